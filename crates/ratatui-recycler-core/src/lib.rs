//! `ratatui-recycler-core` renders a document tree as a virtualized list of recycled holders.
//!
//! Only the visible top-level blocks of a document are materialized at any time. Each block is
//! drawn by the [`entry::Entry`] registered for its node variant; holders that scroll out of
//! view are pooled by [`registry::ViewType`] and rebound to other blocks of the same type.
//!
//! ## Pieces
//!
//! - [`node::Node`]: owned document tree with a variant tag per node.
//! - [`reducer::Reducer`]: flattens a tree into list items ([`reducer::TopLevelReducer`] keeps
//!   the root's direct children).
//! - [`registry::AdapterBuilder`]: registers entries per [`node::NodeVariant`], a default entry
//!   and a reducer, then builds a [`adapter::RecyclerAdapter`].
//! - [`adapter::RecyclerAdapter`]: answers count / view type / stable id / create / bind.
//! - [`recycler_view::RecyclerView`]: ratatui host driving the adapter through `virtualizer`.
//!
//! Parsing and rendering of markdown live in `ratatui-recycler-markdown`; this crate only sees
//! them through [`entry::DocumentContext`].
//!
//! Everything runs on the caller's thread. `submit` replaces the previous document wholesale,
//! and the `&mut self` receivers keep queries from overlapping with it.
pub mod theme;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

pub mod error;
pub mod node;
pub mod viewport;

pub mod entry;
pub mod holder;
pub mod reducer;
pub mod registry;

pub mod adapter;
pub mod recycler_view;
