//! `ratatui-recycler` renders large documents in a ratatui terminal by materializing only the
//! blocks on screen and recycling their holders as the view scrolls.
//!
//! This crate re-exports `ratatui-recycler-core` and, behind the `markdown` feature, the
//! pulldown-cmark based collaborators from `ratatui-recycler-markdown`.
//!
//! ## Features
//!
//! - `markdown`: `markdown` module with the parser, renderer and block entries.
//! - `crossterm`: `crossterm_input` mapping of crossterm events to scroll commands.
pub use ratatui_recycler_core::adapter;
pub use ratatui_recycler_core::entry;
pub use ratatui_recycler_core::error;
pub use ratatui_recycler_core::holder;
pub use ratatui_recycler_core::node;
pub use ratatui_recycler_core::recycler_view;
pub use ratatui_recycler_core::reducer;
pub use ratatui_recycler_core::registry;
pub use ratatui_recycler_core::theme;
pub use ratatui_recycler_core::viewport;

#[cfg(feature = "crossterm")]
pub use ratatui_recycler_core::crossterm_input;

#[cfg(feature = "markdown")]
pub use ratatui_recycler_markdown as markdown;
