//! Markdown collaborators for `ratatui-recycler-core`.
//!
//! - [`parse::parse_markdown`]: pulldown-cmark events to an owned [`Node`] tree, with source
//!   spans on every node.
//! - [`render::MarkdownRenderer`]: the [`DocumentContext`] that parses and renders any node into
//!   styled `Text`.
//! - [`entries`]: heading, code block and table entries, and [`entries::markdown_adapter`] which
//!   registers them.
//!
//! ```ignore
//! use std::sync::Arc;
//! use ratatui_recycler_markdown::entries::markdown_adapter;
//! use ratatui_recycler_markdown::render::MarkdownRenderer;
//!
//! let mut adapter = markdown_adapter().build();
//! adapter.submit_markdown(Arc::new(MarkdownRenderer::new()), "# Title\n\nBody.\n");
//! assert_eq!(adapter.count(), 2);
//! ```
//!
//! [`Node`]: ratatui_recycler_core::node::Node
//! [`DocumentContext`]: ratatui_recycler_core::entry::DocumentContext
pub mod entries;
pub mod options;
pub mod parse;
pub mod render;

pub use entries::markdown_adapter;
pub use options::MarkdownOptions;
pub use render::MarkdownRenderer;
