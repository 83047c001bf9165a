use crate::node::NodeVariant;
use crate::registry::ViewType;
use thiserror::Error;

/// Failure reported by an [`crate::entry::Entry`] while creating or binding a holder.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl EntryError {
    pub fn msg(message: impl Into<String>) -> Self {
        EntryError::Message(message.into())
    }
}

#[derive(Debug, Error)]
pub enum AdapterError {
    /// Position queried outside `0..count`. `count` is 0 before the first submit.
    #[error("position {position} out of range for {count} items")]
    OutOfRange { position: usize, count: usize },

    #[error("failed to bind {variant:?} at position {position}")]
    Bind {
        position: usize,
        variant: NodeVariant,
        #[source]
        source: EntryError,
    },

    #[error("failed to create holder for view type {}", view_type.get())]
    Create {
        view_type: ViewType,
        #[source]
        source: EntryError,
    },
}
