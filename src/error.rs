use crate::domain::card::{BoardId, CardId, Priority};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LaneError>;

#[derive(Debug, Error)]
pub enum LaneError {
    #[error("Card not found: {0}")]
    CardNotFound(CardId),

    #[error("Invalid priority: {0}")]
    InvalidPriority(String),

    #[error("Invalid position {position}: must be in 0..={limit}")]
    InvalidPosition { position: u32, limit: u32 },

    #[error("Position invariant violated for board {board} priority {priority}: {detail}")]
    PositionInvariant {
        board: BoardId,
        priority: Priority,
        detail: String,
    },

    #[error("Store not initialized")]
    StoreNotInitialized,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LaneError {
    /// Stable error code for the move endpoint contract.
    pub fn code(&self) -> &'static str {
        match self {
            Self::CardNotFound(_) => "card_not_found",
            Self::InvalidPriority(_) | Self::InvalidPosition { .. } => "missing_fields",
            Self::PositionInvariant { .. } => "position_invariant",
            Self::StoreNotInitialized | Self::Storage(_) | Self::Io(_) | Self::Serialization(_) => {
                "storage_error"
            }
        }
    }
}
