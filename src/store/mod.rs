use crate::{
    domain::card::{BoardId, Card, CardId},
    error::Result,
    reorder::plan::PositionUpdate,
};
use async_trait::async_trait;

pub mod memory;

#[cfg(feature = "file-store")]
pub mod file_store;

pub use memory::MemoryStore;

#[cfg(feature = "file-store")]
pub use file_store::FileStore;

/// Storage trait for persisting cards.
///
/// The reordering core treats the store as the single source of truth:
/// `list_cards` feeds both the move planner's snapshot and the client's
/// reconciliation reload, and `apply_position_batch` is the one mutation the
/// core issues. Implementations must validate every card referenced by a
/// batch before writing anything, so a rejected batch leaves no partial
/// shift visible.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Saves a card (insert or update)
    async fn save_card(&self, card: &Card) -> Result<()>;

    /// Loads a card by ID
    async fn load_card(&self, id: CardId) -> Result<Card>;

    /// Lists all cards of a board, ordered by column and position
    async fn list_cards(&self, board: BoardId) -> Result<Vec<Card>>;

    /// Deletes a card
    async fn delete_card(&self, id: CardId) -> Result<()>;

    /// Applies a batch of position/priority writes, all or none visible
    async fn apply_position_batch(&self, updates: &[PositionUpdate]) -> Result<()>;
}

pub(crate) fn column_order_key(card: &Card) -> (BoardId, u8, u32) {
    let lane = crate::domain::card::Priority::ALL
        .iter()
        .position(|p| *p == card.priority)
        .unwrap_or(usize::MAX) as u8;
    (card.board, lane, card.position)
}
