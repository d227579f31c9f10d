//! Applies planned moves against the store.
//!
//! The planner in [`crate::reorder::plan`] is pure; this service owns the
//! read-plan-write span. A per-board async mutex is held across that span so
//! two moves touching the same board serialize instead of planning from
//! overlapping stale snapshots, which is the one way the position invariant
//! could break.

use crate::{
    domain::card::{BoardId, Card, CardId, Priority},
    error::Result,
    reorder::plan::{plan_insert, plan_move, plan_remove, MoveRequest},
    store::CardStore,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Executes move, create, and delete requests while keeping every affected
/// column group densely numbered.
pub struct MoveService {
    store: Arc<dyn CardStore>,
    board_locks: Mutex<HashMap<BoardId, Arc<tokio::sync::Mutex<()>>>>,
}

impl MoveService {
    pub fn new(store: Arc<dyn CardStore>) -> Self {
        Self {
            store,
            board_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn CardStore> {
        &self.store
    }

    fn board_lock(&self, board: BoardId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .board_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(board).or_default().clone()
    }

    /// Moves a card to `(target_priority, target_position)`, shifting its
    /// siblings per the dense-ordering rules. Validation failures and
    /// unknown cards reject the request before any write.
    pub async fn move_card(&self, request: &MoveRequest) -> Result<()> {
        let lock = self.board_lock(request.board);
        let _guard = lock.lock().await;

        let snapshot = self.store.list_cards(request.board).await?;
        let updates = plan_move(&snapshot, request)?;
        if updates.is_empty() {
            debug!(card = %request.card_id, "move is a no-op");
            return Ok(());
        }

        debug!(
            card = %request.card_id,
            board = %request.board,
            target = %request.target_priority,
            position = request.target_position,
            writes = updates.len(),
            "applying move batch"
        );
        self.store.apply_position_batch(&updates).await
    }

    /// Creates a card at the end of its column group and returns it
    pub async fn create_card(
        &self,
        id: CardId,
        board: BoardId,
        title: String,
        priority: Priority,
    ) -> Result<Card> {
        let lock = self.board_lock(board);
        let _guard = lock.lock().await;

        let snapshot = self.store.list_cards(board).await?;
        let position = plan_insert(&snapshot, board, priority);
        let card = Card::new(id, board, title, priority, position);

        debug!(card = %card.id, board = %board, position, "creating card");
        self.store.save_card(&card).await?;
        Ok(card)
    }

    /// Deletes a card, shifting the siblings after it down by one
    pub async fn delete_card(&self, board: BoardId, id: CardId) -> Result<()> {
        let lock = self.board_lock(board);
        let _guard = lock.lock().await;

        let snapshot = self.store.list_cards(board).await?;
        let updates = plan_remove(&snapshot, id)?;

        debug!(card = %id, board = %board, shifts = updates.len(), "deleting card");
        self.store.delete_card(id).await?;
        self.store.apply_position_batch(&updates).await
    }
}
