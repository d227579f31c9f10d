//! The client's board projection and its reconciliation contract.
//!
//! A [`BoardView`] is a disposable snapshot of one board's cards, never
//! authoritative. After every move request completes, success or failure,
//! the view reloads the full card list and replaces its state wholesale; no
//! merge or diff is attempted. That bounds any divergence between the
//! optimistic prediction and the store to one round trip, and rollback on
//! failure is the same reload.

use crate::{
    domain::card::{BoardId, Card, Priority},
    error::Result,
    reorder::{
        optimistic::{predict, resolve_drop, DropTarget},
        plan::MoveRequest,
        service::MoveService,
    },
    store::CardStore,
};
use crate::domain::card::CardId;
use tracing::debug;

/// Locally held projection of one board.
pub struct BoardView {
    board: BoardId,
    cards: Vec<Card>,
}

impl BoardView {
    /// Loads the board's canonical card list from the store
    pub async fn load(store: &dyn CardStore, board: BoardId) -> Result<Self> {
        let cards = store.list_cards(board).await?;
        Ok(Self { board, cards })
    }

    pub fn board(&self) -> BoardId {
        self.board
    }

    /// The full local card list, completed cards included
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// The cards rendered in one column: position-ordered, completed cards
    /// hidden. Hidden cards still occupy slots in the underlying sequence,
    /// so the rendered list may skip position values.
    pub fn visible_column(&self, priority: Priority) -> Vec<&Card> {
        let mut column: Vec<&Card> = self
            .cards
            .iter()
            .filter(|c| c.priority == priority && !c.status.is_completed())
            .collect();
        column.sort_by_key(|c| c.position);
        column
    }

    /// Replaces local state with a fresh canonical read
    pub async fn refresh(&mut self, store: &dyn CardStore) -> Result<()> {
        self.cards = store.list_cards(self.board).await?;
        debug!(board = %self.board, cards = self.cards.len(), "board view reloaded");
        Ok(())
    }

    /// Maps a drop gesture onto the local snapshot
    pub fn resolve_drop(&self, card_id: CardId, target: &DropTarget) -> Result<MoveRequest> {
        resolve_drop(&self.cards, card_id, target)
    }

    /// Executes a move with optimistic rendering semantics: the predicted
    /// arrangement replaces local state immediately, the request is issued,
    /// and the view reloads from the store whatever the outcome. The move's
    /// own result is returned after the reload.
    pub async fn move_card(&mut self, service: &MoveService, request: &MoveRequest) -> Result<()> {
        if let Ok(predicted) = predict(&self.cards, request) {
            self.cards = predicted;
        }

        let outcome = service.move_card(request).await;
        if outcome.is_err() {
            debug!(board = %self.board, "move failed, rolling back via reload");
        }
        self.refresh(service.store().as_ref()).await?;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::{CardStatus, Priority};
    use crate::domain::position::verify_positions;
    use crate::store::MemoryStore;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn card(id: u64, priority: Priority, position: u32) -> Card {
        Card::new(
            CardId::new(id),
            BoardId::new(1),
            format!("Card {id}"),
            priority,
            position,
        )
    }

    fn request(card_id: u64, priority: Priority, position: u32) -> MoveRequest {
        MoveRequest {
            card_id: CardId::new(card_id),
            board: BoardId::new(1),
            target_priority: priority,
            target_position: position,
        }
    }

    fn placements(cards: &[Card]) -> HashMap<u64, (Priority, u32)> {
        cards
            .iter()
            .map(|c| (c.id.value(), (c.priority, c.position)))
            .collect()
    }

    async fn setup(cards: Vec<Card>) -> (MoveService, BoardView) {
        let store = Arc::new(MemoryStore::with_cards(cards).await);
        let view = BoardView::load(store.as_ref(), BoardId::new(1)).await.unwrap();
        (MoveService::new(store), view)
    }

    #[tokio::test]
    async fn test_visible_column_hides_completed() {
        let mut done = card(2, Priority::High, 1);
        done.set_status(CardStatus::Done);

        let (_, view) = setup(vec![
            card(1, Priority::High, 0),
            done,
            card(3, Priority::High, 2),
        ])
        .await;

        let visible: Vec<u64> = view
            .visible_column(Priority::High)
            .iter()
            .map(|c| c.id.value())
            .collect();
        assert_eq!(visible, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_move_converges_with_store() {
        let (service, mut view) = setup(vec![
            card(1, Priority::High, 0),
            card(2, Priority::High, 1),
            card(3, Priority::Medium, 0),
        ])
        .await;

        view.move_card(&service, &request(1, Priority::Medium, 1))
            .await
            .unwrap();

        let canonical = service.store().list_cards(BoardId::new(1)).await.unwrap();
        verify_positions(&canonical).unwrap();
        assert_eq!(placements(view.cards()), placements(&canonical));
    }

    #[tokio::test]
    async fn test_failed_move_rolls_back_via_reload() {
        let (service, mut view) = setup(vec![card(1, Priority::High, 0), card(2, Priority::High, 1)]).await;
        let before = placements(view.cards());

        let err = view
            .move_card(&service, &request(42, Priority::Low, 0))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "card_not_found");

        // Local state equals canonical state again
        assert_eq!(placements(view.cards()), before);
    }

    #[tokio::test]
    async fn test_refresh_replaces_state_wholesale() {
        let (service, mut view) = setup(vec![card(1, Priority::High, 0)]).await;

        // Another client moves the card behind this view's back
        service
            .move_card(&request(1, Priority::Low, 0))
            .await
            .unwrap();
        assert_eq!(view.cards()[0].priority, Priority::High);

        view.refresh(service.store().as_ref()).await.unwrap();
        assert_eq!(view.cards()[0].priority, Priority::Low);
    }

    #[tokio::test]
    async fn test_drop_resolution_through_view() {
        let (service, mut view) = setup(vec![
            card(1, Priority::High, 0),
            card(2, Priority::High, 1),
            card(3, Priority::Medium, 0),
        ])
        .await;

        let req = view
            .resolve_drop(CardId::new(1), &DropTarget::After(CardId::new(3)))
            .unwrap();
        view.move_card(&service, &req).await.unwrap();

        let after = placements(view.cards());
        assert_eq!(after[&3], (Priority::Medium, 0));
        assert_eq!(after[&1], (Priority::Medium, 1));
        assert_eq!(after[&2], (Priority::High, 0));
    }
}
