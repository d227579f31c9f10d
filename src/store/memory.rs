use crate::{
    domain::card::{BoardId, Card, CardId},
    error::{LaneError, Result},
    reorder::plan::PositionUpdate,
    store::{column_order_key, CardStore},
};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory card store, used by tests and embeddable callers.
#[derive(Default)]
pub struct MemoryStore {
    cards: RwLock<HashMap<CardId, Card>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with an initial card set
    pub async fn with_cards(cards: Vec<Card>) -> Self {
        let store = Self::new();
        {
            let mut map = store.cards.write().await;
            for card in cards {
                map.insert(card.id, card);
            }
        }
        store
    }
}

#[async_trait]
impl CardStore for MemoryStore {
    async fn save_card(&self, card: &Card) -> Result<()> {
        self.cards.write().await.insert(card.id, card.clone());
        Ok(())
    }

    async fn load_card(&self, id: CardId) -> Result<Card> {
        self.cards
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(LaneError::CardNotFound(id))
    }

    async fn list_cards(&self, board: BoardId) -> Result<Vec<Card>> {
        let map = self.cards.read().await;
        let mut cards: Vec<Card> = map.values().filter(|c| c.board == board).cloned().collect();
        cards.sort_by_key(column_order_key);
        Ok(cards)
    }

    async fn delete_card(&self, id: CardId) -> Result<()> {
        self.cards
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(LaneError::CardNotFound(id))
    }

    async fn apply_position_batch(&self, updates: &[PositionUpdate]) -> Result<()> {
        let mut map = self.cards.write().await;

        // Reject the whole batch before touching anything
        for update in updates {
            if !map.contains_key(&update.card_id) {
                return Err(LaneError::CardNotFound(update.card_id));
            }
        }

        for update in updates {
            if let Some(card) = map.get_mut(&update.card_id) {
                let priority = update.priority.unwrap_or(card.priority);
                card.place(priority, update.position);
            }
        }
        Ok(())
    }
}
