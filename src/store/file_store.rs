use crate::{
    domain::card::{BoardId, Card, CardId},
    error::{LaneError, Result},
    reorder::plan::PositionUpdate,
    store::{column_order_key, CardStore},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-based card store: one pretty-printed JSON document per card under
/// a `.lanekeeper` directory.
pub struct FileStore {
    root_path: PathBuf,
}

impl FileStore {
    const LANEKEEPER_DIR: &'static str = ".lanekeeper";
    const CARDS_DIR: &'static str = "cards";

    /// Creates a new FileStore instance for the given project root
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::LANEKEEPER_DIR),
        }
    }

    fn cards_dir(&self) -> PathBuf {
        self.root_path.join(Self::CARDS_DIR)
    }

    fn card_file(&self, id: CardId) -> PathBuf {
        self.cards_dir().join(format!("{id}.json"))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }

    /// Creates the directory structure
    pub async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;
        self.ensure_directory_exists(&self.cards_dir()).await?;

        let gitignore_path = self.root_path.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(gitignore_path, "# Local caches\n*.tmp\n").await?;
        }

        Ok(())
    }

    /// Checks if the store directory has been created
    pub async fn is_initialized(&self) -> bool {
        self.cards_dir().exists()
    }

    async fn read_card(&self, path: &Path) -> Result<Card> {
        let contents = fs::read_to_string(path).await?;
        let card: Card = serde_json::from_str(&contents)?;
        Ok(card)
    }

    async fn write_card(&self, card: &Card) -> Result<()> {
        let json = serde_json::to_string_pretty(card)?;
        fs::write(self.card_file(card.id), json).await?;
        Ok(())
    }
}

#[async_trait]
impl CardStore for FileStore {
    async fn save_card(&self, card: &Card) -> Result<()> {
        if !self.is_initialized().await {
            return Err(LaneError::StoreNotInitialized);
        }
        self.write_card(card).await
    }

    async fn load_card(&self, id: CardId) -> Result<Card> {
        let path = self.card_file(id);
        if !path.exists() {
            return Err(LaneError::CardNotFound(id));
        }
        self.read_card(&path).await
    }

    async fn list_cards(&self, board: BoardId) -> Result<Vec<Card>> {
        let cards_dir = self.cards_dir();
        if !cards_dir.exists() {
            return Err(LaneError::StoreNotInitialized);
        }

        let mut entries = fs::read_dir(&cards_dir).await?;
        let mut cards: Vec<Card> = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let card = self.read_card(&path).await?;
            if card.board == board {
                cards.push(card);
            }
        }

        cards.sort_by_key(column_order_key);
        Ok(cards)
    }

    async fn delete_card(&self, id: CardId) -> Result<()> {
        let path = self.card_file(id);
        if !path.exists() {
            return Err(LaneError::CardNotFound(id));
        }
        fs::remove_file(path).await?;
        Ok(())
    }

    async fn apply_position_batch(&self, updates: &[PositionUpdate]) -> Result<()> {
        // Load every referenced card up front so an unknown id rejects the
        // batch before any file is rewritten
        let mut cards = Vec::with_capacity(updates.len());
        for update in updates {
            cards.push(self.load_card(update.card_id).await?);
        }

        for (card, update) in cards.iter_mut().zip(updates) {
            let priority = update.priority.unwrap_or(card.priority);
            card.place(priority, update.position);
            self.write_card(card).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::Priority;
    use tempfile::TempDir;

    fn card(id: u64, priority: Priority, position: u32) -> Card {
        Card::new(
            CardId::new(id),
            BoardId::new(1),
            format!("Card {id}"),
            priority,
            position,
        )
    }

    #[tokio::test]
    async fn test_initialization() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        assert!(!store.is_initialized().await);
        store.initialize().await.unwrap();
        assert!(store.is_initialized().await);
        assert!(store.cards_dir().exists());
    }

    #[tokio::test]
    async fn test_save_before_initialize_fails() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        let err = store.save_card(&card(1, Priority::High, 0)).await.unwrap_err();
        assert!(matches!(err, LaneError::StoreNotInitialized));
    }

    #[tokio::test]
    async fn test_save_load_delete_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        store.initialize().await.unwrap();

        let c = card(1, Priority::High, 0);
        store.save_card(&c).await.unwrap();

        let loaded = store.load_card(c.id).await.unwrap();
        assert_eq!(loaded.id, c.id);
        assert_eq!(loaded.priority, Priority::High);

        store.delete_card(c.id).await.unwrap();
        assert!(store.load_card(c.id).await.is_err());
    }

    #[tokio::test]
    async fn test_list_cards_ordered_by_column_and_position() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        store.initialize().await.unwrap();

        store.save_card(&card(1, Priority::Low, 0)).await.unwrap();
        store.save_card(&card(2, Priority::High, 1)).await.unwrap();
        store.save_card(&card(3, Priority::High, 0)).await.unwrap();

        let cards = store.list_cards(BoardId::new(1)).await.unwrap();
        let ids: Vec<u64> = cards.iter().map(|c| c.id.value()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_list_cards_ignores_other_boards() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        store.initialize().await.unwrap();

        let mut foreign = card(9, Priority::High, 0);
        foreign.board = BoardId::new(2);
        store.save_card(&card(1, Priority::High, 0)).await.unwrap();
        store.save_card(&foreign).await.unwrap();

        let cards = store.list_cards(BoardId::new(1)).await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id.value(), 1);
    }

    #[tokio::test]
    async fn test_batch_rejects_unknown_card_before_writing() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        store.initialize().await.unwrap();
        store.save_card(&card(1, Priority::High, 0)).await.unwrap();

        let updates = vec![
            PositionUpdate {
                card_id: CardId::new(1),
                priority: None,
                position: 5,
            },
            PositionUpdate {
                card_id: CardId::new(42),
                priority: None,
                position: 0,
            },
        ];
        assert!(store.apply_position_batch(&updates).await.is_err());

        let untouched = store.load_card(CardId::new(1)).await.unwrap();
        assert_eq!(untouched.position, 0);
    }
}
