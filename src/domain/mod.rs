pub mod card;
pub mod position;

pub use card::{BoardId, Card, CardId, CardStatus, Priority};
pub use position::{group_by_column, repair_positions, verify_positions, ColumnKey};
