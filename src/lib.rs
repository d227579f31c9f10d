//! # Lanekeeper
//!
//! Ordered-position reordering core for a lightweight kanban tracker.
//!
//! Cards live in priority columns, one dense zero-based position sequence
//! per `(board, priority)` group. This crate provides the invariant and its
//! checker, the move planner and service that relocate a card while keeping
//! every affected group densely numbered, the optimistic client-side
//! prediction shown before the server confirms, and the reload-based
//! reconciliation that keeps the store the single source of truth. It does
//! not depend on any UI and talks to persistence only through the
//! [`store::CardStore`] trait.

pub mod domain;
pub mod error;
pub mod reorder;
pub mod store;

// Re-export commonly used types
pub use domain::{
    card::{BoardId, Card, CardId, CardStatus, Priority},
    position::{group_by_column, repair_positions, verify_positions, ColumnKey},
};
pub use error::{LaneError, Result};
pub use reorder::{
    optimistic::{predict, resolve_drop, DropTarget},
    plan::{plan_move, MoveRequest, PositionUpdate},
    service::MoveService,
    view::BoardView,
};
pub use store::CardStore;
