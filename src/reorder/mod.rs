pub mod optimistic;
pub mod plan;
pub mod service;
pub mod view;

pub use optimistic::{predict, resolve_drop, DropTarget};
pub use plan::{apply_plan, plan_insert, plan_move, plan_remove, MoveRequest, PositionUpdate};
pub use service::MoveService;
pub use view::BoardView;
