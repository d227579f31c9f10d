//! Client-side optimistic prediction of a move's outcome.
//!
//! On a drop gesture the board renders the predicted arrangement immediately
//! and sends the move in the background. The prediction is built by running
//! the same planner the server runs ([`crate::reorder::plan::plan_move`])
//! against the locally held card list, so for any given snapshot the
//! predicted `id -> (priority, position)` mapping is identical to the
//! authoritative result. The rendered state stays provisional either way: it
//! is replaced wholesale by a reload once the request completes.

use crate::domain::card::{Card, CardId, Priority};
use crate::error::{LaneError, Result};
use crate::reorder::plan::{apply_plan, plan_move, MoveRequest};

/// Where a dragged card was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Dropped on a column's empty space: append at its end
    Column(Priority),
    /// Dropped on the upper half of a sibling card
    Before(CardId),
    /// Dropped on the lower half of a sibling card
    After(CardId),
}

/// Maps a drop gesture to the move request realizing it.
///
/// Positions index the full column sequence, completed cards included, so a
/// sibling's stored position is usable directly. The one subtlety is a
/// forward move within one column: the dragged card vacates its old slot
/// first, which pulls every later sibling down one, so the raw sibling
/// position overshoots by one.
pub fn resolve_drop(cards: &[Card], card_id: CardId, target: &DropTarget) -> Result<MoveRequest> {
    let dragged = cards
        .iter()
        .find(|c| c.id == card_id)
        .ok_or(LaneError::CardNotFound(card_id))?;

    let (target_priority, target_position) = match target {
        DropTarget::Column(priority) => {
            let group_size = cards
                .iter()
                .filter(|c| c.board == dragged.board && c.priority == *priority && c.id != card_id)
                .count() as u32;
            (*priority, group_size)
        }
        DropTarget::Before(sibling_id) | DropTarget::After(sibling_id) => {
            if *sibling_id == card_id {
                // Dropped back onto itself
                (dragged.priority, dragged.position)
            } else {
                let sibling = cards
                    .iter()
                    .find(|c| c.id == *sibling_id && c.board == dragged.board)
                    .ok_or(LaneError::CardNotFound(*sibling_id))?;

                let same_column = sibling.priority == dragged.priority;
                let forward = same_column && dragged.position < sibling.position;

                let position = match target {
                    DropTarget::Before(_) => {
                        if forward {
                            sibling.position - 1
                        } else {
                            sibling.position
                        }
                    }
                    DropTarget::After(_) => {
                        if forward {
                            sibling.position
                        } else {
                            sibling.position + 1
                        }
                    }
                    DropTarget::Column(_) => unreachable!(),
                };
                (sibling.priority, position)
            }
        }
    };

    Ok(MoveRequest {
        card_id,
        board: dragged.board,
        target_priority,
        target_position,
    })
}

/// Predicts the post-move card list for `request`.
///
/// Returns a new array; the input is never mutated, so an abandoned
/// prediction cannot corrupt the currently rendered state.
pub fn predict(cards: &[Card], request: &MoveRequest) -> Result<Vec<Card>> {
    let updates = plan_move(cards, request)?;
    let mut predicted = cards.to_vec();
    apply_plan(&mut predicted, &updates);
    Ok(predicted)
}
