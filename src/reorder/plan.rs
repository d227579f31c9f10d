//! Pure move planning: computes the minimal batch of position writes that
//! realizes a requested move against a snapshot of the affected column
//! group(s).
//!
//! A move shifts every sibling by at most one slot. Same-column moves shift
//! only the range between the old and new position; cross-column moves close
//! the gap left in the source group and open a slot in the target group. The
//! batch preserves the dense zero-based invariant of
//! [`crate::domain::position`] for every group it touches, provided it is
//! applied against the snapshot it was planned from.

use crate::domain::card::{BoardId, Card, CardId, Priority};
use crate::error::{LaneError, Result};
use serde::{Deserialize, Serialize};

/// A request to relocate one card, optionally into a new column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub card_id: CardId,
    pub board: BoardId,
    pub target_priority: Priority,
    pub target_position: u32,
}

/// One entry of a position batch. `priority` is set only when the card
/// changes column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub card_id: CardId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    pub position: u32,
}

/// Computes the position batch realizing `request` against `cards`.
///
/// `cards` must be the full card set of the request's board (other boards may
/// be present; they are ignored). Validation happens before any computation:
/// an unknown card yields [`LaneError::CardNotFound`], an out-of-range target
/// yields [`LaneError::InvalidPosition`]. The valid target range is
/// `0..=group_size` where `group_size` counts the target group excluding the
/// moved card, so `group_size` itself means append at end in both the
/// same-column and the cross-column case.
///
/// A move to the card's current slot returns an empty batch.
pub fn plan_move(cards: &[Card], request: &MoveRequest) -> Result<Vec<PositionUpdate>> {
    let moved = cards
        .iter()
        .find(|c| c.id == request.card_id && c.board == request.board)
        .ok_or(LaneError::CardNotFound(request.card_id))?;

    let old_priority = moved.priority;
    let old_position = moved.position;
    let target = request.target_position;

    let group_size = cards
        .iter()
        .filter(|c| {
            c.board == request.board
                && c.priority == request.target_priority
                && c.id != request.card_id
        })
        .count() as u32;
    if target > group_size {
        return Err(LaneError::InvalidPosition {
            position: target,
            limit: group_size,
        });
    }

    let mut updates = Vec::new();

    if old_priority == request.target_priority {
        if old_position == target {
            return Ok(updates);
        }

        for card in cards {
            if card.board != request.board || card.priority != old_priority || card.id == moved.id {
                continue;
            }
            if old_position < target {
                // Forward move: the range (old, target] slides down one
                if card.position > old_position && card.position <= target {
                    updates.push(PositionUpdate {
                        card_id: card.id,
                        priority: None,
                        position: card.position - 1,
                    });
                }
            } else {
                // Backward move: the range [target, old) slides up one
                if card.position >= target && card.position < old_position {
                    updates.push(PositionUpdate {
                        card_id: card.id,
                        priority: None,
                        position: card.position + 1,
                    });
                }
            }
        }

        updates.push(PositionUpdate {
            card_id: moved.id,
            priority: None,
            position: target,
        });
    } else {
        for card in cards {
            if card.board != request.board || card.id == moved.id {
                continue;
            }
            if card.priority == old_priority && card.position > old_position {
                // Close the gap left behind in the source group
                updates.push(PositionUpdate {
                    card_id: card.id,
                    priority: None,
                    position: card.position - 1,
                });
            } else if card.priority == request.target_priority && card.position >= target {
                // Open a slot in the target group
                updates.push(PositionUpdate {
                    card_id: card.id,
                    priority: None,
                    position: card.position + 1,
                });
            }
        }

        updates.push(PositionUpdate {
            card_id: moved.id,
            priority: Some(request.target_priority),
            position: target,
        });
    }

    Ok(updates)
}

/// Position a newly created card takes in its column group: the current
/// group size, i.e. append at end.
pub fn plan_insert(cards: &[Card], board: BoardId, priority: Priority) -> u32 {
    cards
        .iter()
        .filter(|c| c.board == board && c.priority == priority)
        .count() as u32
}

/// Computes the gap-closing batch for deleting a card: every sibling after
/// it in its column group shifts down by one. The batch does not include the
/// deleted card itself.
pub fn plan_remove(cards: &[Card], card_id: CardId) -> Result<Vec<PositionUpdate>> {
    let removed = cards
        .iter()
        .find(|c| c.id == card_id)
        .ok_or(LaneError::CardNotFound(card_id))?;

    let updates = cards
        .iter()
        .filter(|c| {
            c.id != card_id
                && c.column_key() == removed.column_key()
                && c.position > removed.position
        })
        .map(|c| PositionUpdate {
            card_id: c.id,
            priority: None,
            position: c.position - 1,
        })
        .collect();

    Ok(updates)
}

/// Applies a batch to a locally held card list. Unknown card ids are
/// ignored; the store-side application in [`crate::store`] rejects them
/// instead.
pub fn apply_plan(cards: &mut [Card], updates: &[PositionUpdate]) {
    for update in updates {
        if let Some(card) = cards.iter_mut().find(|c| c.id == update.card_id) {
            let priority = update.priority.unwrap_or(card.priority);
            card.place(priority, update.position);
        }
    }
}
