use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Identifier of the board a card belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(u64);

impl BoardId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a card, stable for the card's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(u64);

impl CardId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Priority column a card lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// All priorities in board display order (leftmost column first)
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

impl FromStr for Priority {
    type Err = crate::error::LaneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(crate::error::LaneError::InvalidPriority(other.to_string())),
        }
    }
}

/// Workflow status of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    Todo,
    InProgress,
    Done,
}

impl CardStatus {
    /// Completed cards are hidden from the interactive board but still
    /// occupy a slot in their column's position sequence.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Todo => write!(f, "To Do"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Done => write!(f, "Done"),
        }
    }
}

/// A kanban card
///
/// `priority` and `position` place the card on the board; everything else is
/// payload the reordering logic carries but never inspects, except that
/// completed cards are filtered from the visible board surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub board: BoardId,
    pub title: String,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub status: CardStatus,
    pub priority: Priority,
    pub position: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    /// Creates a new card at the given board slot
    pub fn new(id: CardId, board: BoardId, title: String, priority: Priority, position: u32) -> Self {
        let now = Utc::now();
        Self {
            id,
            board,
            title,
            description: None,
            assignee: None,
            status: CardStatus::Todo,
            priority,
            position,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the title
    pub fn set_title(&mut self, title: String) {
        self.title = title;
        self.updated_at = Utc::now();
    }

    /// Sets the description
    pub fn set_description(&mut self, description: String) {
        self.description = Some(description);
        self.updated_at = Utc::now();
    }

    /// Assigns the card to a team member
    pub fn assign(&mut self, assignee: String) {
        self.assignee = Some(assignee);
        self.updated_at = Utc::now();
    }

    /// Clears the assignee
    pub fn unassign(&mut self) {
        self.assignee = None;
        self.updated_at = Utc::now();
    }

    /// Changes the workflow status
    pub fn set_status(&mut self, status: CardStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Places the card at a board slot, touching `updated_at`
    pub(crate) fn place(&mut self, priority: Priority, position: u32) {
        self.priority = priority;
        self.position = position;
        self.updated_at = Utc::now();
    }
}
