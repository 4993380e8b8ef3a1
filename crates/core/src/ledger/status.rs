//! Entry lifecycle.

use chrono::{DateTime, Utc};
use ohada_shared::types::UserId;
use serde::{Deserialize, Serialize};

/// Status of an accounting entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Recorded, no effect on balances.
    Draft,
    /// Applied to account balances.
    Posted,
    /// Locked by a reviewer. Terminal.
    Validated,
    /// Withdrawn. Terminal.
    Cancelled,
}

impl EntryStatus {
    /// Every legal `(from, to)` pair. Anything else is rejected.
    pub const TRANSITIONS: &'static [(Self, Self)] = &[
        (Self::Draft, Self::Posted),
        (Self::Posted, Self::Validated),
        (Self::Draft, Self::Cancelled),
        (Self::Posted, Self::Cancelled),
    ];

    /// Returns true if `self -> to` is in the transition table.
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        Self::TRANSITIONS.contains(&(self, to))
    }

    /// No transition leaves a terminal status.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !Self::TRANSITIONS.iter().any(|(from, _)| *from == self)
    }

    /// Entries in these statuses count towards balances and statements.
    #[must_use]
    pub const fn affects_balances(self) -> bool {
        matches!(self, Self::Posted | Self::Validated)
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Posted => write!(f, "posted"),
            Self::Validated => write!(f, "validated"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A checked status transition with its audit stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EntryAction {
    /// Draft -> Posted.
    Post {
        /// User posting the entry.
        posted_by: UserId,
        /// When it was posted.
        posted_at: DateTime<Utc>,
    },
    /// Posted -> Validated.
    Validate {
        /// User validating the entry.
        validated_by: UserId,
        /// When it was validated.
        validated_at: DateTime<Utc>,
    },
    /// Draft or Posted -> Cancelled.
    Cancel {
        /// User cancelling the entry.
        cancelled_by: UserId,
        /// When it was cancelled.
        cancelled_at: DateTime<Utc>,
        /// The entry was posted, so its balance deltas must be reversed.
        reverses_balances: bool,
    },
}

impl EntryAction {
    /// Status after the action.
    #[must_use]
    pub const fn new_status(&self) -> EntryStatus {
        match self {
            Self::Post { .. } => EntryStatus::Posted,
            Self::Validate { .. } => EntryStatus::Validated,
            Self::Cancel { .. } => EntryStatus::Cancelled,
        }
    }
}
