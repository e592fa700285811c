//! Core types for the practice tracker.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Lifecycle status of a practice session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Planned,
    Completed,
    Cancelled,
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self::Planned
    }
}

impl SessionStatus {
    /// Status name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "Planned",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Parse from the stored form.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "Planned" => Ok(Self::Planned),
            "Completed" => Ok(Self::Completed),
            "Cancelled" => Ok(Self::Cancelled),
            other => Err(DomainError::UnknownSessionStatus {
                value: other.to_string(),
            }),
        }
    }
}

/// Repertoire status of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PieceStatus {
    #[serde(rename = "In Training")]
    InTraining,
    Repertoire,
}

impl Default for PieceStatus {
    fn default() -> Self {
        Self::InTraining
    }
}

impl PieceStatus {
    /// Status name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InTraining => "In Training",
            Self::Repertoire => "Repertoire",
        }
    }

    /// Parse from the stored form.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "In Training" => Ok(Self::InTraining),
            "Repertoire" => Ok(Self::Repertoire),
            other => Err(DomainError::UnknownPieceStatus {
                value: other.to_string(),
            }),
        }
    }
}

/// Streak information derived from a user's distinct practice days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    /// Consecutive practice days ending today (or yesterday).
    pub current_streak: u32,
    /// Longest run of consecutive days anywhere in the supplied window.
    pub longest_streak: u32,
    /// Number of distinct practice days supplied.
    pub total_practice_days: u32,
    /// Most recent practice day, if any.
    pub last_practice_date: Option<NaiveDate>,
}

impl StreakSummary {
    /// Summary for a user with no completed practice at all.
    pub fn empty() -> Self {
        Self {
            current_streak: 0,
            longest_streak: 0,
            total_practice_days: 0,
            last_practice_date: None,
        }
    }
}
