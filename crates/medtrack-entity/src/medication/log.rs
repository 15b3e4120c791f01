//! Medication intake log entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a scheduled medication intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntakeStatus {
    /// The dose was taken.
    Taken,
    /// The dose was missed.
    Missed,
    /// The dose was postponed.
    Postponed,
}

impl IntakeStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Taken => "taken",
            Self::Missed => "missed",
            Self::Postponed => "postponed",
        }
    }
}

/// A recorded intake event for a medication.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeLog {
    /// Unique log identifier.
    #[serde(alias = "_id")]
    pub id: String,
    /// The medication this log belongs to.
    pub medication: String,
    /// Intake outcome.
    pub status: IntakeStatus,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// When the dose was (or should have been) taken.
    pub taken_at: DateTime<Utc>,
}

/// Data required to record an intake.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogIntake {
    /// Intake outcome.
    pub status: IntakeStatus,
    /// Free-form notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// When the dose was taken.
    pub taken_at: DateTime<Utc>,
}
