//! Medication entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A prescribed medication tracked for a patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    /// Unique medication identifier.
    #[serde(alias = "_id")]
    pub id: String,
    /// Medication name.
    pub name: String,
    /// Dosage description (e.g. "200mg").
    pub dosage: String,
    /// Intake frequency (e.g. "twice daily").
    pub frequency: String,
    /// Free-form intake instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// When the prescription starts.
    pub start_date: DateTime<Utc>,
    /// When the prescription ends, if bounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    /// The patient this medication belongs to.
    pub patient: String,
    /// The user who prescribed it, when recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescribed_by: Option<String>,
    /// Whether the prescription is currently active.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Data required to create a new medication.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMedication {
    /// Medication name.
    pub name: String,
    /// Dosage description.
    pub dosage: String,
    /// Intake frequency.
    pub frequency: String,
    /// Free-form intake instructions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// When the prescription starts.
    pub start_date: DateTime<Utc>,
    /// When the prescription ends, if bounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    /// The patient the medication is prescribed to.
    pub patient: String,
}

/// Data for updating an existing medication. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMedication {
    /// New medication name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New dosage description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    /// New intake frequency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    /// New intake instructions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// New start date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    /// New end date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    /// New active flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
