//! Medication domain entities.

pub mod log;
pub mod model;

pub use log::{IntakeLog, IntakeStatus, LogIntake};
pub use model::{CreateMedication, Medication, UpdateMedication};
