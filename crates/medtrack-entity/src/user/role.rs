//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in the RBAC system.
///
/// The role set is fixed; there is no wildcard role. Values the server
/// sends that are not in this set deserialize to [`Role::Unknown`], which
/// satisfies no predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full system administrator.
    Admin,
    /// Can prescribe and manage medications for patients.
    Doctor,
    /// Can administer medications and record intakes.
    Nurse,
    /// Tracks their own medications.
    Patient,
    /// Catch-all for unrecognized role values from the server.
    #[serde(other, skip_serializing)]
    Unknown,
}

impl Role {
    /// All assignable roles, in privilege order.
    pub const ASSIGNABLE: [Role; 4] = [Role::Admin, Role::Doctor, Role::Nurse, Role::Patient];

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Doctor => "doctor",
            Self::Nurse => "nurse",
            Self::Patient => "patient",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = medtrack_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "doctor" => Ok(Self::Doctor),
            "nurse" => Ok(Self::Nurse),
            "patient" => Ok(Self::Patient),
            _ => Err(medtrack_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, doctor, nurse, patient"
            ))),
        }
    }
}
