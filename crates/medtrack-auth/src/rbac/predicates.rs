//! Pure authorization predicates over a user record.
//!
//! These functions are side-effect free and never consult the session.
//! A missing user always evaluates to false, as does the catch-all
//! [`Role::Unknown`] — there is no wildcard role.
//!
//! Note: `has_any_role` with an empty role slice returns false. The
//! "empty set means any authenticated user" convention belongs to the
//! route guard, which never consults the engine for empty requirements.

use medtrack_entity::user::{Role, User};

/// Whether the user holds exactly the given role.
pub fn has_role(user: Option<&User>, role: Role) -> bool {
    match user {
        Some(user) => user.role != Role::Unknown && user.role == role,
        None => false,
    }
}

/// Whether the user holds any of the given roles.
pub fn has_any_role(user: Option<&User>, roles: &[Role]) -> bool {
    match user {
        Some(user) => user.role != Role::Unknown && roles.contains(&user.role),
        None => false,
    }
}

/// Whether the user is an administrator.
pub fn is_admin(user: Option<&User>) -> bool {
    has_role(user, Role::Admin)
}

/// Whether the user is a doctor.
pub fn is_doctor(user: Option<&User>) -> bool {
    has_role(user, Role::Doctor)
}

/// Whether the user is a nurse.
pub fn is_nurse(user: Option<&User>) -> bool {
    has_role(user, Role::Nurse)
}

/// Whether the user is a patient.
pub fn is_patient(user: Option<&User>) -> bool {
    has_role(user, Role::Patient)
}

/// Whether the user is a healthcare provider (doctor or nurse).
pub fn is_healthcare_provider(user: Option<&User>) -> bool {
    has_any_role(user, &[Role::Doctor, Role::Nurse])
}

/// Whether the user can prescribe medications (admin or doctor).
pub fn can_prescribe_medications(user: Option<&User>) -> bool {
    has_any_role(user, &[Role::Admin, Role::Doctor])
}

/// Whether the user can view all patients' medications (admin only).
pub fn can_view_all_medications(user: Option<&User>) -> bool {
    is_admin(user)
}

/// Whether the user can manage user accounts (admin only).
pub fn can_manage_users(user: Option<&User>) -> bool {
    is_admin(user)
}
