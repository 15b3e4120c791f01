//! Cached user administration state.

use medtrack_entity::user::User;

/// Last fetched user administration data.
#[derive(Debug, Default)]
pub struct UsersState {
    users: Vec<User>,
    selected: Option<User>,
}

impl UsersState {
    /// Replace the cached user list.
    pub fn set_users(&mut self, users: Vec<User>) {
        self.users = users;
    }

    /// Cache a fetched user as the selected one.
    pub fn select(&mut self, user: User) {
        self.selected = Some(user);
    }

    /// Reconcile a server-updated user into both the list and the
    /// selection, so a role or status change is visible everywhere it is
    /// rendered.
    pub fn apply_user_update(&mut self, user: User) {
        if let Some(cached) = self.users.iter_mut().find(|u| u.id == user.id) {
            *cached = user.clone();
        }
        if self
            .selected
            .as_ref()
            .is_some_and(|selected| selected.id == user.id)
        {
            self.selected = Some(user);
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn selected(&self) -> Option<&User> {
        self.selected.as_ref()
    }
}
