//! Client-side view state caches.
//!
//! These hold the last fetched server data so screens can render without
//! re-fetching; every mutation reconciles the cache from the server's
//! response rather than guessing locally.

mod medications;
mod users;

pub use medications::MedicationsState;
pub use users::UsersState;

/// Paging position of a cached list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based index of the cached page.
    pub current_page: u32,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total items across all pages.
    pub total_items: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_items: 0,
        }
    }
}
