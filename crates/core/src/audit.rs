//! Audit trail vocabulary.
//!
//! Every mutation (and login, logout and export) is recorded with one of the
//! actions below against one of the entity names.

pub mod action {
    pub const CREATE: &str = "CREATE";
    pub const UPDATE: &str = "UPDATE";
    pub const DELETE: &str = "DELETE";
    pub const LOGIN: &str = "LOGIN";
    pub const LOGOUT: &str = "LOGOUT";
    pub const UPLOAD: &str = "UPLOAD";
    pub const IMPORT: &str = "IMPORT";
    pub const EXPORT_CSV: &str = "EXPORT_CSV";
    pub const DEACTIVATE: &str = "DEACTIVATE";
    pub const ROLE_CHANGE: &str = "ROLE_CHANGE";
}

pub mod entity {
    pub const USER: &str = "user";
    pub const EVENT: &str = "event";
    pub const FILE: &str = "file";
    pub const ATTENDANCE: &str = "attendance";
    pub const NOTE: &str = "note";
}

/// Default and maximum page size for audit log listings.
pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 200;

/// Clamp caller-supplied paging to sane bounds.
pub fn clamp_page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paging_is_clamped() {
        assert_eq!(clamp_page(None, None), (DEFAULT_PAGE_SIZE, 0));
        assert_eq!(clamp_page(Some(10_000), Some(-5)), (MAX_PAGE_SIZE, 0));
        assert_eq!(clamp_page(Some(0), Some(20)), (1, 20));
    }
}
