//! Page state for the application screens, without rendering.
//!
//! Every page owns one round trip at a time: it issues a call, and on
//! success replaces its data. On failure it keeps what it had and records
//! the error text in `last_error` for the notification the UI shows.

mod event_detail;
mod event_form;
mod event_list;
mod login;
mod users;

pub use event_detail::{EventDetailPage, Tab, TabContent};
pub use event_form::{EventForm, EventFormPage};
pub use event_list::EventListPage;
pub use login::LoginPage;
pub use users::UsersPage;

use crate::error::ClientError;

/// Record the outcome of an action on a page and hand it back.
fn track<T>(last_error: &mut Option<String>, result: Result<T, ClientError>) -> Result<T, ClientError> {
    match &result {
        Ok(_) => *last_error = None,
        Err(e) => *last_error = Some(e.to_string()),
    }
    result
}

/// Split a comma separated form field into trimmed, non-empty entries.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
