//! Typed operations, one group per entity.
//!
//! Each group borrows the client; obtain one with e.g.
//! [`EvidenciasClient::events`](crate::EvidenciasClient::events). Required
//! fields are checked before any request is sent; everything else is left to
//! the server and its errors are returned unchanged.

mod attendance;
mod events;
mod files;
mod notes;
mod users;

pub use attendance::AttendanceApi;
pub use events::EventsApi;
pub use files::FilesApi;
pub use notes::NotesApi;
pub use users::UsersApi;
