//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod attendance_repo;
pub mod audit_repo;
pub mod event_file_repo;
pub mod event_repo;
pub mod note_repo;
pub mod session_repo;
pub mod user_repo;

pub use attendance_repo::AttendanceRepo;
pub use audit_repo::AuditLogRepo;
pub use event_file_repo::EventFileRepo;
pub use event_repo::EventRepo;
pub use note_repo::EventNoteRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
