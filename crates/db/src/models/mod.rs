//! Row structs and insert/update DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row and, where the table is written from more than one
//! place, a create DTO. Enum columns are stored as text and decoded through
//! the `TryFrom<String>` impls in `evidencias_core`.

pub mod attendance;
pub mod audit;
pub mod event;
pub mod event_file;
pub mod note;
pub mod session;
pub mod user;
