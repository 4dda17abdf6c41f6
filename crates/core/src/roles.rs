//! User roles and the permission rules that depend on them.

use crate::types::DbId;

text_enum! {
    /// Role assigned to every user. Only an `ADMIN` may change it.
    pub enum UserRole {
        Admin => "ADMIN",
        TecFormacao => "TEC_FORMACAO",
        TecAcompanhamento => "TEC_ACOMPANHAMENTO",
    }
}

impl Default for UserRole {
    /// Self-registered accounts start with the least privileged role.
    fn default() -> Self {
        UserRole::TecAcompanhamento
    }
}

impl UserRole {
    pub fn is_admin(self) -> bool {
        self == UserRole::Admin
    }
}

/// Whether `user_id` (with `role`) may modify an event and its evidence.
pub fn can_edit_event(role: UserRole, user_id: DbId, created_by: DbId) -> bool {
    role.is_admin() || user_id == created_by
}

/// Only administrators delete events.
pub fn can_delete_event(role: UserRole) -> bool {
    role.is_admin()
}

/// A note may be changed by its author or by anyone allowed to edit the event.
pub fn can_modify_note(
    role: UserRole,
    user_id: DbId,
    note_author: DbId,
    event_creator: DbId,
) -> bool {
    user_id == note_author || can_edit_event(role, user_id, event_creator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn role_round_trips_through_text() {
        for role in UserRole::ALL {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), *role);
        }
        assert!("admin".parse::<UserRole>().is_err(), "roles are upper-case");
    }

    #[test]
    fn creator_and_admin_can_edit() {
        let creator = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(can_edit_event(UserRole::TecFormacao, creator, creator));
        assert!(can_edit_event(UserRole::Admin, other, creator));
        assert!(!can_edit_event(UserRole::TecAcompanhamento, other, creator));
    }

    #[test]
    fn only_admin_deletes_events() {
        assert!(can_delete_event(UserRole::Admin));
        assert!(!can_delete_event(UserRole::TecFormacao));
    }

    #[test]
    fn note_author_can_modify_on_foreign_event() {
        let author = Uuid::new_v4();
        let creator = Uuid::new_v4();
        assert!(can_modify_note(UserRole::TecAcompanhamento, author, author, creator));
        assert!(!can_modify_note(
            UserRole::TecAcompanhamento,
            Uuid::new_v4(),
            author,
            creator
        ));
    }
}
