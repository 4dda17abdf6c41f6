//! Page state transitions against the mock API.

mod common;

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use common::{attendance_json, event_json, file_json, note_json, user_json, MockServer, MockState, PASSWORD};
use evidencias_client::models::UploadFile;
use evidencias_client::views::{
    EventDetailPage, EventFormPage, EventListPage, LoginPage, Tab, TabContent, UsersPage,
};
use evidencias_client::ClientError;
use evidencias_core::event::{EventFilter, EventStatus, EventType};
use evidencias_core::roles::UserRole;
use uuid::Uuid;

/// Server state with one event holding one item of each kind of evidence.
fn seeded() -> (MockState, Uuid) {
    let event_id = Uuid::new_v4();
    let mut state = MockState::default();
    state.events = vec![event_json(event_id, "Formação de leitura", "FORMACAO", 5)];
    state.files = vec![
        file_json(event_id, "PHOTO", "foto.png"),
        file_json(event_id, "DOC", "ata.pdf"),
    ];
    state.attendance = vec![attendance_json(event_id, "Ana Souza", true)];
    state.notes = vec![note_json(event_id, "Boa participação")];
    (state, event_id)
}

#[tokio::test]
async fn login_page_keeps_fields_and_error_on_failure() {
    let server = MockServer::start(MockState::default()).await;
    let mut page = LoginPage::new(server.client());
    page.email = "ana@escola.test".into();
    page.password = "errada".into();

    assert_matches!(page.submit_login().await, Err(ClientError::Auth(_)));
    assert_eq!(page.last_error.as_deref(), Some("Invalid email or password"));
    assert_eq!(page.email, "ana@escola.test");

    page.password = PASSWORD.into();
    page.submit_login().await.unwrap();
    assert_eq!(page.last_error, None);
}

#[tokio::test]
async fn event_list_refetches_when_filter_changes() {
    let (state, _) = seeded();
    let server = MockServer::start(state).await;
    let mut page = EventListPage::new(server.signed_in().await);

    page.load().await.unwrap();
    assert_eq!(page.events.len(), 1);

    page.apply_filter(EventFilter {
        status: Some(EventStatus::Realizado),
        ..EventFilter::default()
    })
    .await
    .unwrap();
    assert_eq!(server.hits("GET /events"), 2);
    assert_eq!(server.with(|st| st.last_query.clone()).as_deref(), Some("status=REALIZADO"));
}

#[tokio::test]
async fn failed_reload_keeps_previous_events() {
    let (state, _) = seeded();
    let server = MockServer::start(state).await;
    let mut page = EventListPage::new(server.signed_in().await);
    page.load().await.unwrap();

    server.with(|st| {
        st.reject_all = true;
        st.refresh_enabled = false;
    });
    assert!(page.load().await.is_err());
    assert_eq!(page.events.len(), 1);
    assert!(page.last_error.is_some());
}

#[tokio::test]
async fn detail_mount_fetches_event_and_active_tab_only() {
    let (state, event_id) = seeded();
    let server = MockServer::start(state).await;
    let mut page = EventDetailPage::new(server.signed_in().await, event_id);

    page.mount().await.unwrap();
    assert_eq!(page.event.as_ref().unwrap().title, "Formação de leitura");
    assert_matches!(&page.content, TabContent::Photos(files) if files.len() == 1);
    assert_eq!(server.hits(&format!("GET /events/{event_id}/files")), 1);
    assert_eq!(server.hits(&format!("GET /events/{event_id}/attendance")), 0);
    assert_eq!(server.hits(&format!("GET /events/{event_id}/notes")), 0);
}

#[tokio::test]
async fn switching_tabs_refetches_every_time() {
    let (state, event_id) = seeded();
    let server = MockServer::start(state).await;
    let mut page = EventDetailPage::new(server.signed_in().await, event_id);
    page.mount().await.unwrap();

    page.select_tab(Tab::Notes).await.unwrap();
    assert_matches!(&page.content, TabContent::Notes(notes) if notes.len() == 1);
    page.select_tab(Tab::Documents).await.unwrap();
    assert_matches!(&page.content, TabContent::Documents(files) if files[0].filename == "ata.pdf");
    page.select_tab(Tab::Notes).await.unwrap();

    assert_eq!(server.hits(&format!("GET /events/{event_id}/notes")), 2);
    assert_eq!(server.hits(&format!("GET /events/{event_id}/files")), 2);
}

#[tokio::test]
async fn mutations_refetch_and_deletes_patch_locally() {
    let (state, event_id) = seeded();
    let server = MockServer::start(state).await;
    let mut page = EventDetailPage::new(server.signed_in().await, event_id);
    page.mount().await.unwrap();

    page.upload(vec![UploadFile::new("nova.png", "image/png", &b"png"[..])])
        .await
        .unwrap();
    assert_matches!(&page.content, TabContent::Photos(files) if files.len() == 2);
    assert_eq!(server.hits(&format!("GET /events/{event_id}/files")), 2);

    page.select_tab(Tab::Notes).await.unwrap();
    page.add_note("Segunda observação").await.unwrap();
    let note_id = match &page.content {
        TabContent::Notes(notes) => notes[0].id,
        other => panic!("unexpected content {other:?}"),
    };
    let notes_fetches = server.hits(&format!("GET /events/{event_id}/notes"));

    page.delete_note(note_id).await.unwrap();
    assert_matches!(&page.content, TabContent::Notes(notes) if notes.len() == 1);
    assert_eq!(server.hits(&format!("GET /events/{event_id}/notes")), notes_fetches);
}

#[tokio::test]
async fn failed_file_delete_keeps_the_file() {
    let (state, event_id) = seeded();
    let server = MockServer::start(state).await;
    let mut page = EventDetailPage::new(server.signed_in().await, event_id);
    page.mount().await.unwrap();
    let file_id = match &page.content {
        TabContent::Photos(files) => files[0].id,
        other => panic!("unexpected content {other:?}"),
    };

    server.with(|st| st.fail_file_delete = true);
    assert_matches!(page.delete_file(file_id).await, Err(ClientError::Storage(_)));
    assert_matches!(&page.content, TabContent::Photos(files) if files.len() == 1);
    assert_eq!(page.last_error.as_deref(), Some("Storage backend error: down"));

    server.with(|st| st.fail_file_delete = false);
    page.delete_file(file_id).await.unwrap();
    assert_matches!(&page.content, TabContent::Photos(files) if files.is_empty());
    assert_eq!(page.last_error, None);
}

#[tokio::test]
async fn attendance_tab_actions() {
    let (state, event_id) = seeded();
    let server = MockServer::start(state).await;
    let mut page = EventDetailPage::new(server.signed_in().await, event_id);
    page.mount().await.unwrap();
    page.select_tab(Tab::Attendance).await.unwrap();

    page.add_attendee(evidencias_core::attendance::AttendanceInput::new("Bruno Lima", false))
        .await
        .unwrap();
    assert_matches!(&page.content, TabContent::Attendance(rows) if rows.len() == 2);

    let csv = page.export_attendance().await.unwrap();
    assert!(csv.starts_with("Nome,Função,Escola,Presente\n"));

    let result = page.import_attendance("lista.csv", Vec::new()).await;
    assert_matches!(result, Err(ClientError::Validation(_)));
    assert_matches!(&page.content, TabContent::Attendance(rows) if rows.len() == 2);

    let upload = page
        .upload(vec![UploadFile::new("lista.pdf", "application/pdf", &b"%PDF"[..])])
        .await;
    assert_matches!(upload, Err(ClientError::Validation(_)));
    assert_eq!(server.hits(&format!("POST /events/{event_id}/files")), 0);
}

#[tokio::test]
async fn event_form_checks_required_fields_before_sending() {
    let server = MockServer::start(MockState::default()).await;
    let mut page = EventFormPage::create(server.signed_in().await);
    page.form.title = "Premiação anual".into();

    assert_matches!(page.submit().await, Err(ClientError::Validation(_)));
    assert_eq!(page.last_error.as_deref(), Some("type is required"));
    assert_eq!(page.form.title, "Premiação anual");
    assert_eq!(server.hits("POST /events"), 0);

    page.form.event_type = Some(EventType::Premiacao);
    page.form.start_at = Some(Utc.with_ymd_and_hms(2024, 11, 20, 19, 0, 0).unwrap());
    page.form.schools = "Escola A, Escola B".into();
    let event = page.submit().await.unwrap();
    assert_eq!(event.schools, vec!["Escola A", "Escola B"]);
    assert!(page.saved.is_some());
}

#[tokio::test]
async fn edit_form_is_filled_from_the_server() {
    let (state, event_id) = seeded();
    let server = MockServer::start(state).await;
    let mut page = EventFormPage::edit(server.signed_in().await, event_id)
        .await
        .unwrap();
    assert!(page.is_editing());
    assert_eq!(page.form.title, "Formação de leitura");
    assert_eq!(page.form.event_type, Some(EventType::Formacao));
    assert_eq!(page.form.location, "");

    page.form.location = "Auditório".into();
    let event = page.submit().await.unwrap();
    assert_eq!(event.location.as_deref(), Some("Auditório"));
    assert_eq!(server.hits(&format!("PUT /events/{event_id}")), 1);
}

#[tokio::test]
async fn users_page_patches_local_rows() {
    let other = Uuid::new_v4();
    let mut state = MockState::default();
    state.users.push(user_json(other, "Bruno Lima", "TEC_ACOMPANHAMENTO", true));
    let server = MockServer::start(state).await;
    let mut page = UsersPage::new(server.signed_in().await);
    page.load().await.unwrap();

    page.change_role(other, UserRole::TecFormacao).await.unwrap();
    page.deactivate(other).await.unwrap();

    let bruno = page.users.iter().find(|u| u.id == other).unwrap();
    assert_eq!(bruno.role, UserRole::TecFormacao);
    assert!(!bruno.is_active);
    assert_eq!(page.users.len(), 2);
    assert_eq!(server.hits("GET /users"), 1);
}
