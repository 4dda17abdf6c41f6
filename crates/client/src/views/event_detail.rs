use evidencias_core::attendance::AttendanceInput;
use evidencias_core::files::FileKind;
use evidencias_core::types::DbId;

use crate::client::EvidenciasClient;
use crate::error::ClientError;
use crate::models::{Attendance, Event, EventFile, EventNote, ImportResult, UploadFile};

use super::track;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Photos,
    Documents,
    Attendance,
    Notes,
}

/// Data of the active tab only.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TabContent {
    /// Not fetched yet, or the last fetch failed.
    #[default]
    Empty,
    Photos(Vec<EventFile>),
    Documents(Vec<EventFile>),
    Attendance(Vec<Attendance>),
    Notes(Vec<EventNote>),
}

/// One event with its evidence, split into tabs.
///
/// Only the active tab's data is held. Switching tabs always fetches,
/// even when returning to a tab seen before.
#[derive(Debug)]
pub struct EventDetailPage {
    client: EvidenciasClient,
    event_id: DbId,
    pub event: Option<Event>,
    pub active: Tab,
    pub content: TabContent,
    pub last_error: Option<String>,
}

impl EventDetailPage {
    pub fn new(client: EvidenciasClient, event_id: DbId) -> Self {
        Self {
            client,
            event_id,
            event: None,
            active: Tab::default(),
            content: TabContent::Empty,
            last_error: None,
        }
    }

    /// Fetch the event, then the active tab.
    pub async fn mount(&mut self) -> Result<(), ClientError> {
        let result = self.client.events().get(self.event_id).await;
        self.event = Some(track(&mut self.last_error, result)?);
        self.reload().await
    }

    pub async fn select_tab(&mut self, tab: Tab) -> Result<(), ClientError> {
        self.active = tab;
        self.content = TabContent::Empty;
        self.reload().await
    }

    /// Fetch the active tab's data again.
    pub async fn reload(&mut self) -> Result<(), ClientError> {
        let id = self.event_id;
        let result = match self.active {
            Tab::Photos => self
                .client
                .files()
                .list(id, Some(FileKind::Photo))
                .await
                .map(TabContent::Photos),
            Tab::Documents => self
                .client
                .files()
                .list(id, Some(FileKind::Doc))
                .await
                .map(TabContent::Documents),
            Tab::Attendance => self
                .client
                .attendance()
                .list(id)
                .await
                .map(TabContent::Attendance),
            Tab::Notes => self.client.notes().list(id).await.map(TabContent::Notes),
        };
        self.content = track(&mut self.last_error, result)?;
        Ok(())
    }

    // ---- mutations that re-fetch ----

    /// Upload to the active tab: photos on `Photos`, documents on
    /// `Documents`. Other tabs hold no files and refuse the upload.
    pub async fn upload(&mut self, files: Vec<UploadFile>) -> Result<(), ClientError> {
        let kind = match self.active {
            Tab::Photos => FileKind::Photo,
            Tab::Documents => FileKind::Doc,
            Tab::Attendance | Tab::Notes => {
                let err = ClientError::Validation(
                    "Files can only be uploaded on the photo or document tab".into(),
                );
                return track(&mut self.last_error, Err(err));
            }
        };
        let result = self.client.files().upload(self.event_id, files, kind).await;
        track(&mut self.last_error, result)?;
        self.reload().await
    }

    pub async fn add_attendee(&mut self, input: AttendanceInput) -> Result<(), ClientError> {
        let result = self.client.attendance().create(self.event_id, &input).await;
        track(&mut self.last_error, result)?;
        self.reload().await
    }

    pub async fn import_attendance(&mut self, filename: &str, csv: Vec<u8>) -> Result<ImportResult, ClientError> {
        let result = self
            .client
            .attendance()
            .import_csv(self.event_id, filename, csv)
            .await;
        let imported = track(&mut self.last_error, result)?;
        self.reload().await?;
        Ok(imported)
    }

    pub async fn export_attendance(&mut self) -> Result<String, ClientError> {
        let result = self.client.attendance().export_csv(self.event_id).await;
        track(&mut self.last_error, result)
    }

    pub async fn add_note(&mut self, text: &str) -> Result<(), ClientError> {
        let result = self.client.notes().create(self.event_id, text).await;
        track(&mut self.last_error, result)?;
        self.reload().await
    }

    pub async fn edit_note(&mut self, note_id: DbId, text: &str) -> Result<(), ClientError> {
        let result = self.client.notes().update(self.event_id, note_id, text).await;
        track(&mut self.last_error, result)?;
        self.reload().await
    }

    // ---- deletes patch local state once the server confirms ----

    pub async fn delete_file(&mut self, file_id: DbId) -> Result<(), ClientError> {
        let result = self.client.files().delete(self.event_id, file_id).await;
        track(&mut self.last_error, result)?;
        if let TabContent::Photos(files) | TabContent::Documents(files) = &mut self.content {
            files.retain(|f| f.id != file_id);
        }
        Ok(())
    }

    pub async fn delete_attendee(&mut self, attendance_id: DbId) -> Result<(), ClientError> {
        let result = self
            .client
            .attendance()
            .delete(self.event_id, attendance_id)
            .await;
        track(&mut self.last_error, result)?;
        if let TabContent::Attendance(rows) = &mut self.content {
            rows.retain(|r| r.id != attendance_id);
        }
        Ok(())
    }

    pub async fn delete_note(&mut self, note_id: DbId) -> Result<(), ClientError> {
        let result = self.client.notes().delete(self.event_id, note_id).await;
        track(&mut self.last_error, result)?;
        if let TabContent::Notes(notes) = &mut self.content {
            notes.retain(|n| n.id != note_id);
        }
        Ok(())
    }
}
