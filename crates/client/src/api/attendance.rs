use bytes::Bytes;
use evidencias_core::attendance::AttendanceInput;
use evidencias_core::types::DbId;
use reqwest::multipart::{Form, Part};

use crate::client::EvidenciasClient;
use crate::error::ClientError;
use crate::models::{Attendance, ImportResult};

/// Multipart field the CSV is sent under.
const CSV_FIELD: &str = "file";

pub struct AttendanceApi<'a> {
    client: &'a EvidenciasClient,
}

fn check_record(input: &AttendanceInput) -> Result<(), ClientError> {
    if input.person_name.trim().is_empty() {
        return Err(ClientError::required("person_name"));
    }
    Ok(())
}

impl<'a> AttendanceApi<'a> {
    pub(crate) fn new(client: &'a EvidenciasClient) -> Self {
        Self { client }
    }

    /// The roll of an event, ordered by person name.
    pub async fn list(&self, event_id: DbId) -> Result<Vec<Attendance>, ClientError> {
        self.client
            .get_data(&format!("/events/{event_id}/attendance"))
            .await
    }

    pub async fn create(&self, event_id: DbId, input: &AttendanceInput) -> Result<Attendance, ClientError> {
        check_record(input)?;
        self.client
            .post_data(&format!("/events/{event_id}/attendance"), &input.clone().normalized())
            .await
    }

    /// Insert many records at once; the server stores all or none.
    pub async fn create_many(
        &self,
        event_id: DbId,
        inputs: &[AttendanceInput],
    ) -> Result<Vec<Attendance>, ClientError> {
        if inputs.is_empty() {
            return Err(ClientError::required("records"));
        }
        for (i, input) in inputs.iter().enumerate() {
            check_record(input).map_err(|e| ClientError::Validation(format!("Record {}: {e}", i + 1)))?;
        }
        let inputs: Vec<AttendanceInput> = inputs.iter().cloned().map(AttendanceInput::normalized).collect();
        self.client
            .post_data(&format!("/events/{event_id}/attendance/bulk"), &inputs)
            .await
    }

    /// Upload a CSV roll for the server to parse and insert.
    pub async fn import_csv(
        &self,
        event_id: DbId,
        filename: &str,
        data: impl Into<Bytes>,
    ) -> Result<ImportResult, ClientError> {
        let data = data.into();
        if data.is_empty() {
            return Err(ClientError::required("file"));
        }

        let url = self
            .client
            .url(&format!("/events/{event_id}/attendance/import"));
        let response = self
            .client
            .send(|http| {
                let part = Part::stream(data.clone())
                    .file_name(filename.to_string())
                    .mime_str("text/csv")?;
                Ok(http.post(&url).multipart(Form::new().part(CSV_FIELD, part)))
            })
            .await?;
        crate::client::read_data(response).await
    }

    /// The roll rendered as CSV by the server, header row included.
    pub async fn export_csv(&self, event_id: DbId) -> Result<String, ClientError> {
        let url = self
            .client
            .url(&format!("/events/{event_id}/attendance/export/csv"));
        let response = self.client.send(|http| Ok(http.get(&url))).await?;
        Ok(response.text().await?)
    }

    pub async fn delete(&self, event_id: DbId, attendance_id: DbId) -> Result<(), ClientError> {
        self.client
            .delete(&format!("/events/{event_id}/attendance/{attendance_id}"))
            .await
    }
}
