use evidencias_core::files::FileKind;
use evidencias_core::types::DbId;
use reqwest::multipart::{Form, Part};

use crate::client::EvidenciasClient;
use crate::error::ClientError;
use crate::models::{EventFile, UploadFile};

/// Multipart field every uploaded file is sent under.
const FILES_FIELD: &str = "files";

pub struct FilesApi<'a> {
    client: &'a EvidenciasClient,
}

impl<'a> FilesApi<'a> {
    pub(crate) fn new(client: &'a EvidenciasClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, event_id: DbId, kind: Option<FileKind>) -> Result<Vec<EventFile>, ClientError> {
        let path = format!("/events/{event_id}/files");
        match kind {
            Some(kind) => {
                self.client
                    .get_data_query(&path, &[("kind", kind.as_str())])
                    .await
            }
            None => self.client.get_data(&path).await,
        }
    }

    /// Upload a batch of files of one kind.
    ///
    /// The server stores them one at a time; if one fails, the files before
    /// it stay uploaded and the error is returned.
    pub async fn upload(
        &self,
        event_id: DbId,
        files: Vec<UploadFile>,
        kind: FileKind,
    ) -> Result<Vec<EventFile>, ClientError> {
        if files.is_empty() {
            return Err(ClientError::required("files"));
        }
        if files.iter().any(|f| f.filename.trim().is_empty()) {
            return Err(ClientError::required("filename"));
        }

        let url = self.client.url(&format!("/events/{event_id}/files"));
        // The form is consumed by sending, so it is rebuilt for a replay.
        let response = self
            .client
            .send(|http| {
                Ok(http
                    .post(&url)
                    .query(&[("kind", kind.as_str())])
                    .multipart(build_form(&files)?))
            })
            .await?;
        tracing::debug!(%event_id, count = files.len(), kind = %kind, "Uploaded files");
        crate::client::read_data(response).await
    }

    /// Remove the stored binary and then the metadata row.
    pub async fn delete(&self, event_id: DbId, file_id: DbId) -> Result<(), ClientError> {
        self.client
            .delete(&format!("/events/{event_id}/files/{file_id}"))
            .await
    }
}

fn build_form(files: &[UploadFile]) -> Result<Form, ClientError> {
    let mut form = Form::new();
    for file in files {
        let part = Part::stream(file.data.clone())
            .file_name(file.filename.clone())
            .mime_str(&file.content_type)?;
        form = form.part(FILES_FIELD, part);
    }
    Ok(form)
}
