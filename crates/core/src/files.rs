//! Evidence files: kinds, upload limits, storage keys and public URLs.
//!
//! Storage keys are `{event_id}/{uuid}.{ext}`. The bucket is chosen by kind,
//! and photos additionally get a thumbnail URL that asks the storage endpoint
//! for a 320x320-bounded rendition of the same object.

use uuid::Uuid;

use crate::error::CoreError;
use crate::types::DbId;

text_enum! {
    /// Determines the storage bucket and whether a thumbnail is derived.
    pub enum FileKind {
        Photo => "PHOTO",
        Doc => "DOC",
    }
}

/// Maximum size of a single uploaded file (10 MiB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Edge length of the square box thumbnails are fitted into.
pub const THUMBNAIL_SIZE: u32 = 320;

/// MIME types accepted for `PHOTO` uploads.
pub const ALLOWED_PHOTO_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// MIME types accepted for `DOC` uploads.
pub const ALLOWED_DOC_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/zip",
    "image/jpeg",
    "image/png",
];

impl FileKind {
    pub fn allowed_mime_types(self) -> &'static [&'static str] {
        match self {
            FileKind::Photo => ALLOWED_PHOTO_TYPES,
            FileKind::Doc => ALLOWED_DOC_TYPES,
        }
    }

    pub fn has_thumbnail(self) -> bool {
        self == FileKind::Photo
    }
}

/// Check one file of an upload batch against the kind's MIME allow-list and
/// the size limit.
pub fn validate_upload(kind: FileKind, filename: &str, mime: &str, size: usize) -> Result<(), CoreError> {
    if filename.trim().is_empty() {
        return Err(CoreError::Validation("Uploaded file has no filename".into()));
    }
    if !kind.allowed_mime_types().contains(&mime) {
        return Err(CoreError::Validation(format!(
            "Invalid {} type '{mime}' for '{filename}'. Allowed: {}",
            match kind {
                FileKind::Photo => "photo",
                FileKind::Doc => "document",
            },
            kind.allowed_mime_types().join(", ")
        )));
    }
    if size == 0 {
        return Err(CoreError::Validation(format!("File '{filename}' is empty")));
    }
    if size > MAX_FILE_SIZE {
        return Err(CoreError::Validation(format!(
            "File too large: '{filename}'. Max size: {} MiB",
            MAX_FILE_SIZE / (1024 * 1024)
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Buckets, keys and URLs
// ---------------------------------------------------------------------------

/// Bucket names, one per file kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buckets {
    pub photos: String,
    pub documents: String,
}

impl Default for Buckets {
    fn default() -> Self {
        Self {
            photos: "event-photos".into(),
            documents: "event-documents".into(),
        }
    }
}

impl Buckets {
    pub fn for_kind(&self, kind: FileKind) -> &str {
        match kind {
            FileKind::Photo => &self.photos,
            FileKind::Doc => &self.documents,
        }
    }

    pub fn contains(&self, bucket: &str) -> bool {
        bucket == self.photos || bucket == self.documents
    }
}

/// Lower-cased extension of `filename`, if it has a non-empty one made of
/// ASCII alphanumerics.
pub fn file_extension(filename: &str) -> Option<String> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Conventional extension for an accepted MIME type.
pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
    Some(match mime {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "application/pdf" => "pdf",
        "application/msword" => "doc",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
        "application/vnd.ms-excel" => "xls",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => "xlsx",
        "application/zip" => "zip",
        _ => return None,
    })
}

/// Generate a collision-resistant storage key scoped under `event_id`.
///
/// The extension comes from `filename`, or from `mime` when the filename
/// has none.
pub fn storage_key(event_id: DbId, filename: &str, mime: &str) -> String {
    let id = Uuid::new_v4();
    let ext = file_extension(filename).or_else(|| extension_for_mime(mime).map(str::to_string));
    match ext {
        Some(ext) => format!("{event_id}/{id}.{ext}"),
        None => format!("{event_id}/{id}"),
    }
}

/// Public retrieval URL of an object.
pub fn public_url(base_url: &str, bucket: &str, key: &str) -> String {
    format!("{}/{bucket}/{key}", base_url.trim_end_matches('/'))
}

/// Thumbnail URL: the object's public URL with the resize transform applied.
pub fn thumbnail_url(public_url: &str) -> String {
    format!("{public_url}?width={THUMBNAIL_SIZE}&height={THUMBNAIL_SIZE}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn photo_rejects_pdf() {
        let result = validate_upload(FileKind::Photo, "ata.pdf", "application/pdf", 10);
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("photo"));
        assert!(validate_upload(FileKind::Doc, "ata.pdf", "application/pdf", 10).is_ok());
    }

    #[test]
    fn oversized_file_is_rejected() {
        let result = validate_upload(FileKind::Doc, "big.zip", "application/zip", MAX_FILE_SIZE + 1);
        assert_matches!(result, Err(CoreError::Validation(_)));
        assert!(validate_upload(FileKind::Doc, "ok.zip", "application/zip", MAX_FILE_SIZE).is_ok());
    }

    #[test]
    fn extension_is_lowercased_and_sanitised() {
        assert_eq!(file_extension("Foto.JPG").as_deref(), Some("jpg"));
        assert_eq!(file_extension("dir/relatorio.final.pdf").as_deref(), Some("pdf"));
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension(".hidden"), None);
        assert_eq!(file_extension("weird.p?f"), None);
    }

    #[test]
    fn storage_keys_are_scoped_and_unique() {
        let event_id = Uuid::new_v4();
        let a = storage_key(event_id, "foto.png", "image/png");
        let b = storage_key(event_id, "foto.png", "image/png");
        assert!(a.starts_with(&format!("{event_id}/")));
        assert!(a.ends_with(".png"));
        assert_ne!(a, b);
        assert!(!storage_key(event_id, "noext", "application/octet-stream").contains('.'));
    }

    #[test]
    fn extensionless_filename_takes_extension_from_mime() {
        let event_id = Uuid::new_v4();
        assert!(storage_key(event_id, "foto", "image/png").ends_with(".png"));
        assert!(storage_key(event_id, "scan", "image/jpeg").ends_with(".jpg"));
        // The filename's own extension wins.
        assert!(storage_key(event_id, "foto.jpeg", "image/png").ends_with(".jpeg"));
    }

    #[test]
    fn urls_are_derived_from_base_bucket_and_key() {
        let url = public_url("http://localhost:3000/storage/", "event-photos", "e/1.png");
        assert_eq!(url, "http://localhost:3000/storage/event-photos/e/1.png");
        assert_eq!(
            thumbnail_url(&url),
            "http://localhost:3000/storage/event-photos/e/1.png?width=320&height=320"
        );
    }

    #[test]
    fn bucket_follows_kind() {
        let buckets = Buckets::default();
        assert_eq!(buckets.for_kind(FileKind::Photo), "event-photos");
        assert_eq!(buckets.for_kind(FileKind::Doc), "event-documents");
        assert!(buckets.contains("event-documents"));
        assert!(!buckets.contains("other"));
    }
}
