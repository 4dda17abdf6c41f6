//! Public object retrieval (`/storage/{bucket}/{*key}`).
//!
//! Serves what the local backend stores, under the URLs recorded on each
//! file row. `width` and/or `height` ask for an image rendition bounded by
//! that box, re-encoded as JPEG; this is how thumbnail URLs resolve.
//! Objects in the photos bucket are always treated as images.

use std::io::Cursor;

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use evidencias_storage::StorageError;
use image::ImageFormat;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Largest edge a resize may ask for.
const MAX_DIMENSION: u32 = 2048;

#[derive(Debug, Default, Deserialize)]
pub struct ResizeParams {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ResizeParams {
    /// The bounding box to fit into, if any dimension was requested. A
    /// missing dimension takes the other one.
    fn bounds(&self) -> AppResult<Option<(u32, u32)>> {
        let (w, h) = match (self.width, self.height) {
            (None, None) => return Ok(None),
            (Some(w), None) => (w, w),
            (None, Some(h)) => (h, h),
            (Some(w), Some(h)) => (w, h),
        };
        if w == 0 || h == 0 || w > MAX_DIMENSION || h > MAX_DIMENSION {
            return Err(AppError::BadRequest(format!(
                "width and height must be between 1 and {MAX_DIMENSION}"
            )));
        }
        Ok(Some((w, h)))
    }
}

/// GET /storage/{bucket}/{*key}?width=&height=
pub async fn serve_object(
    State(state): State<AppState>,
    Path((bucket, key)): Path<(String, String)>,
    Query(params): Query<ResizeParams>,
) -> AppResult<Response> {
    if !state.buckets().contains(&bucket) {
        return Err(StorageError::NotFound { bucket, key }.into());
    }

    let object = state.store.get(&bucket, &key).await?;
    let content_type = object
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    // Everything in the photos bucket passed the photo allow-list on upload.
    let is_image = bucket == state.buckets().photos || content_type.starts_with("image/");

    match params.bounds()? {
        Some((width, height)) if is_image => {
            let resized = tokio::task::spawn_blocking(move || {
                resize_to_jpeg(&object.bytes, width, height)
            })
            .await
            .map_err(|e| AppError::InternalError(format!("Resize task failed: {e}")))??;
            serve_bytes(resized, "image/jpeg")
        }
        _ => serve_bytes(object.bytes, &content_type),
    }
}

/// Fit an image into `width` x `height` (aspect ratio kept) and encode it
/// as JPEG.
pub fn resize_to_jpeg(data: &[u8], width: u32, height: u32) -> AppResult<Bytes> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::BadRequest(format!("Stored object is not a readable image: {e}")))?;

    // JPEG has no alpha channel.
    let thumb = image::DynamicImage::ImageRgb8(img.thumbnail(width, height).to_rgb8());

    let mut buf = Vec::new();
    thumb
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
        .map_err(|e| AppError::InternalError(format!("Failed to encode thumbnail: {e}")))?;
    Ok(Bytes::from(buf))
}

fn serve_bytes(data: Bytes, content_type: &str) -> AppResult<Response> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, data.len())
        .header(header::CACHE_CONTROL, "public, max-age=86400")
        .body(Body::from(data))
        .map_err(|e| AppError::InternalError(format!("Failed to build response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, ImageBuffer, Rgba};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Rgba([10u8, 120, 200, 128]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn resize_fits_box_and_keeps_aspect_ratio() {
        let out = resize_to_jpeg(&png(800, 400), 320, 320).unwrap();
        let decoded = image::load_from_memory_with_format(&out, ImageFormat::Jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (320, 160));
    }

    #[test]
    fn resize_rejects_non_images() {
        assert!(resize_to_jpeg(b"%PDF-1.4", 320, 320).is_err());
    }

    #[test]
    fn bounds_are_validated() {
        let none = ResizeParams::default();
        assert_eq!(none.bounds().unwrap(), None);

        let width_only = ResizeParams {
            width: Some(100),
            height: None,
        };
        assert_eq!(width_only.bounds().unwrap(), Some((100, 100)));

        let too_big = ResizeParams {
            width: Some(MAX_DIMENSION + 1),
            height: Some(10),
        };
        assert!(too_big.bounds().is_err());
    }
}
