// ABOUTME: Multipart form parsing and image storage for recipe and profile uploads
// ABOUTME: Validates jpg/jpeg/png images, enforces size limits and writes files to disk
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

//! # Image Uploads
//!
//! Recipe and profile forms arrive as `multipart/form-data` with at most one
//! image part. Text parts are collected into a map; the image is validated
//! by extension and MIME type and stored under the upload directory with a
//! unique name. Stored images are served back under `/uploads`.

use crate::constants::{messages, uploads};
use crate::errors::{AppError, AppResult};
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// An image part received in a multipart form
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Form field the file arrived on
    pub field_name: String,
    /// Client-side file name
    pub original_name: String,
    /// Declared MIME type
    pub content_type: String,
    /// Validated lowercase extension
    pub extension: &'static str,
    /// File contents
    pub bytes: Vec<u8>,
}

/// Text fields plus an optional image from a multipart form
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    image: Option<UploadedImage>,
}

impl MultipartForm {
    /// Read every part of `multipart`, accepting a file only on `image_field`
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for malformed bodies, non-image files or files on
    ///   other fields
    /// - `PayloadTooLarge` when the image exceeds 5MB or a text field 2MB
    pub async fn parse(mut multipart: Multipart, image_field: &str) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(mut field) = multipart.next_field().await.map_err(map_multipart_error)? {
            let name = field.name().unwrap_or_default().to_owned();

            match field.file_name().map(str::to_owned) {
                Some(file_name) if file_name.is_empty() => {
                    // File input left empty by the client
                    read_limited(&mut field, uploads::MAX_IMAGE_BYTES, messages::FILE_TOO_LARGE)
                        .await?;
                }
                Some(file_name) => {
                    if name != image_field || form.image.is_some() {
                        return Err(AppError::invalid_input(messages::UNEXPECTED_FILE_FIELD));
                    }
                    let content_type = field.content_type().unwrap_or_default().to_owned();
                    let extension = validate_image(&file_name, &content_type)?;
                    let bytes = read_limited(
                        &mut field,
                        uploads::MAX_IMAGE_BYTES,
                        messages::FILE_TOO_LARGE,
                    )
                    .await?;

                    debug!(field = %name, file = %file_name, size = bytes.len(), "Image received");
                    form.image = Some(UploadedImage {
                        field_name: name,
                        original_name: file_name,
                        content_type,
                        extension,
                        bytes,
                    });
                }
                None => {
                    let bytes = read_limited(
                        &mut field,
                        uploads::MAX_FIELD_BYTES,
                        messages::FIELD_TOO_LARGE,
                    )
                    .await?;
                    let value = String::from_utf8(bytes).map_err(|_| {
                        AppError::invalid_input(format!("Field {name} is not valid UTF-8"))
                    })?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    /// Value of a text field
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Value of a text field that is present and not blank
    #[must_use]
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.text(name).filter(|value| !value.trim().is_empty())
    }

    /// Take the uploaded image, if any
    pub fn take_image(&mut self) -> Option<UploadedImage> {
        self.image.take()
    }

    /// Build a form directly from parts
    #[must_use]
    pub fn from_parts(fields: HashMap<String, String>, image: Option<UploadedImage>) -> Self {
        Self { fields, image }
    }
}

async fn read_limited(field: &mut Field<'_>, limit: usize, message: &str) -> AppResult<Vec<u8>> {
    let mut buffer = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(map_multipart_error)? {
        if buffer.len() + chunk.len() > limit {
            return Err(AppError::payload_too_large(message));
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer)
}

fn map_multipart_error(error: MultipartError) -> AppError {
    if error.status() == http::StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large(messages::FILE_TOO_LARGE)
    } else {
        AppError::invalid_input(format!("Invalid multipart body: {}", error.body_text()))
    }
}

/// Check that both the extension and MIME type denote a jpg/jpeg/png image
///
/// # Errors
///
/// Returns `InvalidInput` with the "Images only" message otherwise
pub fn validate_image(file_name: &str, content_type: &str) -> AppResult<&'static str> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);
    let allowed_extension = extension.as_deref().and_then(|ext| {
        uploads::ALLOWED_IMAGE_TYPES
            .iter()
            .copied()
            .find(|allowed| *allowed == ext)
    });

    let mime = content_type.trim().to_lowercase();
    let mime_ok = mime
        .strip_prefix("image/")
        .is_some_and(|subtype| uploads::ALLOWED_IMAGE_TYPES.contains(&subtype));

    match allowed_extension {
        Some(extension) if mime_ok => Ok(extension),
        _ => Err(AppError::invalid_input(messages::IMAGES_ONLY)),
    }
}

/// Disk storage for uploaded images
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Create a store rooted at `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding stored images
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the upload directory if missing
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the directory cannot be created
    pub async fn ensure_dir(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::storage(format!(
                "Failed to create upload directory {}: {e}",
                self.root.display()
            ))
        })
    }

    /// Unique file name `{field}-{unix_millis}-{short_uuid}.{ext}`
    #[must_use]
    pub fn file_name_for(image: &UploadedImage) -> String {
        let unique = Uuid::new_v4().simple().to_string();
        format!(
            "{}-{}-{}.{}",
            image.field_name,
            Utc::now().timestamp_millis(),
            &unique[..8],
            image.extension
        )
    }

    /// Write `image` to disk and return its public path
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the file cannot be written
    pub async fn save(&self, image: &UploadedImage) -> AppResult<String> {
        self.ensure_dir().await?;
        let file_name = Self::file_name_for(image);
        let path = self.root.join(&file_name);

        tokio::fs::write(&path, &image.bytes).await.map_err(|e| {
            AppError::storage(format!("Failed to store image {}: {e}", path.display()))
        })?;

        debug!(
            path = %path.display(),
            field = %image.field_name,
            original_name = %image.original_name,
            content_type = %image.content_type,
            size = image.bytes.len(),
            "Stored uploaded image"
        );
        Ok(format!("{}/{file_name}", uploads::PUBLIC_PREFIX))
    }

    /// Delete a previously stored image, ignoring paths outside this store
    ///
    /// Failures are logged and otherwise ignored.
    pub async fn remove(&self, public_path: &str) {
        let Some(file_name) = public_path
            .strip_prefix(uploads::PUBLIC_PREFIX)
            .and_then(|rest| Path::new(rest).file_name())
        else {
            return;
        };

        let path = self.root.join(file_name);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(path = %path.display(), "Could not delete old image: {e}");
        }
    }

    /// Resolve a public path to its location on disk
    #[must_use]
    pub fn local_path(&self, public_path: &str) -> Option<PathBuf> {
        public_path
            .strip_prefix(uploads::PUBLIC_PREFIX)
            .and_then(|rest| Path::new(rest).file_name())
            .map(|file_name| self.root.join(file_name))
    }
}
