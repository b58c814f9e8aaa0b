//! Workspace and project images
//!
//! Create and update forms arrive as `multipart/form-data` with a text `name`
//! field and an optional `image` part. A file part replaces the image, an
//! `image` text part with an empty value clears it, and no `image` part keeps
//! whatever is stored.

use axum::extract::Multipart;
use bytes::Bytes;
use teamspace_core::models::ImageRef;
use teamspace_core::{AppError, Config};
use teamspace_storage::keys::generate_filename;
use teamspace_storage::{ImageScope, Storage};
use thiserror::Error;

use crate::error::{storage_error, HttpAppError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageValidationError {
    #[error("Image file is empty")]
    EmptyFile,

    #[error("Image is {size} bytes, the maximum is {max} bytes")]
    FileTooLarge { size: usize, max: usize },

    #[error("Content type '{content_type}' is not allowed, allowed: {allowed:?}")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Image file name has no extension")]
    MissingExtension,

    #[error("Extension '{extension}' does not match content type '{content_type}'")]
    ExtensionMismatch {
        extension: String,
        content_type: String,
    },
}

impl From<ImageValidationError> for AppError {
    fn from(err: ImageValidationError) -> Self {
        let message = err.to_string();
        match err {
            ImageValidationError::FileTooLarge { .. } => AppError::PayloadTooLarge(message),
            _ => AppError::InvalidInput(message),
        }
    }
}

/// An uploaded image part, not yet validated
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: String,
    pub data: Bytes,
}

/// What the form said about the image
#[derive(Debug, Clone, Default)]
pub enum ImageField {
    #[default]
    Absent,
    Upload(ImageUpload),
    Cleared,
}

/// Parsed create/update form
#[derive(Debug, Clone, Default)]
pub struct ImageForm {
    pub name: Option<String>,
    pub workspace_id: Option<String>,
    pub image: ImageField,
}

/// Read every part of the form. Unknown fields are skipped.
pub async fn read_image_form(mut multipart: Multipart) -> Result<ImageForm, HttpAppError> {
    let mut form = ImageForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(field_name) = field.name().map(str::to_string) else {
            continue;
        };

        match field_name.as_str() {
            "name" => form.name = Some(field.text().await?.trim().to_string()),
            "workspace_id" => form.workspace_id = Some(field.text().await?.trim().to_string()),
            "image" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_lowercase);

                if file_name.is_some() {
                    let data = field.bytes().await?;
                    form.image = ImageField::Upload(ImageUpload {
                        file_name,
                        content_type: content_type
                            .unwrap_or_else(|| "application/octet-stream".to_string()),
                        data,
                    });
                } else if field.text().await?.trim().is_empty() {
                    form.image = ImageField::Cleared;
                } else {
                    // Clients echo the current image URL back when it is unchanged
                    form.image = ImageField::Absent;
                }
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown form field");
            }
        }
    }

    Ok(form)
}

fn content_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "svg" => Some("image/svg+xml"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Validate an upload against the configured limits and return its extension.
pub fn validate_image(upload: &ImageUpload, config: &Config) -> Result<String, ImageValidationError> {
    if upload.data.is_empty() {
        return Err(ImageValidationError::EmptyFile);
    }

    let max = config.max_image_size_bytes;
    if upload.data.len() > max {
        return Err(ImageValidationError::FileTooLarge {
            size: upload.data.len(),
            max,
        });
    }

    if !config
        .allowed_image_content_types
        .iter()
        .any(|allowed| allowed == &upload.content_type)
    {
        return Err(ImageValidationError::InvalidContentType {
            content_type: upload.content_type.clone(),
            allowed: config.allowed_image_content_types.clone(),
        });
    }

    let extension = upload
        .file_name
        .as_deref()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
        .ok_or(ImageValidationError::MissingExtension)?;

    if content_type_for_extension(&extension) != Some(upload.content_type.as_str()) {
        return Err(ImageValidationError::ExtensionMismatch {
            extension,
            content_type: upload.content_type.clone(),
        });
    }

    Ok(extension)
}

/// Validate and store an upload, returning the reference to record.
pub async fn store_image(
    storage: &dyn Storage,
    config: &Config,
    scope: ImageScope,
    upload: ImageUpload,
) -> Result<ImageRef, AppError> {
    let extension = validate_image(&upload, config)?;
    let filename = generate_filename(&extension);

    let (key, url) = storage
        .upload(scope, &filename, &upload.content_type, upload.data)
        .await
        .map_err(storage_error)?;

    tracing::info!(key = %key, "Image stored");
    Ok(ImageRef { url, key })
}

/// Delete a stored image after its record changed. Failures are logged only.
pub async fn discard_image(storage: &dyn Storage, key: &str) {
    if let Err(e) = storage.delete(key).await {
        tracing::warn!(error = %e, key = %key, "Failed to delete image file");
    }
}
