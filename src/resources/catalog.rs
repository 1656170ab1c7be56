//! Lookup collections behind the model and car forms: brands, fuel types, images.
//!
//! These are plain lists, not paged grids.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{Draft, Notification};
use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub short_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBrand {
    pub name: String,
    pub short_name: String,
}

impl Draft for NewBrand {
    fn validate(&self) -> Result<(), ClientError> {
        if self.name.trim().is_empty() || self.short_name.trim().is_empty() {
            return Err(ClientError::Validation("Please fill in both fields.".to_string()));
        }
        Ok(())
    }

    fn label(&self) -> String {
        format!("{} ({})", self.name, self.short_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelType {
    pub id: i64,
    pub name: String,
}

/// Uploaded car photo; `id` goes into a car's `imageId`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub url: String,
}

/// Only JPEG and PNG files are accepted, judged by extension
pub fn image_mime(path: &Path) -> Result<&'static str, ClientError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => Ok("image/jpeg"),
        Some("png") => Ok("image/png"),
        _ => Err(ClientError::Validation(format!(
            "Invalid file type: {} is not a JPEG or PNG image.",
            path.display()
        ))),
    }
}

pub fn brand_added(brand: &NewBrand, result: &Result<(), ClientError>) -> Notification {
    match result {
        Ok(()) => Notification::success(
            "Brand added",
            format!("Successfully added {} ({}).", brand.name, brand.short_name),
        ),
        Err(ClientError::Validation(msg)) => Notification::failure("Missing fields", msg.clone()),
        Err(_) => Notification::failure("Error", "Failed to add brand."),
    }
}

pub fn image_uploaded(file: &str, result: &Result<Image, ClientError>) -> Notification {
    match result {
        Ok(image) => Notification::success("Image uploaded", format!("Uploaded {} as image {}.", file, image.id)),
        Err(ClientError::Validation(msg)) => Notification::failure("Image upload failed", msg.clone()),
        Err(_) => Notification::failure("Image upload failed", format!("Failed to upload {}.", file)),
    }
}
