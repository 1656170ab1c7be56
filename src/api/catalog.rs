//! Brand, fuel type and image lookups, plus brand creation and image upload

use reqwest::multipart::{Form, Part};
use std::path::Path;

use super::{check, ApiClient};
use crate::error::ClientError;
use crate::resources::catalog::{image_mime, Brand, FuelType, Image, NewBrand};
use crate::resources::Draft;

const BRANDS: &str = "/brands";
const FUEL_TYPES: &str = "/fuel-types";
const IMAGES: &str = "/images";

impl ApiClient {
    pub async fn list_brands(&self) -> Result<Vec<Brand>, ClientError> {
        self.get_json(self.collection_url(BRANDS)?).await
    }

    /// Validated locally; nothing is sent when a name is missing
    pub async fn create_brand(&self, brand: &NewBrand) -> Result<(), ClientError> {
        brand.validate()?;
        self.create(BRANDS, brand).await
    }

    pub async fn list_fuel_types(&self) -> Result<Vec<FuelType>, ClientError> {
        self.get_json(self.collection_url(FUEL_TYPES)?).await
    }

    pub async fn list_images(&self) -> Result<Vec<Image>, ClientError> {
        self.get_json(self.collection_url(IMAGES)?).await
    }

    /// Multipart upload under the `file` field; returns the stored image
    pub async fn upload_image(&self, path: &Path) -> Result<Image, ClientError> {
        let mime = image_mime(path)?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ClientError::Validation(format!("Cannot read {}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        let part = Part::bytes(bytes).file_name(file_name).mime_str(mime)?;
        let form = Form::new().part("file", part);

        let url = self.collection_url(IMAGES)?;
        self.trace("POST", &url);
        let response = self
            .http()
            .post(url)
            .bearer_auth(self.session().bearer()?)
            .multipart(form)
            .send()
            .await?;
        let response = check(response).await?;
        Ok(response.json::<Image>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    #[tokio::test]
    async fn unsupported_files_are_refused_before_reading() {
        let client = ApiClient::new("http://localhost:9", "/api", Session::in_memory()).unwrap();
        let err = client.upload_image(Path::new("/nowhere/car.bmp")).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(msg) if msg.starts_with("Invalid file type")));
    }

    #[tokio::test]
    async fn blank_brand_is_refused_locally() {
        let client = ApiClient::new("http://localhost:9", "/api", Session::in_memory()).unwrap();
        let brand = NewBrand {
            name: String::new(),
            short_name: "SK".into(),
        };
        assert!(matches!(client.create_brand(&brand).await, Err(ClientError::Validation(_))));
    }
}
