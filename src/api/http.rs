//! HTTP implementation of the storefront API.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ApiError;
use crate::wizard::draft::{CreateStorePayload, StoreType};

use super::{Category, CreatedStore, StorefrontApi, ThemeFilter, ThemeTemplate, UploadedImage};

/// `reqwest`-backed client for the storefront REST API.
pub struct HttpStorefrontApi {
    client: reqwest::Client,
    base_url: String,
}

/// Error body shape the backend uses for rejections.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl HttpStorefrontApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a non-2xx response to a `Rejected` error carrying the server's
    /// message verbatim, falling back to the status line.
    async fn rejection(response: reqwest::Response) -> ApiError {
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => ApiError::Rejected(body.message),
            Err(_) => ApiError::Rejected(format!("Request failed with status {status}")),
        }
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn list_categories(&self, store_type: StoreType) -> Result<Vec<Category>, ApiError> {
        let response = self
            .client
            .get(self.url("/categories"))
            .query(&[("type", store_type.to_string())])
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))
    }

    async fn list_themes(&self, filter: &ThemeFilter) -> Result<Vec<ThemeTemplate>, ApiError> {
        let response = self
            .client
            .get(self.url("/themes"))
            .query(filter)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))
    }

    async fn increment_theme_downloads(&self, theme_id: i64) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/themes/{theme_id}/downloads")))
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        Ok(())
    }

    async fn upload_image(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<UploadedImage, ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        let response = self
            .client
            .post(self.url("/uploads"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))
    }

    async fn create_store(&self, payload: &CreateStorePayload) -> Result<CreatedStore, ApiError> {
        let response = self
            .client
            .post(self.url("/stores"))
            .json(payload)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))
    }
}
