//! External storefront API collaborators.
//!
//! The wizard core owns no wire formats; these are opaque async operations
//! it calls out to (and must tolerate failures from). [`HttpStorefrontApi`]
//! talks to a real backend; [`MockStorefrontApi`] backs tests and the CLI
//! demo.

mod http;
mod mock;

pub use http::HttpStorefrontApi;
pub use mock::MockStorefrontApi;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::wizard::draft::{CreateStorePayload, StoreType};

/// A store category offered for a given store type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A storefront theme template (read-only to this core).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeTemplate {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub premium: bool,
    pub preview_url: String,
}

/// Filter for theme listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium: Option<bool>,
}

/// Result of a successful image upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub url: String,
}

/// Result of a successful store creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedStore {
    pub id: i64,
}

/// The storefront backend, as seen by the wizard.
///
/// Implementations are pure I/O; the orchestrator owns all flow logic.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// Categories available for the given store type.
    async fn list_categories(&self, store_type: StoreType) -> Result<Vec<Category>, ApiError>;

    /// Theme templates matching the filter.
    async fn list_themes(&self, filter: &ThemeFilter) -> Result<Vec<ThemeTemplate>, ApiError>;

    /// Fire-and-forget download counter bump for a selected theme.
    async fn increment_theme_downloads(&self, theme_id: i64) -> Result<(), ApiError>;

    /// Upload an image; fails with a human-readable message on rejection.
    async fn upload_image(&self, bytes: Vec<u8>, filename: &str)
        -> Result<UploadedImage, ApiError>;

    /// Create the store. A server rejection carries a message surfaced to
    /// the user verbatim.
    async fn create_store(&self, payload: &CreateStorePayload) -> Result<CreatedStore, ApiError>;
}
