//! In-memory storefront API double for tests and the CLI demo.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::wizard::draft::{CreateStorePayload, StoreType};

use super::{Category, CreatedStore, StorefrontApi, ThemeFilter, ThemeTemplate, UploadedImage};

/// Scripted storefront backend: canned catalog data, optional failure
/// injection, and call counters for assertions.
pub struct MockStorefrontApi {
    pub categories: Vec<Category>,
    pub themes: Vec<ThemeTemplate>,
    fail_upload: Mutex<Option<String>>,
    fail_create: Mutex<Option<String>>,
    upload_delay: Mutex<Option<Duration>>,
    create_delay: Mutex<Option<Duration>>,
    upload_calls: AtomicUsize,
    create_calls: AtomicUsize,
    theme_increments: Mutex<Vec<i64>>,
    last_payload: Mutex<Option<CreateStorePayload>>,
}

impl Default for MockStorefrontApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStorefrontApi {
    pub fn new() -> Self {
        Self {
            categories: vec![
                Category { id: 1, name: "Fashion".to_string() },
                Category { id: 2, name: "Electronics".to_string() },
                Category { id: 3, name: "Bakery".to_string() },
                Category { id: 4, name: "Groceries".to_string() },
            ],
            themes: vec![
                ThemeTemplate {
                    id: 1,
                    name: "Clean Slate".to_string(),
                    category: "general".to_string(),
                    premium: false,
                    preview_url: "https://cdn.example/themes/clean-slate.png".to_string(),
                },
                ThemeTemplate {
                    id: 2,
                    name: "Warm Oven".to_string(),
                    category: "food".to_string(),
                    premium: false,
                    preview_url: "https://cdn.example/themes/warm-oven.png".to_string(),
                },
                ThemeTemplate {
                    id: 3,
                    name: "Night Market".to_string(),
                    category: "general".to_string(),
                    premium: true,
                    preview_url: "https://cdn.example/themes/night-market.png".to_string(),
                },
            ],
            fail_upload: Mutex::new(None),
            fail_create: Mutex::new(None),
            upload_delay: Mutex::new(None),
            create_delay: Mutex::new(None),
            upload_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            theme_increments: Mutex::new(Vec::new()),
            last_payload: Mutex::new(None),
        }
    }

    /// Make the next upload calls fail with the given message.
    pub fn fail_uploads_with(&self, message: impl Into<String>) {
        *self.fail_upload.lock().unwrap() = Some(message.into());
    }

    /// Stop failing uploads.
    pub fn clear_upload_failure(&self) {
        *self.fail_upload.lock().unwrap() = None;
    }

    /// Make creation calls fail with the given server message.
    pub fn fail_creation_with(&self, message: impl Into<String>) {
        *self.fail_create.lock().unwrap() = Some(message.into());
    }

    /// Stop failing creation calls.
    pub fn clear_creation_failure(&self) {
        *self.fail_create.lock().unwrap() = None;
    }

    /// Delay upload calls, to exercise in-flight guards.
    pub fn set_upload_delay(&self, delay: Duration) {
        *self.upload_delay.lock().unwrap() = Some(delay);
    }

    /// Delay creation calls, to exercise in-flight guards.
    pub fn set_create_delay(&self, delay: Duration) {
        *self.create_delay.lock().unwrap() = Some(delay);
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn theme_increments(&self) -> Vec<i64> {
        self.theme_increments.lock().unwrap().clone()
    }

    pub fn last_payload(&self) -> Option<CreateStorePayload> {
        self.last_payload.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorefrontApi for MockStorefrontApi {
    async fn list_categories(&self, _store_type: StoreType) -> Result<Vec<Category>, ApiError> {
        Ok(self.categories.clone())
    }

    async fn list_themes(&self, filter: &ThemeFilter) -> Result<Vec<ThemeTemplate>, ApiError> {
        let themes = self
            .themes
            .iter()
            .filter(|t| {
                filter
                    .category
                    .as_ref()
                    .is_none_or(|c| &t.category == c)
            })
            .filter(|t| filter.premium.is_none_or(|p| t.premium == p))
            .cloned()
            .collect();
        Ok(themes)
    }

    async fn increment_theme_downloads(&self, theme_id: i64) -> Result<(), ApiError> {
        self.theme_increments.lock().unwrap().push(theme_id);
        Ok(())
    }

    async fn upload_image(
        &self,
        _bytes: Vec<u8>,
        filename: &str,
    ) -> Result<UploadedImage, ApiError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.upload_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = self.fail_upload.lock().unwrap().clone() {
            return Err(ApiError::Rejected(message));
        }
        Ok(UploadedImage {
            url: format!("https://cdn.example/uploads/{filename}"),
        })
    }

    async fn create_store(&self, payload: &CreateStorePayload) -> Result<CreatedStore, ApiError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.create_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = self.fail_create.lock().unwrap().clone() {
            return Err(ApiError::Rejected(message));
        }
        *self.last_payload.lock().unwrap() = Some(payload.clone());
        Ok(CreatedStore { id: 42 })
    }
}
