//! The live copy of the system settings.
//!
//! Built once at startup from the store and handed to handlers through
//! `AppState`. After an admin saves new settings the copy is refreshed with
//! an explicit `reload`, so a request never reads a half-applied update.

use crate::error::{ApiError, ApiResult};
use crate::store::Store;
use chrono::Utc;
use common::model::settings::SystemSettings;
use common::requests::SettingsUpdate;
use log::info;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct SettingsState {
    current: Arc<RwLock<SystemSettings>>,
}

impl SettingsState {
    pub fn load(store: &Store) -> rusqlite::Result<Self> {
        let settings = store.load_settings()?.unwrap_or_default();
        Ok(SettingsState {
            current: Arc::new(RwLock::new(settings)),
        })
    }

    pub async fn snapshot(&self) -> SystemSettings {
        self.current.read().await.clone()
    }

    /// Re-reads the stored document, falling back to defaults if none exists.
    pub async fn reload(&self, store: &Store) -> rusqlite::Result<SystemSettings> {
        let fresh = store.load_settings()?.unwrap_or_default();
        *self.current.write().await = fresh.clone();
        Ok(fresh)
    }

    /// Validates and persists a partial update, then reloads.
    pub async fn update(
        &self,
        store: &Store,
        update: SettingsUpdate,
        updated_by: &str,
    ) -> ApiResult<SystemSettings> {
        let mut next = self.snapshot().await;
        if let Some(max_file_size) = update.max_file_size {
            next.max_file_size = max_file_size;
        }
        if let Some(types) = update.allowed_file_types {
            next.allowed_file_types = types
                .iter()
                .map(|t| t.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .collect();
        }
        if let Some(max_files) = update.max_files_per_user {
            next.max_files_per_user = max_files;
        }
        if let Some(days) = update.data_retention_days {
            next.data_retention_days = days;
        }
        if let Some(enabled) = update.enable_notifications {
            next.enable_notifications = enabled;
        }
        if let Some(enabled) = update.enable_analytics {
            next.enable_analytics = enabled;
        }
        next.validate().map_err(ApiError::BadRequest)?;
        next.updated_by = Some(updated_by.to_string());
        next.updated_at = Some(Utc::now());

        store.save_settings(&next)?;
        info!("system settings updated by {}", updated_by);
        Ok(self.reload(store).await?)
    }
}
