use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::XanoClient;
use crate::error::StoreError;
use crate::models::Customization;

use super::file_store::write_file_atomic;

/// Key under which the customization object is mirrored in XANO.
pub const CUSTOMIZATION_KEY: &str = "customization";

/// Customization settings persisted to `settings.json` and, when a backend is
/// configured, mirrored to the remote settings table.
#[derive(Clone)]
pub struct SettingsStore {
    path: PathBuf,
    remote: Option<XanoClient>,
    current: Arc<Mutex<Customization>>,
}

impl SettingsStore {
    pub async fn load(path: PathBuf, remote: Option<XanoClient>) -> Self {
        let store = SettingsStore {
            path,
            remote,
            current: Arc::new(Mutex::new(Customization::default())),
        };
        store.reload().await;
        store
    }

    pub fn get(&self) -> Customization {
        self.current.lock().unwrap().clone()
    }

    pub fn session_timeout_minutes(&self) -> u32 {
        self.current.lock().unwrap().session_timeout_minutes
    }

    /// Re-reads the local file, then lets the remote copy win when present.
    /// Unreadable sources are logged and skipped.
    pub async fn reload(&self) {
        let mut settings = Customization::default();
        if self.path.exists() {
            match tokio::fs::read_to_string(&self.path).await {
                Ok(text) => match serde_json::from_str(&text) {
                    Ok(parsed) => settings = parsed,
                    Err(e) => tracing::warn!(%e, path = %self.path.display(), "Ignoring malformed settings file"),
                },
                Err(e) => tracing::warn!(%e, path = %self.path.display(), "Failed to read settings file"),
            }
        }
        if let Some(client) = &self.remote {
            match client.get_setting(CUSTOMIZATION_KEY).await {
                Ok(setting) => match serde_json::from_str(&setting.value) {
                    Ok(parsed) => settings = parsed,
                    Err(e) => tracing::warn!(%e, "Ignoring malformed remote customization"),
                },
                Err(e) => tracing::warn!(%e, "Remote customization unavailable"),
            }
        }
        *self.current.lock().unwrap() = settings;
    }

    /// Writes locally first; a remote failure is returned after the local
    /// copy is already saved.
    pub async fn save(&self, settings: Customization) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(&settings)?;
        write_file_atomic(&self.path, &content).await?;
        *self.current.lock().unwrap() = settings;
        tracing::info!(path = %self.path.display(), "Settings saved");
        if let Some(client) = &self.remote {
            client
                .update_setting(CUSTOMIZATION_KEY, &content, Some(CUSTOMIZATION_KEY))
                .await?;
        }
        Ok(())
    }
}
