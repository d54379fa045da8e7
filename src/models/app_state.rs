use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use crate::api::XanoClient;
use crate::config::AppConfig;
use crate::error::{ApiError, StoreError};
use crate::map::MapSessionStore;
use crate::services::{
    load_users_from_file, random_session_id, GeocodingService, LocationService, SettingsStore,
    UnitBackend, UnitStore, UserMap,
};

/// A logged-in admin session. Expiry slides forward on every request.
#[derive(Clone, Debug)]
pub struct Session {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AppState {
    pub users: UserMap,
    pub users_path: PathBuf,
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
    pub flash_store: Arc<Mutex<HashMap<String, Vec<String>>>>,
    pub units: UnitStore,
    pub settings: SettingsStore,
    pub map_sessions: MapSessionStore,
    pub locations: Arc<LocationService>,
    pub geocoder: Arc<GeocodingService>,
    pub public_base_url: String,
    pub custom_css: Option<String>,
}

impl AppState {
    /// Wires every store from the configuration. A backend that cannot be
    /// reached at startup leaves the unit list empty instead of failing.
    pub async fn build(config: &AppConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .user_agent(format!("Locator/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::from)?;

        let remote = if config.xano.enabled {
            match XanoClient::new(client.clone(), &config.xano) {
                Ok(c) => Some(c),
                Err(e) => {
                    tracing::warn!(%e, "XANO enabled but unusable; falling back to local storage");
                    None
                }
            }
        } else {
            None
        };

        let backend = match remote.clone() {
            Some(c) => UnitBackend::Remote(c),
            None => UnitBackend::Local(config.units_path()),
        };
        let units = UnitStore::new(backend);
        if let Err(e) = units.refresh().await {
            tracing::error!(%e, "Failed to load units");
        }

        let settings = SettingsStore::load(config.settings_path(), remote).await;
        let users_path = config.users_path();
        let users = load_users_from_file(&users_path).await?;

        Ok(AppState {
            users,
            users_path,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            flash_store: Arc::new(Mutex::new(HashMap::new())),
            units,
            settings,
            map_sessions: MapSessionStore::new(),
            locations: Arc::new(LocationService::new(client.clone(), &config.ibge_api_url)),
            geocoder: Arc::new(GeocodingService::new(client, &config.nominatim_url)),
            public_base_url: config.public_base_url.clone(),
            custom_css: None,
        })
    }

    /// Local files only and no outbound HTTP.
    pub async fn offline(config: &AppConfig) -> Result<Self, StoreError> {
        let units = UnitStore::new(UnitBackend::Local(config.units_path()));
        units.refresh().await?;
        let users_path = config.users_path();
        Ok(AppState {
            users: load_users_from_file(&users_path).await?,
            users_path,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            flash_store: Arc::new(Mutex::new(HashMap::new())),
            units,
            settings: SettingsStore::load(config.settings_path(), None).await,
            map_sessions: MapSessionStore::new(),
            locations: Arc::new(LocationService::offline()),
            geocoder: Arc::new(GeocodingService::offline()),
            public_base_url: config.public_base_url.clone(),
            custom_css: None,
        })
    }

    pub fn open_session(&self, username: &str) -> String {
        let sid = random_session_id();
        let expires_at = Utc::now() + self.session_ttl();
        self.sessions.lock().unwrap().insert(
            sid.clone(),
            Session {
                username: username.to_string(),
                expires_at,
            },
        );
        tracing::info!(username, "Session opened");
        sid
    }

    /// Username for a live session; expired sessions are dropped.
    pub fn session_user(&self, sid: &str) -> Option<String> {
        let ttl = self.session_ttl();
        let now = Utc::now();
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.get_mut(sid) {
            Some(s) if s.expires_at > now => {
                s.expires_at = now + ttl;
                Some(s.username.clone())
            }
            Some(_) => {
                sessions.remove(sid);
                None
            }
            None => None,
        }
    }

    pub fn close_session(&self, sid: &str) {
        self.sessions.lock().unwrap().remove(sid);
        self.flash_store.lock().unwrap().remove(sid);
    }

    pub fn push_flash(&self, sid: &str, message: impl Into<String>) {
        self.flash_store
            .lock()
            .unwrap()
            .entry(sid.to_string())
            .or_default()
            .push(message.into());
    }

    fn session_ttl(&self) -> Duration {
        Duration::minutes(i64::from(self.settings.session_timeout_minutes().max(1)))
    }
}
