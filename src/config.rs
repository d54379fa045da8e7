use std::env;
use std::path::{Path, PathBuf};

// Default configuration constants
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = ".";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "";
pub const DEFAULT_IBGE_API_URL: &str = "https://servicodados.ibge.gov.br/api/v1/localidades";
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;
pub const DEFAULT_SESSION_TIMEOUT_MINUTES: u32 = 30;

pub const UNITS_FILE: &str = "units.json";
pub const USERS_FILE: &str = "users.json";
pub const SETTINGS_FILE: &str = "settings.json";

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

pub fn get_data_dir() -> PathBuf {
    let raw = env::var("DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        PathBuf::from(DEFAULT_DATA_DIR)
    } else {
        PathBuf::from(trimmed)
    }
}

pub fn get_public_base_url() -> String {
    sanitize_base_url(&env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| DEFAULT_PUBLIC_BASE_URL.to_string()))
}

pub fn get_ibge_api_url() -> String {
    env_url("IBGE_API_URL", DEFAULT_IBGE_API_URL)
}

pub fn get_nominatim_url() -> String {
    env_url("NOMINATIM_URL", DEFAULT_NOMINATIM_URL)
}

fn env_url(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => v.trim().trim_end_matches('/').to_string(),
        _ => default.to_string(),
    }
}

pub fn sanitize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "http://localhost:5000".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Connection settings for the XANO backend.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct XanoConfig {
    pub instance_name: String,
    pub workspace_id: String,
    pub api_token: String,
    pub base_url: String,
    pub enabled: bool,
}

impl XanoConfig {
    pub fn from_env() -> Self {
        let instance_name = env::var("XANO_INSTANCE_NAME").unwrap_or_default().trim().to_string();
        let base_url = match env::var("XANO_API_URL") {
            Ok(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
            _ => default_xano_url(&instance_name),
        };
        XanoConfig {
            workspace_id: env::var("XANO_WORKSPACE_ID").unwrap_or_default().trim().to_string(),
            api_token: env::var("XANO_API_TOKEN").unwrap_or_default().trim().to_string(),
            enabled: env::var("ENABLE_XANO")
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            base_url,
            instance_name,
        }
    }

    /// Every problem preventing the backend from being used; empty when valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.enabled {
            errors.push("XANO integration is disabled".to_string());
        }
        if self.instance_name.is_empty() {
            errors.push("XANO_INSTANCE_NAME is required".to_string());
        }
        if self.workspace_id.is_empty() {
            errors.push("XANO_WORKSPACE_ID is required".to_string());
        }
        if self.base_url.is_empty() {
            errors.push("XANO_API_URL is required".to_string());
        }
        if self.api_token.is_empty() {
            errors.push("XANO_API_TOKEN is required".to_string());
        }
        errors
    }

    pub fn is_usable(&self) -> bool {
        self.validate().is_empty()
    }
}

fn default_xano_url(instance_name: &str) -> String {
    let instance = if instance_name.is_empty() { "your-instance" } else { instance_name };
    format!("https://{}.xano.io/api:v1", instance)
}

/// Everything the server and CLI read from the environment.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub public_base_url: String,
    pub ibge_api_url: String,
    pub nominatim_url: String,
    pub xano: XanoConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        AppConfig {
            data_dir: get_data_dir(),
            public_base_url: get_public_base_url(),
            ibge_api_url: get_ibge_api_url(),
            nominatim_url: get_nominatim_url(),
            xano: XanoConfig::from_env(),
        }
    }

    /// Offline configuration rooted at `data_dir`; used by tests and the CLI.
    pub fn local(data_dir: impl Into<PathBuf>) -> Self {
        AppConfig {
            data_dir: data_dir.into(),
            public_base_url: sanitize_base_url(DEFAULT_PUBLIC_BASE_URL),
            ibge_api_url: DEFAULT_IBGE_API_URL.to_string(),
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            xano: XanoConfig::default(),
        }
    }

    pub fn units_path(&self) -> PathBuf {
        self.data_dir.join(UNITS_FILE)
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(USERS_FILE)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }
}
