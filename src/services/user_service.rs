use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, Mutex};

use hex::encode as hex_encode;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

use crate::config::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME, DEFAULT_PBKDF2_ITERATIONS};
use crate::error::StoreError;
use crate::models::{Role, UserRecord};

use super::file_store::write_file_atomic;

pub type UserMap = Arc<Mutex<HashMap<String, UserRecord>>>;

pub fn generate_password_hash(password: &str) -> String {
    let mut salt_bytes = [0u8; 12];
    rand::rngs::OsRng.fill_bytes(&mut salt_bytes);
    let salt = hex_encode(salt_bytes);
    let mut dk = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), DEFAULT_PBKDF2_ITERATIONS, &mut dk);
    format!("pbkdf2:sha256:{}${}${}", DEFAULT_PBKDF2_ITERATIONS, salt, hex_encode(dk))
}

pub fn verify_password(stored: &str, candidate: &str) -> bool {
    let Some(rest) = stored.strip_prefix("pbkdf2:sha256:") else {
        return false;
    };
    let Some((iter_s, salt_hash)) = rest.split_once('$') else {
        return false;
    };
    let Some((salt, expected_hash)) = salt_hash.split_once('$') else {
        return false;
    };
    let Ok(iter) = iter_s.parse::<u32>() else {
        return false;
    };
    let mut dk = [0u8; 32];
    pbkdf2_hmac::<Sha256>(candidate.as_bytes(), salt.as_bytes(), iter, &mut dk);
    hex_encode(dk) == expected_hash
}

pub fn random_session_id() -> String {
    let mut b = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut b);
    hex_encode(b)
}

pub fn now_iso8601() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn default_admin() -> UserRecord {
    UserRecord {
        password: generate_password_hash(DEFAULT_ADMIN_PASSWORD),
        role: Role::Admin,
        name: "Administrador".into(),
        email: String::new(),
        active: true,
        created_at: now_iso8601(),
        last_login: None,
    }
}

/// Loads `users.json`, creating it with the default admin account when absent.
pub async fn load_users_from_file(path: &Path) -> Result<UserMap, StoreError> {
    let map: HashMap<String, UserRecord> = if path.exists() {
        let text = tokio::fs::read_to_string(path).await?;
        let parsed: HashMap<String, UserRecord> = serde_json::from_str(&text)?;
        parsed
            .into_iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v))
            .collect()
    } else {
        let mut map = HashMap::new();
        map.insert(DEFAULT_ADMIN_USERNAME.to_string(), default_admin());
        write_users(path, &map).await?;
        tracing::warn!(
            username = DEFAULT_ADMIN_USERNAME,
            "Created default admin account; change its password"
        );
        map
    };
    Ok(Arc::new(Mutex::new(map)))
}

/// Orders writers of `users.json`; each snapshot is taken under it.
static USERS_WRITE: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

pub async fn persist_users_file(users: &UserMap, path: &Path) -> Result<(), StoreError> {
    let _guard = USERS_WRITE.lock().await;
    let snapshot = users.lock().unwrap().clone();
    write_users(path, &snapshot).await
}

async fn write_users(path: &Path, users: &HashMap<String, UserRecord>) -> Result<(), StoreError> {
    let ordered: BTreeMap<&String, &UserRecord> = users.iter().collect();
    let content = serde_json::to_string_pretty(&ordered)?;
    write_file_atomic(path, &content).await
}

/// Checks credentials; inactive accounts never authenticate. Records the
/// login time on success.
pub fn authenticate(users: &UserMap, username: &str, password: &str) -> Option<String> {
    let uname = username.trim().to_lowercase();
    let mut users = users.lock().unwrap();
    let rec = users.get_mut(&uname)?;
    if !rec.active || !verify_password(&rec.password, password) {
        return None;
    }
    rec.last_login = Some(now_iso8601());
    Some(uname)
}

pub fn add_user(
    users: &UserMap,
    username: &str,
    password: &str,
    role: Role,
    name: &str,
    email: &str,
) -> Result<(), StoreError> {
    let uname = username.trim().to_lowercase();
    if uname.is_empty() || password.is_empty() {
        return Err(StoreError::Invalid("username and password are required".into()));
    }
    let mut users = users.lock().unwrap();
    if users.contains_key(&uname) {
        return Err(StoreError::Invalid(format!("user '{}' already exists", uname)));
    }
    users.insert(
        uname,
        UserRecord {
            password: generate_password_hash(password),
            role,
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            active: true,
            created_at: now_iso8601(),
            last_login: None,
        },
    );
    Ok(())
}

pub fn reset_password(users: &UserMap, username: &str, password: &str) -> Result<(), StoreError> {
    if password.is_empty() {
        return Err(StoreError::Invalid("password must not be empty".into()));
    }
    let uname = username.trim().to_lowercase();
    let mut users = users.lock().unwrap();
    let rec = users
        .get_mut(&uname)
        .ok_or_else(|| StoreError::Invalid(format!("user '{}' not found", uname)))?;
    rec.password = generate_password_hash(password);
    Ok(())
}

/// Marks the account inactive. The last active admin cannot be deactivated.
pub fn deactivate_user(users: &UserMap, username: &str) -> Result<(), StoreError> {
    let uname = username.trim().to_lowercase();
    let mut users = users.lock().unwrap();
    let is_admin = match users.get(&uname) {
        Some(rec) => rec.role == Role::Admin && rec.active,
        None => return Err(StoreError::Invalid(format!("user '{}' not found", uname))),
    };
    if is_admin {
        let active_admins = users
            .values()
            .filter(|r| r.role == Role::Admin && r.active)
            .count();
        if active_admins <= 1 {
            return Err(StoreError::Invalid("cannot deactivate the last active admin".into()));
        }
    }
    if let Some(rec) = users.get_mut(&uname) {
        rec.active = false;
    }
    Ok(())
}
