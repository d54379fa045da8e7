use serde::{Deserialize, Serialize};

/// Access level of an admin account. Higher roles include the lower ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Operator,
}

impl Role {
    fn rank(self) -> u8 {
        match self {
            Role::Admin => 3,
            Role::Manager => 2,
            Role::Operator => 1,
        }
    }

    /// True when this role may do what `required` may do.
    pub fn permits(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Operator => "operator",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "manager" => Some(Role::Manager),
            "operator" => Some(Role::Operator),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserRecord {
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub last_login: Option<String>,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_hierarchy() {
        assert!(Role::Admin.permits(Role::Manager));
        assert!(Role::Manager.permits(Role::Operator));
        assert!(!Role::Operator.permits(Role::Manager));
        assert!(Role::Manager.permits(Role::Manager));
    }

    #[test]
    fn record_defaults_to_active() {
        let rec: UserRecord =
            serde_json::from_str(r#"{"password":"x","role":"operator"}"#).unwrap();
        assert!(rec.active);
        assert_eq!(rec.role, Role::Operator);
    }
}
