use serde::{Deserialize, Serialize};

use super::user_record::Role;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CurrentUser {
    pub username: String,
    pub name: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn can(&self, required: Role) -> bool {
        self.role.permits(required)
    }

    pub fn is_admin(&self) -> bool {
        self.can(Role::Admin)
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.username
        } else {
            &self.name
        }
    }
}
