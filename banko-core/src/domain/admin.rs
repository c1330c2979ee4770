//! Admin domain model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::result::Error;

/// Username of the bootstrap superadmin
pub const DEFAULT_ADMIN_USERNAME: &str = "Admin";
/// Password of the bootstrap superadmin
pub const DEFAULT_ADMIN_PASSWORD: &str = "Admin123";

/// Staff role: the superadmin manages staff and removes accounts, clerks run the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    Superadmin,
    Clerk,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Superadmin => "superadmin",
            AdminRole::Clerk => "clerk",
        }
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "superadmin" => Ok(AdminRole::Superadmin),
            "clerk" => Ok(AdminRole::Clerk),
            other => Err(Error::validation(format!("Unknown admin role: {}", other))),
        }
    }
}

/// A staff member allowed to operate the branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    pub username: String,
    pub fullname: Option<String>,
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
}

impl Admin {
    pub fn new(username: impl Into<String>, fullname: Option<String>, role: AdminRole) -> Self {
        Self {
            username: username.into(),
            fullname,
            role,
            created_at: Utc::now(),
        }
    }
}
