//! Account domain model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::result::Error;

/// Prefix of every generated account number
pub const ACCOUNT_NO_PREFIX: &str = "AC";

/// Whether an account can move money
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Frozen,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Frozen => "frozen",
        }
    }

    /// Only active accounts take deposits, withdrawals or transfers
    pub fn allows_movements(&self) -> bool {
        matches!(self, AccountStatus::Active)
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(AccountStatus::Active),
            "frozen" => Ok(AccountStatus::Frozen),
            other => Err(Error::validation(format!("Unknown account status: {}", other))),
        }
    }
}

/// A customer account held at the branch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub account_no: String,
    pub name: String,
    pub balance: Decimal,
    pub status: AccountStatus,
    pub kyc_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new active account with the given opening balance
    pub fn new(account_no: impl Into<String>, name: impl Into<String>, balance: Decimal) -> Self {
        Self {
            account_no: account_no.into(),
            name: name.into(),
            balance,
            status: AccountStatus::Active,
            kyc_verified: false,
            created_at: Utc::now(),
        }
    }

    /// Generate a fresh account number: `AC` + 8 uppercase hex digits
    pub fn generate_account_no() -> String {
        let hex = Uuid::new_v4().simple().to_string();
        format!("{}{}", ACCOUNT_NO_PREFIX, hex[..8].to_uppercase())
    }

    /// Validate account data
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("account name cannot be empty");
        }
        if self.account_no.trim().is_empty() {
            return Err("account number cannot be empty");
        }
        Ok(())
    }
}
