//! Transaction domain model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::result::Error;

/// What kind of money movement a transaction row records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    Transfer,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdraw => "withdraw",
            TransactionKind::Transfer => "transfer",
        }
    }

    /// Audit action recorded next to the ledger row
    pub fn audit_action(&self) -> String {
        format!("tx_{}", self.as_str())
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(TransactionKind::Deposit),
            "withdraw" => Ok(TransactionKind::Withdraw),
            "transfer" => Ok(TransactionKind::Transfer),
            other => Err(Error::validation(format!("Unknown transaction type: {}", other))),
        }
    }
}

/// An immutable ledger row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub kind: TransactionKind,
    pub from_acc: Option<String>,
    pub to_acc: Option<String>,
    pub amount: Decimal,
    pub performed_by: String,
    pub created_at: DateTime<Utc>,
}

/// A ledger row that has not been stored yet
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub from_acc: Option<String>,
    pub to_acc: Option<String>,
    pub amount: Decimal,
    pub performed_by: String,
}

impl NewTransaction {
    pub fn deposit(to_acc: &str, amount: Decimal, performed_by: &str) -> Self {
        Self {
            kind: TransactionKind::Deposit,
            from_acc: None,
            to_acc: Some(to_acc.to_string()),
            amount,
            performed_by: performed_by.to_string(),
        }
    }

    pub fn withdraw(from_acc: &str, amount: Decimal, performed_by: &str) -> Self {
        Self {
            kind: TransactionKind::Withdraw,
            from_acc: Some(from_acc.to_string()),
            to_acc: None,
            amount,
            performed_by: performed_by.to_string(),
        }
    }

    pub fn transfer(from_acc: &str, to_acc: &str, amount: Decimal, performed_by: &str) -> Self {
        Self {
            kind: TransactionKind::Transfer,
            from_acc: Some(from_acc.to_string()),
            to_acc: Some(to_acc.to_string()),
            amount,
            performed_by: performed_by.to_string(),
        }
    }

    /// Detail string for the audit entry: `<from>-><to>|<amount>`
    pub fn audit_details(&self) -> String {
        format!(
            "{}->{}|{}",
            self.from_acc.as_deref().unwrap_or("-"),
            self.to_acc.as_deref().unwrap_or("-"),
            self.amount
        )
    }
}

impl Transaction {
    /// True if the account is on either side of this movement
    pub fn involves(&self, account_no: &str) -> bool {
        self.from_acc.as_deref() == Some(account_no) || self.to_acc.as_deref() == Some(account_no)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_shapes() {
        let amount = Decimal::new(10000, 2);

        let dep = NewTransaction::deposit("AC1", amount, "Admin");
        assert!(dep.from_acc.is_none());
        assert_eq!(dep.to_acc.as_deref(), Some("AC1"));

        let wd = NewTransaction::withdraw("AC1", amount, "Admin");
        assert_eq!(wd.from_acc.as_deref(), Some("AC1"));
        assert!(wd.to_acc.is_none());

        let tr = NewTransaction::transfer("AC1", "AC2", amount, "Admin");
        assert_eq!(tr.kind, TransactionKind::Transfer);
        assert_eq!(tr.audit_details(), "AC1->AC2|100.00");
    }

    #[test]
    fn test_audit_details_for_one_sided_rows() {
        let dep = NewTransaction::deposit("AC1", Decimal::new(550, 2), "AC1");
        assert_eq!(dep.audit_details(), "-->AC1|5.50");
        assert_eq!(dep.kind.audit_action(), "tx_deposit");
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!("loan".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_involves() {
        let tx = Transaction {
            id: 1,
            kind: TransactionKind::Transfer,
            from_acc: Some("AC1".to_string()),
            to_acc: Some("AC2".to_string()),
            amount: Decimal::ONE,
            performed_by: "Admin".to_string(),
            created_at: Utc::now(),
        };
        assert!(tx.involves("AC1"));
        assert!(tx.involves("AC2"));
        assert!(!tx.involves("AC3"));
    }
}
