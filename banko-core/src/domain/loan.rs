//! Loan domain model
//!
//! Loans are requests tracked through a small status lifecycle. There is no
//! repayment schedule and disbursal does not move money.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::result::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Pending,
    Approved,
    Rejected,
    Disbursed,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 4] = [
        LoanStatus::Pending,
        LoanStatus::Approved,
        LoanStatus::Rejected,
        LoanStatus::Disbursed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
            LoanStatus::Disbursed => "disbursed",
        }
    }

    /// pending -> approved | rejected, approved -> disbursed
    pub fn can_transition_to(&self, next: LoanStatus) -> bool {
        matches!(
            (self, next),
            (LoanStatus::Pending, LoanStatus::Approved)
                | (LoanStatus::Pending, LoanStatus::Rejected)
                | (LoanStatus::Approved, LoanStatus::Disbursed)
        )
    }

    /// Check a status change, returning the typed error on refusal
    pub fn transition_to(&self, next: LoanStatus) -> Result<LoanStatus, Error> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(Error::InvalidTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
            })
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        LoanStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == lower)
            .ok_or_else(|| Error::validation(format!("Unknown loan status: {}", s)))
    }
}

/// A loan request tied to an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: i64,
    pub account_no: String,
    pub amount: Decimal,
    pub term_months: u32,
    pub status: LoanStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_transitions() {
        assert!(LoanStatus::Pending.can_transition_to(LoanStatus::Approved));
        assert!(LoanStatus::Pending.can_transition_to(LoanStatus::Rejected));
        assert!(LoanStatus::Approved.can_transition_to(LoanStatus::Disbursed));
    }

    #[test]
    fn test_refused_transitions() {
        assert!(!LoanStatus::Pending.can_transition_to(LoanStatus::Disbursed));
        assert!(!LoanStatus::Rejected.can_transition_to(LoanStatus::Approved));
        assert!(!LoanStatus::Disbursed.can_transition_to(LoanStatus::Pending));
        assert!(!LoanStatus::Approved.can_transition_to(LoanStatus::Approved));

        match LoanStatus::Rejected.transition_to(LoanStatus::Disbursed) {
            Err(Error::InvalidTransition { from, to }) => {
                assert_eq!(from, "rejected");
                assert_eq!(to, "disbursed");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_status_parsing_is_case_insensitive() {
        assert_eq!("APPROVED".parse::<LoanStatus>().unwrap(), LoanStatus::Approved);
        assert!("repaid".parse::<LoanStatus>().is_err());
    }
}
