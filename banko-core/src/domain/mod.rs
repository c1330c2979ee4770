//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod account;
mod actor;
mod admin;
pub mod amount;
mod audit;
mod loan;
pub mod result;
mod transaction;

pub use account::{Account, AccountStatus, ACCOUNT_NO_PREFIX};
pub use actor::Actor;
pub use admin::{Admin, AdminRole, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};
pub use audit::{AuditEntry, NewAuditEntry, SYSTEM_ACTOR};
pub use loan::{Loan, LoanStatus};
pub use transaction::{NewTransaction, Transaction, TransactionKind};
