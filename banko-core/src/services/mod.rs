//! Service layer - business logic orchestration
//!
//! Services coordinate domain rules and repository work. Each service
//! focuses on a specific use case or feature area.

pub(crate) mod account;
mod admin;
mod audit;
mod credentials;
mod ledger;
mod loan;
pub mod logging;
pub mod migration;
mod status;

pub use account::AccountService;
pub use admin::AdminService;
pub use audit::AuditService;
pub use credentials::CredentialService;
pub use ledger::{LedgerService, Movement};
pub use loan::LoanService;
pub use logging::{EventCount, LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use status::{LoanCount, StatusService, StatusSummary};
