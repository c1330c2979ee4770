//! Banko Core - Business logic for a single-branch bank ledger
//!
//! - **domain**: Core business entities (Account, Transaction, Loan, etc.)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (DuckDB)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::duckdb::DuckDbRepository;
use config::Config;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{
    Account, AccountStatus, Actor, Admin, AdminRole, AuditEntry, Loan, LoanStatus, Transaction,
    TransactionKind,
};
pub use services::logging::{LogEvent, LoggingService};

/// File name of the bank database inside the bank directory
pub const DB_FILENAME: &str = "bank_system.duckdb";

/// Main context for Banko operations
///
/// This is the primary entry point for all business logic. It holds
/// the database connection, configuration, and all services.
pub struct BankContext {
    pub config: Config,
    pub repository: Arc<DuckDbRepository>,
    pub admin_service: AdminService,
    pub account_service: AccountService,
    pub ledger_service: LedgerService,
    pub loan_service: LoanService,
    pub audit_service: AuditService,
    pub status_service: StatusService,
}

impl BankContext {
    /// Open the bank in `bank_dir` with settings loaded from that directory
    pub fn new(bank_dir: &Path) -> Result<Self> {
        let config = Config::load(bank_dir)?;
        Self::with_config(bank_dir, config)
    }

    /// Open the bank in `bank_dir` with an explicit configuration
    ///
    /// Creates the directory and schema when missing and makes sure the
    /// bootstrap superadmin exists.
    pub fn with_config(bank_dir: &Path, config: Config) -> Result<Self> {
        std::fs::create_dir_all(bank_dir)?;

        let repository = Arc::new(DuckDbRepository::new(&bank_dir.join(DB_FILENAME))?);
        repository.ensure_schema()?;

        let credentials = CredentialService::new(config.password_hashing);

        let admin_service = AdminService::new(Arc::clone(&repository), credentials.clone());
        let account_service = AccountService::new(Arc::clone(&repository), credentials);
        let ledger_service = LedgerService::new(Arc::clone(&repository), config.history_limit);
        let loan_service = LoanService::new(Arc::clone(&repository));
        let audit_service = AuditService::new(Arc::clone(&repository), config.audit_limit);
        let status_service = StatusService::new(Arc::clone(&repository));

        admin_service.ensure_default_admin()?;

        Ok(Self {
            config,
            repository,
            admin_service,
            account_service,
            ledger_service,
            loan_service,
            audit_service,
            status_service,
        })
    }
}
