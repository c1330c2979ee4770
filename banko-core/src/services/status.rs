//! Status service - branch-wide summary counts

use std::sync::Arc;

use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::{AccountStatus, Actor, LoanStatus};

/// Status service for branch summaries
pub struct StatusService {
    repository: Arc<DuckDbRepository>,
}

impl StatusService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Get overall status summary (admins only)
    pub fn get_status(&self, actor: &Actor) -> Result<StatusSummary> {
        actor.require_admin()?;
        self.repository.read(|uow| {
            let mut loans = Vec::with_capacity(LoanStatus::ALL.len());
            for status in LoanStatus::ALL {
                loans.push(LoanCount {
                    status,
                    count: uow.count_loans(status)?,
                });
            }

            Ok(StatusSummary {
                total_accounts: uow.count_accounts(None)?,
                active_accounts: uow.count_accounts(Some(AccountStatus::Active))?,
                frozen_accounts: uow.count_accounts(Some(AccountStatus::Frozen))?,
                kyc_verified_accounts: uow.count_kyc_verified()?,
                total_deposits: uow.total_balance()?,
                total_transactions: uow.count_transactions()?,
                loans,
                total_audit_entries: uow.count_audit()?,
            })
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub total_accounts: i64,
    pub active_accounts: i64,
    pub frozen_accounts: i64,
    pub kyc_verified_accounts: i64,
    /// Sum of every account balance
    pub total_deposits: Decimal,
    pub total_transactions: i64,
    pub loans: Vec<LoanCount>,
    pub total_audit_entries: i64,
}

#[derive(Debug, Serialize)]
pub struct LoanCount {
    pub status: LoanStatus,
    pub count: i64,
}
