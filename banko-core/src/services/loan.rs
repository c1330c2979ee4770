//! Loan service - loan requests and their status lifecycle

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::amount::validate_amount;
use crate::domain::result::Error;
use crate::domain::{Actor, Loan, LoanStatus, NewAuditEntry};
use crate::services::account::account_not_found;

pub struct LoanService {
    repository: Arc<DuckDbRepository>,
}

impl LoanService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// File a pending loan request against an account
    pub fn request_loan(
        &self,
        actor: &Actor,
        account_no: &str,
        amount: Decimal,
        term_months: u32,
    ) -> Result<Loan> {
        actor.require_access(account_no)?;
        let amount = validate_amount(amount)?;
        if term_months < 1 {
            return Err(Error::validation("Loan term must be at least one month").into());
        }

        self.repository.write(|uow| {
            if !uow.account_exists(account_no)? {
                return Err(account_not_found(account_no));
            }
            let now = Utc::now();
            let loan = uow.insert_loan(account_no, amount, term_months, &now)?;
            uow.insert_audit(
                &NewAuditEntry::new(
                    actor.name(),
                    "loan_requested",
                    format!("{}|{}", account_no, amount),
                ),
                &now,
            )?;
            Ok(loan)
        })
    }

    /// Loans newest first; customers only see their own
    pub fn list_loans(&self, actor: &Actor, status: Option<LoanStatus>) -> Result<Vec<Loan>> {
        let account_no = match actor {
            Actor::Customer { account_no } => Some(account_no.as_str()),
            Actor::Admin { .. } => None,
        };
        self.repository
            .read(|uow| uow.list_loans(status, account_no))
    }

    /// Move a loan along its lifecycle (admins only)
    pub fn update_loan_status(
        &self,
        actor: &Actor,
        loan_id: i64,
        new_status: LoanStatus,
    ) -> Result<Loan> {
        actor.require_admin()?;

        self.repository.write(|uow| {
            let mut loan = uow
                .get_loan(loan_id)?
                .ok_or_else(|| Error::not_found(format!("Loan {} not found", loan_id)))?;
            loan.status = loan.status.transition_to(new_status)?;

            uow.update_loan_status(loan_id, loan.status)?;
            uow.insert_audit(
                &NewAuditEntry::new(
                    actor.name(),
                    "loan_status_change",
                    format!("{}|{}", loan_id, loan.status),
                ),
                &Utc::now(),
            )?;
            Ok(loan)
        })
    }
}
