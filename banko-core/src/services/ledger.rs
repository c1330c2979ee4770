//! Ledger service - deposits, withdrawals, transfers and history
//!
//! Every movement is one database transaction covering the balance
//! update(s), the ledger row and the audit row.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::adapters::duckdb::{DuckDbRepository, UnitOfWork};
use crate::domain::amount::{credit, debit, validate_amount};
use crate::domain::result::Error;
use crate::domain::{Account, Actor, NewAuditEntry, NewTransaction, Transaction};
use crate::services::account::account_not_found;

/// Outcome of a deposit, withdrawal or transfer
#[derive(Debug, Clone, serde::Serialize)]
pub struct Movement {
    pub transaction: Transaction,
    /// Balances after the movement, source first for transfers
    pub balances: Vec<(String, Decimal)>,
}

pub struct LedgerService {
    repository: Arc<DuckDbRepository>,
    history_limit: usize,
}

impl LedgerService {
    pub fn new(repository: Arc<DuckDbRepository>, history_limit: usize) -> Self {
        Self {
            repository,
            history_limit,
        }
    }

    pub fn deposit(&self, actor: &Actor, account_no: &str, amount: Decimal) -> Result<Movement> {
        actor.require_access(account_no)?;
        let amount = validate_amount(amount)?;

        self.repository.write(|uow| {
            let account = active_account(uow, account_no)?;
            let balance = credit(account.balance, amount)?;
            uow.set_balance(account_no, balance)?;

            let tx = NewTransaction::deposit(account_no, amount, actor.name());
            let transaction = record(uow, &tx)?;
            Ok(Movement {
                transaction,
                balances: vec![(account.account_no, balance)],
            })
        })
    }

    pub fn withdraw(&self, actor: &Actor, account_no: &str, amount: Decimal) -> Result<Movement> {
        actor.require_access(account_no)?;
        let amount = validate_amount(amount)?;

        self.repository.write(|uow| {
            let account = active_account(uow, account_no)?;
            ensure_funds(&account, amount)?;
            let balance = debit(account.balance, amount)?;
            uow.set_balance(account_no, balance)?;

            let tx = NewTransaction::withdraw(account_no, amount, actor.name());
            let transaction = record(uow, &tx)?;
            Ok(Movement {
                transaction,
                balances: vec![(account.account_no, balance)],
            })
        })
    }

    /// Move money between two accounts (admins only)
    pub fn transfer(&self, actor: &Actor, src: &str, dst: &str, amount: Decimal) -> Result<Movement> {
        actor.require_admin()?;
        if src == dst {
            return Err(Error::validation("Cannot transfer to the same account").into());
        }
        let amount = validate_amount(amount)?;

        self.repository.write(|uow| {
            let from = active_account(uow, src)?;
            let to = active_account(uow, dst)?;
            ensure_funds(&from, amount)?;

            let from_balance = debit(from.balance, amount)?;
            let to_balance = credit(to.balance, amount)?;
            uow.set_balance(src, from_balance)?;
            uow.set_balance(dst, to_balance)?;

            let tx = NewTransaction::transfer(src, dst, amount, actor.name());
            let transaction = record(uow, &tx)?;
            Ok(Movement {
                transaction,
                balances: vec![(from.account_no, from_balance), (to.account_no, to_balance)],
            })
        })
    }

    /// Ledger rows, newest first
    ///
    /// Customers only ever see rows touching their own account. Admins see
    /// every row unless they name an account.
    pub fn history(
        &self,
        actor: &Actor,
        account_no: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Transaction>> {
        let scope = match (actor, account_no) {
            (Actor::Customer { account_no: own }, None) => Some(own.as_str()),
            (_, Some(no)) => {
                actor.require_access(no)?;
                Some(no)
            }
            (Actor::Admin { .. }, None) => None,
        };
        let limit = limit.unwrap_or(self.history_limit);
        self.repository
            .read(|uow| uow.list_transactions(scope, limit))
    }
}

fn active_account(uow: &UnitOfWork<'_>, account_no: &str) -> Result<Account> {
    let account = uow
        .fetch_account(account_no)?
        .ok_or_else(|| account_not_found(account_no))?;
    if !account.status.allows_movements() {
        return Err(Error::AccountInactive(account_no.to_string()).into());
    }
    Ok(account)
}

fn ensure_funds(account: &Account, amount: Decimal) -> Result<()> {
    if account.balance < amount {
        return Err(Error::InsufficientFunds {
            account_no: account.account_no.clone(),
            balance: account.balance,
            requested: amount,
        }
        .into());
    }
    Ok(())
}

/// Append the ledger row and its audit row with one timestamp
fn record(uow: &UnitOfWork<'_>, tx: &NewTransaction) -> Result<Transaction> {
    let now = Utc::now();
    let id = uow.insert_transaction(tx, &now)?;
    uow.insert_audit(
        &NewAuditEntry::new(&tx.performed_by, tx.kind.audit_action(), tx.audit_details()),
        &now,
    )?;
    Ok(Transaction {
        id,
        kind: tx.kind,
        from_acc: tx.from_acc.clone(),
        to_acc: tx.to_acc.clone(),
        amount: tx.amount,
        performed_by: tx.performed_by.clone(),
        created_at: now,
    })
}
