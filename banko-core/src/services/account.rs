//! Account service - opening, login, lookup and maintenance of customer accounts

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::adapters::duckdb::{DuckDbRepository, UnitOfWork};
use crate::domain::amount::validate_opening_balance;
use crate::domain::result::Error;
use crate::domain::{
    Account, AccountStatus, Actor, NewAuditEntry, NewTransaction, SYSTEM_ACTOR,
};
use crate::services::CredentialService;

/// Attempts at drawing an unused account number
const ACCOUNT_NO_ATTEMPTS: usize = 5;

pub struct AccountService {
    repository: Arc<DuckDbRepository>,
    credentials: CredentialService,
}

impl AccountService {
    pub fn new(repository: Arc<DuckDbRepository>, credentials: CredentialService) -> Self {
        Self {
            repository,
            credentials,
        }
    }

    /// Open an account under a freshly generated account number
    pub fn create_account(
        &self,
        name: &str,
        password: &str,
        initial_deposit: Decimal,
    ) -> Result<Account> {
        self.open(None, name, password, initial_deposit)
    }

    /// Open an account under a caller-supplied account number
    pub fn create_account_with_number(
        &self,
        account_no: &str,
        name: &str,
        password: &str,
        initial_deposit: Decimal,
    ) -> Result<Account> {
        let account_no = account_no.trim();
        if account_no.is_empty() {
            return Err(Error::validation("Account number cannot be empty").into());
        }
        self.open(Some(account_no), name, password, initial_deposit)
    }

    fn open(
        &self,
        account_no: Option<&str>,
        name: &str,
        password: &str,
        initial_deposit: Decimal,
    ) -> Result<Account> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("Name cannot be empty").into());
        }
        CredentialService::validate_password(password)?;
        let balance = validate_opening_balance(initial_deposit)?;
        let hash = self.credentials.hash(password)?;

        self.repository.write(|uow| {
            let account_no = match account_no {
                Some(no) => {
                    if uow.account_no_taken(no)? {
                        return Err(Error::validation("Account number already exists").into());
                    }
                    no.to_string()
                }
                None => unused_account_no(uow)?,
            };

            let account = Account::new(account_no, name, balance);
            account.validate().map_err(Error::validation)?;

            let now = account.created_at;
            uow.insert_account(&account, &hash)?;
            if balance > Decimal::ZERO {
                uow.insert_transaction(
                    &NewTransaction::deposit(&account.account_no, balance, SYSTEM_ACTOR),
                    &now,
                )?;
            }
            uow.insert_audit(
                &NewAuditEntry::new(SYSTEM_ACTOR, "create_account", &account.account_no),
                &now,
            )?;
            Ok(account)
        })
    }

    /// Check customer credentials without recording anything
    pub fn authenticate_user(&self, account_no: &str, password: &str) -> Result<bool> {
        let stored = self
            .repository
            .read(|uow| uow.account_password_hash(account_no))?;
        Ok(match stored {
            Some(hash) => self.credentials.verify(password, &hash),
            None => false,
        })
    }

    /// Log a customer in and audit the login
    pub fn authenticate(&self, account_no: &str, password: &str) -> Result<Actor> {
        if !self.authenticate_user(account_no, password)? {
            return Err(Error::AuthenticationFailed.into());
        }
        self.repository.write(|uow| {
            uow.insert_audit(
                &NewAuditEntry::new(account_no, "user_login", ""),
                &Utc::now(),
            )?;
            Ok(Actor::Customer {
                account_no: account_no.to_string(),
            })
        })
    }

    pub fn get_account(&self, actor: &Actor, account_no: &str) -> Result<Option<Account>> {
        actor.require_access(account_no)?;
        self.repository.read(|uow| uow.fetch_account(account_no))
    }

    /// All accounts, newest first (admins only)
    pub fn list_accounts(&self, actor: &Actor) -> Result<Vec<Account>> {
        actor.require_admin()?;
        self.repository.read(|uow| uow.list_accounts())
    }

    /// Case-insensitive match on account number or name (admins only)
    pub fn search_accounts(&self, actor: &Actor, query: &str) -> Result<Vec<Account>> {
        actor.require_admin()?;
        let query = query.trim();
        if query.is_empty() {
            return self.list_accounts(actor);
        }
        self.repository.read(|uow| uow.search_accounts(query))
    }

    /// Remove an account (superadmin only); its history rows stay and its
    /// number is never reissued
    pub fn delete_account(&self, actor: &Actor, account_no: &str) -> Result<()> {
        actor.require_superadmin()?;
        self.repository.write(|uow| {
            let now = Utc::now();
            if !uow.delete_account(account_no, &now)? {
                return Err(account_not_found(account_no));
            }
            uow.insert_audit(
                &NewAuditEntry::new(actor.name(), "delete_account", account_no),
                &now,
            )?;
            Ok(())
        })
    }

    /// Mark an account's KYC as verified (admins only)
    pub fn verify_kyc(&self, actor: &Actor, account_no: &str) -> Result<Account> {
        actor.require_admin()?;
        self.repository.write(|uow| {
            let mut account = uow
                .fetch_account(account_no)?
                .ok_or_else(|| account_not_found(account_no))?;
            uow.set_kyc(account_no, true)?;
            uow.insert_audit(
                &NewAuditEntry::new(actor.name(), "kyc_verify", account_no),
                &Utc::now(),
            )?;
            account.kyc_verified = true;
            Ok(account)
        })
    }

    /// Freeze or unfreeze an account (admins only)
    pub fn set_status(
        &self,
        actor: &Actor,
        account_no: &str,
        status: AccountStatus,
    ) -> Result<Account> {
        actor.require_admin()?;
        let action = match status {
            AccountStatus::Frozen => "freeze_account",
            AccountStatus::Active => "unfreeze_account",
        };
        self.repository.write(|uow| {
            let mut account = uow
                .fetch_account(account_no)?
                .ok_or_else(|| account_not_found(account_no))?;
            uow.set_status(account_no, status)?;
            uow.insert_audit(
                &NewAuditEntry::new(actor.name(), action, account_no),
                &Utc::now(),
            )?;
            account.status = status;
            Ok(account)
        })
    }
}

fn unused_account_no(uow: &UnitOfWork<'_>) -> Result<String> {
    for _ in 0..ACCOUNT_NO_ATTEMPTS {
        let candidate = Account::generate_account_no();
        if !uow.account_no_taken(&candidate)? {
            return Ok(candidate);
        }
    }
    Err(Error::Other("Could not generate an unused account number".to_string()).into())
}

pub(crate) fn account_not_found(account_no: &str) -> anyhow::Error {
    Error::not_found(format!("Account {} not found", account_no)).into()
}
