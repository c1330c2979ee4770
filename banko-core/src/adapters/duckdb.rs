//! DuckDB repository implementation

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use duckdb::types::Type;
use duckdb::{params, params_from_iter, Connection};
use rust_decimal::Decimal;

use crate::domain::{
    Account, AccountStatus, Admin, AdminRole, AuditEntry, Loan, LoanStatus, NewAuditEntry,
    NewTransaction, Transaction, TransactionKind,
};
use crate::services::MigrationService;

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// DuckDB repository implementation
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl DuckDbRepository {
    /// Open (or create) the bank database
    ///
    /// Includes retry logic with exponential backoff for file locking errors,
    /// which occur when a second `banko` process holds the file.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: db_path.to_path_buf(),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[banko] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| anyhow!("Failed to open database after {} retries", MAX_RETRIES)))
    }

    /// Attempt to open a database connection (called by new() with retry logic)
    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Extension autoloading stays off: nothing here needs ICU or httpfs
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| anyhow!("Database connection lock poisoned: {}", e))
    }

    /// Run database migrations using the MigrationService
    pub fn run_migrations(&self) -> Result<crate::services::MigrationResult> {
        let conn = self.lock()?;
        MigrationService::new(&conn).run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Run `f` inside one database transaction
    ///
    /// Commits when `f` returns `Ok`. On `Err` the transaction is dropped,
    /// which rolls back every statement `f` issued.
    pub fn write<T>(&self, f: impl FnOnce(&UnitOfWork<'_>) -> Result<T>) -> Result<T> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let value = f(&UnitOfWork { conn: &tx })?;
        tx.commit()?;
        Ok(value)
    }

    /// Run read-only statements without opening a transaction
    pub fn read<T>(&self, f: impl FnOnce(&UnitOfWork<'_>) -> Result<T>) -> Result<T> {
        let conn = self.lock()?;
        f(&UnitOfWork { conn: &conn })
    }
}

/// Statements available to a `read` or `write` closure
pub struct UnitOfWork<'a> {
    conn: &'a Connection,
}

const ACCOUNT_COLUMNS: &str = "account_no, name, CAST(balance AS VARCHAR), status, kyc,
     CAST(created_at AS VARCHAR)";

const TRANSACTION_COLUMNS: &str = "id, tx_type, from_acc, to_acc, CAST(amount AS VARCHAR),
     performed_by, CAST(created_at AS VARCHAR)";

const LOAN_COLUMNS: &str = "id, account_no, CAST(amount AS VARCHAR), term_months, status,
     CAST(created_at AS VARCHAR)";

impl<'a> UnitOfWork<'a> {
    // === Admin operations ===

    pub fn get_admin(&self, username: &str) -> Result<Option<Admin>> {
        optional(self.conn.query_row(
            "SELECT username, fullname, role, CAST(created_at AS VARCHAR)
             FROM sys_admins WHERE username = ?",
            [username],
            row_to_admin,
        ))
    }

    pub fn admin_password_hash(&self, username: &str) -> Result<Option<String>> {
        optional(self.conn.query_row(
            "SELECT password_hash FROM sys_admins WHERE username = ?",
            [username],
            |row| row.get(0),
        ))
    }

    pub fn insert_admin(&self, admin: &Admin, password_hash: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sys_admins (username, password_hash, fullname, role, created_at)
             VALUES (?, ?, ?, ?, CAST(? AS TIMESTAMP))",
            params![
                admin.username,
                password_hash,
                admin.fullname,
                admin.role.as_str(),
                format_timestamp(&admin.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn list_admins(&self) -> Result<Vec<Admin>> {
        let mut stmt = self.conn.prepare(
            "SELECT username, fullname, role, CAST(created_at AS VARCHAR)
             FROM sys_admins ORDER BY created_at, username",
        )?;
        let admins = stmt
            .query_map([], row_to_admin)?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(admins)
    }

    pub fn admin_exists(&self, username: &str) -> Result<bool> {
        Ok(self.count("SELECT COUNT(*) FROM sys_admins WHERE username = ?", [username])? > 0)
    }

    // === Account operations ===

    pub fn fetch_account(&self, account_no: &str) -> Result<Option<Account>> {
        optional(self.conn.query_row(
            &format!("SELECT {} FROM sys_accounts WHERE account_no = ?", ACCOUNT_COLUMNS),
            [account_no],
            row_to_account,
        ))
    }

    pub fn account_exists(&self, account_no: &str) -> Result<bool> {
        Ok(self.count(
            "SELECT COUNT(*) FROM sys_accounts WHERE account_no = ?",
            [account_no],
        )? > 0)
    }

    /// True when the number belongs to a live account or ever appeared in
    /// the ledger, a loan or a closed account
    pub fn account_no_taken(&self, account_no: &str) -> Result<bool> {
        Ok(self.count(
            "SELECT (SELECT COUNT(*) FROM sys_accounts WHERE account_no = ?)
                  + (SELECT COUNT(*) FROM sys_closed_accounts WHERE account_no = ?)
                  + (SELECT COUNT(*) FROM sys_transactions WHERE from_acc = ? OR to_acc = ?)
                  + (SELECT COUNT(*) FROM sys_loans WHERE account_no = ?)",
            [account_no; 5],
        )? > 0)
    }

    pub fn account_password_hash(&self, account_no: &str) -> Result<Option<String>> {
        optional(self.conn.query_row(
            "SELECT password_hash FROM sys_accounts WHERE account_no = ?",
            [account_no],
            |row| row.get(0),
        ))
    }

    pub fn insert_account(&self, account: &Account, password_hash: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sys_accounts (account_no, name, password_hash, balance, status, kyc, created_at)
             VALUES (?, ?, ?, CAST(? AS DECIMAL(18, 2)), ?, ?, CAST(? AS TIMESTAMP))",
            params![
                account.account_no,
                account.name,
                password_hash,
                account.balance.to_string(),
                account.status.as_str(),
                account.kyc_verified,
                format_timestamp(&account.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn set_balance(&self, account_no: &str, balance: Decimal) -> Result<()> {
        self.conn.execute(
            "UPDATE sys_accounts SET balance = CAST(? AS DECIMAL(18, 2)) WHERE account_no = ?",
            params![balance.to_string(), account_no],
        )?;
        Ok(())
    }

    pub fn set_status(&self, account_no: &str, status: AccountStatus) -> Result<()> {
        self.conn.execute(
            "UPDATE sys_accounts SET status = ? WHERE account_no = ?",
            params![status.as_str(), account_no],
        )?;
        Ok(())
    }

    pub fn set_kyc(&self, account_no: &str, verified: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE sys_accounts SET kyc = ? WHERE account_no = ?",
            params![verified, account_no],
        )?;
        Ok(())
    }

    /// Delete the account row and retire its number; ledger, loan and audit
    /// rows are kept
    pub fn delete_account(&self, account_no: &str, closed_at: &DateTime<Utc>) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM sys_accounts WHERE account_no = ?", [account_no])?;
        if deleted == 0 {
            return Ok(false);
        }
        self.conn.execute(
            "INSERT INTO sys_closed_accounts (account_no, closed_at)
             VALUES (?, CAST(? AS TIMESTAMP))
             ON CONFLICT DO NOTHING",
            params![account_no, format_timestamp(closed_at)],
        )?;
        Ok(true)
    }

    pub fn list_accounts(&self) -> Result<Vec<Account>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM sys_accounts ORDER BY created_at DESC, account_no",
            ACCOUNT_COLUMNS
        ))?;
        let accounts = stmt
            .query_map([], row_to_account)?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(accounts)
    }

    /// Case-insensitive substring match on account number or name
    pub fn search_accounts(&self, query: &str) -> Result<Vec<Account>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM sys_accounts
             WHERE contains(lower(account_no), lower(?)) OR contains(lower(name), lower(?))
             ORDER BY created_at DESC, account_no",
            ACCOUNT_COLUMNS
        ))?;
        let accounts = stmt
            .query_map([query, query], row_to_account)?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(accounts)
    }

    // === Transaction operations ===

    /// Append a ledger row and return its id
    pub fn insert_transaction(&self, tx: &NewTransaction, created_at: &DateTime<Utc>) -> Result<i64> {
        let id = self.next_id("seq_transaction_id")?;
        self.conn.execute(
            "INSERT INTO sys_transactions (id, tx_type, from_acc, to_acc, amount, performed_by, created_at)
             VALUES (?, ?, ?, ?, CAST(? AS DECIMAL(18, 2)), ?, CAST(? AS TIMESTAMP))",
            params![
                id,
                tx.kind.as_str(),
                tx.from_acc,
                tx.to_acc,
                tx.amount.to_string(),
                tx.performed_by,
                format_timestamp(created_at),
            ],
        )?;
        Ok(id)
    }

    /// Newest first, optionally restricted to rows touching one account
    pub fn list_transactions(&self, account_no: Option<&str>, limit: usize) -> Result<Vec<Transaction>> {
        let (filter, values): (&str, Vec<&str>) = match account_no {
            Some(no) => ("WHERE from_acc = ? OR to_acc = ?", vec![no, no]),
            None => ("", Vec::new()),
        };
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM sys_transactions {} ORDER BY created_at DESC, id DESC LIMIT {}",
            TRANSACTION_COLUMNS, filter, limit
        ))?;
        let rows = stmt
            .query_map(params_from_iter(values), row_to_transaction)?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(rows)
    }

    // === Loan operations ===

    pub fn insert_loan(
        &self,
        account_no: &str,
        amount: Decimal,
        term_months: u32,
        created_at: &DateTime<Utc>,
    ) -> Result<Loan> {
        let id = self.next_id("seq_loan_id")?;
        self.conn.execute(
            "INSERT INTO sys_loans (id, account_no, amount, term_months, status, created_at)
             VALUES (?, ?, CAST(? AS DECIMAL(18, 2)), ?, ?, CAST(? AS TIMESTAMP))",
            params![
                id,
                account_no,
                amount.to_string(),
                term_months,
                LoanStatus::Pending.as_str(),
                format_timestamp(created_at),
            ],
        )?;
        Ok(Loan {
            id,
            account_no: account_no.to_string(),
            amount,
            term_months,
            status: LoanStatus::Pending,
            created_at: *created_at,
        })
    }

    pub fn get_loan(&self, id: i64) -> Result<Option<Loan>> {
        optional(self.conn.query_row(
            &format!("SELECT {} FROM sys_loans WHERE id = ?", LOAN_COLUMNS),
            [id],
            row_to_loan,
        ))
    }

    pub fn update_loan_status(&self, id: i64, status: LoanStatus) -> Result<()> {
        self.conn.execute(
            "UPDATE sys_loans SET status = ? WHERE id = ?",
            params![status.as_str(), id],
        )?;
        Ok(())
    }

    /// Newest first, optionally filtered by status and/or account
    pub fn list_loans(&self, status: Option<LoanStatus>, account_no: Option<&str>) -> Result<Vec<Loan>> {
        let mut clauses = Vec::new();
        let mut values: Vec<String> = Vec::new();
        if let Some(status) = status {
            clauses.push("status = ?");
            values.push(status.as_str().to_string());
        }
        if let Some(no) = account_no {
            clauses.push("account_no = ?");
            values.push(no.to_string());
        }
        let filter = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM sys_loans {} ORDER BY created_at DESC, id DESC",
            LOAN_COLUMNS, filter
        ))?;
        let loans = stmt
            .query_map(params_from_iter(values.iter()), row_to_loan)?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(loans)
    }

    // === Audit operations ===

    pub fn insert_audit(&self, entry: &NewAuditEntry, created_at: &DateTime<Utc>) -> Result<i64> {
        let id = self.next_id("seq_audit_id")?;
        self.conn.execute(
            "INSERT INTO sys_audit (id, actor, action, details, created_at)
             VALUES (?, ?, ?, ?, CAST(? AS TIMESTAMP))",
            params![
                id,
                entry.actor,
                entry.action,
                entry.details,
                format_timestamp(created_at),
            ],
        )?;
        Ok(id)
    }

    pub fn list_audit(&self, limit: usize) -> Result<Vec<AuditEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, actor, action, details, CAST(created_at AS VARCHAR)
             FROM sys_audit ORDER BY created_at DESC, id DESC LIMIT {}",
            limit
        ))?;
        let entries = stmt
            .query_map([], |row| {
                Ok(AuditEntry {
                    id: row.get(0)?,
                    actor: row.get(1)?,
                    action: row.get(2)?,
                    details: row.get(3)?,
                    created_at: timestamp_column(row, 4)?,
                })
            })?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(entries)
    }

    // === Counts ===

    pub fn count_accounts(&self, status: Option<AccountStatus>) -> Result<i64> {
        match status {
            Some(status) => self.count(
                "SELECT COUNT(*) FROM sys_accounts WHERE status = ?",
                [status.as_str()],
            ),
            None => self.count("SELECT COUNT(*) FROM sys_accounts", []),
        }
    }

    pub fn count_kyc_verified(&self) -> Result<i64> {
        self.count("SELECT COUNT(*) FROM sys_accounts WHERE kyc", [])
    }

    /// Sum of all account balances
    pub fn total_balance(&self) -> Result<Decimal> {
        let value: String = self.conn.query_row(
            "SELECT CAST(COALESCE(SUM(balance), 0) AS VARCHAR) FROM sys_accounts",
            [],
            |row| row.get(0),
        )?;
        Ok(Decimal::from_str(&value)?)
    }

    pub fn count_transactions(&self) -> Result<i64> {
        self.count("SELECT COUNT(*) FROM sys_transactions", [])
    }

    pub fn count_loans(&self, status: LoanStatus) -> Result<i64> {
        self.count("SELECT COUNT(*) FROM sys_loans WHERE status = ?", [status.as_str()])
    }

    pub fn count_audit(&self) -> Result<i64> {
        self.count("SELECT COUNT(*) FROM sys_audit", [])
    }

    fn count<P: duckdb::Params>(&self, sql: &str, params: P) -> Result<i64> {
        Ok(self.conn.query_row(sql, params, |row| row.get(0))?)
    }

    fn next_id(&self, sequence: &str) -> Result<i64> {
        Ok(self
            .conn
            .query_row(&format!("SELECT nextval('{}')", sequence), [], |row| row.get(0))?)
    }
}

// Row mapping

fn row_to_admin(row: &duckdb::Row) -> duckdb::Result<Admin> {
    let role: String = row.get(2)?;
    Ok(Admin {
        username: row.get(0)?,
        fullname: row.get(1)?,
        role: AdminRole::from_str(&role).map_err(|e| conversion_error(2, Type::Text, e))?,
        created_at: timestamp_column(row, 3)?,
    })
}

fn row_to_account(row: &duckdb::Row) -> duckdb::Result<Account> {
    let status: String = row.get(3)?;
    Ok(Account {
        account_no: row.get(0)?,
        name: row.get(1)?,
        balance: decimal_column(row, 2)?,
        status: AccountStatus::from_str(&status).map_err(|e| conversion_error(3, Type::Text, e))?,
        kyc_verified: row.get(4)?,
        created_at: timestamp_column(row, 5)?,
    })
}

fn row_to_transaction(row: &duckdb::Row) -> duckdb::Result<Transaction> {
    let kind: String = row.get(1)?;
    Ok(Transaction {
        id: row.get(0)?,
        kind: TransactionKind::from_str(&kind).map_err(|e| conversion_error(1, Type::Text, e))?,
        from_acc: row.get(2)?,
        to_acc: row.get(3)?,
        amount: decimal_column(row, 4)?,
        performed_by: row.get(5)?,
        created_at: timestamp_column(row, 6)?,
    })
}

fn row_to_loan(row: &duckdb::Row) -> duckdb::Result<Loan> {
    let term: i32 = row.get(3)?;
    let status: String = row.get(4)?;
    Ok(Loan {
        id: row.get(0)?,
        account_no: row.get(1)?,
        amount: decimal_column(row, 2)?,
        term_months: u32::try_from(term).map_err(|e| conversion_error(3, Type::Int, e))?,
        status: LoanStatus::from_str(&status).map_err(|e| conversion_error(4, Type::Text, e))?,
        created_at: timestamp_column(row, 5)?,
    })
}

// Helper functions

fn optional<T>(result: duckdb::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn conversion_error<E>(idx: usize, ty: Type, err: E) -> duckdb::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    duckdb::Error::FromSqlConversionFailure(idx, ty, Box::new(err))
}

fn decimal_column(row: &duckdb::Row, idx: usize) -> duckdb::Result<Decimal> {
    let value: String = row.get(idx)?;
    Decimal::from_str(&value).map_err(|e| conversion_error(idx, Type::Text, e))
}

fn timestamp_column(row: &duckdb::Row, idx: usize) -> duckdb::Result<DateTime<Utc>> {
    let value: String = row.get(idx)?;
    parse_timestamp(&value).map_err(|e| conversion_error(idx, Type::Text, e))
}

/// Timestamps are stored as naive UTC with microsecond precision
fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

fn parse_timestamp(s: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    // DuckDB drops the fraction when it is zero
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn setup() -> (TempDir, DuckDbRepository) {
        let dir = TempDir::new().unwrap();
        let repo = DuckDbRepository::new(&dir.path().join("bank.duckdb")).unwrap();
        repo.ensure_schema().unwrap();
        (dir, repo)
    }

    fn account(no: &str, balance: &str) -> Account {
        Account::new(no, "Juan Dela Cruz", Decimal::from_str(balance).unwrap())
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2026-03-01 09:30:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2026-03-01 09:30:00.000000").unwrap(), expected);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_retryable_error_detection() {
        assert!(is_retryable_error("IO Error: Could not set lock on file: Resource temporarily unavailable"));
        assert!(!is_retryable_error("Catalog Error: Table does not exist"));
    }

    #[test]
    fn test_account_round_trip_keeps_exact_cents() {
        let (_dir, repo) = setup();
        repo.write(|uow| uow.insert_account(&account("AC00000001", "1234567.89"), "hash"))
            .unwrap();

        let stored = repo
            .read(|uow| uow.fetch_account("AC00000001"))
            .unwrap()
            .unwrap();
        assert_eq!(stored.balance.to_string(), "1234567.89");
        assert_eq!(stored.status, AccountStatus::Active);

        let missing = repo.read(|uow| uow.fetch_account("AC99999999")).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_write_rolls_back_on_error() {
        let (_dir, repo) = setup();
        repo.write(|uow| uow.insert_account(&account("AC00000001", "100.00"), "hash"))
            .unwrap();

        let result: Result<()> = repo.write(|uow| {
            uow.set_balance("AC00000001", Decimal::from_str("0.00")?)?;
            uow.insert_audit(&NewAuditEntry::new("Admin", "tx_withdraw", "x"), &Utc::now())?;
            Err(anyhow!("boom"))
        });
        assert!(result.is_err());

        let (balance, audits) = repo
            .read(|uow| {
                let acc = uow.fetch_account("AC00000001")?.unwrap();
                Ok((acc.balance, uow.count_audit()?))
            })
            .unwrap();
        assert_eq!(balance.to_string(), "100.00");
        assert_eq!(audits, 0);
    }

    #[test]
    fn test_transactions_newest_first_and_filtered() {
        let (_dir, repo) = setup();
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2026, 1, 2, 8, 0, 0).unwrap();
        let amount = Decimal::new(500, 2);

        repo.write(|uow| {
            uow.insert_transaction(&NewTransaction::deposit("AC1", amount, "Admin"), &t0)?;
            uow.insert_transaction(&NewTransaction::transfer("AC1", "AC2", amount, "Admin"), &t1)?;
            uow.insert_transaction(&NewTransaction::deposit("AC3", amount, "Admin"), &t1)?;
            Ok(())
        })
        .unwrap();

        let ac1 = repo.read(|uow| uow.list_transactions(Some("AC1"), 200)).unwrap();
        assert_eq!(ac1.len(), 2);
        assert_eq!(ac1[0].kind, TransactionKind::Transfer);
        assert_eq!(ac1[1].created_at, t0);

        let all = repo.read(|uow| uow.list_transactions(None, 2)).unwrap();
        assert_eq!(all.len(), 2);
        // same timestamp: higher id first
        assert!(all[0].id > all[1].id);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let (_dir, repo) = setup();
        repo.write(|uow| {
            uow.insert_account(&Account::new("AC0000ABCD", "Maria Santos", Decimal::ZERO), "h")?;
            uow.insert_account(&Account::new("AC0000EF01", "Pedro Reyes", Decimal::ZERO), "h")?;
            Ok(())
        })
        .unwrap();

        assert_eq!(repo.read(|uow| uow.search_accounts("santos")).unwrap().len(), 1);
        assert_eq!(repo.read(|uow| uow.search_accounts("ac0000")).unwrap().len(), 2);
        assert!(repo.read(|uow| uow.search_accounts("zzz")).unwrap().is_empty());
    }

    #[test]
    fn test_loan_status_update_and_filter() {
        let (_dir, repo) = setup();
        let loan = repo
            .write(|uow| uow.insert_loan("AC1", Decimal::new(100000, 2), 12, &Utc::now()))
            .unwrap();
        repo.write(|uow| uow.update_loan_status(loan.id, LoanStatus::Approved))
            .unwrap();

        let stored = repo.read(|uow| uow.get_loan(loan.id)).unwrap().unwrap();
        assert_eq!(stored.status, LoanStatus::Approved);
        assert_eq!(stored.term_months, 12);

        let pending = repo
            .read(|uow| uow.list_loans(Some(LoanStatus::Pending), None))
            .unwrap();
        assert!(pending.is_empty());
        let mine = repo.read(|uow| uow.list_loans(None, Some("AC1"))).unwrap();
        assert_eq!(mine.len(), 1);
    }

    #[test]
    fn test_total_balance_on_empty_bank() {
        let (_dir, repo) = setup();
        assert_eq!(repo.read(|uow| uow.total_balance()).unwrap(), Decimal::ZERO);
    }
}
