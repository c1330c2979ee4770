//! CLI command implementations

pub mod account;
pub mod admin;
pub mod audit;
pub mod ledger;
pub mod loan;
pub mod logs;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use dialoguer::Password;

use banko_core::{Actor, BankContext, LogEvent, LoggingService};

/// Who is running the command
#[derive(Args, Debug, Clone, Default)]
pub struct Credentials {
    /// Log in as a staff member
    #[arg(long, global = true, value_name = "USERNAME")]
    pub admin: Option<String>,
    /// Log in as a customer
    #[arg(long, global = true, value_name = "ACCOUNT_NO")]
    pub account: Option<String>,
}

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let bank_dir = get_bank_dir().ok()?;
    std::fs::create_dir_all(&bank_dir).ok()?;
    LoggingService::new(&bank_dir, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the bank directory from BANKO_DIR or default to ~/.banko
pub fn get_bank_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("BANKO_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".banko"))
}

/// Open the bank
pub fn get_context() -> Result<BankContext> {
    let bank_dir = get_bank_dir()?;

    std::fs::create_dir_all(&bank_dir)
        .with_context(|| format!("Failed to create bank directory: {:?}", bank_dir))?;

    BankContext::new(&bank_dir).context("Failed to open bank")
}

/// Read a password from BANKO_PASSWORD or prompt for it
pub fn get_password(prompt: &str) -> Result<String> {
    if let Ok(p) = std::env::var("BANKO_PASSWORD") {
        return Ok(p);
    }
    require_terminal("set BANKO_PASSWORD")?;
    let p = Password::new().with_prompt(prompt).interact()?;
    Ok(p)
}

/// Read a new password from `env_var` or prompt twice for it
pub fn get_new_password(env_var: &str, prompt: &str) -> Result<String> {
    if let Ok(p) = std::env::var(env_var) {
        return Ok(p);
    }
    require_terminal(&format!("set {}", env_var))?;
    let p = Password::new()
        .with_prompt(prompt)
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;
    Ok(p)
}

/// Fail with `hint` when stdin is not a terminal a prompt could read from
pub fn require_terminal(hint: &str) -> Result<()> {
    if atty::isnt(atty::Stream::Stdin) {
        return Err(no_terminal(hint));
    }
    Ok(())
}

fn no_terminal(hint: &str) -> anyhow::Error {
    anyhow::anyhow!("No terminal to prompt on; {}", hint)
}

/// Log in with whichever of --admin / --account was given
pub fn authenticate(ctx: &BankContext, creds: &Credentials) -> Result<Actor> {
    match (&creds.admin, &creds.account) {
        (Some(_), Some(_)) => anyhow::bail!("Use either --admin or --account, not both"),
        (Some(username), None) => {
            let password = get_password(&format!("Password for {}", username))?;
            ctx.admin_service.authenticate(username, &password)
        }
        (None, Some(account_no)) => {
            let password = get_password(&format!("Password for {}", account_no))?;
            ctx.account_service.authenticate(account_no, &password)
        }
        (None, None) => {
            anyhow::bail!("This command needs a login: pass --admin <USERNAME> or --account <ACCOUNT_NO>")
        }
    }
}

/// Account a command targets: the one given, else the customer's own
pub fn target_account(actor: &Actor, account_no: Option<String>) -> Result<String> {
    match (account_no, actor) {
        (Some(no), _) => Ok(no),
        (None, Actor::Customer { account_no }) => Ok(account_no.clone()),
        (None, Actor::Admin { .. }) => anyhow::bail!("Specify an account number"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_password_comes_from_named_variable() {
        std::env::set_var("BANKO_TEST_NEW_PASSWORD", "s3cret");
        let password = get_new_password("BANKO_TEST_NEW_PASSWORD", "unused").unwrap();
        std::env::remove_var("BANKO_TEST_NEW_PASSWORD");
        assert_eq!(password, "s3cret");
    }

    #[test]
    fn test_no_terminal_message_carries_hint() {
        let err = no_terminal("pass --force to skip confirmation");
        assert_eq!(
            err.to_string(),
            "No terminal to prompt on; pass --force to skip confirmation"
        );
    }

    #[test]
    fn test_target_account_defaults_to_customer() {
        let customer = Actor::Customer {
            account_no: "AC00000001".to_string(),
        };
        assert_eq!(target_account(&customer, None).unwrap(), "AC00000001");
        assert_eq!(
            target_account(&customer, Some("AC00000002".to_string())).unwrap(),
            "AC00000002"
        );
        let admin = Actor::Admin {
            username: "Admin".to_string(),
            role: banko_core::AdminRole::Superadmin,
        };
        assert!(target_account(&admin, None).is_err());
    }
}
