//! Banko CLI - branch ledger in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;
mod output;

use banko_core::{Error, LogEvent};
use commands::{account, admin, audit, ledger, loan, logs, status, Credentials};

/// Banko - single-branch bank ledger
#[derive(Parser)]
#[command(name = "banko", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    credentials: Credentials,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show branch status and summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open and maintain customer accounts
    Account {
        #[command(subcommand)]
        command: account::AccountCommands,
    },

    /// Deposit money into an account
    Deposit {
        account_no: String,
        amount: Decimal,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Withdraw money from an account
    Withdraw {
        account_no: String,
        amount: Decimal,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Transfer money between accounts (staff only)
    Transfer {
        from: String,
        to: String,
        amount: Decimal,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show transaction history, newest first
    History {
        /// Only rows touching this account
        account_no: Option<String>,
        /// Maximum number of rows
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Request and process loans
    Loan {
        #[command(subcommand)]
        command: loan::LoanCommands,
    },

    /// Show the audit trail
    Audit {
        /// Maximum number of entries
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage staff
    Admin {
        #[command(subcommand)]
        command: admin::AdminCommands,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Status { .. } => "status",
            Commands::Account { command } => command.name(),
            Commands::Deposit { .. } => "deposit",
            Commands::Withdraw { .. } => "withdraw",
            Commands::Transfer { .. } => "transfer",
            Commands::History { .. } => "history",
            Commands::Loan { command } => command.name(),
            Commands::Audit { .. } => "audit",
            Commands::Admin { command } => command.name(),
            Commands::Logs { command } => command.name(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logger = commands::get_logger();
    let command = cli.command.name();
    commands::log_event(&logger, LogEvent::new("command_executed").with_command(command));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            commands::log_event(
                &logger,
                LogEvent::new("command_failed")
                    .with_command(command)
                    .with_error(loggable_error(&e)),
            );
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Error text safe for the event log: core errors are reduced to their category
fn loggable_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<Error>() {
        Some(core) => core.kind().to_string(),
        None => "internal".to_string(),
    }
}

fn run(cli: Cli) -> Result<()> {
    let creds = &cli.credentials;
    match cli.command {
        Commands::Status { json } => status::run(creds, json),
        Commands::Account { command } => account::run(command, creds),
        Commands::Deposit {
            account_no,
            amount,
            json,
        } => ledger::deposit(creds, &account_no, amount, json),
        Commands::Withdraw {
            account_no,
            amount,
            json,
        } => ledger::withdraw(creds, &account_no, amount, json),
        Commands::Transfer {
            from,
            to,
            amount,
            json,
        } => ledger::transfer(creds, &from, &to, amount, json),
        Commands::History {
            account_no,
            limit,
            json,
        } => ledger::history(creds, account_no.as_deref(), limit, json),
        Commands::Loan { command } => loan::run(command, creds),
        Commands::Audit { limit, json } => audit::run(creds, limit, json),
        Commands::Admin { command } => admin::run(command, creds),
        Commands::Logs { command } => logs::run(command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_login_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["banko", "deposit", "AC00000001", "12.50", "--admin", "Admin"])
            .unwrap();
        assert_eq!(cli.credentials.admin.as_deref(), Some("Admin"));
        match cli.command {
            Commands::Deposit { amount, .. } => assert_eq!(amount.to_string(), "12.50"),
            _ => panic!("expected deposit"),
        }
    }

    #[test]
    fn test_nested_command_names() {
        let cli = Cli::try_parse_from(["banko", "loan", "approve", "3"]).unwrap();
        assert_eq!(cli.command.name(), "loan approve");
    }

    #[test]
    fn test_loggable_error_hides_details() {
        let err: anyhow::Error = Error::InsufficientFunds {
            account_no: "AC00000001".to_string(),
            balance: Decimal::ONE,
            requested: Decimal::TEN,
        }
        .into();
        assert_eq!(loggable_error(&err), "insufficient_funds");
        assert_eq!(loggable_error(&anyhow::anyhow!("disk full at /home/x")), "internal");
    }
}
