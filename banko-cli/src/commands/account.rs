//! Account commands - open, inspect and maintain customer accounts

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use rust_decimal::Decimal;

use banko_core::domain::amount::format_amount;
use banko_core::{Account, AccountStatus};

use super::{
    authenticate, get_context, get_new_password, require_terminal, target_account, Credentials,
};
use crate::output;

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Open a new account (no login needed)
    Create {
        /// Account holder name
        name: String,
        /// Opening deposit
        #[arg(long, default_value = "0")]
        initial_deposit: Decimal,
        /// Use this account number instead of generating one
        #[arg(long)]
        number: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List all accounts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one account (customers default to their own)
    Show {
        account_no: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search accounts by number or name
    Search {
        query: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an account (history is kept)
    Delete {
        account_no: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
    /// Mark an account's KYC as verified
    Kyc {
        account_no: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Freeze an account so it cannot move money
    Freeze {
        account_no: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Unfreeze an account
    Unfreeze {
        account_no: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl AccountCommands {
    pub fn name(&self) -> &'static str {
        match self {
            AccountCommands::Create { .. } => "account create",
            AccountCommands::List { .. } => "account list",
            AccountCommands::Show { .. } => "account show",
            AccountCommands::Search { .. } => "account search",
            AccountCommands::Delete { .. } => "account delete",
            AccountCommands::Kyc { .. } => "account kyc",
            AccountCommands::Freeze { .. } => "account freeze",
            AccountCommands::Unfreeze { .. } => "account unfreeze",
        }
    }
}

pub fn run(command: AccountCommands, creds: &Credentials) -> Result<()> {
    let ctx = get_context()?;
    let symbol = ctx.config.currency_symbol.clone();

    match command {
        AccountCommands::Create {
            name,
            initial_deposit,
            number,
            json,
        } => {
            let password = get_new_password("BANKO_PASSWORD", "Choose a password")?;
            let account = match number {
                Some(no) => ctx.account_service.create_account_with_number(
                    &no,
                    &name,
                    &password,
                    initial_deposit,
                )?,
                None => ctx
                    .account_service
                    .create_account(&name, &password, initial_deposit)?,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&account)?);
            } else {
                output::success(&format!("Account created: {}", account.account_no));
                println!("  Balance: {}", format_amount(&symbol, account.balance));
            }
        }
        AccountCommands::List { json } => {
            let actor = authenticate(&ctx, creds)?;
            let accounts = ctx.account_service.list_accounts(&actor)?;
            print_accounts(&accounts, &symbol, json)?;
        }
        AccountCommands::Search { query, json } => {
            let actor = authenticate(&ctx, creds)?;
            let accounts = ctx.account_service.search_accounts(&actor, &query)?;
            print_accounts(&accounts, &symbol, json)?;
        }
        AccountCommands::Show { account_no, json } => {
            let actor = authenticate(&ctx, creds)?;
            let account_no = target_account(&actor, account_no)?;
            let account = ctx
                .account_service
                .get_account(&actor, &account_no)?
                .ok_or_else(|| anyhow::anyhow!("Account {} not found", account_no))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&account)?);
            } else {
                println!("{}", account.account_no.bold());
                println!("  Name:    {}", account.name);
                println!("  Balance: {}", format_amount(&symbol, account.balance));
                println!("  Status:  {}", status_label(account.status));
                println!("  KYC:     {}", if account.kyc_verified { "verified" } else { "pending" });
                println!("  Opened:  {}", output::format_time(&account.created_at));
            }
        }
        AccountCommands::Delete { account_no, force } => {
            let actor = authenticate(&ctx, creds)?;
            if !force {
                require_terminal("pass --force to delete without confirmation")?;
            }
            if !force
                && !Confirm::new()
                    .with_prompt(format!("Delete account {}? History rows are kept.", account_no))
                    .default(false)
                    .interact()?
            {
                println!("Cancelled.");
                return Ok(());
            }
            ctx.account_service.delete_account(&actor, &account_no)?;
            output::success(&format!("Deleted account {}", account_no));
        }
        AccountCommands::Kyc { account_no, json } => {
            let actor = authenticate(&ctx, creds)?;
            let account = ctx.account_service.verify_kyc(&actor, &account_no)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&account)?);
            } else {
                output::success(&format!("KYC verified for {}", account.account_no));
            }
        }
        AccountCommands::Freeze { account_no, json } => {
            let actor = authenticate(&ctx, creds)?;
            let account = ctx
                .account_service
                .set_status(&actor, &account_no, AccountStatus::Frozen)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&account)?);
            } else {
                output::warning(&format!("Account {} frozen", account.account_no));
            }
        }
        AccountCommands::Unfreeze { account_no, json } => {
            let actor = authenticate(&ctx, creds)?;
            let account = ctx
                .account_service
                .set_status(&actor, &account_no, AccountStatus::Active)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&account)?);
            } else {
                output::success(&format!("Account {} is active again", account.account_no));
            }
        }
    }

    Ok(())
}

fn status_label(status: AccountStatus) -> String {
    match status {
        AccountStatus::Active => status.to_string().green().to_string(),
        AccountStatus::Frozen => status.to_string().red().to_string(),
    }
}

fn print_accounts(accounts: &[Account], symbol: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(accounts)?);
        return Ok(());
    }

    if accounts.is_empty() {
        println!("No accounts found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Account", "Name", "Balance", "Status", "KYC", "Opened"]);
    for account in accounts {
        table.add_row(vec![
            account.account_no.clone(),
            account.name.clone(),
            format_amount(symbol, account.balance),
            status_label(account.status),
            if account.kyc_verified { "yes" } else { "no" }.to_string(),
            output::format_time(&account.created_at),
        ]);
    }
    println!("{}", table);
    Ok(())
}
