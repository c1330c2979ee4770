//! Loan commands - request loans and move them through approval

use anyhow::Result;
use clap::Subcommand;
use rust_decimal::Decimal;

use banko_core::domain::amount::format_amount;
use banko_core::{Loan, LoanStatus};

use super::{authenticate, get_context, target_account, Credentials};
use crate::output;

#[derive(Subcommand)]
pub enum LoanCommands {
    /// Request a loan (customers default to their own account)
    Request {
        /// Loan amount
        amount: Decimal,
        /// Term in months
        #[arg(long)]
        term: u32,
        /// Account the loan is for
        #[arg(long = "for", value_name = "ACCOUNT_NO")]
        account_no: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List loans
    List {
        /// Only loans with this status
        #[arg(long)]
        status: Option<LoanStatus>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Approve a pending loan
    Approve {
        id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Reject a pending loan
    Reject {
        id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Mark an approved loan as disbursed
    Disburse {
        id: i64,
        #[arg(long)]
        json: bool,
    },
}

impl LoanCommands {
    pub fn name(&self) -> &'static str {
        match self {
            LoanCommands::Request { .. } => "loan request",
            LoanCommands::List { .. } => "loan list",
            LoanCommands::Approve { .. } => "loan approve",
            LoanCommands::Reject { .. } => "loan reject",
            LoanCommands::Disburse { .. } => "loan disburse",
        }
    }
}

pub fn run(command: LoanCommands, creds: &Credentials) -> Result<()> {
    let ctx = get_context()?;
    let actor = authenticate(&ctx, creds)?;
    let symbol = ctx.config.currency_symbol.clone();

    let (id, next, json) = match command {
        LoanCommands::Request {
            amount,
            term,
            account_no,
            json,
        } => {
            let account_no = target_account(&actor, account_no)?;
            let loan = ctx
                .loan_service
                .request_loan(&actor, &account_no, amount, term)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&loan)?);
            } else {
                output::success(&format!(
                    "Loan #{} requested: {} over {} months",
                    loan.id,
                    format_amount(&symbol, loan.amount),
                    loan.term_months
                ));
            }
            return Ok(());
        }
        LoanCommands::List { status, json } => {
            let loans = ctx.loan_service.list_loans(&actor, status)?;
            return print_loans(&loans, &symbol, json);
        }
        LoanCommands::Approve { id, json } => (id, LoanStatus::Approved, json),
        LoanCommands::Reject { id, json } => (id, LoanStatus::Rejected, json),
        LoanCommands::Disburse { id, json } => (id, LoanStatus::Disbursed, json),
    };

    let loan = ctx.loan_service.update_loan_status(&actor, id, next)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&loan)?);
    } else {
        output::success(&format!("Loan #{} is now {}", loan.id, loan.status));
    }
    Ok(())
}

fn print_loans(loans: &[Loan], symbol: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(loans)?);
        return Ok(());
    }

    if loans.is_empty() {
        println!("No loans found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Account", "Amount", "Term", "Status", "Requested"]);
    for loan in loans {
        table.add_row(vec![
            loan.id.to_string(),
            loan.account_no.clone(),
            format_amount(symbol, loan.amount),
            format!("{} mo", loan.term_months),
            loan.status.to_string(),
            output::format_time(&loan.created_at),
        ]);
    }
    println!("{}", table);
    Ok(())
}
