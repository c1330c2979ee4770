//! Status command - show branch summary

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use banko_core::domain::amount::format_amount;

use super::{authenticate, get_context, Credentials};

pub fn run(creds: &Credentials, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let actor = authenticate(&ctx, creds)?;
    let status = ctx.status_service.get_status(&actor)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Branch Status".bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec!["Accounts".to_string(), status.total_accounts.to_string()]);
    table.add_row(vec!["  Active".to_string(), status.active_accounts.to_string()]);
    table.add_row(vec!["  Frozen".to_string(), status.frozen_accounts.to_string()]);
    table.add_row(vec![
        "  KYC verified".to_string(),
        status.kyc_verified_accounts.to_string(),
    ]);
    table.add_row(vec![
        "Total deposits".to_string(),
        format_amount(&ctx.config.currency_symbol, status.total_deposits),
    ]);
    table.add_row(vec![
        "Transactions".to_string(),
        status.total_transactions.to_string(),
    ]);
    table.add_row(vec![
        "Audit entries".to_string(),
        status.total_audit_entries.to_string(),
    ]);

    println!("{}", table);
    println!();

    println!("{}", "Loans".bold());
    for loan in &status.loans {
        println!("  {:<10} {}", loan.status.to_string(), loan.count);
    }

    println!();
    println!("Database: {}", ctx.repository.db_path().display());

    Ok(())
}
