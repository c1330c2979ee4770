//! Ledger commands - deposit, withdraw, transfer and history

use anyhow::Result;
use rust_decimal::Decimal;

use banko_core::domain::amount::format_amount;
use banko_core::services::Movement;
use banko_core::Transaction;

use super::{authenticate, get_context, Credentials};
use crate::output;

pub fn deposit(creds: &Credentials, account_no: &str, amount: Decimal, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let actor = authenticate(&ctx, creds)?;
    let movement = ctx.ledger_service.deposit(&actor, account_no, amount)?;
    print_movement(&movement, "Deposited", &ctx.config.currency_symbol, json)
}

pub fn withdraw(creds: &Credentials, account_no: &str, amount: Decimal, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let actor = authenticate(&ctx, creds)?;
    let movement = ctx.ledger_service.withdraw(&actor, account_no, amount)?;
    print_movement(&movement, "Withdrew", &ctx.config.currency_symbol, json)
}

pub fn transfer(
    creds: &Credentials,
    from: &str,
    to: &str,
    amount: Decimal,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    let actor = authenticate(&ctx, creds)?;
    let movement = ctx.ledger_service.transfer(&actor, from, to, amount)?;
    print_movement(&movement, "Transferred", &ctx.config.currency_symbol, json)
}

pub fn history(
    creds: &Credentials,
    account_no: Option<&str>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    let actor = authenticate(&ctx, creds)?;
    let rows = ctx.ledger_service.history(&actor, account_no, limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    print_transactions(&rows, &ctx.config.currency_symbol);
    Ok(())
}

fn print_movement(movement: &Movement, verb: &str, symbol: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(movement)?);
        return Ok(());
    }

    output::success(&format!(
        "{} {} (transaction #{})",
        verb,
        format_amount(symbol, movement.transaction.amount),
        movement.transaction.id
    ));
    for (account_no, balance) in &movement.balances {
        println!("  {} balance: {}", account_no, format_amount(symbol, *balance));
    }
    Ok(())
}

fn print_transactions(rows: &[Transaction], symbol: &str) {
    let mut table = output::create_table();
    table.set_header(vec!["ID", "Time", "Type", "From", "To", "Amount", "By"]);
    for tx in rows {
        table.add_row(vec![
            tx.id.to_string(),
            output::format_time(&tx.created_at),
            tx.kind.to_string(),
            tx.from_acc.clone().unwrap_or_else(|| "-".to_string()),
            tx.to_acc.clone().unwrap_or_else(|| "-".to_string()),
            format_amount(symbol, tx.amount),
            tx.performed_by.clone(),
        ]);
    }
    println!("{}", table);
}
