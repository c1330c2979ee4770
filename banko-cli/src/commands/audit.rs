//! Audit command - show the audit trail

use anyhow::Result;

use super::{authenticate, get_context, Credentials};
use crate::output;

pub fn run(creds: &Credentials, limit: Option<usize>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let actor = authenticate(&ctx, creds)?;
    let entries = ctx.audit_service.list(&actor, limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No audit entries found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Time", "Actor", "Action", "Details"]);
    for entry in entries {
        table.add_row(vec![
            entry.id.to_string(),
            output::format_time(&entry.created_at),
            entry.actor,
            entry.action,
            entry.details,
        ]);
    }
    println!("{}", table);
    Ok(())
}
