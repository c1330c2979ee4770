//! Admin commands - manage branch staff

use anyhow::Result;
use clap::Subcommand;

use banko_core::AdminRole;

use super::{authenticate, get_context, get_new_password, Credentials};
use crate::output;

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Add a staff member (superadmin only)
    Add {
        username: String,
        /// Full name
        #[arg(long)]
        fullname: Option<String>,
        /// Role: clerk or superadmin
        #[arg(long, default_value = "clerk")]
        role: AdminRole,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List staff members
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl AdminCommands {
    pub fn name(&self) -> &'static str {
        match self {
            AdminCommands::Add { .. } => "admin add",
            AdminCommands::List { .. } => "admin list",
        }
    }
}

pub fn run(command: AdminCommands, creds: &Credentials) -> Result<()> {
    let ctx = get_context()?;
    let actor = authenticate(&ctx, creds)?;

    match command {
        AdminCommands::Add {
            username,
            fullname,
            role,
            json,
        } => {
            // BANKO_PASSWORD already holds the caller's password
            let password = get_new_password(
                "BANKO_NEW_PASSWORD",
                &format!("Password for new admin {}", username),
            )?;
            let admin = ctx.admin_service.add_admin(
                &actor,
                &username,
                &password,
                fullname.as_deref(),
                role,
            )?;
            if json {
                println!("{}", serde_json::to_string_pretty(&admin)?);
            } else {
                output::success(&format!("Added {} ({})", admin.username, admin.role));
            }
        }
        AdminCommands::List { json } => {
            let admins = ctx.admin_service.list_admins(&actor)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&admins)?);
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Username", "Full name", "Role", "Created"]);
            for admin in admins {
                table.add_row(vec![
                    admin.username,
                    admin.fullname.unwrap_or_default(),
                    admin.role.to_string(),
                    output::format_time(&admin.created_at),
                ]);
            }
            println!("{}", table);
        }
    }

    Ok(())
}
