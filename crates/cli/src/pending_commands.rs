//! CLI commands for pending driver-notification lists.

use {anyhow::Result, clap::Subcommand};

use pitwall_notices::pending::{EntryId, PendingEntries};

use crate::Context;

#[derive(Subcommand)]
pub enum PendingAction {
    /// Show the ids in a list, or the names of all lists.
    List {
        /// List name.
        name: Option<String>,
    },
    /// Add entry ids to a list.
    Add {
        /// List name (letters, digits, '-' or '_').
        name: String,
        /// Entry ids.
        #[arg(required = true)]
        ids: Vec<EntryId>,
    },
    /// Remove entry ids from a list.
    Remove {
        /// List name.
        name: String,
        /// Entry ids.
        #[arg(required = true)]
        ids: Vec<EntryId>,
    },
}

fn format_ids(ids: &[EntryId]) -> String {
    if ids.is_empty() {
        return "(empty)".into();
    }
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub async fn handle_pending(action: PendingAction, ctx: &Context) -> Result<()> {
    let pending = PendingEntries::new(ctx.config.notifications.pending_path(&ctx.data_dir));

    match action {
        PendingAction::List { name: None } => {
            let names = pending.names().await?;
            if names.is_empty() {
                println!("No pending lists in {}.", pending.dir().display());
            }
            for name in names {
                let ids = pending.load(&name).await?;
                println!("  {name}: {}", format_ids(&ids));
            }
        },
        PendingAction::List { name: Some(name) } => {
            println!("{name}: {}", format_ids(&pending.load(&name).await?));
        },
        PendingAction::Add { name, ids } => {
            let now = pending.add(&name, &ids).await?;
            println!("{name}: {}", format_ids(&now));
        },
        PendingAction::Remove { name, ids } => {
            let now = pending.remove(&name, &ids).await?;
            println!("{name}: {}", format_ids(&now));
        },
    }
    Ok(())
}
