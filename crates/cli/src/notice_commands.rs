//! `send` and `notices` commands.

use std::{path::PathBuf, sync::Arc, time::Duration};

use {
    anyhow::Result,
    clap::{Args, Subcommand},
    tokio::io::AsyncReadExt,
};

use {
    pitwall_channels::{MessagePlatform, UnknownCommandHooks},
    pitwall_discord::{DiscordOutbound, mentions, user_tags},
    pitwall_notices::{
        Category, NoticeRegistry, NotificationSender, SendOutcome, help::CommandHelpObserver,
        registry_file::FileRegistry,
    },
};

use crate::Context;

#[derive(Args)]
pub struct SendArgs {
    /// Target channel id.
    #[arg(long)]
    pub channel: u64,

    /// Notice category (e.g. BoP, Entries, season-settings-violations).
    #[arg(long)]
    pub category: Category,

    /// Read the notice text from a file.
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Mention a user at the top of the notice. Repeatable.
    #[arg(long = "mention", value_name = "USER_ID")]
    pub mentions: Vec<u64>,

    /// Notice text. Read from stdin when neither TEXT nor --file is given.
    pub text: Option<String>,
}

#[derive(Subcommand)]
pub enum NoticeAction {
    /// List notices currently tracked in the registry.
    List {
        /// Only show notices in this channel.
        #[arg(long)]
        channel: Option<u64>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show every category and which categories retract it.
    Categories,
    /// Run the unknown-command hooks for a channel, posting the help text.
    UnknownCommand {
        /// Channel the unknown command was typed in.
        #[arg(long)]
        channel: u64,
        /// Help text file.
        #[arg(long)]
        help_file: PathBuf,
    },
}

fn registry(ctx: &Context) -> Arc<FileRegistry> {
    Arc::new(FileRegistry::new(
        ctx.config.notifications.registry_path(&ctx.data_dir),
    ))
}

fn sender(ctx: &Context) -> Result<NotificationSender> {
    let platform: Arc<dyn MessagePlatform> = Arc::new(DiscordOutbound::new(&ctx.config.discord)?);
    Ok(NotificationSender::new(platform, registry(ctx)))
}

async fn read_content(args: &SendArgs) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(path) = &args.file {
        return tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()));
    }
    let mut content = String::new();
    tokio::io::stdin().read_to_string(&mut content).await?;
    Ok(content)
}

/// Prefix `content` with tags for users it does not mention yet.
fn with_mentions(content: String, user_ids: &[u64]) -> String {
    let missing: Vec<u64> = user_ids
        .iter()
        .copied()
        .filter(|id| !mentions(&content, *id))
        .collect();
    if content.is_empty() || missing.is_empty() {
        return content;
    }
    format!("{}\n{content}", user_tags(&missing, false))
}

fn describe(outcome: &SendOutcome, channel: u64) -> String {
    if outcome.is_noop() {
        return "Nothing to send: notice text is empty.".into();
    }
    let mut line = format!(
        "Sent {} message(s) to channel {channel}",
        outcome.sent.len()
    );
    if outcome.tracked {
        line.push_str(" (tracked)");
    }
    if !outcome.deleted.is_empty() {
        line.push_str(&format!(", retracted {}", outcome.deleted.len()));
    }
    if !outcome.already_gone.is_empty() {
        line.push_str(&format!(
            ", {} already gone",
            outcome.already_gone.len()
        ));
    }
    line.push('.');
    line
}

pub async fn handle_send(args: SendArgs, ctx: &Context) -> Result<()> {
    let content = with_mentions(read_content(&args).await?, &args.mentions);
    let outcome = sender(ctx)?
        .send_notification(&content, args.channel, args.category)
        .await?;

    println!("{}", describe(&outcome, args.channel));
    for id in &outcome.sent {
        println!("  {id}");
    }
    Ok(())
}

pub async fn handle_notices(action: NoticeAction, ctx: &Context) -> Result<()> {
    match action {
        NoticeAction::List { channel, json } => {
            let notices: Vec<_> = registry(ctx)
                .load()
                .await?
                .into_iter()
                .filter(|n| channel.is_none_or(|c| n.channel_id == c))
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&notices)?);
            } else if notices.is_empty() {
                println!("No tracked notices.");
            } else {
                for n in &notices {
                    println!("  {:>20}  {:>20}  {}", n.channel_id, n.message_id, n.category);
                }
            }
        },
        NoticeAction::Categories => {
            for category in Category::ALL {
                let retracted_by: Vec<&str> = Category::ALL
                    .iter()
                    .filter(|newer| category.is_superseded_by(**newer))
                    .map(|newer| newer.as_str())
                    .collect();
                let tracked = if category.is_trackable() {
                    "tracked"
                } else {
                    "permanent"
                };
                if retracted_by.is_empty() {
                    println!("  {category:<26} {tracked}");
                } else {
                    println!(
                        "  {category:<26} {tracked:<10} retracted by: {}",
                        retracted_by.join(", ")
                    );
                }
            }
        },
        NoticeAction::UnknownCommand { channel, help_file } => {
            let help_text = tokio::fs::read_to_string(&help_file)
                .await
                .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", help_file.display()))?;
            let cooldown = Duration::from_millis(ctx.config.notifications.help_cooldown_ms);
            let observer = CommandHelpObserver::new(Arc::new(sender(ctx)?), help_text)
                .with_cooldown(cooldown);

            let hooks = UnknownCommandHooks::new();
            hooks.register(Arc::new(observer));
            let ran = hooks.notify(channel).await;
            println!("Ran {ran} unknown-command hook(s) for channel {channel}.");
        },
    }
    Ok(())
}
