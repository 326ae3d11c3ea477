mod config_commands;
mod notice_commands;
mod pending_commands;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    pitwall_config::PitwallConfig,
    tracing::{debug, info},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "pitwall", about = "Pitwall: self-cleaning league notices for Discord")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (overrides discovery of ./pitwall.toml and ~/.config/pitwall/).
    #[arg(long, global = true, env = "PITWALL_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory holding the notice registry and pending lists.
    #[arg(long, global = true, env = "PITWALL_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Post a notice, retracting the notices it supersedes.
    Send(notice_commands::SendArgs),
    /// Inspect tracked notices and categories.
    Notices {
        #[command(subcommand)]
        action: notice_commands::NoticeAction,
    },
    /// Manage pending driver-notification lists.
    Pending {
        #[command(subcommand)]
        action: pending_commands::PendingAction,
    },
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

/// Loaded configuration plus the resolved data directory.
pub(crate) struct Context {
    pub config: PitwallConfig,
    pub config_path: Option<PathBuf>,
    pub data_dir: PathBuf,
}

impl Context {
    fn load(cli: &Cli) -> anyhow::Result<Self> {
        let (config, config_path) = match &cli.config {
            Some(path) => (pitwall_config::load_config(path)?, Some(path.clone())),
            None => (
                pitwall_config::discover_and_load(),
                pitwall_config::find_config_file(),
            ),
        };
        let data_dir = pitwall_config::resolve_data_dir(cli.data_dir.as_deref(), &config);
        debug!(data_dir = %data_dir.display(), "resolved data directory");
        Ok(Self {
            config,
            config_path,
            data_dir,
        })
    }
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "pitwall starting");

    // `config check` reports on broken files instead of failing to load them.
    if let Commands::Config { action } = &cli.command {
        return config_commands::handle_config(action, &cli).await;
    }

    let ctx = Context::load(&cli)?;
    match cli.command {
        Commands::Send(args) => notice_commands::handle_send(args, &ctx).await,
        Commands::Notices { action } => notice_commands::handle_notices(action, &ctx).await,
        Commands::Pending { action } => pending_commands::handle_pending(action, &ctx).await,
        Commands::Config { .. } => Ok(()),
    }
}
