use {anyhow::Result, clap::Subcommand};

use pitwall_config::{Severity, ValidationResult, validate_file};

use crate::{Cli, Context};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors/warnings.
    Check {
        /// Show informational diagnostics in addition to errors and warnings.
        #[arg(long)]
        verbose: bool,
    },
    /// Show which config file and data directory are in use.
    Paths,
}

pub async fn handle_config(action: &ConfigAction, cli: &Cli) -> Result<()> {
    match action {
        ConfigAction::Check { verbose } => {
            let result = validate_file(cli.config.as_deref());
            let errors = report(&result, *verbose);
            if errors > 0 {
                std::process::exit(1);
            }
            Ok(())
        },
        ConfigAction::Paths => {
            let ctx = Context::load(cli)?;
            match &ctx.config_path {
                Some(path) => println!("config:   {}", path.display()),
                None => println!("config:   (none, using defaults)"),
            }
            println!("data dir: {}", ctx.data_dir.display());
            println!(
                "registry: {}",
                ctx.config
                    .notifications
                    .registry_path(&ctx.data_dir)
                    .display()
            );
            println!(
                "pending:  {}",
                ctx.config.notifications.pending_path(&ctx.data_dir).display()
            );
            Ok(())
        },
    }
}

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Print diagnostics to stderr and return the error count.
fn report(result: &ValidationResult, verbose: bool) -> usize {
    if let Some(ref path) = result.config_path {
        eprintln!("Checking {}\n", path.display());
    } else {
        eprintln!("No config file found; checking defaults.\n");
    }

    let mut shown = 0;
    for d in &result.diagnostics {
        if d.severity == Severity::Info && !verbose {
            continue;
        }

        let color = match d.severity {
            Severity::Error => RED,
            Severity::Warning => YELLOW,
            Severity::Info => CYAN,
        };

        if d.path.is_empty() {
            eprintln!("  {BOLD}{color}{}{RESET} {}", d.severity, d.message);
        } else {
            eprintln!("  {BOLD}{color}{}{RESET} {}: {}", d.severity, d.path, d.message);
        }
        shown += 1;
    }

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);

    if shown > 0 {
        eprintln!();
    }
    if errors == 0 && warnings == 0 {
        eprintln!("No issues found.");
    } else {
        eprintln!("{errors} error(s), {warnings} warning(s)");
    }
    errors
}
