//! Configuration loading, validation, and env substitution.
//!
//! Config files: `pitwall.toml`, `pitwall.yaml`, or `pitwall.json`
//! Searched in `./` then `~/.config/pitwall/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{
        config_dir, default_data_dir, discover_and_load, find_config_file, load_config,
        resolve_data_dir,
    },
    schema::{DISCORD_MESSAGE_LIMIT, DiscordConfig, NotificationsConfig, PitwallConfig},
    validate::{Diagnostic, Severity, ValidationResult, validate, validate_file, validate_str},
};
