use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{Error, Result, env_subst::substitute_env, schema::PitwallConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "pitwall.toml",
    "pitwall.yaml",
    "pitwall.yml",
    "pitwall.json",
];

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "pitwall")
}

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<PitwallConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./pitwall.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/pitwall/pitwall.{toml,yaml,yml,json}` (user-global)
///
/// Returns `PitwallConfig::default()` if no config file is found or the one
/// found cannot be loaded.
pub fn discover_and_load() -> PitwallConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    PitwallConfig::default()
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    if let Some(p) = find_in(Path::new(".")) {
        return Some(p);
    }
    config_dir().and_then(|dir| find_in(&dir))
}

fn find_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/pitwall/`).
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().to_path_buf())
}

/// Returns the platform data directory (`~/.local/share/pitwall/` on Linux).
pub fn default_data_dir() -> Option<PathBuf> {
    project_dirs().map(|d| d.data_dir().to_path_buf())
}

/// Pick the data directory: explicit override, then `data_dir` from the
/// config, then the platform default, then the working directory.
pub fn resolve_data_dir(override_dir: Option<&Path>, config: &PitwallConfig) -> PathBuf {
    override_dir
        .map(Path::to_path_buf)
        .or_else(|| config.data_dir.clone())
        .or_else(default_data_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn parse_config(raw: &str, path: &Path) -> Result<PitwallConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => toml::from_str(raw).map_err(|e| Error::parse(path, e)),
        "yaml" | "yml" => serde_yaml::from_str(raw).map_err(|e| Error::parse(path, e)),
        "json" => serde_json::from_str(raw).map_err(|e| Error::parse(path, e)),
        _ => Err(Error::UnsupportedFormat {
            extension: ext.to_string(),
        }),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, secrecy::ExposeSecret, tempfile::TempDir};

    #[test]
    fn loads_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pitwall.toml");
        std::fs::write(
            &path,
            r#"
data_dir = "/srv/pitwall"

[discord]
token = "abc"
bot_id = 42
char_limit = 1500

[notifications]
help_cooldown_ms = 250
"#,
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.data_dir, Some(PathBuf::from("/srv/pitwall")));
        assert_eq!(cfg.discord.token.expose_secret(), "abc");
        assert_eq!(cfg.discord.bot_id, 42);
        assert_eq!(cfg.discord.char_limit, 1500);
        assert_eq!(cfg.discord.timeout_secs, 15);
        assert_eq!(cfg.notifications.help_cooldown_ms, 250);
        assert_eq!(
            cfg.notifications.registry_file,
            PathBuf::from("temporary_discord_messages.json")
        );
    }

    #[test]
    fn loads_yaml_and_json() {
        let tmp = TempDir::new().unwrap();

        let yaml = tmp.path().join("pitwall.yaml");
        std::fs::write(&yaml, "discord:\n  server_id: 77\n").unwrap();
        assert_eq!(load_config(&yaml).unwrap().discord.server_id, 77);

        let json = tmp.path().join("pitwall.json");
        std::fs::write(&json, r#"{"discord": {"bot_id": 5}}"#).unwrap();
        assert_eq!(load_config(&json).unwrap().discord.bot_id, 5);
    }

    #[test]
    fn substitutes_env_before_parsing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pitwall.toml");
        std::fs::write(
            &path,
            "[discord]\ntoken = \"${PITWALL_LOADER_TEST_UNSET_VAR}\"\n",
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(
            cfg.discord.token.expose_secret(),
            "${PITWALL_LOADER_TEST_UNSET_VAR}"
        );
    }

    #[test]
    fn reports_parse_and_format_errors() {
        let tmp = TempDir::new().unwrap();

        let broken = tmp.path().join("pitwall.toml");
        std::fs::write(&broken, "[discord\n").unwrap();
        assert!(matches!(
            load_config(&broken).unwrap_err(),
            Error::Parse { .. }
        ));

        let ini = tmp.path().join("pitwall.ini");
        std::fs::write(&ini, "").unwrap();
        assert!(matches!(
            load_config(&ini).unwrap_err(),
            Error::UnsupportedFormat { .. }
        ));

        assert!(matches!(
            load_config(&tmp.path().join("missing.toml")).unwrap_err(),
            Error::Read { .. }
        ));
    }

    #[test]
    fn find_in_respects_name_order() {
        let tmp = TempDir::new().unwrap();
        assert!(find_in(tmp.path()).is_none());

        std::fs::write(tmp.path().join("pitwall.json"), "{}").unwrap();
        std::fs::write(tmp.path().join("pitwall.toml"), "").unwrap();
        assert_eq!(
            find_in(tmp.path()).unwrap(),
            tmp.path().join("pitwall.toml")
        );
    }

    #[test]
    fn data_dir_override_wins() {
        let cfg = PitwallConfig {
            data_dir: Some(PathBuf::from("/from/config")),
            ..PitwallConfig::default()
        };
        assert_eq!(
            resolve_data_dir(Some(Path::new("/from/flag")), &cfg),
            PathBuf::from("/from/flag")
        );
        assert_eq!(resolve_data_dir(None, &cfg), PathBuf::from("/from/config"));
    }
}
