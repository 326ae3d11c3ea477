//! Configuration validation.
//!
//! Checks a config file for syntax, unknown or misspelled keys, and settings
//! that would make the bot misbehave against Discord.

use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;

use crate::{
    env_subst::substitute_env,
    schema::{DISCORD_MESSAGE_LIMIT, PitwallConfig},
};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// "syntax", "unknown-field", "type-error", "discord" or "file-ref"
    pub category: &'static str,
    /// Dotted path, e.g. "discord.char_limit"
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    fn new(
        severity: Severity,
        category: &'static str,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result of validating a configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<PathBuf>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

const TOP_LEVEL_KEYS: &[&str] = &["data_dir", "discord", "notifications"];
const DISCORD_KEYS: &[&str] = &[
    "token",
    "bot_id",
    "server_id",
    "char_limit",
    "api_base",
    "timeout_secs",
];
const NOTIFICATIONS_KEYS: &[&str] = &["registry_file", "pending_dir", "help_cooldown_ms"];

/// Semantic checks on an already parsed config.
#[must_use]
pub fn validate(config: &PitwallConfig) -> ValidationResult {
    let mut diagnostics = Vec::new();
    let discord = &config.discord;

    if discord.char_limit == 0 {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "discord",
            "discord.char_limit",
            "char_limit must be at least 1",
        ));
    } else if discord.char_limit > DISCORD_MESSAGE_LIMIT {
        diagnostics.push(Diagnostic::new(
            Severity::Warning,
            "discord",
            "discord.char_limit",
            format!(
                "char_limit {} exceeds Discord's {DISCORD_MESSAGE_LIMIT} character limit; long notices will be rejected",
                discord.char_limit
            ),
        ));
    }

    let token = discord.token.expose_secret();
    if token.trim().is_empty() {
        diagnostics.push(Diagnostic::new(
            Severity::Warning,
            "discord",
            "discord.token",
            "no bot token configured; sending notices will fail",
        ));
    } else if token.contains("${") {
        diagnostics.push(Diagnostic::new(
            Severity::Warning,
            "discord",
            "discord.token",
            "token contains an unresolved ${...} placeholder",
        ));
    }

    if discord.bot_id == 0 {
        diagnostics.push(Diagnostic::new(
            Severity::Warning,
            "discord",
            "discord.bot_id",
            "bot_id is not set",
        ));
    }

    if discord.timeout_secs == 0 {
        diagnostics.push(Diagnostic::new(
            Severity::Info,
            "discord",
            "discord.timeout_secs",
            "timeout_secs is 0; requests will use no timeout",
        ));
    }

    ValidationResult {
        diagnostics,
        config_path: None,
    }
}

/// Validate a config file at the given path, or discover the default config
/// file location if `path` is `None`.
#[must_use]
pub fn validate_file(path: Option<&Path>) -> ValidationResult {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => crate::loader::find_config_file(),
    };

    let Some(actual_path) = config_path else {
        let mut result = validate(&PitwallConfig::default());
        result.diagnostics.insert(
            0,
            Diagnostic::new(
                Severity::Info,
                "file-ref",
                "",
                "no config file found; using defaults",
            ),
        );
        return result;
    };

    let mut result = match std::fs::read_to_string(&actual_path) {
        Ok(raw) => validate_str(&substitute_env(&raw), &actual_path),
        Err(e) => ValidationResult {
            diagnostics: vec![Diagnostic::new(
                Severity::Error,
                "syntax",
                "",
                format!("failed to read config file: {e}"),
            )],
            config_path: None,
        },
    };
    result.config_path = Some(actual_path);
    result
}

/// Validate raw config text. The format is picked from `path`'s extension.
#[must_use]
pub fn validate_str(raw: &str, path: &Path) -> ValidationResult {
    let mut diagnostics = Vec::new();

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
    let value: serde_json::Value = match ext {
        "toml" => toml::from_str::<toml::Value>(raw)
            .map_err(|e| e.to_string())
            .and_then(|v| serde_json::to_value(v).map_err(|e| e.to_string())),
        "yaml" | "yml" => serde_yaml::from_str(raw).map_err(|e| e.to_string()),
        "json" => serde_json::from_str(raw).map_err(|e| e.to_string()),
        other => Err(format!("unsupported config format: .{other}")),
    }
    .unwrap_or_else(|message| {
        diagnostics.push(Diagnostic::new(Severity::Error, "syntax", "", message));
        serde_json::Value::Null
    });
    if !diagnostics.is_empty() {
        return ValidationResult {
            diagnostics,
            config_path: None,
        };
    }

    check_unknown_fields(&value, &mut diagnostics);

    match serde_json::from_value::<PitwallConfig>(value) {
        Ok(config) => diagnostics.extend(validate(&config).diagnostics),
        Err(e) => diagnostics.push(Diagnostic::new(
            Severity::Error,
            "type-error",
            "",
            format!("type error: {e}"),
        )),
    }

    ValidationResult {
        diagnostics,
        config_path: None,
    }
}

fn check_unknown_fields(value: &serde_json::Value, diagnostics: &mut Vec<Diagnostic>) {
    let Some(root) = value.as_object() else {
        return;
    };

    for (key, child) in root {
        let nested = match key.as_str() {
            "discord" => DISCORD_KEYS,
            "notifications" => NOTIFICATIONS_KEYS,
            "data_dir" => continue,
            _ => {
                diagnostics.push(unknown_field(key, key, TOP_LEVEL_KEYS));
                continue;
            },
        };
        if let Some(table) = child.as_object() {
            for inner in table.keys() {
                if !nested.contains(&inner.as_str()) {
                    diagnostics.push(unknown_field(&format!("{key}.{inner}"), inner, nested));
                }
            }
        }
    }
}

fn unknown_field(path: &str, key: &str, candidates: &[&str]) -> Diagnostic {
    let message = match suggest(key, candidates, 3) {
        Some(hint) => format!("unknown field '{key}' (did you mean '{hint}'?)"),
        None => format!("unknown field '{key}'"),
    };
    Diagnostic::new(Severity::Warning, "unknown-field", path, message)
}

/// Levenshtein edit distance over chars.
fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn suggest<'a>(needle: &str, candidates: &[&'a str], max_distance: usize) -> Option<&'a str> {
    candidates
        .iter()
        .map(|c| (*c, levenshtein(needle, c)))
        .filter(|(_, d)| *d > 0 && *d <= max_distance)
        .min_by_key(|(_, d)| *d)
        .map(|(c, _)| c)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::schema::DiscordConfig,
        secrecy::Secret,
        tempfile::TempDir,
    };

    fn configured() -> PitwallConfig {
        PitwallConfig {
            discord: DiscordConfig {
                token: Secret::new("bot-token".into()),
                bot_id: 1,
                server_id: 2,
                ..DiscordConfig::default()
            },
            ..PitwallConfig::default()
        }
    }

    fn toml(raw: &str) -> ValidationResult {
        validate_str(raw, Path::new("pitwall.toml"))
    }

    #[test]
    fn levenshtein_distances() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("token", "token"), 0);
        assert_eq!(levenshtein("tokn", "token"), 1);
        assert_eq!(levenshtein("char_limt", "char_limit"), 1);
    }

    #[test]
    fn configured_is_clean() {
        assert!(validate(&configured()).diagnostics.is_empty());
    }

    #[test]
    fn defaults_warn_about_missing_credentials() {
        let result = validate(&PitwallConfig::default());
        assert!(!result.has_errors());
        assert_eq!(result.count(Severity::Warning), 2);
        let paths: Vec<_> = result.diagnostics.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, ["discord.token", "discord.bot_id"]);
    }

    #[test]
    fn zero_char_limit_is_error() {
        let mut cfg = configured();
        cfg.discord.char_limit = 0;
        let result = validate(&cfg);
        assert!(result.has_errors());
        assert_eq!(result.diagnostics[0].path, "discord.char_limit");
    }

    #[test]
    fn oversized_char_limit_is_warning() {
        let mut cfg = configured();
        cfg.discord.char_limit = 4000;
        let result = validate(&cfg);
        assert!(!result.has_errors());
        assert_eq!(result.count(Severity::Warning), 1);
    }

    #[test]
    fn unresolved_placeholder_token_warned() {
        let mut cfg = configured();
        cfg.discord.token = Secret::new("${DISCORD_TOKEN}".into());
        let result = validate(&cfg);
        assert!(result.diagnostics[0].message.contains("placeholder"));
    }

    #[test]
    fn syntax_error_detected() {
        let result = toml("[discord\n");
        assert!(result.has_errors());
        assert_eq!(result.diagnostics[0].category, "syntax");
    }

    #[test]
    fn unknown_keys_suggest_close_match() {
        let result = toml("[discord]\ntoken = \"t\"\nbot_id = 1\nchar_limt = 100\n\n[notifcations]\n");
        let unknown: Vec<_> = result
            .diagnostics
            .iter()
            .filter(|d| d.category == "unknown-field")
            .collect();
        assert_eq!(unknown.len(), 2);
        assert_eq!(unknown[0].path, "discord.char_limt");
        assert!(unknown[0].message.contains("did you mean 'char_limit'"));
        assert_eq!(unknown[1].path, "notifcations");
        assert!(unknown[1].message.contains("did you mean 'notifications'"));
    }

    #[test]
    fn type_error_detected() {
        let result = toml("[discord]\nchar_limit = \"lots\"\n");
        assert!(result.has_errors());
        assert!(result.diagnostics.iter().any(|d| d.category == "type-error"));
    }

    #[test]
    fn yaml_and_json_are_checked_too() {
        let yaml = validate_str(
            "discord:\n  char_limit: 0\n",
            Path::new("pitwall.yaml"),
        );
        assert!(yaml.has_errors());

        let json = validate_str(r#"{"discord": {"bot_id": 3, "token": "t"}}"#, Path::new("p.json"));
        assert!(json.diagnostics.is_empty());
    }

    #[test]
    fn validate_file_records_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pitwall.toml");
        std::fs::write(&path, "[discord]\ntoken = \"t\"\nbot_id = 9\n").unwrap();

        let result = validate_file(Some(&path));
        assert_eq!(result.config_path.as_deref(), Some(path.as_path()));
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn validate_file_missing_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = validate_file(Some(&tmp.path().join("nope.toml")));
        assert!(result.has_errors());
    }
}
