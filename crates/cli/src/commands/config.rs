use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;
use shopassist_core::config::{AppConfig, LoadOptions};
use toml::Value;

use crate::commands::CommandResult;

struct Field<'a> {
    key: &'static str,
    value: String,
    env_keys: &'a [&'static str],
    flag: bool,
}

pub fn run(options: &LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                2,
            )
        }
    };

    let config_file_path = detect_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let overrides = &options.overrides;

    let api_token = match &config.backend.api_token {
        Some(token) => redact_token(token.expose_secret()),
        None => "<unset>".to_string(),
    };

    let fields = [
        Field {
            key: "backend.mode",
            value: config.backend.mode.as_str().to_string(),
            env_keys: &["SHOPASSIST_BACKEND_MODE"],
            flag: overrides.backend_mode.is_some(),
        },
        Field {
            key: "backend.base_url",
            value: config.backend.base_url.clone(),
            env_keys: &["SHOPASSIST_BACKEND_BASE_URL"],
            flag: overrides.base_url.is_some(),
        },
        Field {
            key: "backend.api_token",
            value: api_token,
            env_keys: &["SHOPASSIST_BACKEND_API_TOKEN"],
            flag: overrides.api_token.is_some(),
        },
        Field {
            key: "backend.timeout_secs",
            value: config.backend.timeout_secs.to_string(),
            env_keys: &["SHOPASSIST_BACKEND_TIMEOUT_SECS"],
            flag: false,
        },
        Field {
            key: "backend.simulated_latency_ms",
            value: config.backend.simulated_latency_ms.to_string(),
            env_keys: &["SHOPASSIST_BACKEND_SIMULATED_LATENCY_MS"],
            flag: false,
        },
        Field {
            key: "search.default_preset",
            value: config.search.default_preset.as_str().to_string(),
            env_keys: &["SHOPASSIST_SEARCH_DEFAULT_PRESET"],
            flag: overrides.default_preset.is_some(),
        },
        Field {
            key: "search.currency",
            value: config.search.currency.clone(),
            env_keys: &["SHOPASSIST_SEARCH_CURRENCY"],
            flag: false,
        },
        Field {
            key: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["SHOPASSIST_LOGGING_LEVEL", "SHOPASSIST_LOG_LEVEL"],
            flag: overrides.log_level.is_some(),
        },
        Field {
            key: "logging.format",
            value: config.logging.format.as_str().to_string(),
            env_keys: &["SHOPASSIST_LOGGING_FORMAT", "SHOPASSIST_LOG_FORMAT"],
            flag: overrides.log_format.is_some(),
        },
    ];

    let mut lines =
        vec!["effective config (source precedence: flag > env > file > default):".to_string()];
    for field in &fields {
        let source = field_source(
            field,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key, &field.value, source));
    }

    CommandResult::text(lines.join("\n"))
}

fn detect_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }

    [PathBuf::from("shopassist.toml"), PathBuf::from("config/shopassist.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    field: &Field<'_>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if field.flag {
        return "flag".to_string();
    }

    if let Some(env_key) = field.env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, field.key) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

/// Keeps a `prefix-` when the token has one; never prints the secret part.
fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}
