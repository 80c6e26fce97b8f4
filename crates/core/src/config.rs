use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::preferences::PresetType;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub mode: BackendMode,
    pub base_url: String,
    pub api_token: Option<SecretString>,
    pub timeout_secs: u64,
    pub simulated_latency_ms: u64,
}

#[derive(Clone, Debug)]
pub struct SearchConfig {
    pub default_preset: PresetType,
    pub currency: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendMode {
    Mock,
    Http,
}

impl BackendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Http => "http",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub backend_mode: Option<BackendMode>,
    pub base_url: Option<String>,
    pub api_token: Option<String>,
    pub default_preset: Option<PresetType>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                mode: BackendMode::Mock,
                base_url: "http://localhost:8000".to_string(),
                api_token: None,
                timeout_secs: 10,
                simulated_latency_ms: 0,
            },
            search: SearchConfig {
                default_preset: PresetType::BestValue,
                currency: "USD".to_string(),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for BackendMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "http" => Ok(Self::Http),
            other => Err(ConfigError::Validation(format!(
                "unsupported backend mode `{other}` (expected mock|http)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch)?;
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from("shopassist.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(backend) = patch.backend {
            if let Some(mode) = backend.mode {
                self.backend.mode = mode;
            }
            if let Some(base_url) = backend.base_url {
                self.backend.base_url = base_url;
            }
            if let Some(api_token_value) = backend.api_token {
                self.backend.api_token = Some(secret_value(api_token_value));
            }
            if let Some(timeout_secs) = backend.timeout_secs {
                self.backend.timeout_secs = timeout_secs;
            }
            if let Some(simulated_latency_ms) = backend.simulated_latency_ms {
                self.backend.simulated_latency_ms = simulated_latency_ms;
            }
        }

        if let Some(search) = patch.search {
            if let Some(default_preset) = search.default_preset {
                self.search.default_preset = parse_preset("search.default_preset", &default_preset)?;
            }
            if let Some(currency) = search.currency {
                self.search.currency = currency;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SHOPASSIST_BACKEND_MODE") {
            self.backend.mode = value.parse()?;
        }
        if let Some(value) = read_env("SHOPASSIST_BACKEND_BASE_URL") {
            self.backend.base_url = value;
        }
        if let Some(value) = read_env("SHOPASSIST_BACKEND_API_TOKEN") {
            self.backend.api_token = Some(secret_value(value));
        }
        if let Some(value) = read_env("SHOPASSIST_BACKEND_TIMEOUT_SECS") {
            self.backend.timeout_secs = parse_u64("SHOPASSIST_BACKEND_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("SHOPASSIST_BACKEND_SIMULATED_LATENCY_MS") {
            self.backend.simulated_latency_ms =
                parse_u64("SHOPASSIST_BACKEND_SIMULATED_LATENCY_MS", &value)?;
        }

        if let Some(value) = read_env("SHOPASSIST_SEARCH_DEFAULT_PRESET") {
            self.search.default_preset = parse_preset("SHOPASSIST_SEARCH_DEFAULT_PRESET", &value)?;
        }
        if let Some(value) = read_env("SHOPASSIST_SEARCH_CURRENCY") {
            self.search.currency = value;
        }

        let log_level =
            read_env("SHOPASSIST_LOGGING_LEVEL").or_else(|| read_env("SHOPASSIST_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("SHOPASSIST_LOGGING_FORMAT").or_else(|| read_env("SHOPASSIST_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(mode) = overrides.backend_mode {
            self.backend.mode = mode;
        }
        if let Some(base_url) = overrides.base_url {
            self.backend.base_url = base_url;
        }
        if let Some(api_token) = overrides.api_token {
            self.backend.api_token = Some(secret_value(api_token));
        }
        if let Some(default_preset) = overrides.default_preset {
            self.search.default_preset = default_preset;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_backend(&self.backend)?;
        validate_search(&self.search)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("shopassist.toml"), PathBuf::from("config/shopassist.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_backend(backend: &BackendConfig) -> Result<(), ConfigError> {
    if backend.timeout_secs == 0 || backend.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "backend.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if backend.mode == BackendMode::Http {
        let base_url = backend.base_url.trim();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "backend.base_url must start with http:// or https:// when backend.mode is http"
                    .to_string(),
            ));
        }
    }

    let blank_token = backend
        .api_token
        .as_ref()
        .map(|token| token.expose_secret().trim().is_empty())
        .unwrap_or(false);
    if blank_token {
        return Err(ConfigError::Validation(
            "backend.api_token must not be blank when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_search(search: &SearchConfig) -> Result<(), ConfigError> {
    let currency = search.currency.trim();
    let iso_code = currency.len() == 3 && currency.chars().all(|ch| ch.is_ascii_uppercase());
    if !iso_code {
        return Err(ConfigError::Validation(format!(
            "search.currency must be a 3-letter uppercase code (got `{currency}`)"
        )));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_preset(key: &str, value: &str) -> Result<PresetType, ConfigError> {
    value.parse::<PresetType>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    backend: Option<BackendPatch>,
    search: Option<SearchPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct BackendPatch {
    mode: Option<BackendMode>,
    base_url: Option<String>,
    api_token: Option<String>,
    timeout_secs: Option<u64>,
    simulated_latency_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchPatch {
    default_preset: Option<String>,
    currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{AppConfig, BackendMode, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
    use crate::domain::preferences::PresetType;

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_run_against_the_mock_backend() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.backend.mode == BackendMode::Mock, "mock backend is the default")?;
        ensure(config.backend.api_token.is_none(), "no token by default")?;
        ensure(config.search.default_preset == PresetType::BestValue, "best value preset")?;
        ensure(config.search.currency == "USD", "USD currency by default")?;
        Ok(())
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_SHOPASSIST_TOKEN", "token-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("shopassist.toml");
            fs::write(
                &path,
                r#"
[backend]
mode = "http"
base_url = "https://api.shopassist.test"
api_token = "${TEST_SHOPASSIST_TOKEN}"

[search]
default_preset = "fastest-delivery"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.backend.mode == BackendMode::Http, "mode should come from file")?;
            ensure(
                config.backend.api_token.as_ref().map(|token| token.expose_secret())
                    == Some("token-from-env"),
                "api token should be interpolated from environment",
            )?;
            ensure(
                config.search.default_preset == PresetType::FastestDelivery,
                "preset aliases should be accepted in files",
            )?;
            Ok(())
        })();

        clear_vars(&["TEST_SHOPASSIST_TOKEN"]);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("SHOPASSIST_LOG_LEVEL", "warn");
        env::set_var("SHOPASSIST_LOG_FORMAT", "json");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Json),
                "json logging format should be set from env var",
            )?;
            Ok(())
        })();

        clear_vars(&["SHOPASSIST_LOG_LEVEL", "SHOPASSIST_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("SHOPASSIST_BACKEND_BASE_URL", "https://from-env.test");
        env::set_var("SHOPASSIST_BACKEND_TIMEOUT_SECS", "20");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("shopassist.toml");
            fs::write(
                &path,
                r#"
[backend]
mode = "http"
base_url = "https://from-file.test"
timeout_secs = 5

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    log_level: Some("debug".to_string()),
                    default_preset: Some(PresetType::MostTrusted),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.backend.base_url == "https://from-env.test",
                "env base url should win over file",
            )?;
            ensure(config.backend.timeout_secs == 20, "env timeout should win over file")?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(
                config.search.default_preset == PresetType::MostTrusted,
                "override preset should win",
            )?;
            Ok(())
        })();

        clear_vars(&["SHOPASSIST_BACKEND_BASE_URL", "SHOPASSIST_BACKEND_TIMEOUT_SECS"]);
        result
    }

    #[test]
    fn http_mode_requires_http_base_url() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let error = match AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                backend_mode: Some(BackendMode::Http),
                base_url: Some("ftp://catalog.test".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }) {
            Ok(_) => return Err("expected validation failure but config load succeeded".to_string()),
            Err(error) => error,
        };

        ensure(
            matches!(error, ConfigError::Validation(ref message) if message.contains("backend.base_url")),
            "error should name the offending field",
        )
    }

    #[test]
    fn invalid_env_values_are_reported_with_their_key() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("SHOPASSIST_BACKEND_TIMEOUT_SECS", "soon");
        let result = match AppConfig::load(LoadOptions::default()) {
            Err(ConfigError::InvalidEnvOverride { key, .. }) => ensure(
                key == "SHOPASSIST_BACKEND_TIMEOUT_SECS",
                "error should carry the env key",
            ),
            Err(other) => Err(format!("unexpected error: {other}")),
            Ok(_) => Err("expected env override failure".to_string()),
        };
        clear_vars(&["SHOPASSIST_BACKEND_TIMEOUT_SECS"]);
        result
    }

    #[test]
    fn missing_required_file_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;

        let result = AppConfig::load(LoadOptions {
            config_path: Some(dir.path().join("absent.toml")),
            require_file: true,
            ..LoadOptions::default()
        });

        ensure(
            matches!(result, Err(ConfigError::MissingConfigFile(_))),
            "missing file should be reported when required",
        )
    }

    #[test]
    fn lowercase_currency_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("SHOPASSIST_SEARCH_CURRENCY", "usd");
        let result = AppConfig::load(LoadOptions::default());
        clear_vars(&["SHOPASSIST_SEARCH_CURRENCY"]);

        ensure(
            matches!(result, Err(ConfigError::Validation(ref message)) if message.contains("search.currency")),
            "currency must be an uppercase ISO code",
        )
    }
}
