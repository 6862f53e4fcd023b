use rse_engine::{EngineConfig, EngineConfigError};
use std::env;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Distinguishes runtime behavior for different stages of the advisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Preset selecting which signals and domain rules are active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum EngineMode {
    #[default]
    Canonical,
    Legacy,
}

impl EngineMode {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "canonical" => Ok(Self::Canonical),
            "legacy" => Ok(Self::Legacy),
            _ => Err(ConfigError::InvalidMode(value.to_string())),
        }
    }

    pub fn preset(self) -> EngineConfig {
        match self {
            Self::Canonical => EngineConfig::canonical(),
            Self::Legacy => EngineConfig::legacy(),
        }
    }
}

/// Shape of the log lines written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    /// Production runs feed log collectors, so they default to JSON lines.
    fn for_environment(environment: AppEnvironment) -> Self {
        match environment {
            AppEnvironment::Production => Self::Json,
            AppEnvironment::Development | AppEnvironment::Test => Self::Compact,
        }
    }

    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidLogFormat(value.to_string())),
        }
    }
}

/// Top-level configuration for the advisor.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub engine: EngineSource,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let mode = EngineMode::parse(&env::var("RSE_MODE").unwrap_or_default())?;
        let config_path = env::var("RSE_ENGINE_CONFIG")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = match env::var("APP_LOG_FORMAT") {
            Ok(value) if !value.trim().is_empty() => LogFormat::parse(&value)?,
            _ => LogFormat::for_environment(environment),
        };

        Ok(Self {
            environment,
            engine: EngineSource { mode, config_path },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
        })
    }
}

/// Where the engine configuration comes from: a preset or a JSON document.
#[derive(Debug, Clone)]
pub struct EngineSource {
    pub mode: EngineMode,
    pub config_path: Option<PathBuf>,
}

impl EngineSource {
    pub fn resolve(&self) -> Result<EngineConfig, ConfigError> {
        match &self.config_path {
            Some(path) => load_engine_file(path),
            None => Ok(self.mode.preset()),
        }
    }
}

fn load_engine_file(path: &Path) -> Result<EngineConfig, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::EngineFile {
        path: path.to_path_buf(),
        source,
    })?;

    EngineConfig::from_json_reader(file).map_err(|source| ConfigError::EngineDocument {
        path: path.to_path_buf(),
        source,
    })
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidMode(String),
    InvalidLogFormat(String),
    EngineFile {
        path: PathBuf,
        source: std::io::Error,
    },
    EngineDocument {
        path: PathBuf,
        source: EngineConfigError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidMode(value) => {
                write!(f, "RSE_MODE must be 'canonical' or 'legacy' (found '{value}')")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'json' (found '{value}')")
            }
            ConfigError::EngineFile { path, .. } => {
                write!(f, "unable to open engine config {}", path.display())
            }
            ConfigError::EngineDocument { path, source } => {
                write!(f, "engine config {} rejected: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidMode(_) | ConfigError::InvalidLogFormat(_) => None,
            ConfigError::EngineFile { source, .. } => Some(source),
            ConfigError::EngineDocument { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_LOG_FORMAT");
        env::remove_var("RSE_MODE");
        env::remove_var("RSE_ENGINE_CONFIG");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.engine.mode, EngineMode::Canonical);
        assert!(config.engine.config_path.is_none());
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.log_format, LogFormat::Compact);
        assert_eq!(
            config.engine.resolve().expect("preset resolves"),
            EngineConfig::canonical()
        );
    }

    #[test]
    fn legacy_mode_selects_legacy_preset() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RSE_MODE", " Legacy ");
        env::set_var("APP_ENV", "ci");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Test);
        assert_eq!(config.engine.mode, EngineMode::Legacy);
        assert_eq!(
            config.engine.resolve().expect("preset resolves"),
            EngineConfig::legacy()
        );
        reset_env();
    }

    #[test]
    fn rejects_unknown_mode() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RSE_MODE", "aggressive");
        let err = AppConfig::load().expect_err("mode rejected");
        assert!(matches!(err, ConfigError::InvalidMode(ref mode) if mode == "aggressive"));
        reset_env();
    }

    #[test]
    fn production_logs_default_to_json_unless_overridden() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.telemetry.log_format, LogFormat::Json);

        env::set_var("APP_LOG_FORMAT", " Compact ");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.telemetry.log_format, LogFormat::Compact);

        env::set_var("APP_LOG_FORMAT", "pretty");
        let err = AppConfig::load().expect_err("format rejected");
        assert!(matches!(err, ConfigError::InvalidLogFormat(ref value) if value == "pretty"));
        reset_env();
    }

    #[test]
    fn missing_engine_file_is_reported_with_path() {
        let source = EngineSource {
            mode: EngineMode::Canonical,
            config_path: Some(PathBuf::from("/nonexistent/rse-engine.json")),
        };
        let err = source.resolve().expect_err("file missing");
        assert!(err.to_string().contains("/nonexistent/rse-engine.json"));
    }
}
