use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use validator::Validate;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub api: ApiSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    #[validate(url)]
    pub base_url: String,
    /// Django `sessionid` cookie of an already authenticated browser session
    pub session_id: Option<String>,
    #[validate(range(min = 1))]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            session_id: None,
            timeout_secs: None,
        }
    }
}

fn default_base_url() -> String { "http://localhost:8000".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with TWIN_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("api.base_url", default_base_url())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., TWIN__API__BASE_URL -> api.base_url
            .add_source(
                Environment::with_prefix("TWIN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_session_override(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("api.base_url", default_base_url())?
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("TWIN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// `SESSION_ID` is accepted as a shorthand for `TWIN__API__SESSION_ID`
fn apply_session_override(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("SESSION_ID") {
        Ok(session_id) if !session_id.is_empty() => Config::builder()
            .add_source(settings)
            .set_override("api.session_id", session_id)?
            .build(),
        _ => Ok(settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "compact");
    }

    #[test]
    fn test_default_api_settings_validate() {
        let settings = Settings {
            api: ApiSettings::default(),
            logging: LoggingSettings::default(),
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let settings = Settings {
            api: ApiSettings {
                base_url: "not a url".to_string(),
                session_id: None,
                timeout_secs: Some(10),
            },
            logging: LoggingSettings::default(),
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let settings = Settings {
            api: ApiSettings {
                timeout_secs: Some(0),
                ..ApiSettings::default()
            },
            logging: LoggingSettings::default(),
        };
        assert!(settings.validate().is_err());
    }
}
