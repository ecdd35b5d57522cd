//! Server configuration loading from file and environment variables.

use exovoice_voice::TranscriptionConfig;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Where the carrier should post follow-up webhooks.
    #[serde(default)]
    pub callback: CallbackConfig,

    /// Hosted transcription provider settings.
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Callback configuration embedded in rendered ExoML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackConfig {
    /// Public base URL of this server, e.g. `https://voice.example.com`.
    ///
    /// The `Record` action becomes `{base_url}/exotel/next`. Empty yields a
    /// relative action.
    #[serde(default)]
    pub base_url: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "exovoice_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults, then
/// applies overrides from the process environment.
///
/// See [`apply_env_overrides`] for the recognised variables.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = load_file(path)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn load_file(path: Option<&str>) -> Result<Config, ConfigError> {
    match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Ok(Config::default())
            }
            Err(e) => Err(ConfigError::FileRead(e)),
        },
        None => Ok(Config::default()),
    }
}

/// Applies environment overrides using `lookup` to read variables.
///
/// - `GROQ_API_KEY` overrides `transcription.api_key` (blank means demo mode)
/// - `BASE_URL` overrides `callback.base_url`
/// - `EXOVOICE_STT_ENDPOINT` overrides `transcription.endpoint`
/// - `EXOVOICE_STT_MODEL` overrides `transcription.model`
/// - `EXOVOICE_HOST` overrides `server.host`
/// - `EXOVOICE_PORT` overrides `server.port`
/// - `EXOVOICE_LOG_LEVEL` overrides `logging.level`
/// - `EXOVOICE_LOG_JSON` overrides `logging.json` (set to "true" to enable)
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup("GROQ_API_KEY") {
        config.transcription.api_key = Some(key).filter(|k| !k.trim().is_empty());
    }
    if let Some(base_url) = lookup("BASE_URL") {
        config.callback.base_url = base_url;
    }
    if let Some(endpoint) = lookup("EXOVOICE_STT_ENDPOINT") {
        config.transcription.endpoint = endpoint;
    }
    if let Some(model) = lookup("EXOVOICE_STT_MODEL") {
        config.transcription.model = model;
    }
    if let Some(host) = lookup("EXOVOICE_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Some(port) = lookup("EXOVOICE_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Some(level) = lookup("EXOVOICE_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("EXOVOICE_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_file() {
        let config = load_file(None).unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.callback.base_url, "");
        assert!(config.transcription.is_demo_mode());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load_file(Some("/nonexistent/exovoice.toml")).unwrap();
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn parses_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[server]
host = "0.0.0.0"
port = 9100

[callback]
base_url = "https://voice.example.com"

[transcription]
api_key = "gsk_file"
timeout_secs = 30

[logging]
json = true
"#
        )
        .unwrap();

        let config = load_file(file.path().to_str()).unwrap();
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.callback.base_url, "https://voice.example.com");
        assert_eq!(config.transcription.credential(), Some("gsk_file"));
        assert_eq!(config.transcription.timeout_secs, 30);
        assert_eq!(config.transcription.model, "whisper-large-v3");
        assert!(config.logging.json);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[server\nport = ").unwrap();

        let err = load_file(file.path().to_str()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn env_overrides_win() {
        let mut config = Config::default();
        apply_env_overrides(
            &mut config,
            overrides(&[
                ("GROQ_API_KEY", "gsk_env"),
                ("BASE_URL", "https://calls.example.org"),
                ("EXOVOICE_PORT", "8080"),
                ("EXOVOICE_HOST", "not-an-ip"),
                ("EXOVOICE_LOG_JSON", "1"),
            ]),
        );

        assert_eq!(config.transcription.credential(), Some("gsk_env"));
        assert_eq!(config.callback.base_url, "https://calls.example.org");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, default_host());
        assert!(config.logging.json);
    }

    #[test]
    fn blank_groq_key_enables_demo_mode() {
        let mut config = Config::default();
        config.transcription.api_key = Some("gsk_file".to_string());

        apply_env_overrides(&mut config, overrides(&[("GROQ_API_KEY", "")]));

        assert!(config.transcription.is_demo_mode());
    }
}
