//! Configuration: `relay.ron` file, then environment, then command-line flags.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::LevelFilter;
use relay_core::DEFAULT_STREAM_EVENT;
use relay_engine::{EnvTokenProvider, HttpTokenProvider, RelaySettings, TokenProvider};
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "relay.ron";
pub const DEFAULT_TOKEN_ENV: &str = "RELAY_TOKEN";

#[derive(Debug, Parser)]
#[command(name = "relay_app", version)]
#[command(about = "Subscribe to a relay channel and accumulate its streamed content", long_about = None)]
pub struct Cli {
    /// RON config file; `relay.ron` in the working directory is used when present
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Relay hostname or ws:// / wss:// URL
    #[arg(long, env = "RELAY_SERVER")]
    pub server: Option<String>,

    /// Application id presented to the relay
    #[arg(long = "app-id", env = "RELAY_APP_ID")]
    pub app_id: Option<String>,

    /// Channel to subscribe to
    #[arg(long, env = "RELAY_CHANNEL")]
    pub channel: Option<String>,

    /// Event whose payloads are appended to the output
    #[arg(long = "stream-event", env = "RELAY_STREAM_EVENT")]
    pub stream_event: Option<String>,

    /// Fetch a fresh session token from this URL before every connect
    #[arg(long = "token-url", env = "RELAY_TOKEN_URL")]
    pub token_url: Option<String>,

    /// Environment variable holding the session token (default RELAY_TOKEN)
    #[arg(long = "token-env")]
    pub token_env: Option<String>,

    /// Connect at startup instead of waiting for `connect`
    #[arg(long)]
    pub connect: bool,

    /// Write the accumulated content to this file on exit
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// off, error, warn, info, debug or trace
    #[arg(long = "log-level", env = "RELAY_LOG")]
    pub log_level: Option<String>,

    /// Also write logs to this file
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// With --log-file, keep log lines off the terminal
    #[arg(long = "log-file-only")]
    pub log_file_only: bool,
}

/// Contents of the optional RON config file. Every field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: Option<String>,
    pub app_id: Option<String>,
    pub channel: Option<String>,
    pub stream_event: Option<String>,
    pub site_revision: Option<String>,
    pub token_url: Option<String>,
    pub token_env: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub auto_connect: Option<bool>,
    pub save: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// Token endpoint URL.
    Http(String),
    /// Environment variable name.
    Env(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub relay: RelaySettings,
    pub stream_event: String,
    pub token_source: TokenSource,
    pub auto_connect: bool,
    pub save_path: Option<PathBuf>,
    pub log_level: LevelFilter,
    pub log_destination: LogDestination,
}

impl AppConfig {
    pub fn token_provider(&self) -> Result<Arc<dyn TokenProvider>> {
        match &self.token_source {
            TokenSource::Http(url) => {
                let provider = HttpTokenProvider::new(url, self.relay.connect_timeout)
                    .context("invalid token url")?;
                Ok(Arc::new(provider))
            }
            TokenSource::Env(var) => Ok(Arc::new(EnvTokenProvider::new(var.clone()))),
        }
    }
}

/// Reads the config file. An explicitly named file must exist; the default
/// `relay.ron` is optional.
pub fn load_file(path: Option<&Path>) -> Result<FileConfig> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if !required && err.kind() == io::ErrorKind::NotFound => {
            return Ok(FileConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("reading config {}", path.display()));
        }
    };
    parse_file(&text).with_context(|| format!("parsing config {}", path.display()))
}

pub fn parse_file(text: &str) -> Result<FileConfig> {
    Ok(ron::from_str(text)?)
}

/// Layers flags (which already include environment values) over the file.
pub fn resolve(cli: Cli, file: FileConfig) -> Result<AppConfig> {
    let defaults = RelaySettings::default();
    let relay = RelaySettings {
        server: cli.server.or(file.server).unwrap_or(defaults.server),
        app_id: cli.app_id.or(file.app_id).unwrap_or_default(),
        channel: cli.channel.or(file.channel).unwrap_or_default(),
        site_revision: file.site_revision.unwrap_or(defaults.site_revision),
        connect_timeout: file
            .connect_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.connect_timeout),
    };

    let log_level = match cli.log_level.or(file.log_level) {
        Some(name) => relay_logging::parse_level(&name)
            .ok_or_else(|| anyhow!("unknown log level {name:?}"))?,
        None => LevelFilter::Info,
    };

    let token_source = match cli.token_url.or(file.token_url) {
        Some(url) => TokenSource::Http(url),
        None => TokenSource::Env(
            cli.token_env
                .or(file.token_env)
                .unwrap_or_else(|| DEFAULT_TOKEN_ENV.to_string()),
        ),
    };

    Ok(AppConfig {
        relay,
        stream_event: cli
            .stream_event
            .or(file.stream_event)
            .unwrap_or_else(|| DEFAULT_STREAM_EVENT.to_string()),
        token_source,
        auto_connect: cli.connect || file.auto_connect.unwrap_or(false),
        save_path: cli.save.or(file.save),
        log_level,
        log_destination: LogDestination::from_options(
            cli.log_file.or(file.log_file),
            cli.log_file_only,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["relay_app"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("valid args")
    }

    const SAMPLE: &str = r#"(
        server: Some("relay.example.com"),
        app_id: Some("app-from-file"),
        channel: Some("chan-from-file"),
        site_revision: Some("7"),
        connect_timeout_secs: Some(3),
        auto_connect: Some(true),
        log_level: Some("debug"),
    )"#;

    #[test]
    fn parses_partial_ron_file() {
        let file = parse_file(SAMPLE).unwrap();
        assert_eq!(file.server.as_deref(), Some("relay.example.com"));
        assert_eq!(file.connect_timeout_secs, Some(3));
        assert_eq!(file.token_url, None);
        assert_eq!(parse_file("()").unwrap(), FileConfig::default());
    }

    #[test]
    fn flags_override_file_values() {
        let file = parse_file(SAMPLE).unwrap();
        let config = resolve(
            cli(&["--channel", "chan-from-flag", "--log-level", "warn"]),
            file,
        )
        .unwrap();

        assert_eq!(config.relay.server, "relay.example.com");
        assert_eq!(config.relay.app_id, "app-from-file");
        assert_eq!(config.relay.channel, "chan-from-flag");
        assert_eq!(config.relay.site_revision, "7");
        assert_eq!(config.relay.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.log_level, LevelFilter::Warn);
        assert!(config.auto_connect);
        assert_eq!(config.stream_event, DEFAULT_STREAM_EVENT);
    }

    #[test]
    fn token_url_wins_over_token_env() {
        let file = FileConfig {
            token_env: Some("MY_TOKEN".to_string()),
            ..FileConfig::default()
        };
        let config = resolve(cli(&[]), file.clone()).unwrap();
        assert_eq!(config.token_source, TokenSource::Env("MY_TOKEN".to_string()));

        let config = resolve(cli(&["--token-url", "https://auth.example.com/token"]), file).unwrap();
        assert_eq!(
            config.token_source,
            TokenSource::Http("https://auth.example.com/token".to_string())
        );
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let config = resolve(cli(&[]), FileConfig::default()).unwrap();
        assert_eq!(config.token_source, TokenSource::Env(DEFAULT_TOKEN_ENV.to_string()));
        assert_eq!(config.relay.site_revision, "1");
        assert_eq!(config.log_destination, LogDestination::Terminal);
        assert!(config.save_path.is_none());
    }

    #[test]
    fn unknown_log_level_is_an_error() {
        assert!(resolve(cli(&["--log-level", "chatty"]), FileConfig::default()).is_err());
    }

    #[test]
    fn explicit_config_file_must_exist() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("absent.ron");
        assert!(load_file(Some(&missing)).is_err());

        let present = temp.path().join("relay.ron");
        fs::write(&present, SAMPLE).unwrap();
        let file = load_file(Some(&present)).unwrap();
        assert_eq!(file.channel.as_deref(), Some("chan-from-file"));
    }
}
