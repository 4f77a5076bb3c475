//! Client configuration.
//!
//! Settings are layered: `taskboard.toml`, then environment (including a
//! `.env` file), then command-line flags. Later layers win.
//!
//! ```toml
//! [api]
//! url = "http://localhost:9000"
//! timeout_secs = 30
//!
//! [board]
//! reload_policy = "discard-if-superseded"   # or "last-write-wins"
//!
//! [session]
//! path = "/home/me/.config/taskboard/session.json"
//!
//! [logging]
//! dir = "/home/me/.local/share/taskboard/logs"
//! json = false
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::board::ReloadPolicy;
use crate::gateway::DEFAULT_API_URL;

pub const ENV_API_URL: &str = "TASKBOARD_API_URL";
pub const ENV_SESSION: &str = "TASKBOARD_SESSION";
pub const ENV_RELOAD_POLICY: &str = "TASKBOARD_RELOAD_POLICY";

const APP_DIR: &str = "taskboard";
const CONFIG_FILE: &str = "taskboard.toml";
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSection {
    /// Backend base URL
    #[serde(default)]
    pub url: Option<String>,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardSection {
    #[serde(default)]
    pub reload_policy: ReloadPolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSection {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Directory for the rolling log file. No file is written when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Emit JSON lines instead of human-readable text
    #[serde(default)]
    pub json: bool,
}

/// The complete taskboard.toml structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskboardToml {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub board: BoardSection,
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl TaskboardToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse taskboard.toml")
    }

    /// Returns the default configuration if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize taskboard.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Some(url) = &self.api.url
            && !is_http_url(url)
        {
            warnings.push(format!(
                "Invalid api.url '{}': should start with http:// or https://",
                url
            ));
        }
        if self.api.timeout_secs == 0 {
            warnings.push("api.timeout_secs is 0; every request would time out".to_string());
        }

        warnings
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Platform config directory for the client, e.g. `~/.config/taskboard`.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join(CONFIG_FILE)
}

/// Resolved configuration: the file plus environment and CLI overrides.
#[derive(Debug, Clone)]
pub struct TaskboardConfig {
    pub config_path: PathBuf,
    pub toml: TaskboardToml,
    /// CLI override: `--api-url`
    pub cli_api_url: Option<String>,
    /// CLI override: `--verbose`
    pub verbose: bool,
}

impl TaskboardConfig {
    /// Load from `path`, or from the platform default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
        let toml = TaskboardToml::load_or_default(&config_path)?;
        Ok(Self {
            config_path,
            toml,
            cli_api_url: None,
            verbose: false,
        })
    }

    pub fn with_cli_args(path: Option<&Path>, api_url: Option<String>, verbose: bool) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.cli_api_url = api_url;
        config.verbose = verbose;
        Ok(config)
    }

    /// Backend base URL (CLI → env → file → default).
    pub fn api_url(&self) -> String {
        self.cli_api_url
            .clone()
            .or_else(|| non_empty_env(ENV_API_URL))
            .or_else(|| self.toml.api.url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.toml.api.timeout_secs)
    }

    /// Reload policy (env → file → default). An unparsable env value is
    /// ignored.
    pub fn reload_policy(&self) -> ReloadPolicy {
        non_empty_env(ENV_RELOAD_POLICY)
            .and_then(|v| v.parse().ok())
            .unwrap_or(self.toml.board.reload_policy)
    }

    /// Session file (env → file → `<config dir>/session.json`).
    pub fn session_path(&self) -> PathBuf {
        non_empty_env(ENV_SESSION)
            .map(PathBuf::from)
            .or_else(|| self.toml.session.path.clone())
            .unwrap_or_else(|| default_config_dir().join(SESSION_FILE))
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        self.toml.logging.dir.clone()
    }

    pub fn json_logs(&self) -> bool {
        self.toml.logging.json
    }

    pub fn validate(&self) -> Vec<String> {
        let mut warnings = self.toml.validate();
        if let Some(raw) = non_empty_env(ENV_RELOAD_POLICY)
            && let Err(e) = raw.parse::<ReloadPolicy>()
        {
            warnings.push(format!("{} ignored: {}", ENV_RELOAD_POLICY, e));
        }
        warnings
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Run `f` with the taskboard env vars cleared, restoring them after.
    fn without_env<T>(f: impl FnOnce() -> T) -> T {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let keys = [ENV_API_URL, ENV_SESSION, ENV_RELOAD_POLICY];
        let saved: Vec<_> = keys.iter().map(|k| (*k, std::env::var(k).ok())).collect();
        for k in keys {
            unsafe { std::env::remove_var(k) };
        }
        let result = f();
        for (k, v) in saved {
            match v {
                Some(v) => unsafe { std::env::set_var(k, v) },
                None => unsafe { std::env::remove_var(k) },
            }
        }
        result
    }

    #[test]
    fn test_parse_empty_gives_defaults() {
        let toml = TaskboardToml::parse("").unwrap();
        assert_eq!(toml.api.timeout_secs, 30);
        assert!(toml.api.url.is_none());
        assert_eq!(toml.board.reload_policy, ReloadPolicy::DiscardIfSuperseded);
        assert!(!toml.logging.json);
    }

    #[test]
    fn test_parse_full_file() {
        let content = r#"
[api]
url = "https://board.example.com"
timeout_secs = 5

[board]
reload_policy = "last-write-wins"

[session]
path = "/tmp/tb/session.json"

[logging]
dir = "/tmp/tb/logs"
json = true
"#;
        let toml = TaskboardToml::parse(content).unwrap();
        assert_eq!(toml.api.url.as_deref(), Some("https://board.example.com"));
        assert_eq!(toml.api.timeout_secs, 5);
        assert_eq!(toml.board.reload_policy, ReloadPolicy::LastWriteWins);
        assert_eq!(toml.session.path, Some(PathBuf::from("/tmp/tb/session.json")));
        assert!(toml.logging.json);
        assert!(toml.validate().is_empty());
    }

    #[test]
    fn test_unknown_policy_is_parse_error() {
        let content = "[board]\nreload_policy = \"whenever\"\n";
        assert!(TaskboardToml::parse(content).is_err());
    }

    #[test]
    fn test_validate_flags_bad_url_and_zero_timeout() {
        let content = "[api]\nurl = \"localhost:9000\"\ntimeout_secs = 0\n";
        let warnings = TaskboardToml::parse(content).unwrap().validate();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("Invalid api.url"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("taskboard.toml");
        let mut toml = TaskboardToml::default();
        toml.api.url = Some("http://10.0.0.2:9000".into());
        toml.save(&path).unwrap();

        let loaded = TaskboardToml::load(&path).unwrap();
        assert_eq!(loaded.api.url.as_deref(), Some("http://10.0.0.2:9000"));
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let config = TaskboardConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.toml.api.timeout_secs, 30);
    }

    #[test]
    fn test_api_url_layering() {
        without_env(|| {
            let dir = tempdir().unwrap();
            let path = dir.path().join("taskboard.toml");
            std::fs::write(&path, "[api]\nurl = \"http://from-file\"\n").unwrap();

            let config = TaskboardConfig::load(Some(&path)).unwrap();
            assert_eq!(config.api_url(), "http://from-file");

            unsafe { std::env::set_var(ENV_API_URL, "http://from-env") };
            assert_eq!(config.api_url(), "http://from-env");

            let config =
                TaskboardConfig::with_cli_args(Some(&path), Some("http://from-cli".into()), false)
                    .unwrap();
            assert_eq!(config.api_url(), "http://from-cli");
        });
    }

    #[test]
    fn test_default_api_url() {
        without_env(|| {
            let dir = tempdir().unwrap();
            let config = TaskboardConfig::load(Some(&dir.path().join("none.toml"))).unwrap();
            assert_eq!(config.api_url(), DEFAULT_API_URL);
        });
    }

    #[test]
    fn test_session_path_env_override() {
        without_env(|| {
            let dir = tempdir().unwrap();
            let config = TaskboardConfig::load(Some(&dir.path().join("none.toml"))).unwrap();
            assert!(config.session_path().ends_with("taskboard/session.json"));

            unsafe { std::env::set_var(ENV_SESSION, "/tmp/other.json") };
            assert_eq!(config.session_path(), PathBuf::from("/tmp/other.json"));
        });
    }

    #[test]
    fn test_reload_policy_env_override_and_warning() {
        without_env(|| {
            let dir = tempdir().unwrap();
            let config = TaskboardConfig::load(Some(&dir.path().join("none.toml"))).unwrap();

            unsafe { std::env::set_var(ENV_RELOAD_POLICY, "last-write-wins") };
            assert_eq!(config.reload_policy(), ReloadPolicy::LastWriteWins);

            unsafe { std::env::set_var(ENV_RELOAD_POLICY, "bogus") };
            assert_eq!(config.reload_policy(), ReloadPolicy::DiscardIfSuperseded);
            assert!(config.validate().iter().any(|w| w.contains("bogus")));
        });
    }
}
