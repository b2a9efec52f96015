//! Configuration management.
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! environment variables prefixed with `PAPER_BATCH` (sections separated by
//! `__`, e.g. `PAPER_BATCH_FETCH__TIMEOUT_SECS=30`). Command-line flags are
//! applied on top by the binary.
//!
//! ```toml
//! [paths]
//! input = "papers.csv"
//! output_dir = "out/batches"
//!
//! [fetch]
//! timeout_secs = 20
//! max_bytes = 200000
//! user_agent = "Mozilla/5.0"
//! concurrency = 1
//!
//! [batch]
//! size = 20
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "PAPER_BATCH";

/// Name of the config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "paper-batch.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Input and output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Page fetch settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Batch windowing
    #[serde(default)]
    pub batch: BatchConfig,
}

impl Config {
    /// Check that numeric settings are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Invalid("fetch.timeout_secs must be > 0".into()));
        }
        if self.fetch.max_bytes == 0 {
            return Err(ConfigError::Invalid("fetch.max_bytes must be > 0".into()));
        }
        if self.fetch.concurrency == 0 {
            return Err(ConfigError::Invalid("fetch.concurrency must be > 0".into()));
        }
        if self.batch.size == 0 {
            return Err(ConfigError::Invalid("batch.size must be > 0".into()));
        }
        Ok(())
    }
}

/// File locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Paper table (CSV with a header row)
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Directory receiving `batch_NNN.json` files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_input() -> PathBuf {
    PathBuf::from("papers.csv")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out").join("batches")
}

/// Page fetch settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of body bytes read per page
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Number of pages fetched at once (1 = one after another)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_bytes: default_max_bytes(),
            user_agent: default_user_agent(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_max_bytes() -> usize {
    200_000
}

fn default_user_agent() -> String {
    // Several publishers reject requests without a browser-like agent
    "Mozilla/5.0".to_string()
}

fn default_concurrency() -> usize {
    1
}

/// Batch windowing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Rows per batch
    #[serde(default = "default_batch_size")]
    pub size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            size: default_batch_size(),
        }
    }
}

fn default_batch_size() -> usize {
    20
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Load configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: Config = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Find a config file in the working directory or the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("paper-batch").join("config.toml"))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // Tests that read the environment hold this while loading
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.paths.input, PathBuf::from("papers.csv"));
        assert_eq!(config.paths.output_dir, PathBuf::from("out/batches"));
        assert_eq!(config.fetch.timeout_secs, 20);
        assert_eq!(config.fetch.max_bytes, 200_000);
        assert_eq!(config.fetch.user_agent, "Mozilla/5.0");
        assert_eq!(config.fetch.concurrency, 1);
        assert_eq!(config.batch.size, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempdir().unwrap();
        let path = dir.path().join("paper-batch.toml");
        std::fs::write(
            &path,
            r#"
[paths]
input = "/data/papers.csv"

[fetch]
timeout_secs = 45
concurrency = 4
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.paths.input, PathBuf::from("/data/papers.csv"));
        assert_eq!(config.paths.output_dir, PathBuf::from("out/batches"));
        assert_eq!(config.fetch.timeout_secs, 45);
        assert_eq!(config.fetch.concurrency, 4);
        assert_eq!(config.fetch.max_bytes, 200_000);
        assert_eq!(config.batch.size, 20);
    }

    #[test]
    fn test_env_overrides_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempdir().unwrap();
        let path = dir.path().join("paper-batch.toml");
        std::fs::write(&path, "[fetch]\ntimeout_secs = 30\n").unwrap();

        std::env::set_var("PAPER_BATCH_FETCH__TIMEOUT_SECS", "45");
        std::env::set_var("PAPER_BATCH_BATCH__SIZE", "7");
        let with_file = load_config(Some(&path));
        let without_file = load_config(None);
        std::env::remove_var("PAPER_BATCH_FETCH__TIMEOUT_SECS");
        std::env::remove_var("PAPER_BATCH_BATCH__SIZE");

        let config = with_file.unwrap();
        assert_eq!(config.fetch.timeout_secs, 45);
        assert_eq!(config.batch.size, 7);
        assert_eq!(config.fetch.max_bytes, 200_000);

        let config = without_file.unwrap();
        assert_eq!(config.fetch.timeout_secs, 45);
        assert_eq!(config.batch.size, 7);
    }

    #[test]
    fn test_load_config_rejects_zero_values() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempdir().unwrap();
        let path = dir.path().join("paper-batch.toml");
        std::fs::write(&path, "[batch]\nsize = 0\n").unwrap();

        let result = load_config(Some(&path));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_config_missing_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let result = load_config(Some(Path::new("/nonexistent/paper-batch.toml")));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");
        std::fs::write(&path, "invalid = toml = content").unwrap();

        assert!(load_config(Some(&path)).is_err());
    }
}
