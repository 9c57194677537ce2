mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::scoring::MetricScore;

/// Get the config directory path (~/.config/gem-filter/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("gem-filter"))
}

/// Get the default config file path (~/.config/gem-filter/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   and falls back to built-in defaults when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found at {}", p.display());
            }
            p
        }
        None => {
            let default_path = get_config_path()?;
            if !default_path.exists() {
                log::debug!(
                    "No config at {}, using defaults",
                    default_path.display()
                );
                return Ok(Config::default());
            }
            default_path
        }
    };

    parse_config_file(&config_path)
}

fn parse_config_file(config_path: &Path) -> Result<Config> {
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let mut config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;
    config.export_dir = config.export_dir.map(expand_home);

    log::debug!("Loaded config from {}", config_path.display());
    Ok(config)
}

/// Replace a leading `~` with the home directory
fn expand_home(path: PathBuf) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path;
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path,
    }
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(value) = config.default_metric {
        if !(MetricScore::MIN..=MetricScore::MAX).contains(&value) {
            errors.push(format!(
                "default_metric: {} is outside {}-{}",
                value,
                MetricScore::MIN,
                MetricScore::MAX
            ));
        }
    }

    if let Some(ref dir) = config.export_dir {
        if dir.exists() && !dir.is_dir() {
            errors.push(format!(
                "export_dir: {} exists but is not a directory",
                dir.display()
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl Config {
    /// Initial slider value for new scorecard entries
    pub fn starting_metric(&self) -> MetricScore {
        self.default_metric
            .map(|v| MetricScore::clamped(v as i64))
            .unwrap_or_default()
    }
}
