use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while reading configuration
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be true or false, got {value:?}")]
    InvalidBool { name: &'static str, value: String },
    #[error("{name} must be a positive number, got {value:?}")]
    InvalidRate { name: &'static str, value: String },
    #[error("Cannot determine home directory for the default episode list")]
    NoHomeDir,
}

/// Application configuration
/// In debug builds a `.env` file is loaded first, then the environment is read.
#[derive(Clone, Debug)]
pub struct Config {
    /// JSON file holding the episode list shown in the app
    pub episodes_file: PathBuf,
    /// Start playback as soon as a newly selected episode is loaded
    pub autoplay: bool,
    /// Speed multiplier for the simulated clock used by the headless runner
    pub playback_rate: f64,
    /// Log filter used when RUST_LOG is not set
    pub log_filter: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        #[cfg(debug_assertions)]
        {
            // Tracing is usually not installed yet, the filter lives in here
            if dotenvy::dotenv().is_ok() {
                eprintln!("Config: loaded .env file");
            }
        }

        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let episodes_file = match lookup("PODCASTR_EPISODES_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_episodes_file()?,
        };

        let autoplay = match lookup("PODCASTR_AUTOPLAY") {
            Some(value) => parse_bool("PODCASTR_AUTOPLAY", &value)?,
            None => true,
        };

        let playback_rate = match lookup("PODCASTR_PLAYBACK_RATE") {
            Some(value) => match value.trim().parse::<f64>() {
                Ok(rate) if rate.is_finite() && rate > 0.0 => rate,
                _ => {
                    return Err(ConfigError::InvalidRate {
                        name: "PODCASTR_PLAYBACK_RATE",
                        value,
                    })
                }
            },
            None => 1.0,
        };

        let log_filter = lookup("PODCASTR_LOG").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            episodes_file,
            autoplay,
            playback_rate,
            log_filter,
        })
    }

    pub fn log_summary(&self) {
        info!(
            "Config: episodes={}, autoplay={}, playback_rate={}",
            self.episodes_file.display(),
            self.autoplay,
            self.playback_rate
        );
    }
}

fn default_episodes_file() -> Result<PathBuf, ConfigError> {
    let home_dir = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home_dir.join(".podcastr").join("episodes.json"))
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_explicit_values() {
        let config = Config::from_vars(vars(&[
            ("PODCASTR_EPISODES_FILE", "/tmp/episodes.json"),
            ("PODCASTR_AUTOPLAY", "False"),
            ("PODCASTR_PLAYBACK_RATE", "8"),
            ("PODCASTR_LOG", "podcastr=debug"),
        ]))
        .unwrap();

        assert_eq!(config.episodes_file, PathBuf::from("/tmp/episodes.json"));
        assert!(!config.autoplay);
        assert_eq!(config.playback_rate, 8.0);
        assert_eq!(config.log_filter, "podcastr=debug");
    }

    #[test]
    fn test_defaults() {
        let config =
            Config::from_vars(vars(&[("PODCASTR_EPISODES_FILE", "episodes.json")])).unwrap();
        assert!(config.autoplay);
        assert_eq!(config.playback_rate, 1.0);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_vars(vars(&[
            ("PODCASTR_EPISODES_FILE", "episodes.json"),
            ("PODCASTR_AUTOPLAY", "sometimes"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBool { .. }));

        let err = Config::from_vars(vars(&[
            ("PODCASTR_EPISODES_FILE", "episodes.json"),
            ("PODCASTR_PLAYBACK_RATE", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRate { .. }));
    }
}
