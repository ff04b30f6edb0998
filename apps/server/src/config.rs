//! Server configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use memory_core::{Difficulty, Glossary, GlossaryError, SessionError};
use thiserror::Error;

use crate::services::host::HostTiming;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("Failed to read glossary {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid glossary {path}: {source}")]
    Glossary {
        path: PathBuf,
        source: GlossaryError,
    },

    #[error("Glossary cannot serve every difficulty: {0}")]
    Coverage(#[from] SessionError),
}

/// Runtime settings for the game server.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_filter: String,
    pub glossary_path: Option<PathBuf>,
    pub seed: Option<u64>,
    pub resolution_delay: Duration,
    pub tick_interval: Duration,
}

impl Config {
    /// Read configuration from environment variables.
    ///
    /// Optional env vars:
    /// - HOST, PORT: Listen address (default 0.0.0.0:3000)
    /// - RUST_LOG: Log filter (default "info")
    /// - MEMORY_GLOSSARY_PATH: Markdown glossary replacing the built-in one
    /// - MEMORY_SEED: Seed for reproducible decks
    /// - MEMORY_RESOLUTION_DELAY_MS, MEMORY_TICK_INTERVAL_MS: Timer periods (default 1000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 3000)?;
        let log_filter = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());
        let glossary_path = lookup("MEMORY_GLOSSARY_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let seed = match lookup("MEMORY_SEED") {
            Some(value) => Some(value.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "MEMORY_SEED",
                value,
            })?),
            None => None,
        };

        let resolution_delay = positive_millis(&lookup, "MEMORY_RESOLUTION_DELAY_MS")?;
        let tick_interval = positive_millis(&lookup, "MEMORY_TICK_INTERVAL_MS")?;

        Ok(Self {
            host,
            port,
            log_filter,
            glossary_path,
            seed,
            resolution_delay,
            tick_interval,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timing(&self) -> HostTiming {
        HostTiming {
            resolution_delay: self.resolution_delay,
            tick_interval: self.tick_interval,
        }
    }

    /// Load the configured glossary and check it can deal every difficulty.
    pub fn load_glossary(&self) -> Result<Glossary, ConfigError> {
        let glossary = match &self.glossary_path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                Glossary::from_markdown(&content).map_err(|source| ConfigError::Glossary {
                    path: path.clone(),
                    source,
                })?
            }
            None => Glossary::builtin(),
        };

        for difficulty in Difficulty::ALL {
            glossary.pairs_for(difficulty)?;
        }
        Ok(glossary)
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn positive_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Duration, ConfigError> {
    let millis: u64 = parse_or(lookup, key, 1000)?;
    if millis == 0 {
        return Err(ConfigError::Invalid {
            key,
            value: millis.to_string(),
        });
    }
    Ok(Duration::from_millis(millis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.addr(), "0.0.0.0:3000");
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.glossary_path, None);
        assert_eq!(config.seed, None);
        assert_eq!(config.timing(), HostTiming::default());
    }

    #[test]
    fn overrides() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("MEMORY_SEED", "13485"),
            ("MEMORY_RESOLUTION_DELAY_MS", "250"),
            ("MEMORY_GLOSSARY_PATH", "/tmp/glossary.md"),
        ])
        .unwrap();
        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(config.seed, Some(13485));
        assert_eq!(config.resolution_delay, Duration::from_millis(250));
        assert_eq!(config.tick_interval, Duration::from_secs(1));
        assert_eq!(config.glossary_path, Some(PathBuf::from("/tmp/glossary.md")));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config_from(&[("PORT", "http")]),
            Err(ConfigError::Invalid { key: "PORT", .. })
        ));
        assert!(matches!(
            config_from(&[("MEMORY_SEED", "-1")]),
            Err(ConfigError::Invalid { key: "MEMORY_SEED", .. })
        ));
        assert!(matches!(
            config_from(&[("MEMORY_TICK_INTERVAL_MS", "0")]),
            Err(ConfigError::Invalid { key: "MEMORY_TICK_INTERVAL_MS", .. })
        ));
    }

    #[test]
    fn builtin_glossary_by_default() {
        let glossary = config_from(&[]).unwrap().load_glossary().unwrap();
        assert_eq!(glossary, Glossary::builtin());
    }

    #[test]
    fn missing_glossary_file_is_reported() {
        let config = config_from(&[("MEMORY_GLOSSARY_PATH", "/nonexistent/glossary.md")]).unwrap();
        assert!(matches!(config.load_glossary(), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn short_glossary_file_is_rejected() {
        let path = std::env::temp_dir().join(format!("memory-glossary-{}.md", std::process::id()));
        std::fs::write(&path, "ID: 1\nT: CAPA\nD: Actions correctives").unwrap();

        let config = Config {
            glossary_path: Some(path.clone()),
            ..config_from(&[]).unwrap()
        };
        let result = config.load_glossary();
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigError::Coverage(_))));
    }
}
