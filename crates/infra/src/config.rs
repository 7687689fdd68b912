//! Process configuration, read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use jobscroll_core::PageSize;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid value: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("{0} must be set when USE_PERSISTENT_STORES=true")]
    Missing(&'static str),
}

/// Which store backs the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSettings {
    InMemory {
        seed_file: Option<PathBuf>,
    },
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub listen_addr: SocketAddr,
    pub store: StoreSettings,
    pub default_page_size: PageSize,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen_addr: SocketAddr = get("JOBSCROLL_LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .trim()
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                var: "JOBSCROLL_LISTEN_ADDR",
                reason: e.to_string(),
            })?;

        let use_persistent = get("USE_PERSISTENT_STORES")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let store = if use_persistent {
            let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
            let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
                Some(raw) => raw
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| ConfigError::Invalid {
                        var: "DATABASE_MAX_CONNECTIONS",
                        reason: format!("expected a positive integer, got `{raw}`"),
                    })?,
                None => DEFAULT_MAX_CONNECTIONS,
            };
            StoreSettings::Postgres {
                database_url,
                max_connections,
            }
        } else {
            StoreSettings::InMemory {
                seed_file: get("JOBSCROLL_SEED_FILE").map(PathBuf::from),
            }
        };

        let default_page_size = PageSize::clamped(
            get("JOBSCROLL_DEFAULT_PAGE_SIZE").and_then(|v| v.trim().parse().ok()),
            PageSize::DEFAULT,
        );

        Ok(Self {
            listen_addr,
            store,
            default_page_size,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            store: StoreSettings::InMemory { seed_file: None },
            default_page_size: PageSize::DEFAULT,
        }
    }
}
