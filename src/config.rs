// Configuración del servidor leída del entorno (y de `.env` si existe).
use std::env;
use tracing::warn;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `CREDITSHIFT_BIND`
    pub bind_addr: String,
    /// `CREDITSHIFT_MAX_SEARCHES`: searches allowed to run at once.
    pub max_searches: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND.to_string(),
            max_searches: std::cmp::max(1, num_cpus::get()),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Invalid values fall
    /// back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(bind) = lookup("CREDITSHIFT_BIND") {
            if bind.trim().is_empty() {
                warn!("CREDITSHIFT_BIND is empty, using {}", DEFAULT_BIND);
            } else {
                config.bind_addr = bind.trim().to_string();
            }
        }
        if let Some(raw) = lookup("CREDITSHIFT_MAX_SEARCHES") {
            match raw.trim().parse::<usize>() {
                Ok(n) if n >= 1 => config.max_searches = n,
                _ => warn!(
                    value = %raw,
                    fallback = config.max_searches,
                    "CREDITSHIFT_MAX_SEARCHES must be a positive integer"
                ),
            }
        }
        config
    }
}
