//! Connector configuration.
//!
//! Registry-wide defaults for handle construction. Individual connection
//! descriptors may override any of these per logical connection.

/// Defaults applied when a connection descriptor leaves a field unset.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// Database used when neither the descriptor nor its connection string
    /// names one.
    pub default_database: String,
    /// Upper bound of the driver connection pool per handle.
    pub max_pool_size: u32,
    /// Lower bound of the driver connection pool per handle.
    pub min_pool_size: u32,
    /// TCP connect timeout, in seconds.
    pub connect_timeout_secs: u64,
    /// Server selection timeout, in seconds.
    pub server_selection_timeout_secs: u64,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            default_database: "test".to_string(),
            max_pool_size: 10,
            min_pool_size: 0,
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 30,
        }
    }
}

impl ConnectorConfig {
    /// Loads the configuration from `MONGODB_*` environment variables,
    /// falling back to the defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_database: std::env::var("MONGODB_DEFAULT_DATABASE")
                .unwrap_or(defaults.default_database),
            max_pool_size: env_parse("MONGODB_MAX_POOL_SIZE", defaults.max_pool_size),
            min_pool_size: env_parse("MONGODB_MIN_POOL_SIZE", defaults.min_pool_size),
            connect_timeout_secs: env_parse(
                "MONGODB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            ),
            server_selection_timeout_secs: env_parse(
                "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
                defaults.server_selection_timeout_secs,
            ),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
