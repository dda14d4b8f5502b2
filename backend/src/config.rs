//! Persistence configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

/// Database settings for the account store.
///
/// Read from `ACCOUNTS_DB_*` environment variables or a configuration file.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ACCOUNTS_DB")]
pub struct PersistenceSettings {
    /// PostgreSQL connection URL.
    pub url: String,
    /// Maximum number of pooled connections.
    #[ortho_config(default = 10)]
    pub max_size: u32,
    /// Idle connections kept open.
    #[ortho_config(default = 2)]
    pub min_idle: u32,
    /// Seconds to wait for a pooled connection before failing.
    #[ortho_config(default = 30)]
    pub connection_timeout_secs: u64,
}

impl PersistenceSettings {
    /// Pool configuration matching these settings.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(self.url.as_str())
            .with_max_size(self.max_size)
            .with_min_idle(Some(self.min_idle))
            .with_connection_timeout(Duration::from_secs(self.connection_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for persistence configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> Result<PersistenceSettings, impl std::fmt::Debug> {
        PersistenceSettings::load_from_iter([OsString::from("accounts")])
    }

    #[rstest]
    fn defaults_fill_everything_but_the_url() {
        let _guard = lock_env([
            ("ACCOUNTS_DB_URL", Some("postgres://localhost/accounts".to_owned())),
            ("ACCOUNTS_DB_MAX_SIZE", None::<String>),
            ("ACCOUNTS_DB_MIN_IDLE", None::<String>),
            ("ACCOUNTS_DB_CONNECTION_TIMEOUT_SECS", None::<String>),
        ]);

        let settings = load_from_empty_args().expect("config should load");

        assert_eq!(settings.url, "postgres://localhost/accounts");
        assert_eq!(settings.max_size, 10);
        assert_eq!(settings.min_idle, 2);
        assert_eq!(settings.connection_timeout_secs, 30);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("ACCOUNTS_DB_URL", Some("postgres://db/accounts".to_owned())),
            ("ACCOUNTS_DB_MAX_SIZE", Some("4".to_owned())),
            ("ACCOUNTS_DB_MIN_IDLE", Some("0".to_owned())),
            ("ACCOUNTS_DB_CONNECTION_TIMEOUT_SECS", Some("5".to_owned())),
        ]);

        let config = load_from_empty_args()
            .expect("config should load")
            .pool_config();

        assert_eq!(config.database_url(), "postgres://db/accounts");
        assert_eq!(config.max_size(), 4);
        assert_eq!(config.min_idle(), Some(0));
        assert_eq!(config.connection_timeout(), Duration::from_secs(5));
    }

    #[rstest]
    fn missing_url_fails_to_load() {
        let _guard = lock_env([("ACCOUNTS_DB_URL", None::<String>)]);

        assert!(load_from_empty_args().is_err());
    }
}
