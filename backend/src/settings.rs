//! Server settings loaded via OrthoConfig from CLI flags and `RECIPE_*`
//! environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Runtime configuration for the `recipe-backend` binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECIPE")]
pub struct AppSettings {
    /// PostgreSQL connection URL, e.g. `postgres://app:secret@db/recipes`.
    pub database_url: Option<String>,
    /// Address to listen on.
    pub bind_host: Option<IpAddr>,
    /// Port to listen on.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
}

/// Error raised when a required setting is missing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{name} must be set (flag --{flag} or environment variable {env})")]
pub struct MissingSetting {
    name: &'static str,
    flag: &'static str,
    env: &'static str,
}

impl AppSettings {
    /// Database URL, which has no default.
    ///
    /// # Errors
    /// Returns [`MissingSetting`] when neither the flag nor the variable is set.
    pub fn database_url(&self) -> Result<&str, MissingSetting> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(MissingSetting {
                name: "database_url",
                flag: "database-url",
                env: "RECIPE_DATABASE_URL",
            })
    }

    /// Socket address built from host and port; the host defaults to `0.0.0.0`.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.bind_host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            self.port,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "RECIPE_DATABASE_URL",
        "RECIPE_BIND_HOST",
        "RECIPE_PORT",
        "RECIPE_DB_MAX_CONNECTIONS",
    ];

    fn load(args: &[&str]) -> AppSettings {
        let argv = std::iter::once("recipe-backend")
            .chain(args.iter().copied())
            .map(OsString::from);
        AppSettings::load_from_iter(argv).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load(&[]);

        assert_eq!(settings.bind_addr(), "0.0.0.0:8080".parse().expect("addr"));
        assert_eq!(settings.db_max_connections, 10);
        assert_eq!(
            settings.database_url().expect_err("no default").to_string(),
            "database_url must be set (flag --database-url or environment variable RECIPE_DATABASE_URL)"
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("RECIPE_DATABASE_URL", Some("postgres://localhost/recipes".to_owned())),
            ("RECIPE_BIND_HOST", Some("127.0.0.1".to_owned())),
            ("RECIPE_PORT", Some("9000".to_owned())),
            ("RECIPE_DB_MAX_CONNECTIONS", Some("4".to_owned())),
        ]);

        let settings = load(&[]);

        assert_eq!(
            settings.database_url().expect("url"),
            "postgres://localhost/recipes"
        );
        assert_eq!(settings.bind_addr(), "127.0.0.1:9000".parse().expect("addr"));
        assert_eq!(settings.db_max_connections, 4);
    }

    #[rstest]
    fn cli_flags_take_precedence_over_environment() {
        let _guard = lock_env([
            ("RECIPE_PORT", Some("9000".to_owned())),
            ("RECIPE_DATABASE_URL", None),
            ("RECIPE_BIND_HOST", None),
            ("RECIPE_DB_MAX_CONNECTIONS", None),
        ]);

        let settings = load(&["--port", "7000"]);

        assert_eq!(settings.port, 7000);
    }
}
