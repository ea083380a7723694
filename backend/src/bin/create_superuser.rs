//! Create an active staff superuser account.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::sync::Arc;

use backend::domain::AccountService;
use backend::domain::ports::{AccountCommand, RegisterUserRequest};
use backend::domain::{EmailAddress, PersonName, PlainPassword};
use backend::outbound::credentials::Argon2PasswordHasher;
use backend::outbound::persistence::{
    DbPool, DieselAuthTokenRepository, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use tokio::runtime::Builder;

const DATABASE_URL_ENV: &str = "RECIPE_DATABASE_URL";

/// `create-superuser` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-superuser",
    about = "Create an active staff superuser account",
    version
)]
struct CliArgs {
    /// Login email; stored lowercased.
    #[arg(long, value_name = "email")]
    email: String,
    /// Initial password.
    #[arg(long, value_name = "password")]
    password: String,
    /// Display name.
    #[arg(long, value_name = "name", default_value = "")]
    name: String,
    /// Database connection URL. Falls back to `RECIPE_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main(CliArgs::parse()))
}

async fn async_main(args: CliArgs) -> Result<()> {
    let request = build_request(&args)?;
    let database_url = resolve_database_url(args.database_url, env::var(DATABASE_URL_ENV).ok())?;

    run_pending_migrations(&database_url)
        .await
        .wrap_err("database migrations failed")?;
    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(1))
        .await
        .wrap_err("create database pool")?;

    let accounts = AccountService::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselAuthTokenRepository::new(pool)),
        Arc::new(Argon2PasswordHasher::default()),
        Arc::new(DefaultClock),
    );
    let user = accounts
        .register_superuser(request)
        .await
        .map_err(|err| eyre!("create superuser failed: {}", err.message()))?;

    println!("created superuser {} ({})", user.email(), user.id());
    Ok(())
}

fn build_request(args: &CliArgs) -> Result<RegisterUserRequest> {
    Ok(RegisterUserRequest {
        email: EmailAddress::new(&args.email).wrap_err("invalid --email")?,
        password: PlainPassword::new(&args.password).wrap_err("invalid --password")?,
        name: PersonName::new(&args.name).wrap_err("invalid --name")?,
    })
}

fn resolve_database_url(explicit: Option<String>, from_env: Option<String>) -> Result<String> {
    explicit
        .or(from_env)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| eyre!("database URL missing: set --database-url or {DATABASE_URL_ENV}"))
}

#[cfg(test)]
mod tests {
    //! Unit tests for argument handling.

    use rstest::rstest;

    use super::{CliArgs, build_request, resolve_database_url};
    use clap::Parser;

    fn args(extra: &[&str]) -> CliArgs {
        let argv = ["create-superuser", "--email", "Admin@Example.com"]
            .into_iter()
            .chain(extra.iter().copied());
        CliArgs::try_parse_from(argv).expect("arguments parse")
    }

    #[rstest]
    fn request_normalises_the_email() {
        let request = build_request(&args(&["--password", "secret1"])).expect("valid request");
        assert_eq!(request.email.as_ref(), "admin@example.com");
        assert_eq!(request.name.as_ref(), "");
    }

    #[rstest]
    fn short_passwords_are_rejected_before_connecting() {
        let error = build_request(&args(&["--password", "pw"])).expect_err("too short");
        assert!(error.to_string().contains("--password"));
    }

    #[rstest]
    #[case(Some("postgres://cli"), Some("postgres://env"), Some("postgres://cli"))]
    #[case(None, Some("postgres://env"), Some("postgres://env"))]
    #[case(Some("  "), None, None)]
    #[case(None, None, None)]
    fn database_url_prefers_the_flag(
        #[case] explicit: Option<&str>,
        #[case] from_env: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let resolved =
            resolve_database_url(explicit.map(str::to_owned), from_env.map(str::to_owned)).ok();
        assert_eq!(resolved.as_deref(), expected);
    }
}
