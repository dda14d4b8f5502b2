//! Apply or list the account store schema migrations.
//!
//! Connection settings come from `ACCOUNTS_DB_*` (see
//! [`accounts::config::PersistenceSettings`]).
//!
//! # Examples
//! ```sh
//! ACCOUNTS_DB_URL=postgres://localhost/accounts cargo run --bin accounts-migrate -- --list
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;

use accounts::config::PersistenceSettings;
use accounts::outbound::persistence::migrations::{pending_migrations, run_pending_migrations};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `accounts-migrate` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "accounts-migrate",
    about = "Apply the embedded account store migrations",
    version
)]
struct CliArgs {
    /// Print pending migrations without applying them.
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings = PersistenceSettings::load_from_iter([OsString::from("accounts-migrate")])
        .map_err(|err| eyre!("failed to load persistence settings: {err}"))?;

    if args.list {
        let pending = pending_migrations(&settings.url).wrap_err("failed to list migrations")?;
        for name in &pending {
            println!("{name}");
        }
        info!(count = pending.len(), "listed pending migrations");
        return Ok(());
    }

    let applied = run_pending_migrations(&settings.url).wrap_err("failed to apply migrations")?;
    for version in &applied {
        println!("applied {version}");
    }
    Ok(())
}
