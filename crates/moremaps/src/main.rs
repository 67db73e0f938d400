//! `MoreMaps` - account management from the command line.
//!
//! Wires settings, logging and the `SQLite` stores to the account service.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;
mod settings;

use std::path::Path;

use anyhow::{Context, bail};
use clap::Parser;
use moremaps_core::{
    AccountDeletion, AccountService, NewAccount, PoiRepository, PreferenceRepository,
    RouteRepository, SqliteAccountStore, VehicleRepository,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moremaps=info,moremaps_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings_path = cli.config.clone().unwrap_or_else(settings::settings_path);
    let settings = settings::load_settings(&settings_path)
        .await
        .with_context(|| format!("reading settings from {}", settings_path.display()))?;

    let database = cli.database.clone().unwrap_or_else(|| settings.database_path());
    if let Some(parent) = database.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let database = path_str(&database)?;
    info!("Using database {database}");

    let config = settings
        .store_config()
        .with_context(|| format!("invalid settings in {}", settings_path.display()))?;
    let store = SqliteAccountStore::new(database).await?.with_config(config);
    let service = AccountService::new(store);

    run(cli.command, &service, database).await
}

async fn run(
    command: Command,
    service: &AccountService<SqliteAccountStore>,
    database: &str,
) -> anyhow::Result<()> {
    match command {
        Command::Signup {
            email,
            password,
            given_name,
            family_name,
            gender,
        } => {
            let mut request = NewAccount::new(email, given_name, family_name);
            request.gender = gender.map(Into::into);
            let account = service.sign_up(&request, &password).await?;
            println!("Created account {} for {}", account.id, account.email);
        }
        Command::Login { email, password } => {
            if !service.login(&email, &password).await? {
                bail!("wrong password for {email}");
            }
            println!("Logged in as {email}");
        }
        Command::Logout => {
            service.logout().await?;
            println!("Logged out");
        }
        Command::DeleteAccount => {
            let pois = PoiRepository::new(database).await?;
            let vehicles = VehicleRepository::new(database).await?;
            let routes = RouteRepository::new(database).await?;
            let preferences = PreferenceRepository::new(database).await?;

            let report = AccountDeletion::new(service)
                .with(&pois)
                .with(&vehicles)
                .with(&routes)
                .with(&preferences)
                .run()
                .await?;
            println!(
                "Deleted account {} and {} saved items",
                report.account.email,
                report.total_removed()
            );
        }
        Command::Whoami => {
            let account = service.current_account().await?;
            println!(
                "{} <{}> ({})",
                account.full_name(),
                account.email,
                account.id
            );
        }
    }

    Ok(())
}

fn path_str(path: &Path) -> anyhow::Result<&str> {
    path.to_str()
        .with_context(|| format!("database path {} is not valid UTF-8", path.display()))
}
