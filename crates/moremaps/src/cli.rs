//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use moremaps_core::Gender;

/// Manage your `MoreMaps` account.
#[derive(Debug, Parser)]
#[command(name = "moremaps", version, about)]
pub struct Cli {
    /// Database file, overriding the settings file.
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Settings file to read.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Account commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a new account.
    Signup {
        /// Email address used to log in.
        #[arg(long)]
        email: String,
        /// Password: 8+ characters with upper, lower, digit and symbol.
        #[arg(long)]
        password: String,
        /// Given name.
        #[arg(long)]
        given_name: String,
        /// Family name.
        #[arg(long)]
        family_name: String,
        /// Gender.
        #[arg(long, value_enum)]
        gender: Option<GenderArg>,
    },
    /// Log in.
    Login {
        /// Email address.
        #[arg(long)]
        email: String,
        /// Password.
        #[arg(long)]
        password: String,
    },
    /// Log out of the active session.
    Logout,
    /// Delete the logged-in account and all of its data.
    DeleteAccount,
    /// Show the logged-in account.
    Whoami,
}

/// Gender values accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenderArg {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Other.
    Other,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Self::Male,
            GenderArg::Female => Self::Female,
            GenderArg::Other => Self::Other,
        }
    }
}
