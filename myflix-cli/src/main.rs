//! MyFlix CLI - browse movies and manage favorites from the terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{account, catalog, config, favorites, logs, profile, AlreadyReported};

/// MyFlix - movie catalog and favorites in your terminal
#[derive(Parser)]
#[command(name = "myflix", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    Register {
        /// Username (prompted if omitted)
        #[arg(long)]
        username: Option<String>,
        /// Email address (prompted if omitted)
        #[arg(long)]
        email: Option<String>,
        /// Birthday (YYYY-MM-DD)
        #[arg(long)]
        birthday: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in and store the session
    Login {
        /// Username (prompted if omitted)
        #[arg(long)]
        username: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Forget the stored session
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or edit your profile
    Profile {
        #[command(subcommand)]
        command: profile::ProfileCommands,
    },

    /// Delete your account and log out
    DeleteAccount {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all movies
    Movies {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a movie by title
    Movie {
        /// Movie title
        title: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a genre by name
    Genre {
        /// Genre name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a director by name
    Director {
        /// Director name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List your favorite movies
    Favorites {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change your favorite movies
    Favorite {
        #[command(subcommand)]
        command: favorites::FavoriteCommands,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },

    /// View and manage the diagnostic log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.downcast_ref::<AlreadyReported>().is_none() {
                output::error(&e.to_string());
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Register { username, email, birthday, json } => {
            account::register(username, email, birthday, json).await
        }
        Commands::Login { username, json } => account::login(username, json).await,
        Commands::Logout { json } => account::logout(json),
        Commands::Profile { command } => profile::run(command).await,
        Commands::DeleteAccount { force, json } => account::delete_account(force, json).await,
        Commands::Movies { json } => catalog::movies(json).await,
        Commands::Movie { title, json } => catalog::movie(&title, json).await,
        Commands::Genre { name, json } => catalog::genre(&name, json).await,
        Commands::Director { name, json } => catalog::director(&name, json).await,
        Commands::Favorites { json } => favorites::list(json).await,
        Commands::Favorite { command } => favorites::run(command).await,
        Commands::Config { command } => config::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
