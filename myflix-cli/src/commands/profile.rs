//! Profile commands - show and edit the current user

use anyhow::Result;
use clap::Subcommand;
use dialoguer::Password;

use myflix_core::ProfileUpdate;

use super::account::parse_birthday;
use super::{get_context_for, hint_if_logged_out, print_json};
use crate::output::{self, with_spinner};

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the current user's profile
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update profile fields
    Edit {
        /// New username
        #[arg(long)]
        username: Option<String>,
        /// New email address
        #[arg(long)]
        email: Option<String>,
        /// New birthday (YYYY-MM-DD)
        #[arg(long)]
        birthday: Option<String>,
        /// Prompt for a new password
        #[arg(long)]
        password: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(command: ProfileCommands) -> Result<()> {
    match command {
        ProfileCommands::Show { json } => show(json).await,
        ProfileCommands::Edit {
            username,
            email,
            birthday,
            password,
            json,
        } => edit(username, email, birthday, password, json).await,
    }
}

async fn show(json: bool) -> Result<()> {
    let ctx = get_context_for("profile show")?;
    let result = with_spinner("Loading profile...", json, ctx.account_service.load_profile()).await;

    if json {
        return print_json(result);
    }

    match result {
        Ok(user) => {
            output::print_user(&user);
            Ok(())
        }
        Err(e) => {
            hint_if_logged_out(&ctx);
            Err(e.into())
        }
    }
}

async fn edit(
    username: Option<String>,
    email: Option<String>,
    birthday: Option<String>,
    change_password: bool,
    json: bool,
) -> Result<()> {
    let password = if change_password {
        Some(
            Password::new()
                .with_prompt("New password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()?,
        )
    } else {
        None
    };

    let update = ProfileUpdate {
        username,
        password,
        email,
        birthday: birthday.as_deref().map(parse_birthday).transpose()?,
    };
    if update.is_empty() {
        anyhow::bail!("Nothing to update. Pass --username, --email, --birthday or --password.");
    }

    let ctx = get_context_for("profile edit")?;
    let result = with_spinner("Saving profile...", json, ctx.account_service.edit_profile(&update)).await;

    if json {
        return print_json(result);
    }

    match result {
        Ok(user) => {
            output::success("Profile updated");
            if let Some(user) = user {
                output::print_user(&user);
            }
            Ok(())
        }
        Err(e) => {
            hint_if_logged_out(&ctx);
            Err(e.into())
        }
    }
}
