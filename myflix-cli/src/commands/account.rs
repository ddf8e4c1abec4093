//! Account commands - register, login, logout, delete-account

use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::Colorize;
use dialoguer::{Confirm, Input, Password};

use myflix_core::ports::SessionStore;
use myflix_core::{Credentials, Registration};

use super::{get_context_for, print_json};
use crate::output::{self, with_spinner};

fn prompt_text(prompt: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::<String>::new().with_prompt(prompt).interact_text()?),
    }
}

/// Password from MYFLIX_PASSWORD or an interactive prompt
fn prompt_password(confirm: bool) -> Result<String> {
    if let Ok(password) = std::env::var("MYFLIX_PASSWORD") {
        return Ok(password);
    }
    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    Ok(prompt.interact()?)
}

pub fn parse_birthday(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid birthday '{}', expected YYYY-MM-DD", value))
}

pub async fn register(
    username: Option<String>,
    email: Option<String>,
    birthday: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context_for("register")?;

    let username = prompt_text("Username", username)?;
    let email = prompt_text("Email", email)?;
    let birthday = birthday.as_deref().map(parse_birthday).transpose()?;
    let password = prompt_password(true)?;

    let registration = Registration {
        username,
        password,
        email,
        birthday,
    };
    let result = with_spinner(
        "Creating account...",
        json,
        ctx.account_service.register(&registration),
    )
    .await;

    if json {
        return print_json(result);
    }

    let username = result?.map_or(registration.username, |user| user.username);
    output::success(&format!("Registration complete. Welcome, {}!", username));
    println!("{}", "Run 'myflix login' to sign in.".dimmed());
    Ok(())
}

pub async fn login(username: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context_for("login")?;

    let username = prompt_text("Username", username)?;
    let password = prompt_password(false)?;

    let result = with_spinner(
        "Logging in...",
        json,
        ctx.account_service
            .login(&Credentials::new(username, password)),
    )
    .await;

    if json {
        return print_json(result);
    }

    let user = result?;
    output::success(&format!("Logged in as {}", user.username));
    Ok(())
}

pub fn logout(json: bool) -> Result<()> {
    let ctx = get_context_for("logout")?;
    let result = ctx.account_service.logout();

    if json {
        return print_json(result);
    }

    result?;
    output::success("Logged out");
    Ok(())
}

pub async fn delete_account(force: bool, json: bool) -> Result<()> {
    if let Some(message) = delete_needs_force(force, json) {
        anyhow::bail!(message);
    }

    let ctx = get_context_for("delete-account")?;
    let username = ctx.session.username().unwrap_or_default();

    if !force {
        println!(
            "\n{}",
            format!("This will permanently delete the account '{}'.", username).yellow()
        );
        println!("{}\n", "You will be logged out whether or not it succeeds.".dimmed());

        if !Confirm::new()
            .with_prompt("Are you sure?")
            .default(false)
            .interact()?
        {
            println!("{}\n", "Cancelled".dimmed());
            return Ok(());
        }
    }

    let result = with_spinner(
        "Deleting account...",
        json,
        ctx.account_service.delete_account(),
    )
    .await;

    if json {
        return print_json(result);
    }

    result?;
    output::success(&format!("Account '{}' deleted", username));
    Ok(())
}

/// JSON output never prompts, so it only deletes with `--force`
fn delete_needs_force(force: bool, json: bool) -> Option<&'static str> {
    if json && !force {
        Some("Refusing to delete the account without confirmation. Pass --force with --json.")
    } else {
        None
    }
}
