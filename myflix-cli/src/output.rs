//! Output formatting utilities

use std::future::Future;
use std::time::Duration;

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};

use myflix_core::{Director, Genre, Movie, User};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Run `future` behind a spinner when stdout is an interactive terminal
pub async fn with_spinner<F: Future>(message: &str, quiet: bool, future: F) -> F::Output {
    if quiet || atty::isnt(atty::Stream::Stdout) {
        return future.await;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));

    let output = future.await;
    spinner.finish_and_clear();
    output
}

/// Print a user profile as key-value rows
pub fn print_user(user: &User) {
    let mut table = create_table();
    table.add_row(vec!["Username", user.username.as_str()]);
    table.add_row(vec!["Email", user.email.as_str()]);
    let birthday = user
        .birthday
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    table.add_row(vec!["Birthday", birthday.as_str()]);
    table.add_row(vec![
        "Favorites",
        &user.favorite_movie_ids.len().to_string(),
    ]);
    println!("{}", table);
}

/// Print the detail view of a movie
pub fn print_movie(movie: &Movie) {
    let title = if movie.featured {
        format!("{} {}", movie.title.bold(), "(featured)".yellow())
    } else {
        movie.title.bold().to_string()
    };
    println!("{}", title);
    println!("{}", movie.description);
    println!();
    println!("  {} {}", "Genre:".dimmed(), movie.genre.name);
    println!("  {} {}", "Director:".dimmed(), movie.director.name);
    if !movie.image_path.is_empty() {
        println!("  {} {}", "Image:".dimmed(), movie.image_path);
    }
    println!("  {} {}", "ID:".dimmed(), movie.id);
}

pub fn print_genre(genre: &Genre) {
    println!("{}", genre.name.bold());
    println!("{}", genre.description);
}

pub fn print_director(director: &Director) {
    println!("{}", director.name.bold());
    let lifespan = match (&director.birth_year, &director.death_year) {
        (Some(birth), Some(death)) => Some(format!("{} - {}", birth, death)),
        (Some(birth), None) => Some(format!("born {}", birth)),
        (None, Some(death)) => Some(format!("died {}", death)),
        (None, None) => None,
    };
    if let Some(lifespan) = lifespan {
        println!("{}", lifespan.dimmed());
    }
    if let Some(bio) = &director.biography {
        println!();
        println!("{}", bio);
    }
}

/// Shorten text for table cells
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut short: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        short.push_str("...");
        short
    }
}
