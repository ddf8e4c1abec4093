//! Favorites commands - list and change favorite movies

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use myflix_core::services::{FavoriteAction, ToggleOutcome};

use super::{get_context_for, hint_if_logged_out, print_json};
use crate::output::{self, create_table, with_spinner};

#[derive(Subcommand)]
pub enum FavoriteCommands {
    /// Add the movie if it is not a favorite, remove it otherwise
    Toggle {
        /// Movie ID
        movie_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a movie to favorites
    Add {
        /// Movie ID
        movie_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a movie from favorites
    Remove {
        /// Movie ID
        movie_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// The user's favorites resolved against the catalog
pub async fn list(json: bool) -> Result<()> {
    let ctx = get_context_for("favorites")?;
    let load = with_spinner(
        "Loading favorites...",
        json,
        ctx.catalog_service.load_catalog_and_user(),
    )
    .await;

    let result = load.into_snapshot().map(|snapshot| snapshot.favorites);
    if json {
        return print_json(result);
    }

    let favorites = match result {
        Ok(favorites) => favorites,
        Err(e) => {
            hint_if_logged_out(&ctx);
            return Err(e.into());
        }
    };

    if favorites.is_empty() {
        output::info("No favorite movies yet. Add one with 'myflix favorite add <movie_id>'.");
    } else {
        let mut table = create_table();
        table.set_header(vec!["Title", "Genre", "Director", "ID"]);
        for movie in &favorites.movies {
            table.add_row(vec![
                movie.title.as_str(),
                movie.genre.name.as_str(),
                movie.director.name.as_str(),
                movie.id.as_str(),
            ]);
        }
        println!("{}", table);
    }

    if !favorites.unresolved_ids.is_empty() {
        output::warning(&format!(
            "{} favorite(s) not found in the catalog: {}",
            favorites.unresolved_ids.len(),
            favorites.unresolved_ids.join(", ")
        ));
    }
    Ok(())
}

pub async fn run(command: FavoriteCommands) -> Result<()> {
    match command {
        FavoriteCommands::Toggle { movie_id, json } => {
            let ctx = get_context_for("favorite toggle")?;
            // Membership is judged against the ids of a fresh load
            ctx.catalog_service.load_catalog_and_user().await;
            let outcome = with_spinner(
                "Updating favorites...",
                json,
                ctx.catalog_service.toggle_favorite(&movie_id),
            )
            .await;
            report(&ctx, &movie_id, outcome, json)
        }
        FavoriteCommands::Add { movie_id, json } => {
            let ctx = get_context_for("favorite add")?;
            let outcome = with_spinner(
                "Adding favorite...",
                json,
                ctx.catalog_service.add_favorite(&movie_id),
            )
            .await;
            report(&ctx, &movie_id, outcome, json)
        }
        FavoriteCommands::Remove { movie_id, json } => {
            let ctx = get_context_for("favorite remove")?;
            let outcome = with_spinner(
                "Removing favorite...",
                json,
                ctx.catalog_service.remove_favorite(&movie_id),
            )
            .await;
            report(&ctx, &movie_id, outcome, json)
        }
    }
}

fn report(
    ctx: &myflix_core::MyflixContext,
    movie_id: &str,
    outcome: ToggleOutcome,
    json: bool,
) -> Result<()> {
    let ToggleOutcome {
        action,
        result,
        refreshed,
    } = outcome;

    if json {
        // Without a response body the ids come from the reload
        let data = result.map(|user| {
            let ids = user
                .or_else(|| refreshed.user.ok())
                .map(|user| user.favorite_movie_ids);
            serde_json::json!({
                "action": action,
                "movie_id": movie_id,
                "favorite_movie_ids": ids,
            })
        });
        return print_json(data);
    }

    if let Err(e) = result {
        hint_if_logged_out(ctx);
        return Err(e.into());
    }

    // Name the movie from the refreshed catalog when it is available
    let title = refreshed
        .movies
        .as_ref()
        .ok()
        .and_then(|movies| movies.iter().find(|m| m.id == movie_id))
        .map(|m| m.title.clone())
        .unwrap_or_else(|| movie_id.to_string());

    match action {
        FavoriteAction::Added => output::success(&format!("Added '{}' to favorites", title)),
        FavoriteAction::Removed => {
            output::success(&format!("Removed '{}' from favorites", title))
        }
    }
    if let Some(favorites) = &refreshed.favorites {
        println!("{}", format!("{} favorite(s)", favorites.len()).dimmed());
    }
    Ok(())
}
