//! Catalog commands - movie list and detail lookups

use anyhow::Result;
use colored::Colorize;

use myflix_core::services::CatalogLoad;

use super::{get_context_for, hint_if_logged_out, print_json};
use crate::output::{self, create_table, truncate, with_spinner};

/// Movie table with a favorite marker
pub async fn movies(json: bool) -> Result<()> {
    let ctx = get_context_for("movies")?;
    let load = with_spinner(
        "Loading movies...",
        json,
        ctx.catalog_service.load_catalog_and_user(),
    )
    .await;

    if json {
        return print_json(load.into_snapshot());
    }

    let CatalogLoad { user, movies, .. } = load;
    let movies = match movies {
        Ok(movies) => movies,
        Err(e) => {
            hint_if_logged_out(&ctx);
            return Err(e.into());
        }
    };
    // Without the user the list still renders, just without markers
    let favorite_ids = match user {
        Ok(user) => user.favorite_movie_ids,
        Err(_) => {
            output::warning("Could not load your profile; favorites are not marked.");
            Vec::new()
        }
    };

    if movies.is_empty() {
        output::info("No movies found.");
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["", "Title", "Genre", "Director", "Description", "ID"]);
    for movie in &movies {
        let marker = if favorite_ids.contains(&movie.id) {
            "★".yellow().to_string()
        } else {
            String::new()
        };
        table.add_row(vec![
            marker,
            movie.title.clone(),
            movie.genre.name.clone(),
            movie.director.name.clone(),
            truncate(&movie.description, 50),
            movie.id.clone(),
        ]);
    }
    println!("{}", table);
    println!("{}", format!("{} movies", movies.len()).dimmed());
    Ok(())
}

pub async fn movie(title: &str, json: bool) -> Result<()> {
    let ctx = get_context_for("movie")?;
    let result = with_spinner("Loading movie...", json, ctx.catalog_service.movie(title)).await;

    if json {
        return print_json(result);
    }

    match result {
        Ok(movie) => {
            output::print_movie(&movie);
            Ok(())
        }
        Err(e) => {
            hint_if_logged_out(&ctx);
            Err(e.into())
        }
    }
}

pub async fn genre(name: &str, json: bool) -> Result<()> {
    let ctx = get_context_for("genre")?;
    let result = with_spinner("Loading genre...", json, ctx.catalog_service.genre(name)).await;

    if json {
        return print_json(result);
    }

    match result {
        Ok(genre) => {
            output::print_genre(&genre);
            Ok(())
        }
        Err(e) => {
            hint_if_logged_out(&ctx);
            Err(e.into())
        }
    }
}

pub async fn director(name: &str, json: bool) -> Result<()> {
    let ctx = get_context_for("director")?;
    let result = with_spinner("Loading director...", json, ctx.catalog_service.director(name)).await;

    if json {
        return print_json(result);
    }

    match result {
        Ok(director) => {
            output::print_director(&director);
            Ok(())
        }
        Err(e) => {
            hint_if_logged_out(&ctx);
            Err(e.into())
        }
    }
}
