//! Catalog service - movie catalog, detail lookups and favorites

use std::sync::{Arc, RwLock};

use serde::Serialize;

use crate::domain::favorites::{self, FavoritesView};
use crate::domain::result::Result;
use crate::domain::{Director, Genre, Movie, User};
use crate::ports::MovieApi;
use crate::services::{LogEvent, LoggingService};

/// Which mutation a favorite change performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteAction {
    Added,
    Removed,
}

/// Outcome of one catalog activation
///
/// The two fetches succeed or fail independently. `favorites` is present
/// only when both succeeded.
#[derive(Debug)]
pub struct CatalogLoad {
    pub user: Result<User>,
    pub movies: Result<Vec<Movie>>,
    pub favorites: Option<FavoritesView>,
}

impl CatalogLoad {
    pub fn is_complete(&self) -> bool {
        self.user.is_ok() && self.movies.is_ok()
    }

    /// Collapse into one result; the user error wins when both failed
    pub fn into_snapshot(self) -> Result<CatalogSnapshot> {
        let user = self.user?;
        let movies = self.movies?;
        let favorites = match self.favorites {
            Some(view) => view,
            None => favorites::resolve(&user.favorite_movie_ids, &movies),
        };
        Ok(CatalogSnapshot {
            user,
            movies,
            favorites,
        })
    }
}

/// A fully loaded catalog view
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSnapshot {
    pub user: User,
    pub movies: Vec<Movie>,
    pub favorites: FavoritesView,
}

impl CatalogSnapshot {
    pub fn is_favorite(&self, movie_id: &str) -> bool {
        favorites::is_favorite(movie_id, &self.user.favorite_movie_ids)
    }
}

/// Result of a favorite mutation plus the reload that followed it
///
/// `result` is `Ok(None)` when the server applied the change without
/// sending the updated user back.
#[derive(Debug)]
pub struct ToggleOutcome {
    pub action: FavoriteAction,
    pub result: Result<Option<User>>,
    pub refreshed: CatalogLoad,
}

/// Catalog browsing and favorite management
///
/// The service never predicts the favorite set: every mutation is followed
/// by a full reload of user and catalog.
pub struct CatalogService {
    api: Arc<dyn MovieApi>,
    favorite_ids: RwLock<Vec<String>>,
    logger: Option<Arc<LoggingService>>,
}

impl CatalogService {
    pub fn new(api: Arc<dyn MovieApi>) -> Self {
        Self {
            api,
            favorite_ids: RwLock::new(Vec::new()),
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Arc<LoggingService>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Fetch the current user and the catalog concurrently
    pub async fn load_catalog_and_user(&self) -> CatalogLoad {
        let (user, movies) = tokio::join!(self.api.get_user(), self.api.list_movies());

        if let Ok(user) = &user {
            *self
                .favorite_ids
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner()) = user.favorite_movie_ids.clone();
        }

        let favorites = match (&user, &movies) {
            (Ok(user), Ok(movies)) => Some(favorites::resolve(&user.favorite_movie_ids, movies)),
            _ => None,
        };

        match (&user, &movies) {
            (Ok(_), Ok(_)) => {
                self.log(LogEvent::new("catalog_loaded").with_operation("load_catalog_and_user"));
            }
            (user_result, movies_result) => {
                let failed: Vec<&str> = [
                    user_result.as_ref().err().map(|_| "user"),
                    movies_result.as_ref().err().map(|_| "movies"),
                ]
                .into_iter()
                .flatten()
                .collect();
                self.log(
                    LogEvent::new("catalog_load_failed")
                        .with_operation("load_catalog_and_user")
                        .with_error(format!("failed to load {}", failed.join(" and "))),
                );
            }
        }

        CatalogLoad {
            user,
            movies,
            favorites,
        }
    }

    /// Add the movie if it is not a favorite, remove it if it is, then reload.
    ///
    /// Membership is judged against the ids from the last load. Overlapping
    /// toggles are not serialized.
    pub async fn toggle_favorite(&self, movie_id: &str) -> ToggleOutcome {
        let action = if favorites::is_favorite(movie_id, &self.current_favorite_ids()) {
            FavoriteAction::Removed
        } else {
            FavoriteAction::Added
        };
        self.change_favorite(movie_id, action).await
    }

    /// Add a favorite, then reload
    pub async fn add_favorite(&self, movie_id: &str) -> ToggleOutcome {
        self.change_favorite(movie_id, FavoriteAction::Added).await
    }

    /// Remove a favorite, then reload
    pub async fn remove_favorite(&self, movie_id: &str) -> ToggleOutcome {
        self.change_favorite(movie_id, FavoriteAction::Removed).await
    }

    async fn change_favorite(&self, movie_id: &str, action: FavoriteAction) -> ToggleOutcome {
        let result = match action {
            FavoriteAction::Added => self.api.add_favorite(movie_id).await,
            FavoriteAction::Removed => self.api.remove_favorite(movie_id).await,
        };

        match (&result, action) {
            (Ok(_), FavoriteAction::Added) => {
                self.log(LogEvent::new("favorite_added").with_operation("add_favorite"))
            }
            (Ok(_), FavoriteAction::Removed) => {
                self.log(LogEvent::new("favorite_removed").with_operation("remove_favorite"))
            }
            (Err(e), _) => self.log(
                LogEvent::new("favorite_toggle_failed")
                    .with_operation(match action {
                        FavoriteAction::Added => "add_favorite",
                        FavoriteAction::Removed => "remove_favorite",
                    })
                    .with_error(e.to_string()),
            ),
        }

        let refreshed = self.load_catalog_and_user().await;
        ToggleOutcome {
            action,
            result,
            refreshed,
        }
    }

    /// Favorite ids straight from the server
    pub async fn favorite_ids(&self) -> Result<Vec<String>> {
        self.api.list_favorites().await
    }

    /// Favorite ids remembered from the last successful user fetch
    pub fn current_favorite_ids(&self) -> Vec<String> {
        self.favorite_ids
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub async fn movie(&self, title: &str) -> Result<Movie> {
        self.api.get_movie(title).await
    }

    pub async fn genre(&self, name: &str) -> Result<Genre> {
        self.api.get_genre(name).await
    }

    pub async fn director(&self, name: &str) -> Result<Director> {
        self.api.get_director(name).await
    }

    fn log(&self, event: LogEvent) {
        if let Some(logger) = &self.logger {
            let _ = logger.log(event.with_view("catalog"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::HttpMovieApi;
    use crate::adapters::local_storage::MemorySessionStore;
    use crate::adapters::mock_api::{MockConfig, MockMyflixServer};
    use crate::domain::Session;
    use crate::services::EntryPoint;
    use tempfile::tempdir;

    fn service_for(server: &MockMyflixServer) -> CatalogService {
        let store = Arc::new(MemorySessionStore::with_session(Session::new(
            server.token_for("alice"),
            "alice",
        )));
        let api = Arc::new(HttpMovieApi::new(&server.base_url(), store).unwrap());
        CatalogService::new(api)
    }

    #[tokio::test]
    async fn test_load_catalog_and_user() {
        let server = MockMyflixServer::start(MockConfig::default()).unwrap();
        let service = service_for(&server);

        let load = service.load_catalog_and_user().await;
        assert!(load.is_complete());
        assert_eq!(load.favorites.as_ref().map(|f| f.len()), Some(0));

        let snapshot = load.into_snapshot().unwrap();
        assert_eq!(snapshot.user.username, "alice");
        assert_eq!(snapshot.movies.len(), 3);
    }

    #[tokio::test]
    async fn test_toggle_twice() {
        let server = MockMyflixServer::start(MockConfig::default()).unwrap();
        let service = service_for(&server);
        service.load_catalog_and_user().await;

        let first = service.toggle_favorite("m2").await;
        assert_eq!(first.action, FavoriteAction::Added);
        assert!(first.result.is_ok());
        let snapshot = first.refreshed.into_snapshot().unwrap();
        assert!(snapshot.is_favorite("m2"));
        assert_eq!(snapshot.favorites.movies[0].title, "The Dark Knight");
        assert_eq!(service.current_favorite_ids(), vec!["m2".to_string()]);

        let second = service.toggle_favorite("m2").await;
        assert_eq!(second.action, FavoriteAction::Removed);
        let snapshot = second.refreshed.into_snapshot().unwrap();
        assert!(!snapshot.is_favorite("m2"));
        assert!(service.current_favorite_ids().is_empty());
        assert!(server.favorites_of("alice").is_empty());
    }

    #[tokio::test]
    async fn test_toggle_without_prior_load_adds() {
        let server = MockMyflixServer::start(MockConfig::default()).unwrap();
        let service = service_for(&server);

        let outcome = service.toggle_favorite("m1").await;
        assert_eq!(outcome.action, FavoriteAction::Added);
        assert_eq!(server.favorites_of("alice"), vec!["m1".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_mutation_still_refreshes() {
        let server = MockMyflixServer::start(MockConfig {
            failing_paths: vec!["/users/alice/add-movies".to_string()],
            ..Default::default()
        })
        .unwrap();
        let service = service_for(&server);

        let outcome = service.add_favorite("m1").await;
        assert!(outcome.result.unwrap_err().is_request());
        assert!(outcome.refreshed.is_complete());

        let paths: Vec<String> = server.requests().into_iter().map(|r| r.path).collect();
        assert!(paths.contains(&"/movies".to_string()));
        assert!(paths.contains(&"/users/alice".to_string()));
    }

    #[tokio::test]
    async fn test_mutation_without_response_body_succeeds() {
        let server = MockMyflixServer::start(MockConfig {
            empty_success_bodies: true,
            ..Default::default()
        })
        .unwrap();
        let service = service_for(&server);

        let outcome = service.add_favorite("m1").await;
        assert_eq!(outcome.action, FavoriteAction::Added);
        assert!(matches!(outcome.result, Ok(None)));
        assert_eq!(server.favorites_of("alice"), vec!["m1".to_string()]);

        // The reload could not read the user back, so load again
        assert!(outcome.refreshed.user.is_err());
        server.set_config(MockConfig::default());
        service.load_catalog_and_user().await;
        let outcome = service.toggle_favorite("m1").await;
        assert_eq!(outcome.action, FavoriteAction::Removed);
        assert!(server.favorites_of("alice").is_empty());
    }

    #[tokio::test]
    async fn test_partial_failure_reported_per_fetch() {
        let server = MockMyflixServer::start(MockConfig {
            failing_paths: vec!["/movies".to_string()],
            ..Default::default()
        })
        .unwrap();
        let service = service_for(&server);
        service.add_favorite("m3").await;

        let load = service.load_catalog_and_user().await;
        assert!(load.user.is_ok());
        assert!(load.movies.as_ref().unwrap_err().is_request());
        assert!(load.favorites.is_none());
        assert!(!load.is_complete());

        // The user fetch still updates the remembered ids
        assert_eq!(service.current_favorite_ids(), vec!["m3".to_string()]);
    }

    #[tokio::test]
    async fn test_detail_passthroughs() {
        let server = MockMyflixServer::start(MockConfig::default()).unwrap();
        let service = service_for(&server);

        let movie = service.movie("Schindler's List").await.unwrap();
        assert_eq!(movie.genre.name, "Drama");

        let genre = service.genre(&movie.genre.name).await.unwrap();
        assert_eq!(genre.description, "Serious stories");

        let director = service.director(&movie.director.name).await.unwrap();
        assert_eq!(director.name, "Steven Spielberg");
        assert_eq!(director.birth_year.as_deref(), Some("1946"));

        service.add_favorite("m1").await;
        assert_eq!(service.favorite_ids().await.unwrap(), vec!["m1".to_string()]);
    }

    #[tokio::test]
    async fn test_catalog_events_are_logged() {
        let dir = tempdir().unwrap();
        let logger = Arc::new(LoggingService::new(dir.path(), EntryPoint::Library, "test").unwrap());
        let server = MockMyflixServer::start(MockConfig::default()).unwrap();
        let service = service_for(&server).with_logger(logger.clone());

        service.toggle_favorite("m1").await;

        let events: Vec<String> = logger
            .get_recent(10)
            .unwrap()
            .into_iter()
            .map(|e| e.event)
            .collect();
        assert!(events.contains(&"favorite_added".to_string()));
        assert!(events.contains(&"catalog_loaded".to_string()));
    }
}
