//! MyFlix API port - remote REST abstraction

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::{
    Credentials, Director, Genre, LoginResponse, Movie, ProfileUpdate, Registration, User,
};

/// Remote MyFlix API
///
/// One method per REST endpoint. Every method except [`register`](Self::register)
/// and [`login`](Self::login) is authorized with the session's bearer token, and
/// the user-scoped endpoints address the session's username. Any failure comes
/// back as the normalized `Error::Request`.
///
/// The mutations return `Ok(None)` when the server accepted the change but
/// sent no body.
#[async_trait]
pub trait MovieApi: Send + Sync {
    // === Accounts ===

    /// `POST /users`
    async fn register(&self, registration: &Registration) -> Result<Option<User>>;

    /// `POST /login`
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse>;

    // === Catalog ===

    /// `GET /movies`; an empty body is an empty catalog
    async fn list_movies(&self) -> Result<Vec<Movie>>;

    /// `GET /movies/{title}`
    async fn get_movie(&self, title: &str) -> Result<Movie>;

    /// `GET /genres/{name}`
    async fn get_genre(&self, name: &str) -> Result<Genre>;

    /// `GET /directors/{name}`
    async fn get_director(&self, name: &str) -> Result<Director>;

    // === Current user ===

    /// `GET /users/{username}`
    async fn get_user(&self) -> Result<User>;

    /// `GET /users/{username}/movies`; an empty body is an empty list
    async fn list_favorites(&self) -> Result<Vec<String>>;

    /// `PUT /users/{username}/add-movies/{movie_id}`
    async fn add_favorite(&self, movie_id: &str) -> Result<Option<User>>;

    /// `DELETE /users/{username}/delete-movies/{movie_id}`
    async fn remove_favorite(&self, movie_id: &str) -> Result<Option<User>>;

    /// `PUT /users/{username}`
    async fn edit_user(&self, update: &ProfileUpdate) -> Result<Option<User>>;

    /// `DELETE /users/{username}`; the body is ignored
    async fn delete_user(&self) -> Result<()>;
}
