//! MyFlix REST API client
//!
//! One HTTP request per [`MovieApi`] operation. Authorized operations read
//! the bearer token and username from the session store at call time.
//!
//! Every failure (transport, non-2xx, undecodable body) is reported to the
//! caller as the normalized [`Error::Request`]; the details go to the
//! diagnostic log as a `request_failed` event. An empty 2xx body is a
//! success: mutations return `None`, lists come back empty and genre or
//! director lookups return the empty record. Login and the user and movie
//! reads have nothing to return without a payload and fail.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use crate::domain::result::{Error, Result, REQUEST_FAILED_MESSAGE};
use crate::domain::{
    Credentials, Director, Genre, LoginResponse, Movie, ProfileUpdate, Registration, User,
};
use crate::ports::{MovieApi, SessionStore};
use crate::services::{LogEvent, LoggingService};

/// Default production API URL
pub const MYFLIX_PRODUCTION_URL: &str = "https://movies-api-21.herokuapp.com";

/// Environment variable to override the API base URL
pub const MYFLIX_API_URL_ENV: &str = "MYFLIX_API_URL";

/// Longest response body kept in a diagnostic log entry
const MAX_LOGGED_BODY_CHARS: usize = 2048;

/// HTTP implementation of [`MovieApi`]
pub struct HttpMovieApi {
    client: Client,
    base_url: Url,
    session: Arc<dyn SessionStore>,
    logger: Option<Arc<LoggingService>>,
}

impl std::fmt::Debug for HttpMovieApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMovieApi")
            .field("base_url", &self.base_url.as_str())
            .field("has_token", &self.session.token().is_some())
            .finish()
    }
}

impl HttpMovieApi {
    /// Create a client without a request timeout
    pub fn new(base_url: &str, session: Arc<dyn SessionStore>) -> anyhow::Result<Self> {
        Self::with_timeout(base_url, None, session)
    }

    /// Create a client; `timeout` of `None` means requests may wait forever
    pub fn with_timeout(
        base_url: &str,
        timeout: Option<Duration>,
        session: Arc<dyn SessionStore>,
    ) -> anyhow::Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            anyhow::bail!("MyFlix API URL cannot be empty");
        }

        let base_url =
            Url::parse(trimmed).with_context(|| format!("Invalid MyFlix API URL: {}", trimmed))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            anyhow::bail!("MyFlix API URL must be an http(s) URL: {}", trimmed);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            session,
            logger: None,
        })
    }

    /// Attach the diagnostic log
    pub fn with_logger(mut self, logger: Arc<LoggingService>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Base URL plus percent-encoded path segments
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Username from the session; absent becomes an empty path segment
    fn username(&self) -> String {
        self.session.username().unwrap_or_default()
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.client.request(method, self.endpoint(segments))
    }

    /// Request carrying `Authorization: Bearer <token>`. A missing token is
    /// sent as an empty credential and left to the server to reject.
    fn authorized(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let token = self.session.token().unwrap_or_default();
        self.request(method, segments)
            .header(AUTHORIZATION, format!("Bearer {}", token))
    }

    /// Send the request and return the body of a 2xx response
    async fn execute(&self, operation: &'static str, request: RequestBuilder) -> Result<String> {
        let request = request
            .build()
            .map_err(|e| self.fail(operation, format!("Invalid request: {}", e)))?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| self.fail(operation, describe_transport_error(&method, &path, &e)))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            self.fail(
                operation,
                format!("HTTP {} {} {}: unreadable body: {}", status.as_u16(), method, path, e),
            )
        })?;

        if !status.is_success() {
            return Err(self.fail(
                operation,
                format!(
                    "HTTP {} {} {}: {}",
                    status.as_u16(),
                    method,
                    path,
                    truncate_body(&body)
                ),
            ));
        }

        Ok(body)
    }

    /// Send the request and decode the JSON body; an empty 2xx body is `None`
    async fn send_optional<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Option<T>> {
        let body = self.execute(operation, request).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&body).map(Some).map_err(|e| {
            self.fail(
                operation,
                format!("Undecodable response body: {}: {}", e, truncate_body(&body)),
            )
        })
    }

    /// Like [`send_optional`](Self::send_optional) for reads that need a payload
    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T> {
        match self.send_optional(operation, request).await? {
            Some(value) => Ok(value),
            None => Err(self.fail(operation, "Empty response body".to_string())),
        }
    }

    /// Log the failure details and hand back the normalized error
    fn fail(&self, operation: &str, details: String) -> Error {
        if let Some(logger) = &self.logger {
            let _ = logger.log(
                LogEvent::new("request_failed")
                    .with_operation(operation)
                    .with_error(REQUEST_FAILED_MESSAGE)
                    .with_error_details(details),
            );
        }
        Error::Request
    }
}

fn describe_transport_error(method: &Method, path: &str, error: &reqwest::Error) -> String {
    let kind = if error.is_timeout() {
        "timed out"
    } else if error.is_connect() {
        "connection failed"
    } else {
        "transport error"
    };
    format!("{} {} {}: {}", method, path, kind, error)
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_LOGGED_BODY_CHARS {
        body.to_string()
    } else {
        let mut truncated: String = body.chars().take(MAX_LOGGED_BODY_CHARS).collect();
        truncated.push_str("...");
        truncated
    }
}

#[async_trait]
impl MovieApi for HttpMovieApi {
    async fn register(&self, registration: &Registration) -> Result<Option<User>> {
        let request = self.request(Method::POST, &["users"]).json(registration);
        self.send_optional("register", request).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let request = self.request(Method::POST, &["login"]).json(credentials);
        self.send_json("login", request).await
    }

    async fn list_movies(&self) -> Result<Vec<Movie>> {
        let request = self.authorized(Method::GET, &["movies"]);
        let movies = self.send_optional("list_movies", request).await?;
        Ok(movies.unwrap_or_default())
    }

    async fn get_movie(&self, title: &str) -> Result<Movie> {
        let request = self.authorized(Method::GET, &["movies", title]);
        self.send_json("get_movie", request).await
    }

    async fn get_genre(&self, name: &str) -> Result<Genre> {
        let request = self.authorized(Method::GET, &["genres", name]);
        let value = self.send_optional("get_genre", request).await?;
        Ok(value.unwrap_or_default())
    }

    async fn get_director(&self, name: &str) -> Result<Director> {
        let request = self.authorized(Method::GET, &["directors", name]);
        let value = self.send_optional("get_director", request).await?;
        Ok(value.unwrap_or_default())
    }

    async fn get_user(&self) -> Result<User> {
        let username = self.username();
        let request = self.authorized(Method::GET, &["users", &username]);
        self.send_json("get_user", request).await
    }

    async fn list_favorites(&self) -> Result<Vec<String>> {
        let username = self.username();
        let request = self.authorized(Method::GET, &["users", &username, "movies"]);
        let ids = self.send_optional("list_favorites", request).await?;
        Ok(ids.unwrap_or_default())
    }

    async fn add_favorite(&self, movie_id: &str) -> Result<Option<User>> {
        let username = self.username();
        let request =
            self.authorized(Method::PUT, &["users", &username, "add-movies", movie_id]);
        self.send_optional("add_favorite", request).await
    }

    async fn remove_favorite(&self, movie_id: &str) -> Result<Option<User>> {
        let username = self.username();
        let request =
            self.authorized(Method::DELETE, &["users", &username, "delete-movies", movie_id]);
        self.send_optional("remove_favorite", request).await
    }

    async fn edit_user(&self, update: &ProfileUpdate) -> Result<Option<User>> {
        let username = self.username();
        let request = self
            .authorized(Method::PUT, &["users", &username])
            .json(update);
        self.send_optional("edit_user", request).await
    }

    async fn delete_user(&self) -> Result<()> {
        let username = self.username();
        let request = self.authorized(Method::DELETE, &["users", &username]);
        // The API answers with a plain-text confirmation
        self.execute("delete_user", request).await.map(|_| ())
    }
}
