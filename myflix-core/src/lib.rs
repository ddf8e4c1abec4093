//! MyFlix Core - client library for the MyFlix movie API
//!
//! This crate implements the client core following hexagonal architecture:
//!
//! - **domain**: Core entities (User, Movie, Session) and favorites reconciliation
//! - **ports**: Trait definitions for external dependencies (MovieApi, SessionStore)
//! - **services**: Account and catalog flows, diagnostic logging
//! - **adapters**: Concrete implementations (reqwest HTTP client, session file)

pub mod domain;
pub mod ports;
pub mod services;
pub mod adapters;
pub mod config;
pub mod log_migrations;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::http::HttpMovieApi;
use adapters::local_storage::FileSessionStore;
use config::Config;
use ports::{MovieApi, SessionStore};
use services::*;

// Re-export commonly used types at crate root
pub use domain::{
    Credentials, Director, FavoritesView, Genre, Movie, ProfileUpdate, Registration, Session, User,
};
pub use domain::result::{Error, OperationResult, REQUEST_FAILED_MESSAGE};

/// Main context for MyFlix operations
///
/// This is the primary entry point for all client logic. It owns the single
/// session store and shares it with the API client and the services.
pub struct MyflixContext {
    pub config: Config,
    pub session: Arc<dyn SessionStore>,
    pub api: Arc<dyn MovieApi>,
    pub logger: Option<Arc<LoggingService>>,
    pub account_service: AccountService,
    pub catalog_service: CatalogService,
}

impl MyflixContext {
    /// Create a context backed by the session file and log database in
    /// `myflix_dir`
    pub fn new(myflix_dir: &Path, entry_point: EntryPoint) -> Result<Self> {
        std::fs::create_dir_all(myflix_dir)
            .with_context(|| format!("Failed to create {}", myflix_dir.display()))?;

        let config = Config::load(myflix_dir)?;
        let session: Arc<dyn SessionStore> = Arc::new(FileSessionStore::open(myflix_dir));

        // A broken log database must not stop the client
        let logger = LoggingService::new(myflix_dir, entry_point, env!("CARGO_PKG_VERSION"))
            .ok()
            .map(Arc::new);

        let mut http = HttpMovieApi::with_timeout(
            &config.api_url,
            config.request_timeout(),
            Arc::clone(&session),
        )?;
        if let Some(logger) = &logger {
            http = http.with_logger(Arc::clone(logger));
        }

        Ok(Self::with_parts(config, session, Arc::new(http), logger))
    }

    /// Assemble a context from existing parts
    pub fn with_parts(
        config: Config,
        session: Arc<dyn SessionStore>,
        api: Arc<dyn MovieApi>,
        logger: Option<Arc<LoggingService>>,
    ) -> Self {
        let mut account_service = AccountService::new(Arc::clone(&api), Arc::clone(&session));
        let mut catalog_service = CatalogService::new(Arc::clone(&api));
        if let Some(logger) = &logger {
            account_service = account_service.with_logger(Arc::clone(logger));
            catalog_service = catalog_service.with_logger(Arc::clone(logger));
        }

        Self {
            config,
            session,
            api,
            logger,
            account_service,
            catalog_service,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.session().is_authenticated()
    }
}
