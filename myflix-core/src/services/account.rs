//! Account service - registration, login, profile and account lifecycle

use std::sync::{Arc, RwLock};

use crate::domain::result::Result;
use crate::domain::{Credentials, ProfileUpdate, Registration, User};
use crate::ports::{MovieApi, SessionStore};
use crate::services::{LogEvent, LoggingService};

/// Account flows for the current user
///
/// Every flow ends in `Ok` or the normalized error; nothing is retried. The
/// last profile seen by login, load or edit is kept as the cached profile.
pub struct AccountService {
    api: Arc<dyn MovieApi>,
    session: Arc<dyn SessionStore>,
    profile: RwLock<Option<User>>,
    logger: Option<Arc<LoggingService>>,
}

impl AccountService {
    pub fn new(api: Arc<dyn MovieApi>, session: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            session,
            profile: RwLock::new(None),
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Arc<LoggingService>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Create an account. The session is not touched.
    ///
    /// `Ok(None)` means the server accepted the registration without a body.
    pub async fn register(&self, registration: &Registration) -> Result<Option<User>> {
        match self.api.register(registration).await {
            Ok(user) => {
                self.log(LogEvent::new("registration_completed").with_operation("register"));
                Ok(user)
            }
            Err(e) => {
                self.log_failure("registration_failed", "register", &e.to_string());
                Err(e)
            }
        }
    }

    /// Log in and make the returned token and username the current session
    pub async fn login(&self, credentials: &Credentials) -> Result<User> {
        let response = match self.api.login(credentials).await {
            Ok(response) => response,
            Err(e) => {
                self.log_failure("login_failed", "login", &e.to_string());
                return Err(e);
            }
        };

        self.session
            .set_session(&response.token, &response.user.username)?;
        self.set_profile(Some(response.user.clone()));
        self.log(LogEvent::new("login_succeeded").with_operation("login"));

        Ok(response.user)
    }

    /// Forget the session and the cached profile; no network call
    pub fn logout(&self) -> Result<()> {
        self.set_profile(None);
        self.session.clear()?;
        self.log(LogEvent::new("logged_out").with_operation("logout"));
        Ok(())
    }

    /// Fetch the current user and replace the cached profile
    pub async fn load_profile(&self) -> Result<User> {
        let user = self.api.get_user().await?;
        self.set_profile(Some(user.clone()));
        Ok(user)
    }

    /// Submit a profile edit.
    ///
    /// On success a changed username is written to the session and the cached
    /// profile is replaced. When the server answers without a body the edit is
    /// applied to the cached profile instead; the result is `None` only if
    /// there was nothing cached. On failure the cached profile keeps its value.
    pub async fn edit_profile(&self, update: &ProfileUpdate) -> Result<Option<User>> {
        let payload = match self.api.edit_user(update).await {
            Ok(payload) => payload,
            Err(e) => {
                self.log_failure("profile_update_failed", "edit_profile", &e.to_string());
                return Err(e);
            }
        };

        let user = payload.or_else(|| self.cached_profile().map(|cached| update.apply_to(cached)));
        let username = match &user {
            Some(user) => Some(user.username.clone()),
            None => update.username.clone(),
        };
        if let Some(username) = username {
            if self.session.username().as_deref() != Some(username.as_str()) {
                self.session.set_username(&username)?;
            }
        }
        if user.is_some() {
            self.set_profile(user.clone());
        }
        self.log(LogEvent::new("profile_updated").with_operation("edit_profile"));

        Ok(user)
    }

    /// Delete the account on the server.
    ///
    /// The session and cached profile are cleared whatever the server says;
    /// the request outcome is returned afterwards.
    pub async fn delete_account(&self) -> Result<()> {
        let outcome = self.api.delete_user().await;

        self.set_profile(None);
        let cleared = self.session.clear();

        match &outcome {
            Ok(()) => self.log(LogEvent::new("account_deleted").with_operation("delete_account")),
            Err(e) => self.log_failure("account_delete_failed", "delete_account", &e.to_string()),
        }

        outcome.and(cleared)
    }

    /// Last profile seen by login, load or edit
    pub fn cached_profile(&self) -> Option<User> {
        self.profile
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_profile(&self, user: Option<User>) {
        *self
            .profile
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = user;
    }

    fn log(&self, event: LogEvent) {
        if let Some(logger) = &self.logger {
            let _ = logger.log(event.with_view("account"));
        }
    }

    fn log_failure(&self, event: &str, operation: &str, message: &str) {
        self.log(
            LogEvent::new(event)
                .with_operation(operation)
                .with_error(message),
        );
    }
}
