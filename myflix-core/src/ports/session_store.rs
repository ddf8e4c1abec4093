//! Session store port

use crate::domain::result::Result;
use crate::domain::Session;

/// Owner of the client session (token + username)
///
/// Reads never fail; an absent value is `None`. Writes may fail when the
/// backing storage does.
pub trait SessionStore: Send + Sync {
    /// Snapshot of the current session
    fn session(&self) -> Session;

    fn token(&self) -> Option<String> {
        self.session().token
    }

    fn username(&self) -> Option<String> {
        self.session().username
    }

    /// Replace the whole session
    fn set_session(&self, token: &str, username: &str) -> Result<()>;

    /// Replace only the username, keeping the token
    fn set_username(&self, username: &str) -> Result<()>;

    /// Forget both token and username
    fn clear(&self) -> Result<()>;
}
