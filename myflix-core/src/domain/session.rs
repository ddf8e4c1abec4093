//! Session domain model

use serde::{Deserialize, Serialize};

/// Client session: bearer token plus the username it was issued for
///
/// Serialized with the local-storage key names `token` and `user`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(rename = "user", default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            username: Some(username.into()),
        }
    }

    /// A token is present. Says nothing about whether the server accepts it.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}
