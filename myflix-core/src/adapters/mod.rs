//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - reqwest HTTP client for the MovieApi port
//! - JSON session file (and an in-memory variant) for SessionStore

pub mod http;
pub mod local_storage;

#[cfg(test)]
pub mod mock_api;
