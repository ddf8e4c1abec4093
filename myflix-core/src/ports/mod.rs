//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. Services depend
//! only on these traits, not on concrete implementations.

mod movie_api;
mod session_store;

pub use movie_api::MovieApi;
pub use session_store::SessionStore;
