//! Core domain entities
//!
//! Plain data structures mirroring the MyFlix API payloads, plus the pure
//! favorites reconciliation. No I/O happens here.

mod movie;
mod session;
mod user;
pub mod favorites;
pub mod result;

pub use favorites::FavoritesView;
pub use movie::{Director, Genre, Movie};
pub use session::Session;
pub use user::{Credentials, LoginResponse, ProfileUpdate, Registration, User};
