//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on one area: the account lifecycle or the catalog and favorites.

mod account;
mod catalog;
pub mod logging;

pub use account::AccountService;
pub use catalog::{CatalogLoad, CatalogService, CatalogSnapshot, FavoriteAction, ToggleOutcome};
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
