//! CLI command implementations

pub mod account;
pub mod catalog;
pub mod config;
pub mod favorites;
pub mod logs;
pub mod profile;

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use myflix_core::domain::result::Result as CoreResult;
use myflix_core::services::{EntryPoint, LogEvent, LoggingService};
use myflix_core::{MyflixContext, OperationResult};

/// Error already shown to the user (as JSON); main only sets the exit code
#[derive(Debug)]
pub struct AlreadyReported;

impl fmt::Display for AlreadyReported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("already reported")
    }
}

impl std::error::Error for AlreadyReported {}

/// Get the myflix directory from environment or default
pub fn get_myflix_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MYFLIX_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".myflix")
    }
}

/// Get the logging service for commands that run without a context
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let myflix_dir = get_myflix_dir();
    std::fs::create_dir_all(&myflix_dir).ok()?;
    LoggingService::new(&myflix_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: Option<&LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the client context
pub fn get_context() -> Result<MyflixContext> {
    let myflix_dir = get_myflix_dir();
    MyflixContext::new(&myflix_dir, EntryPoint::Cli).context("Failed to initialize myflix context")
}

/// Get the client context and record the command in the diagnostic log
pub fn get_context_for(command: &str) -> Result<MyflixContext> {
    let ctx = get_context()?;
    log_event(
        ctx.logger.as_deref(),
        LogEvent::new("command_executed").with_command(command),
    );
    Ok(ctx)
}

/// Print an outcome as an `OperationResult` JSON document.
///
/// A failure is returned as [`AlreadyReported`] so the process still exits
/// non-zero without printing the message twice.
pub fn print_json<T: Serialize>(result: CoreResult<T>) -> Result<()> {
    let failed = result.is_err();
    let outcome: OperationResult<T> = result.into();
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    if failed {
        return Err(AlreadyReported.into());
    }
    Ok(())
}

/// After a failed request, point out a missing session
pub fn hint_if_logged_out(ctx: &MyflixContext) {
    if !ctx.is_logged_in() {
        crate::output::warning("Not logged in. Run 'myflix login' first.");
    }
}
