//! Session storage adapters
//!
//! `FileSessionStore` is the persistent one: `session.json` in the myflix
//! directory, holding the two keys `token` and `user`. `MemorySessionStore`
//! lives only as long as the process.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use fs2::FileExt;

use crate::domain::result::{Error, Result};
use crate::domain::Session;
use crate::ports::SessionStore;

const SESSION_FILENAME: &str = "session.json";

fn read_lock(lock: &RwLock<Session>) -> RwLockReadGuard<'_, Session> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock(lock: &RwLock<Session>) -> RwLockWriteGuard<'_, Session> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// File-backed session store
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    state: RwLock<Session>,
}

impl FileSessionStore {
    /// Open the session file in `myflix_dir`.
    ///
    /// A missing or unreadable file starts an empty session.
    pub fn open(myflix_dir: &Path) -> Self {
        let path = myflix_dir.join(SESSION_FILENAME);
        let session = Self::read(&path).unwrap_or_default();

        Self {
            path,
            state: RwLock::new(session),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file under a shared lock so a concurrent rewrite is never
    /// seen half done
    fn read(path: &Path) -> Option<Session> {
        let mut file = File::open(path).ok()?;
        file.lock_shared().ok()?;

        let mut content = String::new();
        let read = file.read_to_string(&mut content);
        let _ = FileExt::unlock(&file);

        read.ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Rewrite the file under an exclusive lock so concurrent CLI runs
    /// never interleave partial writes.
    fn persist(&self, session: &Session) -> Result<()> {
        let content = serde_json::to_string_pretty(session)?;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| Error::session(format!("cannot open {}: {}", self.path.display(), e)))?;

        file.lock_exclusive()
            .map_err(|e| Error::session(format!("cannot lock {}: {}", self.path.display(), e)))?;

        let written = file
            .set_len(0)
            .and_then(|_| file.write_all(content.as_bytes()))
            .and_then(|_| file.sync_all());
        let _ = FileExt::unlock(&file);

        written.map_err(|e| Error::session(format!("cannot write {}: {}", self.path.display(), e)))
    }
}

impl SessionStore for FileSessionStore {
    fn session(&self) -> Session {
        read_lock(&self.state).clone()
    }

    fn set_session(&self, token: &str, username: &str) -> Result<()> {
        let mut state = write_lock(&self.state);
        let next = Session::new(token, username);
        self.persist(&next)?;
        *state = next;
        Ok(())
    }

    fn set_username(&self, username: &str) -> Result<()> {
        let mut state = write_lock(&self.state);
        let next = Session {
            username: Some(username.to_string()),
            ..state.clone()
        };
        self.persist(&next)?;
        *state = next;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut state = write_lock(&self.state);
        *state = Session::default();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::session(format!(
                "cannot remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

/// In-process session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    state: RwLock<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing session
    pub fn with_session(session: Session) -> Self {
        Self {
            state: RwLock::new(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn session(&self) -> Session {
        read_lock(&self.state).clone()
    }

    fn set_session(&self, token: &str, username: &str) -> Result<()> {
        *write_lock(&self.state) = Session::new(token, username);
        Ok(())
    }

    fn set_username(&self, username: &str) -> Result<()> {
        write_lock(&self.state).username = Some(username.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *write_lock(&self.state) = Session::default();
        Ok(())
    }
}
