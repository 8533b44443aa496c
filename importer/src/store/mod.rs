//! SQLite destination store.
//!
//! - [`Store`] - owned connection handle
//! - [`schema`] - destructive provisioning and seed rows
//! - [`loader`] - transactional bulk load and post-load counts
//!
//! A store is owned by one import run at a time. Provisioning drops every
//! table the importer manages, so concurrent runs against the same file must
//! be serialized by the caller.

pub mod loader;
pub mod schema;

use rusqlite::Connection;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::StoreResult;

/// Destination used when the operator does not pass one.
pub const DEFAULT_STORE_PATH: &str = "productos.db";

/// Extension every store file carries.
pub const STORE_EXTENSION: &str = "db";

/// Append `.db` unless the path already ends with it.
pub fn store_path(raw: &Path) -> PathBuf {
    if raw.extension().is_some_and(|ext| ext == STORE_EXTENSION) {
        return raw.to_path_buf();
    }
    let mut name = OsString::from(raw.as_os_str());
    name.push(".");
    name.push(STORE_EXTENSION);
    PathBuf::from(name)
}

/// An open destination store.
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Open (or create) a store file.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// A private in-memory store.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
            path: None,
        })
    }

    /// File backing the store, `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}
