//! SQLite-backed component catalog and calculation history
//!
//! The store holds one catalog table per component slot and a flattened
//! `calculations_history` table. A fresh database is seeded with a small
//! default catalog so the calculator is usable out of the box.

mod catalog;
mod history;
mod schema;
mod types;

pub use types::*;

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use thiserror::Error;

use crate::core::slot::ComponentSlot;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Cannot create database directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No {slot} with ID {id} in the catalog")]
    ComponentNotFound { slot: ComponentSlot, id: i64 },

    #[error("No calculation with ID {0} in history")]
    CalculationNotFound(i64),
}

/// The component catalog and history store
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Open or create a store at `path`
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened component database");

        let mut store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.prepare()?;
        Ok(store)
    }

    /// Open a throwaway in-memory store (seeded like a fresh file)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let mut store = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        store.prepare()?;
        Ok(store)
    }

    fn prepare(&mut self) -> Result<(), StoreError> {
        // Seed only alongside schema creation; a catalog emptied by the user
        // stays empty.
        if self.needs_schema_rebuild()? {
            self.init_schema()?;
            self.seed_defaults()?;
        }
        Ok(())
    }

    /// Check if schema version matches current version
    fn needs_schema_rebuild(&self) -> Result<bool, StoreError> {
        let current_version: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        Ok(current_version != SCHEMA_VERSION)
    }

    /// Location of the database file (None for in-memory stores)
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
