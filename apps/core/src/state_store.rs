use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};

use crate::config::Config;
use crate::model::TabId;
use crate::tab_tracker::TabTrackerState;

pub const CURRENT_TAB_KEY: &str = "current_tab_id";
pub const LAST_TAB_KEY: &str = "last_tab_id";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn open_memory() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn open_file(path: &Path) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let conn = Connection::open(path)?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn open_from_config(cfg: &Config) -> Result<Connection, StoreError> {
    open_file(&cfg.state_db_path)
}

fn init_schema(db: &Connection) -> Result<(), rusqlite::Error> {
    db.execute(
        "CREATE TABLE IF NOT EXISTS tab_state (key TEXT PRIMARY KEY, value INTEGER NOT NULL)",
        [],
    )?;
    Ok(())
}

pub fn get_tab_id(db: &Connection, key: &str) -> Result<Option<TabId>, StoreError> {
    let value = db
        .query_row(
            "SELECT value FROM tab_state WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

pub fn set_tab_id(db: &Connection, key: &str, value: TabId) -> Result<(), StoreError> {
    db.execute(
        "INSERT INTO tab_state (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn remove_key(db: &Connection, key: &str) -> Result<(), StoreError> {
    db.execute("DELETE FROM tab_state WHERE key = ?1", params![key])?;
    Ok(())
}

pub fn load_tab_state(db: &Connection) -> Result<TabTrackerState, StoreError> {
    Ok(TabTrackerState::new(
        get_tab_id(db, CURRENT_TAB_KEY)?,
        get_tab_id(db, LAST_TAB_KEY)?,
    ))
}

/// Writes both slots; an empty slot removes its key.
pub fn save_tab_state(db: &Connection, state: &TabTrackerState) -> Result<(), StoreError> {
    let tx = db.unchecked_transaction()?;
    for (key, value) in [(CURRENT_TAB_KEY, state.current), (LAST_TAB_KEY, state.previous)] {
        match value {
            Some(id) => set_tab_id(&tx, key, id)?,
            None => remove_key(&tx, key)?,
        }
    }
    tx.commit()?;
    Ok(())
}
