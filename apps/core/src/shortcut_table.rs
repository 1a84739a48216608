use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, OnceLock};
use std::time::Duration;

use serde::Deserialize;

use crate::model::{DefaultRoute, ShortcutEntry};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse shortcuts: {0}")]
    Parse(#[from] json5::Error),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("loader thread exited without a result")]
    Worker,
}

#[derive(Debug, Deserialize)]
struct ShortcutFile {
    #[serde(default)]
    shortcuts: Vec<ShortcutEntry>,
}

/// String-keyed map that remembers where each key was first inserted.
/// Re-inserting a key replaces the value but keeps the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupIndex {
    order: Vec<String>,
    values: HashMap<String, String>,
}

impl LookupIndex {
    pub fn insert(&mut self, key: &str, destination: &str) {
        if self
            .values
            .insert(key.to_string(), destination.to_string())
            .is_none()
        {
            self.order.push(key.to_string());
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .filter_map(|key| self.values.get(key).map(|value| (key.as_str(), value.as_str())))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutTable {
    entries: Vec<ShortcutEntry>,
    with_marker: LookupIndex,
    without_marker: LookupIndex,
    default_route: Option<DefaultRoute>,
}

impl ShortcutTable {
    pub fn from_entries(entries: Vec<ShortcutEntry>) -> Self {
        let mut with_marker = LookupIndex::default();
        let mut without_marker = LookupIndex::default();
        for entry in &entries {
            with_marker.insert(&entry.keyword, &entry.destination);
            without_marker.insert(entry.bare_keyword(), &entry.destination);
        }

        let default_route = entries.first().map(|first| DefaultRoute {
            keyword: first.bare_keyword().to_string(),
            destination: first.destination.clone(),
        });

        Self {
            entries,
            with_marker,
            without_marker,
            default_route,
        }
    }

    pub fn entries(&self) -> &[ShortcutEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn with_marker(&self) -> &LookupIndex {
        &self.with_marker
    }

    pub fn without_marker(&self) -> &LookupIndex {
        &self.without_marker
    }

    pub fn default_route(&self) -> Option<&DefaultRoute> {
        self.default_route.as_ref()
    }
}

fn empty_table() -> &'static ShortcutTable {
    static EMPTY: OnceLock<ShortcutTable> = OnceLock::new();
    EMPTY.get_or_init(ShortcutTable::default)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ShortcutLoadState {
    #[default]
    Pending,
    Ready(ShortcutTable),
    Failed(String),
}

impl ShortcutLoadState {
    pub fn from_result(result: Result<ShortcutTable, LoadError>) -> Self {
        match result {
            Ok(table) => Self::Ready(table),
            Err(error) => Self::Failed(error.to_string()),
        }
    }

    /// `None` while loading is still pending. A failed load yields the
    /// empty table so every lookup falls through to no-match.
    pub fn table(&self) -> Option<&ShortcutTable> {
        match self {
            Self::Pending => None,
            Self::Ready(table) => Some(table),
            Self::Failed(_) => Some(empty_table()),
        }
    }
}

pub fn parse_shortcuts(raw: &str) -> Result<ShortcutTable, LoadError> {
    let file: ShortcutFile = json5::from_str(raw)?;
    Ok(ShortcutTable::from_entries(file.shortcuts))
}

pub fn load_file(path: &Path, timeout: Duration) -> Result<ShortcutTable, LoadError> {
    let (tx, rx) = mpsc::channel();
    let worker_path = path.to_path_buf();
    std::thread::spawn(move || {
        let result = std::fs::read_to_string(&worker_path)
            .map_err(|source| LoadError::Io {
                path: worker_path.clone(),
                source,
            })
            .and_then(|raw| parse_shortcuts(&raw));
        let _ = tx.send(result);
    });

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(LoadError::Timeout(timeout)),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(LoadError::Worker),
    }
}

#[cfg(test)]
mod tests {
    use super::LookupIndex;

    #[test]
    fn reinsert_keeps_first_position_and_last_value() {
        let mut index = LookupIndex::default();
        index.insert("a", "1");
        index.insert("b", "2");
        index.insert("a", "3");

        let pairs: Vec<_> = index.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
        assert_eq!(index.len(), 2);
    }
}
