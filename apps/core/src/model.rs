use serde::{Deserialize, Serialize};

pub type TabId = i64;

pub const DEFAULT_MARKER: char = '@';

/// One `{"shortcut": "@kw", "url": "..."}` row of the shortcut file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutEntry {
    #[serde(rename = "shortcut")]
    pub keyword: String,
    #[serde(rename = "url")]
    pub destination: String,
}

impl ShortcutEntry {
    pub fn new(keyword: &str, destination: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            destination: destination.to_string(),
        }
    }

    /// Keyword with its leading marker character removed.
    pub fn bare_keyword(&self) -> &str {
        strip_marker(&self.keyword)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultRoute {
    pub keyword: String,
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub content: String,
    pub description: String,
}

/// Drops the first character, whatever it is. Keywords in the shortcut file
/// always carry exactly one marker in front.
pub fn strip_marker(keyword: &str) -> &str {
    let mut chars = keyword.chars();
    chars.next();
    chars.as_str()
}
