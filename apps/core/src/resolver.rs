use log::debug;
use url::Url;

use crate::config::{Config, SearchEngine};
use crate::model::Suggestion;
use crate::shortcut_table::ShortcutTable;
use crate::url_transform::UrlTransformer;

/// Maps omnibox text and navigated URLs onto shortcut destinations.
///
/// The resolver holds only matching policy; the table is passed in on every
/// call so a reload never leaves a resolver pointing at stale data.
#[derive(Debug, Clone)]
pub struct Resolver {
    marker: char,
    search_engines: Vec<SearchEngine>,
    transformer: UrlTransformer,
}

impl Resolver {
    pub fn new(marker: char, search_engines: Vec<SearchEngine>, transformer: UrlTransformer) -> Self {
        Self {
            marker,
            search_engines,
            transformer,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self, regex::Error> {
        Ok(Self::new(
            cfg.marker,
            cfg.search_engines.clone(),
            UrlTransformer::from_config(cfg)?,
        ))
    }

    pub fn marker(&self) -> char {
        self.marker
    }

    pub fn transformer(&self) -> &UrlTransformer {
        &self.transformer
    }

    pub fn resolve_typed_input(&self, table: &ShortcutTable, text: &str) -> Option<String> {
        if let Some(destination) = table.without_marker().get(text) {
            return Some(self.transformer.transform(destination));
        }

        let with_marker = format!("{}{text}", self.marker);
        if let Some(destination) = table.with_marker().get(&with_marker) {
            return Some(self.transformer.transform(destination));
        }

        // Text typed with its marker already attached.
        if let Some(destination) = table.with_marker().get(text) {
            return Some(self.transformer.transform(destination));
        }

        self.default_destination(table)
    }

    pub fn resolve_navigated_url(&self, table: &ShortcutTable, url: &str) -> Option<String> {
        if url.is_empty() {
            return None;
        }

        if self.is_bare_marker(url) {
            return self.default_destination(table);
        }

        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(error) => {
                debug!("url parse error for {url:?}: {error}");
                return None;
            }
        };
        let hostname = parsed.host_str().unwrap_or_default();

        if hostname == self.transformer.task_host() && parsed.path().contains("/app/task/") {
            let transformed = self.transformer.transform(url);
            if transformed != url {
                return Some(transformed);
            }
        }

        if self
            .search_engines
            .iter()
            .any(|engine| engine.matches(hostname, parsed.path()))
        {
            let query = parsed
                .query_pairs()
                .find(|(key, _)| key == "q")
                .map(|(_, value)| value.into_owned());
            if let Some(query) = query.filter(|q| !q.is_empty()) {
                if let Some(destination) = table.with_marker().get(query.trim()) {
                    return Some(self.transformer.transform(destination));
                }
            }
        }

        let lowered = url.to_lowercase();
        if has_malformed_escape(&lowered) {
            debug!("malformed percent escape in {url:?}");
            return None;
        }
        let decoded = match urlencoding::decode(lowered.trim()) {
            Ok(decoded) => decoded.into_owned(),
            Err(error) => {
                debug!("url decode error for {url:?}: {error}");
                return None;
            }
        };

        if let Some(destination) = table.with_marker().get(&decoded) {
            return Some(self.transformer.transform(destination));
        }

        table
            .with_marker()
            .iter()
            .find(|(keyword, _)| address_matches_keyword(&decoded, keyword))
            .map(|(_, destination)| self.transformer.transform(destination))
    }

    pub fn suggestions(&self, table: &ShortcutTable, text: &str) -> Vec<Suggestion> {
        table
            .entries()
            .iter()
            .filter(|entry| text.is_empty() || entry.bare_keyword().contains(text))
            .map(|entry| Suggestion {
                content: entry.bare_keyword().to_string(),
                description: format!("Go to: {} ({})", entry.destination, entry.keyword),
            })
            .collect()
    }

    fn default_destination(&self, table: &ShortcutTable) -> Option<String> {
        table
            .default_route()
            .filter(|route| !route.destination.is_empty())
            .map(|route| self.transformer.transform(&route.destination))
    }

    fn is_bare_marker(&self, url: &str) -> bool {
        let marker = self.marker;
        url == marker.to_string()
            || url == format!("http://{marker}/")
            || url == format!("https://{marker}/")
    }
}

/// True when a `%` is not followed by two hex digits.
fn has_malformed_escape(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.iter().enumerate().any(|(i, byte)| {
        *byte == b'%'
            && !(bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit))
    })
}

fn address_matches_keyword(decoded: &str, keyword: &str) -> bool {
    decoded == keyword
        || decoded == format!("http://{keyword}/")
        || decoded == format!("https://{keyword}/")
        || decoded.ends_with(&format!("/{keyword}"))
        || decoded.ends_with(&format!("/{keyword}/"))
}
