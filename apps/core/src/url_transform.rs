use regex::Regex;

use crate::config::Config;

/// Rewrites task-tracker web links into the tracker's desktop URI scheme,
/// e.g. `https://app.todoist.com/app/task/ABC` -> `todoist://task?id=ABC`.
#[derive(Debug, Clone)]
pub struct UrlTransformer {
    task_pattern: Regex,
    task_host: String,
    scheme: String,
}

impl UrlTransformer {
    pub fn new(task_host: &str, scheme: &str) -> Result<Self, regex::Error> {
        let pattern = format!(
            r"^https?://{}/app/task/([a-zA-Z0-9]+)",
            regex::escape(task_host)
        );
        Ok(Self {
            task_pattern: Regex::new(&pattern)?,
            task_host: task_host.to_string(),
            scheme: scheme.to_string(),
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, regex::Error> {
        Self::new(&cfg.task_host, &cfg.task_scheme)
    }

    pub fn task_host(&self) -> &str {
        &self.task_host
    }

    pub fn transform(&self, url: &str) -> String {
        match self.task_pattern.captures(url).and_then(|caps| caps.get(1)) {
            Some(id) => format!("{}://task?id={}", self.scheme, id.as_str()),
            None => url.to_string(),
        }
    }
}
