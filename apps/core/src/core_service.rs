use std::time::Duration;

use log::{debug, error, info, warn};
use rusqlite::Connection;

use crate::command_dispatcher::{self, DispatchOutcome};
use crate::config::{validate, Config};
use crate::contract::NavigationDetails;
use crate::host::TabHost;
use crate::model::{Suggestion, TabId};
use crate::resolver::Resolver;
use crate::shortcut_table::{self, ShortcutLoadState, ShortcutTable};
use crate::state_store::{self, StoreError};
use crate::tab_tracker::TabTrackerState;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("config error: {0}")]
    Config(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("task link pattern error: {0}")]
    Pattern(#[from] regex::Error),
    #[error("shortcuts are still loading")]
    NotReady,
}

/// Owns all extension state: the loaded shortcut table, the tab tracker and
/// the store it persists to. Each host event maps to one method.
pub struct ExtensionService {
    config: Config,
    db: Connection,
    resolver: Resolver,
    shortcuts: ShortcutLoadState,
    tabs: TabTrackerState,
}

impl ExtensionService {
    pub fn new(config: Config) -> Result<Self, ServiceError> {
        validate(&config).map_err(ServiceError::Config)?;
        let db = state_store::open_from_config(&config)?;
        Self::with_connection(config, db)
    }

    pub fn with_connection(config: Config, db: Connection) -> Result<Self, ServiceError> {
        validate(&config).map_err(ServiceError::Config)?;
        let resolver = Resolver::from_config(&config)?;
        Ok(Self {
            config,
            db,
            resolver,
            shortcuts: ShortcutLoadState::Pending,
            tabs: TabTrackerState::default(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn shortcuts(&self) -> &ShortcutLoadState {
        &self.shortcuts
    }

    pub fn tab_state(&self) -> TabTrackerState {
        self.tabs
    }

    /// Reads the shortcut file, bounded by `load_timeout_ms`. A failed load is
    /// logged and leaves an empty table behind; returns the entry count.
    pub fn load_shortcuts(&mut self) -> usize {
        let timeout = Duration::from_millis(self.config.load_timeout_ms);
        let result = shortcut_table::load_file(&self.config.shortcuts_path, timeout);
        if let Err(error) = &result {
            error!(
                "failed to load shortcuts from {}: {error}",
                self.config.shortcuts_path.display()
            );
        }
        self.shortcuts = ShortcutLoadState::from_result(result);
        let table = self.shortcuts.table();
        let count = table.map_or(0, ShortcutTable::len);
        match table.and_then(ShortcutTable::default_route) {
            Some(route) => info!("shortcuts loaded count={count} default={}", route.keyword),
            None => info!("shortcuts loaded count={count} default=none"),
        }
        count
    }

    pub fn install_shortcuts(&mut self, table: ShortcutTable) {
        self.shortcuts = ShortcutLoadState::Ready(table);
    }

    pub fn on_omnibox_entered(
        &self,
        host: &mut dyn TabHost,
        text: &str,
    ) -> Result<bool, ServiceError> {
        let table = self.ready_table()?;
        match self.resolver.resolve_typed_input(table, text) {
            Some(url) => {
                debug!("omnibox {text:?} -> {url}");
                host.update_tab_url(None, &url);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn on_omnibox_changed(&self, text: &str) -> Result<Vec<Suggestion>, ServiceError> {
        let table = self.ready_table()?;
        Ok(self.resolver.suggestions(table, text))
    }

    pub fn on_before_navigate(
        &self,
        host: &mut dyn TabHost,
        details: &NavigationDetails,
    ) -> Result<bool, ServiceError> {
        if details.frame_id != 0 {
            return Ok(false);
        }
        self.redirect_navigation(host, details.tab_id, &details.url)
    }

    pub fn on_tab_url_changed(
        &self,
        host: &mut dyn TabHost,
        tab_id: TabId,
        url: &str,
    ) -> Result<bool, ServiceError> {
        self.redirect_navigation(host, tab_id, url)
    }

    fn redirect_navigation(
        &self,
        host: &mut dyn TabHost,
        tab_id: TabId,
        url: &str,
    ) -> Result<bool, ServiceError> {
        let table = self.ready_table()?;
        match self.resolver.resolve_navigated_url(table, url) {
            Some(target) => {
                debug!("tab {tab_id} {url} -> {target}");
                host.update_tab_url(Some(tab_id), &target);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn ready_table(&self) -> Result<&ShortcutTable, ServiceError> {
        self.shortcuts.table().ok_or(ServiceError::NotReady)
    }

    /// Restores the persisted tab pair, dropping ids the host no longer
    /// knows, and falls back to the active tab for an empty current slot.
    pub fn initialize_tab_tracking(&mut self, host: &dyn TabHost) {
        let restored = match state_store::load_tab_state(&self.db) {
            Ok(state) => state,
            Err(error) => {
                warn!("failed to restore tab state: {error}");
                TabTrackerState::default()
            }
        };

        self.tabs = restored;
        if self.tabs.retain_alive(|id| host.tab_exists(id)) {
            info!("dropped stale tab ids from {restored:?}");
        }
        if self.tabs.current.is_none() {
            self.tabs.current = host.active_tab();
        }
        self.persist();
    }

    pub fn on_tab_activated(&mut self, tab_id: TabId) {
        if self.tabs.on_activated(tab_id) {
            self.persist();
        }
    }

    pub fn on_tab_removed(&mut self, tab_id: TabId) {
        if self.tabs.on_removed(tab_id) {
            self.persist();
        }
    }

    pub fn on_tab_created(&mut self, tab_id: TabId) {
        if self.tabs.on_created(tab_id) {
            self.persist();
        }
    }

    pub fn on_command(&mut self, host: &mut dyn TabHost, command: &str) -> DispatchOutcome {
        let before = self.tabs;
        let outcome = command_dispatcher::dispatch(&self.config, &mut self.tabs, host, command);
        match &outcome {
            DispatchOutcome::Unknown(id) => warn!("ignoring unknown command {id:?}"),
            other => debug!("command {command:?} -> {other:?}"),
        }
        if self.tabs != before {
            self.persist();
        }
        outcome
    }

    fn persist(&self) {
        if let Err(error) = state_store::save_tab_state(&self.db, &self.tabs) {
            warn!("failed to persist tab state: {error}");
        }
    }
}
