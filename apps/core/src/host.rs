use crate::contract::HostAction;
use crate::model::TabId;

/// Tab queries and operations the service needs from the browser.
pub trait TabHost {
    fn tab_exists(&self, tab_id: TabId) -> bool;
    fn list_tabs(&self) -> Vec<TabId>;
    /// Active tab of the focused window.
    fn active_tab(&self) -> Option<TabId>;
    /// `None` targets the active tab.
    fn update_tab_url(&mut self, tab_id: Option<TabId>, url: &str);
    fn activate_tab(&mut self, tab_id: TabId);
    fn create_tab(&mut self, url: &str);
}

/// Answers queries from a local copy of the browser's tab set, kept current
/// from lifecycle events, and queues outgoing operations as [`HostAction`]s.
#[derive(Debug, Default)]
pub struct TabMirror {
    tabs: Vec<TabId>,
    active: Option<TabId>,
    outbox: Vec<HostAction>,
}

impl TabMirror {
    pub fn new(tabs: Vec<TabId>, active: Option<TabId>) -> Self {
        let mut mirror = Self::default();
        mirror.replace_snapshot(tabs, active);
        mirror
    }

    pub fn replace_snapshot(&mut self, tabs: Vec<TabId>, active: Option<TabId>) {
        self.tabs.clear();
        for tab_id in tabs {
            self.record_created(tab_id);
        }
        self.active = active.filter(|id| self.tabs.contains(id));
    }

    pub fn record_created(&mut self, tab_id: TabId) {
        if !self.tabs.contains(&tab_id) {
            self.tabs.push(tab_id);
        }
    }

    pub fn record_removed(&mut self, tab_id: TabId) {
        self.tabs.retain(|id| *id != tab_id);
        if self.active == Some(tab_id) {
            self.active = None;
        }
    }

    pub fn record_activated(&mut self, tab_id: TabId) {
        self.record_created(tab_id);
        self.active = Some(tab_id);
    }

    pub fn pending_actions(&self) -> &[HostAction] {
        &self.outbox
    }

    pub fn take_actions(&mut self) -> Vec<HostAction> {
        std::mem::take(&mut self.outbox)
    }
}

impl TabHost for TabMirror {
    fn tab_exists(&self, tab_id: TabId) -> bool {
        self.tabs.contains(&tab_id)
    }

    fn list_tabs(&self) -> Vec<TabId> {
        self.tabs.clone()
    }

    fn active_tab(&self) -> Option<TabId> {
        self.active
    }

    fn update_tab_url(&mut self, tab_id: Option<TabId>, url: &str) {
        self.outbox.push(HostAction::UpdateTab {
            tab_id,
            url: url.to_string(),
        });
    }

    fn activate_tab(&mut self, tab_id: TabId) {
        self.outbox.push(HostAction::ActivateTab { tab_id });
    }

    fn create_tab(&mut self, url: &str) {
        self.outbox.push(HostAction::CreateTab {
            url: url.to_string(),
        });
    }
}
