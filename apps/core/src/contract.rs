use serde::{Deserialize, Serialize};

use crate::model::{Suggestion, TabId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TabsSnapshot {
    pub tabs: Vec<TabId>,
    pub active: Option<TabId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OmniboxInput {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavigationDetails {
    pub tab_id: TabId,
    #[serde(default)]
    pub frame_id: i64,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TabUpdate {
    pub tab_id: TabId,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TabRef {
    pub tab_id: TabId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandInvocation {
    pub command: String,
}

/// Events forwarded by the extension shim, one per frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum HostEvent {
    TabsSnapshot(TabsSnapshot),
    OmniboxInputEntered(OmniboxInput),
    OmniboxInputChanged(OmniboxInput),
    BeforeNavigate(NavigationDetails),
    TabUpdated(TabUpdate),
    TabActivated(TabRef),
    TabRemoved(TabRef),
    TabCreated(TabRef),
    Command(CommandInvocation),
}

/// Operations the shim applies on the service's behalf.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum HostAction {
    UpdateTab { tab_id: Option<TabId>, url: String },
    ActivateTab { tab_id: TabId },
    CreateTab { url: String },
    Suggest { suggestions: Vec<Suggestion> },
}
