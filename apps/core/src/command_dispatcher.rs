use crate::config::{Config, SWITCH_TAB_COMMAND};
use crate::host::TabHost;
use crate::model::TabId;
use crate::tab_tracker::TabTrackerState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionCommand {
    SwitchTab,
    OpenUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    SwitchedTo(TabId),
    Opened(String),
    NoOtherTab,
    Unknown(String),
}

pub fn resolve_command(cfg: &Config, id: &str) -> Option<ExtensionCommand> {
    if id == SWITCH_TAB_COMMAND {
        return Some(ExtensionCommand::SwitchTab);
    }
    cfg.command_url(id)
        .map(|url| ExtensionCommand::OpenUrl(url.to_string()))
}

pub fn dispatch(
    cfg: &Config,
    state: &mut TabTrackerState,
    host: &mut dyn TabHost,
    id: &str,
) -> DispatchOutcome {
    match resolve_command(cfg, id) {
        Some(ExtensionCommand::SwitchTab) => switch_tab(state, host),
        Some(ExtensionCommand::OpenUrl(url)) => {
            host.create_tab(&url);
            DispatchOutcome::Opened(url)
        }
        None => DispatchOutcome::Unknown(id.to_string()),
    }
}

/// Activates the previous tab, or when it is gone, the first other open tab,
/// which then becomes the new previous tab.
pub fn switch_tab(state: &mut TabTrackerState, host: &mut dyn TabHost) -> DispatchOutcome {
    if let Some(previous) = state.previous {
        if host.tab_exists(previous) {
            host.activate_tab(previous);
            return DispatchOutcome::SwitchedTo(previous);
        }
    }

    let tabs = host.list_tabs();
    if tabs.len() < 2 {
        return DispatchOutcome::NoOtherTab;
    }

    match tabs.into_iter().find(|id| Some(*id) != state.current) {
        Some(other) => {
            state.adopt_previous(other);
            host.activate_tab(other);
            DispatchOutcome::SwitchedTo(other)
        }
        None => DispatchOutcome::NoOtherTab,
    }
}
