use crate::model::TabId;

/// The two most recently active tabs. Every transition reports whether it
/// changed anything so the caller knows when to persist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabTrackerState {
    pub current: Option<TabId>,
    pub previous: Option<TabId>,
}

impl TabTrackerState {
    pub fn new(current: Option<TabId>, previous: Option<TabId>) -> Self {
        Self { current, previous }
    }

    pub fn on_activated(&mut self, tab_id: TabId) -> bool {
        let before = *self;
        if let Some(current) = self.current {
            if current != tab_id {
                self.previous = Some(current);
            }
        }
        self.current = Some(tab_id);
        *self != before
    }

    pub fn on_removed(&mut self, tab_id: TabId) -> bool {
        if self.current == Some(tab_id) {
            self.current = self.previous.take();
            true
        } else if self.previous == Some(tab_id) {
            self.previous = None;
            true
        } else {
            false
        }
    }

    pub fn on_created(&mut self, tab_id: TabId) -> bool {
        if self.current.is_none() {
            self.current = Some(tab_id);
            return true;
        }
        false
    }

    /// Drops every remembered id for which `is_alive` returns false.
    pub fn retain_alive(&mut self, mut is_alive: impl FnMut(TabId) -> bool) -> bool {
        let before = *self;
        self.current = self.current.filter(|id| is_alive(*id));
        self.previous = self.previous.filter(|id| is_alive(*id));
        *self != before
    }

    pub fn adopt_previous(&mut self, tab_id: TabId) -> bool {
        let changed = self.previous != Some(tab_id);
        self.previous = Some(tab_id);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::TabTrackerState;

    #[test]
    fn activation_shifts_current_into_previous() {
        let mut state = TabTrackerState::default();
        assert!(state.on_activated(2));
        assert_eq!(state, TabTrackerState::new(Some(2), None));

        assert!(state.on_activated(5));
        assert_eq!(state, TabTrackerState::new(Some(5), Some(2)));
    }

    #[test]
    fn reactivating_current_is_a_no_op() {
        let mut state = TabTrackerState::new(Some(5), Some(2));
        assert!(!state.on_activated(5));
        assert_eq!(state, TabTrackerState::new(Some(5), Some(2)));
    }

    #[test]
    fn removing_current_promotes_previous() {
        let mut state = TabTrackerState::default();
        state.on_activated(2);
        state.on_activated(5);
        assert!(state.on_removed(5));
        assert_eq!(state, TabTrackerState::new(Some(2), None));
    }

    #[test]
    fn removing_current_with_previous_seven() {
        let mut state = TabTrackerState::new(Some(3), Some(7));
        assert!(state.on_removed(3));
        assert_eq!(state, TabTrackerState::new(Some(7), None));
    }

    #[test]
    fn removing_previous_clears_it() {
        let mut state = TabTrackerState::new(Some(3), Some(7));
        assert!(state.on_removed(7));
        assert_eq!(state, TabTrackerState::new(Some(3), None));
    }

    #[test]
    fn removing_unknown_tab_changes_nothing() {
        let mut state = TabTrackerState::new(Some(3), Some(7));
        assert!(!state.on_removed(99));
        assert_eq!(state, TabTrackerState::new(Some(3), Some(7)));
    }

    #[test]
    fn created_only_fills_empty_current() {
        let mut state = TabTrackerState::default();
        assert!(state.on_created(4));
        assert!(!state.on_created(8));
        assert_eq!(state, TabTrackerState::new(Some(4), None));
    }

    #[test]
    fn retain_alive_clears_stale_ids() {
        let mut state = TabTrackerState::new(Some(3), Some(7));
        assert!(state.retain_alive(|id| id == 7));
        assert_eq!(state, TabTrackerState::new(None, Some(7)));
        assert!(!state.retain_alive(|_| true));
    }
}
