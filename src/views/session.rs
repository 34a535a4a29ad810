//! Active-key guard for a page's displayed state.
//!
//! A page shows exactly one cache key at a time. A filter change supersedes
//! any in-flight load by moving the active key; when the superseded load
//! eventually resolves, `apply` drops it instead of letting a slow, stale
//! response clobber the newer view. The result still lands in its own cache
//! slot, which is harmless — the slot is content-addressed.

use crate::viewmodel::ViewState;

pub struct PageSession<V> {
    active_key: Option<String>,
    current: ViewState<V>,
}

impl<V> PageSession<V> {
    pub fn new(loading_message: &str) -> Self {
        PageSession {
            active_key: None,
            current: ViewState::loading(loading_message),
        }
    }

    /// Make `key` the page's active key. Call on mount and on every filter
    /// change, before starting the load.
    pub fn begin(&mut self, key: &str, loading_message: &str) {
        if self.active_key.as_deref() != Some(key) {
            self.active_key = Some(key.to_string());
            self.current = ViewState::loading(loading_message);
        }
    }

    /// Apply a resolved state iff it belongs to the active key.
    ///
    /// Returns false (and changes nothing) for superseded resolutions.
    pub fn apply(&mut self, key: &str, next: ViewState<V>) -> bool {
        if self.active_key.as_deref() != Some(key) {
            log::debug!("dropping superseded resolution for {}", key);
            return false;
        }
        self.current = next;
        true
    }

    pub fn current(&self) -> &ViewState<V> {
        &self.current
    }

    pub fn active_key(&self) -> Option<&str> {
        self.active_key.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_matches_active_key() {
        let mut session: PageSession<u32> = PageSession::new("loading");
        session.begin("a", "loading");
        assert!(session.apply("a", ViewState::Ready { data: 1 }));
        assert!(session.current().is_ready());
    }

    #[test]
    fn test_superseded_resolution_is_dropped() {
        let mut session: PageSession<u32> = PageSession::new("loading");
        session.begin("a", "loading");
        session.begin("b", "loading");

        // The old key's slow response arrives after the filter change.
        assert!(!session.apply("a", ViewState::Ready { data: 1 }));
        assert!(matches!(session.current(), ViewState::Loading { .. }));

        assert!(session.apply("b", ViewState::Ready { data: 2 }));
        assert!(session.current().is_ready());
    }

    #[test]
    fn test_rebeginning_same_key_keeps_current_state() {
        let mut session: PageSession<u32> = PageSession::new("loading");
        session.begin("a", "loading");
        session.apply("a", ViewState::Ready { data: 1 });
        // A revalidation tick re-begins the same key; the shown value stays.
        session.begin("a", "loading");
        assert!(session.current().is_ready());
    }
}
