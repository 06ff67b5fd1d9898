//! Hash navigation tracker
//!
//! Owns the [`NavigationLog`], reacts to observed navigations, and answers
//! "which hash should be active after going back". It never touches the DOM:
//! the caller applies the returned hash and listens to the visibility signal.

use std::fmt;

use super::hash::Hash;
use super::history::NavigationLog;

/// Receives the "can go back" signal after every operation
pub trait VisibilityListener {
    fn visibility_changed(&mut self, can_go_back: bool);
}

impl<F: FnMut(bool)> VisibilityListener for F {
    fn visibility_changed(&mut self, can_go_back: bool) {
        self(can_go_back)
    }
}

/// What happened to an observed navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Appended to the log
    Recorded,
    /// Same hash as before, or already the last entry
    Ignored,
    /// Echo of our own programmatic location update
    Suppressed,
}

/// Tracks in-page anchor navigation and provides a synthetic "back"
pub struct HashNavigationTracker {
    log: NavigationLog,
    /// Target of a programmatic update whose notification should be skipped
    pending_programmatic: Option<Hash>,
    listener: Option<Box<dyn VisibilityListener>>,
}

impl fmt::Debug for HashNavigationTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashNavigationTracker")
            .field("log", &self.log)
            .field("pending_programmatic", &self.pending_programmatic)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl Default for HashNavigationTracker {
    fn default() -> Self {
        Self::new(0)
    }
}

impl HashNavigationTracker {
    /// Create a tracker whose log keeps at most `max_entries` (0 = unbounded)
    pub fn new(max_entries: usize) -> Self {
        Self {
            log: NavigationLog::with_capacity(max_entries),
            pending_programmatic: None,
            listener: None,
        }
    }

    /// Attach the visibility listener, replacing any previous one
    pub fn with_listener(mut self, listener: impl VisibilityListener + 'static) -> Self {
        self.set_listener(listener);
        self
    }

    pub fn set_listener(&mut self, listener: impl VisibilityListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Reset the log, seeding `["", initial]` when the page opened on a hash
    pub fn initialize(&mut self, initial: &Hash) {
        self.pending_programmatic = None;
        self.log.seed(initial);
        log::info!(
            "Tracking anchor navigation (initial hash {}, {} entries)",
            initial,
            self.log.len()
        );
        self.emit_visibility();
    }

    /// Record an observed navigation (hash change or anchor click)
    pub fn record_navigation(&mut self, from: &Hash, to: &Hash) -> Observation {
        if let Some(expected) = self.pending_programmatic.take() {
            if &expected == to {
                log::debug!("Skipping our own navigation to {}", to);
                return Observation::Suppressed;
            }
            log::debug!("Expected navigation to {} never arrived", expected);
        }

        if !self.log.record(from, to) {
            log::trace!("Ignoring navigation {} -> {}", from, to);
            return Observation::Ignored;
        }

        log::debug!(
            "Navigated {} -> {} (position {} of {})",
            from,
            to,
            self.log.position(),
            self.log.len()
        );
        self.emit_visibility();
        Observation::Recorded
    }

    /// Step back one entry, returning the hash to restore.
    ///
    /// The caller must update the location without it being observed as a
    /// new navigation: either with a primitive that fires no `hashchange`, or
    /// by calling [`expect_programmatic`](Self::expect_programmatic) first.
    pub fn go_back(&mut self) -> Option<Hash> {
        let target = self.log.back()?;
        log::debug!(
            "Going back to {} (position {}, {} forward)",
            target,
            self.log.position(),
            self.log.forward_len()
        );
        self.emit_visibility();
        Some(target)
    }

    /// Ignore the next observed navigation to `target`.
    ///
    /// One-shot: any observation disarms it, and a non-matching one is
    /// recorded normally.
    pub fn expect_programmatic(&mut self, target: Hash) {
        self.pending_programmatic = Some(target);
    }

    /// Forget everything
    pub fn teardown(&mut self) {
        self.log.clear();
        self.pending_programmatic = None;
        log::info!("Anchor navigation tracking stopped");
        self.emit_visibility();
    }

    pub fn can_go_back(&self) -> bool {
        self.log.can_go_back()
    }

    pub fn entries(&self) -> &[Hash] {
        self.log.entries()
    }

    pub fn position(&self) -> isize {
        self.log.position()
    }

    pub fn current(&self) -> Option<&Hash> {
        self.log.current()
    }

    fn emit_visibility(&mut self) {
        let visible = self.log.can_go_back();
        if let Some(listener) = self.listener.as_mut() {
            listener.visibility_changed(visible);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn h(s: &str) -> Hash {
        Hash::new(s)
    }

    fn strs(tracker: &HashNavigationTracker) -> Vec<&str> {
        tracker.entries().iter().map(Hash::as_str).collect()
    }

    /// Tracker plus a record of every visibility signal it emitted
    fn tracker_with_signals() -> (HashNavigationTracker, Rc<RefCell<Vec<bool>>>) {
        let signals = Rc::new(RefCell::new(Vec::new()));
        let sink = signals.clone();
        let tracker =
            HashNavigationTracker::new(0).with_listener(move |v: bool| sink.borrow_mut().push(v));
        (tracker, signals)
    }

    #[test]
    fn test_initialize_without_hash() {
        let (mut tracker, signals) = tracker_with_signals();
        tracker.initialize(&Hash::top());
        assert!(tracker.entries().is_empty());
        assert_eq!(tracker.position(), -1);
        assert_eq!(*signals.borrow(), vec![false]);
    }

    #[test]
    fn test_initialize_with_hash() {
        let (mut tracker, signals) = tracker_with_signals();
        tracker.initialize(&h("#install"));
        assert_eq!(strs(&tracker), vec!["", "#install"]);
        assert_eq!(tracker.position(), 1);
        assert!(tracker.can_go_back());
        assert_eq!(*signals.borrow(), vec![true]);
    }

    #[test]
    fn test_round_trip() {
        let (mut tracker, signals) = tracker_with_signals();
        tracker.initialize(&Hash::top());

        assert_eq!(tracker.record_navigation(&h(""), &h("#a")), Observation::Recorded);
        assert_eq!(strs(&tracker), vec!["", "#a"]);
        assert_eq!(tracker.position(), 1);
        assert!(tracker.can_go_back());

        assert_eq!(tracker.go_back(), Some(h("")));
        assert_eq!(tracker.position(), 0);
        assert!(!tracker.can_go_back());

        assert_eq!(*signals.borrow(), vec![false, true, false]);
    }

    #[test]
    fn test_multi_hop_and_branch() {
        let mut tracker = HashNavigationTracker::default();
        tracker.initialize(&Hash::top());
        tracker.record_navigation(&h(""), &h("#a"));
        tracker.record_navigation(&h("#a"), &h("#b"));
        assert_eq!(strs(&tracker), vec!["", "#a", "#b"]);
        assert_eq!(tracker.position(), 2);

        assert_eq!(tracker.go_back(), Some(h("#a")));
        assert_eq!(tracker.position(), 1);

        tracker.record_navigation(&h("#a"), &h("#c"));
        assert_eq!(strs(&tracker), vec!["", "#a", "#c"]);
        assert_eq!(tracker.position(), 2);

        assert_eq!(tracker.go_back(), Some(h("#a")));
        assert_eq!(tracker.go_back(), Some(h("")));
        assert_eq!(tracker.position(), 0);
    }

    #[test]
    fn test_current_follows_cursor() {
        let mut tracker = HashNavigationTracker::default();
        tracker.initialize(&Hash::top());
        assert_eq!(tracker.current(), None);

        tracker.record_navigation(&h(""), &h("#a"));
        tracker.record_navigation(&h("#a"), &h("#b"));
        assert_eq!(tracker.current(), Some(&h("#b")));

        tracker.go_back();
        assert_eq!(tracker.current(), Some(&h("#a")));
        assert_eq!(tracker.log.forward_len(), 1);
    }

    #[test]
    fn test_go_back_at_top_is_noop() {
        let (mut tracker, signals) = tracker_with_signals();
        tracker.initialize(&Hash::top());
        assert_eq!(tracker.go_back(), None);
        assert_eq!(tracker.position(), -1);

        tracker.record_navigation(&h(""), &h("#a"));
        tracker.go_back();
        assert_eq!(tracker.go_back(), None);
        assert_eq!(tracker.position(), 0);
        // Guarded no-ops emit nothing
        assert_eq!(*signals.borrow(), vec![false, true, false]);
    }

    #[test]
    fn test_click_then_hashchange_records_once() {
        // An anchor click is seen twice: by the click listener and then by hashchange
        let mut tracker = HashNavigationTracker::default();
        tracker.initialize(&Hash::top());
        assert_eq!(tracker.record_navigation(&h(""), &h("#a")), Observation::Recorded);
        assert_eq!(tracker.record_navigation(&h(""), &h("#a")), Observation::Ignored);
        assert_eq!(strs(&tracker), vec!["", "#a"]);
    }

    #[test]
    fn test_same_hash_is_ignored() {
        let (mut tracker, signals) = tracker_with_signals();
        tracker.initialize(&h("#a"));
        assert_eq!(tracker.record_navigation(&h("#a"), &h("#a")), Observation::Ignored);
        assert_eq!(strs(&tracker), vec!["", "#a"]);
        assert_eq!(tracker.position(), 1);
        assert_eq!(signals.borrow().len(), 1);
    }

    #[test]
    fn test_programmatic_update_is_suppressed_once() {
        let mut tracker = HashNavigationTracker::default();
        tracker.initialize(&Hash::top());
        tracker.record_navigation(&h(""), &h("#a"));
        tracker.record_navigation(&h("#a"), &h("#b"));

        let target = tracker.go_back().unwrap();
        tracker.expect_programmatic(target.clone());
        assert_eq!(
            tracker.record_navigation(&h("#b"), &target),
            Observation::Suppressed
        );
        assert_eq!(strs(&tracker), vec!["", "#a", "#b"]);
        assert_eq!(tracker.position(), 1);

        // The filter is gone: a real navigation to #a is not swallowed later
        tracker.go_back();
        assert_eq!(tracker.record_navigation(&h(""), &h("#a")), Observation::Recorded);
        assert_eq!(strs(&tracker), vec!["", "#a"]);
    }

    #[test]
    fn test_unmatched_expectation_records_normally() {
        let mut tracker = HashNavigationTracker::default();
        tracker.initialize(&Hash::top());
        tracker.record_navigation(&h(""), &h("#a"));
        tracker.expect_programmatic(h(""));
        assert_eq!(tracker.record_navigation(&h("#a"), &h("#b")), Observation::Recorded);
        assert_eq!(strs(&tracker), vec!["", "#a", "#b"]);
    }

    #[test]
    fn test_teardown() {
        let (mut tracker, signals) = tracker_with_signals();
        tracker.initialize(&h("#a"));
        tracker.record_navigation(&h("#a"), &h("#b"));
        tracker.expect_programmatic(h("#a"));
        tracker.teardown();

        assert!(tracker.entries().is_empty());
        assert_eq!(tracker.position(), -1);
        assert!(!tracker.can_go_back());
        assert_eq!(signals.borrow().last(), Some(&false));

        // Pending suppression didn't survive teardown
        tracker.initialize(&Hash::top());
        assert_eq!(tracker.record_navigation(&h(""), &h("#a")), Observation::Recorded);
    }

    #[test]
    fn test_bounded_tracker() {
        let mut tracker = HashNavigationTracker::new(4);
        tracker.initialize(&Hash::top());
        for (from, to) in [("", "#a"), ("#a", "#b"), ("#b", "#c"), ("#c", "#d"), ("#d", "#e")] {
            tracker.record_navigation(&h(from), &h(to));
        }
        assert_eq!(strs(&tracker), vec!["#b", "#c", "#d", "#e"]);
        assert_eq!(tracker.position(), 3);
    }
}
