use super::*;

fn ids(events: &[NavigationEvent]) -> Vec<&'static str> {
    events
        .iter()
        .map(|e| match e {
            NavigationEvent::Started { .. } => "started",
            NavigationEvent::Committed { .. } => "committed",
            NavigationEvent::Fragment { .. } => "fragment",
            NavigationEvent::Aborted { .. } => "aborted",
            NavigationEvent::Failed { .. } => "failed",
        })
        .collect()
}

#[test]
fn command_navigation_runs_started_committed_load() {
    let mut tracker = NavigationTracker::new("about:blank");
    let (pending, events) = tracker.create_pending_navigation("https://x/");
    assert!(events.is_empty());

    let events = tracker.frame_started_navigating("L1", "https://x/");
    assert_eq!(ids(&events), vec!["started"]);
    let NavigationEvent::Started { navigation, .. } = &events[0] else {
        unreachable!();
    };
    assert_eq!(navigation, &pending.id);

    let events = tracker.frame_navigated("L1", "https://x/");
    assert_eq!(ids(&events), vec!["committed"]);
    assert_eq!(tracker.current_navigation_id(), pending.id);

    tracker.load_fired("L1");
    assert_eq!(pending.finished.peek(), Some(NavigationOutcome::Load));
}

#[test]
fn renderer_initiated_navigation_mints_its_own_id() {
    let mut tracker = NavigationTracker::new("about:blank");
    let initial = tracker.current_navigation_id().to_string();

    let events = tracker.frame_started_navigating("L1", "https://x/");
    assert_eq!(ids(&events), vec!["started"]);

    tracker.frame_navigated("L1", "https://x/");
    assert_ne!(tracker.current_navigation_id(), initial);
}

#[test]
fn fragment_navigation_keeps_the_current_navigation() {
    let mut tracker = NavigationTracker::new("https://x/");
    let current = tracker.current_navigation_id().to_string();

    let (pending, _) = tracker.create_pending_navigation("https://x/#a");
    let events = tracker.fragment_navigated("https://x/#a");
    assert_eq!(ids(&events), vec!["fragment"]);
    let NavigationEvent::Fragment { navigation, url } = &events[0] else {
        unreachable!();
    };
    // The fragment attempt resolves the command's pending navigation...
    assert_eq!(navigation, &pending.id);
    assert_eq!(url, "https://x/#a");
    assert_eq!(pending.finished.peek(), Some(NavigationOutcome::Fragment));
    // ...while the current navigation id is untouched.
    assert_eq!(tracker.current_navigation_id(), current);
    assert_eq!(tracker.current().url, "https://x/#a");
}

#[test]
fn spontaneous_fragment_navigation_mints_a_fresh_id() {
    let mut tracker = NavigationTracker::new("https://x/");
    let events = tracker.fragment_navigated("https://x/#spontaneous");
    assert_eq!(ids(&events), vec!["fragment"]);
}

#[test]
fn second_navigate_aborts_the_started_pending_one() {
    let mut tracker = NavigationTracker::new("about:blank");

    let (first, _) = tracker.create_pending_navigation("https://a/");
    tracker.frame_started_navigating("L1", "https://a/");

    let (second, events) = tracker.create_pending_navigation("https://b/");
    assert_eq!(ids(&events), vec!["aborted"]);
    let NavigationEvent::Aborted { navigation, .. } = &events[0] else {
        unreachable!();
    };
    assert_eq!(navigation, &first.id);
    assert_eq!(first.finished.peek(), Some(NavigationOutcome::Aborted));

    let events = tracker.frame_started_navigating("L2", "https://b/");
    assert_eq!(ids(&events), vec!["started"]);

    let events = tracker.frame_navigated("L2", "https://b/");
    assert_eq!(ids(&events), vec!["committed"]);
    assert_eq!(tracker.current_navigation_id(), second.id);
}

#[test]
fn unstarted_pending_aborts_silently() {
    let mut tracker = NavigationTracker::new("about:blank");
    let (first, _) = tracker.create_pending_navigation("https://a/");
    let (_, events) = tracker.create_pending_navigation("https://b/");
    assert!(events.is_empty());
    assert_eq!(first.finished.peek(), Some(NavigationOutcome::Aborted));
}

#[test]
fn new_start_aborts_an_unfinished_current_navigation() {
    let mut tracker = NavigationTracker::new("about:blank");
    tracker.frame_started_navigating("L1", "https://a/");
    tracker.frame_navigated("L1", "https://a/");
    let committed = tracker.current_navigation_id().to_string();

    // load never fired; a fresh navigation starts.
    let events = tracker.frame_started_navigating("L2", "https://b/");
    assert_eq!(ids(&events), vec!["aborted", "started"]);
    let NavigationEvent::Aborted { navigation, .. } = &events[0] else {
        unreachable!();
    };
    assert_eq!(navigation, &committed);
}

#[test]
fn loading_failed_resolves_the_attempt() {
    let mut tracker = NavigationTracker::new("about:blank");
    let (pending, _) = tracker.create_pending_navigation("https://down/");
    tracker.frame_started_navigating("L1", "https://down/");

    let events = tracker.loading_failed("L1", "https://down/");
    assert_eq!(ids(&events), vec!["failed"]);
    assert_eq!(pending.finished.peek(), Some(NavigationOutcome::Failed));
    assert!(tracker.pending().is_none());

    // A second failure report for the same loader is ignored.
    assert!(tracker.loading_failed("L1", "https://down/").is_empty());
}

#[test]
fn dispose_cancels_everything() {
    let mut tracker = NavigationTracker::new("about:blank");
    let (pending, _) = tracker.create_pending_navigation("https://x/");
    tracker.dispose();
    assert_eq!(pending.finished.peek(), Some(NavigationOutcome::Aborted));
    assert!(tracker.pending_url().is_none());
}
