use super::*;
use crate::error::ErrorCode;

fn scope(context: &str, top_level: &str, user_context: &str) -> EventScope {
    EventScope {
        context: Some(context.to_string()),
        top_level_context: Some(top_level.to_string()),
        user_context: Some(user_context.to_string()),
    }
}

#[test]
fn module_subscription_expands_to_leaves() {
    let mut manager = SubscriptionManager::new();
    manager
        .subscribe(&["network".to_string()], &[], &[], None)
        .unwrap();

    let scope = scope("C1", "C1", "default");
    assert!(manager.is_subscribed("network.beforeRequestSent", &scope));
    assert!(manager.is_subscribed("network.responseCompleted", &scope));
    assert!(!manager.is_subscribed("browsingContext.load", &scope));
}

#[test]
fn unknown_event_is_rejected() {
    let mut manager = SubscriptionManager::new();
    let err = manager
        .subscribe(&["network.noSuchEvent".to_string()], &[], &[], None)
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidArgument);
}

#[test]
fn context_scoped_subscription_matches_by_top_level_ancestor() {
    let mut manager = SubscriptionManager::new();
    manager
        .subscribe(
            &["browsingContext.load".to_string()],
            &["TOP".to_string()],
            &[],
            None,
        )
        .unwrap();

    // A child frame of TOP matches through its top-level ancestor.
    assert!(manager.is_subscribed("browsingContext.load", &scope("CHILD", "TOP", "default")));
    assert!(!manager.is_subscribed("browsingContext.load", &scope("OTHER", "OTHER", "default")));
}

#[test]
fn user_context_scope_takes_precedence() {
    let mut manager = SubscriptionManager::new();
    manager
        .subscribe(
            &["log.entryAdded".to_string()],
            &[],
            &["profile-2".to_string()],
            None,
        )
        .unwrap();

    assert!(manager.is_subscribed("log.entryAdded", &scope("C", "C", "profile-2")));
    assert!(!manager.is_subscribed("log.entryAdded", &scope("C", "C", "default")));
}

#[test]
fn cdp_module_matches_every_cdp_event() {
    let mut manager = SubscriptionManager::new();
    manager
        .subscribe(&["cdp".to_string()], &[], &[], None)
        .unwrap();

    let scope = EventScope::global();
    assert!(manager.is_subscribed("cdp.Network.requestWillBeSent", &scope));
    assert!(manager.is_subscribed("cdp.Page.frameNavigated", &scope));
    assert!(!manager.is_subscribed("network.beforeRequestSent", &scope));
}

#[test]
fn unsubscribe_by_id_is_atomic() {
    let mut manager = SubscriptionManager::new();
    let id = manager
        .subscribe(&["log".to_string()], &[], &[], None)
        .unwrap();

    let err = manager
        .unsubscribe_by_id(&[id.clone(), "bogus".to_string()])
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidArgument);
    // The valid id survived the failed call.
    assert!(manager.is_subscribed("log.entryAdded", &EventScope::global()));

    manager.unsubscribe_by_id(&[id]).unwrap();
    assert!(!manager.is_subscribed("log.entryAdded", &EventScope::global()));
}

#[test]
fn unsubscribe_by_attributes_removes_matched_events() {
    let mut manager = SubscriptionManager::new();
    manager
        .subscribe(
            &["network".to_string(), "log".to_string()],
            &[],
            &[],
            None,
        )
        .unwrap();

    manager
        .unsubscribe(&["network".to_string()], None, None)
        .unwrap();

    let scope = EventScope::global();
    assert!(!manager.is_subscribed("network.beforeRequestSent", &scope));
    assert!(manager.is_subscribed("log.entryAdded", &scope));
}

#[test]
fn unsubscribe_without_a_match_fails_and_keeps_records() {
    let mut manager = SubscriptionManager::new();
    manager
        .subscribe(&["log".to_string()], &[], &[], None)
        .unwrap();

    let err = manager
        .unsubscribe(&["network".to_string()], None, None)
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidArgument);
    assert!(manager.is_subscribed("log.entryAdded", &EventScope::global()));
}

#[test]
fn scoped_unsubscribe_splits_the_record() {
    let mut manager = SubscriptionManager::new();
    manager
        .subscribe(
            &["browsingContext.load".to_string()],
            &["A".to_string(), "B".to_string()],
            &[],
            None,
        )
        .unwrap();

    manager
        .unsubscribe(
            &["browsingContext.load".to_string()],
            Some(&["A".to_string()]),
            None,
        )
        .unwrap();

    assert!(!manager.is_subscribed("browsingContext.load", &scope("A", "A", "default")));
    assert!(manager.is_subscribed("browsingContext.load", &scope("B", "B", "default")));
}

#[test]
fn global_unsubscribe_does_not_touch_scoped_records() {
    let mut manager = SubscriptionManager::new();
    manager
        .subscribe(
            &["browsingContext.load".to_string()],
            &["A".to_string()],
            &[],
            None,
        )
        .unwrap();

    // No global record covers the event, so the call must fail.
    let err = manager
        .unsubscribe(&["browsingContext.load".to_string()], None, None)
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidArgument);
    assert!(manager.is_subscribed("browsingContext.load", &scope("A", "A", "default")));
}

#[test]
fn channels_resolve_in_priority_order_without_duplicates() {
    let mut manager = SubscriptionManager::new();
    manager
        .subscribe(&["log".to_string()], &[], &[], Some("late".to_string()))
        .unwrap();
    manager
        .subscribe(&["log".to_string()], &[], &[], None)
        .unwrap();
    manager
        .subscribe(&["log".to_string()], &[], &[], Some("late".to_string()))
        .unwrap();

    let channels = manager.channels_for("log.entryAdded", &EventScope::global());
    assert_eq!(channels, vec![Some("late".to_string()), None]);
}

#[test]
fn module_subscription_check_for_domain_enablement() {
    let mut manager = SubscriptionManager::new();
    manager
        .subscribe(
            &["network.beforeRequestSent".to_string()],
            &[],
            &[],
            None,
        )
        .unwrap();

    assert!(manager.is_module_subscribed("network", &EventScope::global()));
    assert!(!manager.is_module_subscribed("log", &EventScope::global()));
}
