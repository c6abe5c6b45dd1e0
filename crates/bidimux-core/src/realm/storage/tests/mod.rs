use bidimux_cdp::CdpSession;

use super::*;
use crate::error::ErrorCode;
use crate::realm::{Realm, RealmType};
use crate::test_support::FakeBrowser;

fn realm(
    browser: &FakeBrowser,
    session_id: &str,
    context: Option<&str>,
    execution_context: i64,
    sandbox: Option<&str>,
) -> Realm {
    Realm::new(
        RealmType::Window,
        context.map(str::to_string),
        execution_context,
        "https://example.com",
        sandbox.map(str::to_string),
        CdpSession::attached(browser.connection.clone(), session_id),
    )
}

#[tokio::test]
async fn default_and_sandbox_realms_resolve_separately() {
    let browser = FakeBrowser::ok();
    let mut storage = RealmStorage::new();
    let default = realm(&browser, "S1", Some("C1"), 1, None);
    let sandboxed = realm(&browser, "S1", Some("C1"), 2, Some("probe"));
    storage.add(default.clone());
    storage.add(sandboxed.clone());

    assert_eq!(
        storage.find_window_realm("C1", None).unwrap().id(),
        default.id()
    );
    assert_eq!(
        storage.find_window_realm("C1", Some("probe")).unwrap().id(),
        sandboxed.id()
    );
    assert!(storage.find_window_realm("C1", Some("other")).is_none());
    assert!(storage.find_window_realm("C2", None).is_none());
}

#[tokio::test]
async fn lookup_by_execution_context_is_session_scoped() {
    let browser = FakeBrowser::ok();
    let mut storage = RealmStorage::new();
    storage.add(realm(&browser, "S1", Some("C1"), 7, None));

    assert!(storage.find_by_execution_context(Some("S1"), 7).is_some());
    assert!(storage.find_by_execution_context(Some("S2"), 7).is_none());
    assert!(storage.find_by_execution_context(Some("S1"), 8).is_none());
}

#[tokio::test]
async fn unknown_realm_is_no_such_frame() {
    let storage = RealmStorage::new();
    let err = storage.get("missing").unwrap_err();
    assert_eq!(err.code, ErrorCode::NoSuchFrame);
}

#[tokio::test]
async fn removal_by_context_clears_all_its_realms() {
    let browser = FakeBrowser::ok();
    let mut storage = RealmStorage::new();
    storage.add(realm(&browser, "S1", Some("C1"), 1, None));
    storage.add(realm(&browser, "S1", Some("C1"), 2, Some("probe")));
    storage.add(realm(&browser, "S1", Some("C2"), 3, None));

    let removed = storage.remove_for_context("C1");
    assert_eq!(removed.len(), 2);
    assert!(storage.find_window_realm("C1", None).is_none());
    assert!(storage.find_window_realm("C2", None).is_some());
}

#[tokio::test]
async fn removal_by_session_clears_worker_realms_too() {
    let browser = FakeBrowser::ok();
    let mut storage = RealmStorage::new();
    let worker = Realm::new(
        RealmType::DedicatedWorker,
        None,
        1,
        "https://example.com",
        None,
        CdpSession::attached(browser.connection.clone(), "SW"),
    );
    storage.add(worker);
    storage.add(realm(&browser, "S1", Some("C1"), 1, None));

    let removed = storage.remove_for_session(Some("SW"));
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].realm_type(), RealmType::DedicatedWorker);
}

#[tokio::test]
async fn realm_filters_apply() {
    let browser = FakeBrowser::ok();
    let mut storage = RealmStorage::new();
    storage.add(realm(&browser, "S1", Some("C1"), 1, None));
    storage.add(realm(&browser, "S1", Some("C2"), 2, None));

    assert_eq!(storage.realms(None, None).len(), 2);
    assert_eq!(storage.realms(Some("C1"), None).len(), 1);
    assert_eq!(
        storage.realms(None, Some(RealmType::DedicatedWorker)).len(),
        0
    );
}
