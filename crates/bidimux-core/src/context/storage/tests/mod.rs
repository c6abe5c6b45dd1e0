use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use bidimux_cdp::CdpSession;

use super::*;
use crate::context::BrowsingContext;
use crate::event::{EventManager, SubscriptionManager};
use crate::queue::ProcessingQueue;
use crate::target::CdpTarget;
use crate::test_support::FakeBrowser;

struct Fixture {
    storage: BrowsingContextStorage,
    _browser: FakeBrowser,
    event_manager: EventManager,
    target: Arc<crate::target::CdpTarget>,
}

async fn fixture() -> Fixture {
    let browser = FakeBrowser::ok();
    let (sink_tx, _sink) = mpsc::unbounded_channel();
    let event_manager = EventManager::new(
        Arc::new(Mutex::new(SubscriptionManager::new())),
        ProcessingQueue::new(sink_tx),
    );
    let target = CdpTarget::new(
        "T1",
        CdpSession::attached(browser.connection.clone(), "S1"),
        CdpSession::browser(browser.connection.clone()),
        false,
    );
    Fixture {
        storage: BrowsingContextStorage::new(),
        _browser: browser,
        event_manager,
        target,
    }
}

impl Fixture {
    fn context(
        &self,
        id: &str,
        parent: Option<&str>,
        top_level: &str,
    ) -> Arc<BrowsingContext> {
        BrowsingContext::new(
            id,
            parent.map(str::to_string),
            top_level,
            "default",
            None,
            "about:blank",
            self.target.clone(),
            self.event_manager.clone(),
        )
    }
}

#[tokio::test]
async fn lookup_errors_use_no_such_frame() {
    let f = fixture().await;
    let err = f.storage.get("missing").await.unwrap_err();
    assert_eq!(err.code, crate::error::ErrorCode::NoSuchFrame);
}

#[tokio::test]
async fn parent_child_edges_stay_consistent() {
    let f = fixture().await;
    f.storage.add_context(f.context("TOP", None, "TOP")).await;
    f.storage
        .add_context(f.context("CHILD", Some("TOP"), "TOP"))
        .await;

    let top = f.storage.get("TOP").await.unwrap();
    assert_eq!(top.children().await, vec!["CHILD".to_string()]);

    let ancestor = f.storage.top_level_ancestor("CHILD").await.unwrap();
    assert_eq!(ancestor.id(), "TOP");

    let err = f.storage.get_top_level("CHILD").await.unwrap_err();
    assert_eq!(err.code, crate::error::ErrorCode::InvalidArgument);
}

#[tokio::test]
async fn delete_cascades_children_first() {
    let f = fixture().await;
    f.storage.add_context(f.context("TOP", None, "TOP")).await;
    f.storage
        .add_context(f.context("MID", Some("TOP"), "TOP"))
        .await;
    f.storage
        .add_context(f.context("LEAF", Some("MID"), "TOP"))
        .await;

    let removed = f.storage.delete_context("TOP").await;
    let ids: Vec<&str> = removed.iter().map(|c| c.id()).collect();
    assert_eq!(ids, vec!["LEAF", "MID", "TOP"]);
    assert!(!f.storage.has_context("TOP").await);
    assert!(!f.storage.has_context("LEAF").await);
}

#[tokio::test]
async fn deleting_a_child_updates_the_parent() {
    let f = fixture().await;
    f.storage.add_context(f.context("TOP", None, "TOP")).await;
    f.storage
        .add_context(f.context("CHILD", Some("TOP"), "TOP"))
        .await;

    f.storage.delete_context("CHILD").await;
    let top = f.storage.get("TOP").await.unwrap();
    assert!(top.children().await.is_empty());
}

#[tokio::test]
async fn tree_respects_depth_limit() {
    let f = fixture().await;
    f.storage.add_context(f.context("TOP", None, "TOP")).await;
    f.storage
        .add_context(f.context("CHILD", Some("TOP"), "TOP"))
        .await;

    let full = f.storage.get_tree(None, None).await.unwrap();
    assert_eq!(full.len(), 1);
    assert_eq!(full[0].children.as_ref().unwrap().len(), 1);
    assert_eq!(full[0].parent, None);

    let shallow = f.storage.get_tree(Some(0), None).await.unwrap();
    assert!(shallow[0].children.is_none());

    let rooted = f.storage.get_tree(None, Some("CHILD")).await.unwrap();
    assert_eq!(rooted[0].context, "CHILD");
    assert_eq!(rooted[0].parent.as_deref(), Some("TOP"));
}
