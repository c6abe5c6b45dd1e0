//! Per-frame navigation state machine.
//!
//! Every navigation attempt is a [`NavigationState`] with a mediator-minted
//! uuid; CDP loader ids are internal correlation keys and never surface on
//! the BiDi wire. A frame tracks one current navigation plus at most one
//! pending navigation that has not committed yet.

use std::collections::HashMap;

use tracing::{debug, trace};
use uuid::Uuid;

use crate::wait::Deferred;

/// Terminal outcome of one navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The document finished loading.
    Load,
    /// A newer navigation superseded this one.
    Aborted,
    /// The network load failed.
    Failed,
    /// The navigation stayed within the document.
    Fragment,
}

/// One navigation attempt.
#[derive(Debug, Clone)]
pub struct NavigationState {
    /// Mediator-minted navigation id.
    pub id: String,
    /// Destination URL as currently known.
    pub url: String,
    /// CDP loader backing this navigation, once known.
    pub loader_id: Option<String>,
    /// Whether `navigationStarted` was emitted for this attempt.
    pub started: bool,
    /// Resolves once the attempt reaches a terminal state.
    pub finished: Deferred<NavigationOutcome>,
}

impl NavigationState {
    fn new(url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            url: url.into(),
            loader_id: None,
            started: false,
            finished: Deferred::new(),
        }
    }
}

/// A navigation lifecycle event the tracker asks the caller to emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    /// browsingContext.navigationStarted
    Started {
        /// Navigation id.
        navigation: String,
        /// Destination URL.
        url: String,
    },
    /// browsingContext.navigationCommitted
    Committed {
        /// Navigation id.
        navigation: String,
        /// Committed URL.
        url: String,
    },
    /// browsingContext.fragmentNavigated
    Fragment {
        /// Navigation id.
        navigation: String,
        /// New URL including the fragment.
        url: String,
    },
    /// browsingContext.navigationAborted
    Aborted {
        /// Navigation id.
        navigation: String,
        /// Last known URL.
        url: String,
    },
    /// browsingContext.navigationFailed
    Failed {
        /// Navigation id.
        navigation: String,
        /// Last known URL.
        url: String,
    },
}

/// Navigation bookkeeping for one frame.
#[derive(Debug)]
pub struct NavigationTracker {
    /// The navigation the frame currently displays.
    current: NavigationState,
    /// A navigation that was created but has not committed.
    pending: Option<NavigationState>,
    /// URL requested by an in-flight navigate command.
    pending_url: Option<String>,
    /// Loader id to navigation id for committed and started attempts.
    by_loader: HashMap<String, NavigationState>,
}

impl NavigationTracker {
    /// Create a tracker whose current navigation represents the document
    /// the frame was created with.
    pub fn new(initial_url: impl Into<String>) -> Self {
        let current = NavigationState::new(initial_url);
        // The initial document is already there; nothing to await.
        current.finished.resolve(NavigationOutcome::Load);
        Self {
            current,
            pending: None,
            pending_url: None,
            by_loader: HashMap::new(),
        }
    }

    /// The navigation id the frame currently displays.
    pub fn current_navigation_id(&self) -> &str {
        &self.current.id
    }

    /// The current navigation state.
    pub fn current(&self) -> &NavigationState {
        &self.current
    }

    /// The pending navigation state, if any.
    pub fn pending(&self) -> Option<&NavigationState> {
        self.pending.as_ref()
    }

    /// The URL a navigate command is currently steering towards.
    pub fn pending_url(&self) -> Option<&str> {
        self.pending_url.as_deref()
    }

    /// The navigation a loader belongs to, if known.
    pub fn navigation_for_loader(&self, loader_id: &str) -> Option<&NavigationState> {
        self.by_loader.get(loader_id)
    }

    /// A navigate command was issued: mint the pending navigation.
    ///
    /// Any prior pending attempt is aborted; it only produced events if it
    /// had started.
    pub fn create_pending_navigation(
        &mut self,
        url: impl Into<String>,
    ) -> (NavigationState, Vec<NavigationEvent>) {
        let url = url.into();
        let mut events = Vec::new();
        if let Some(prior) = self.pending.take() {
            prior.finished.resolve(NavigationOutcome::Aborted);
            if prior.started {
                events.push(NavigationEvent::Aborted {
                    navigation: prior.id,
                    url: prior.url,
                });
            }
        }

        let state = NavigationState::new(url.clone());
        debug!(navigation = %state.id, url = %url, "Pending navigation created");
        self.pending = Some(state.clone());
        self.pending_url = Some(url);
        (state, events)
    }

    /// CDP Page.frameStartedNavigating: bind the loader and emit started.
    pub fn frame_started_navigating(
        &mut self,
        loader_id: &str,
        url: &str,
    ) -> Vec<NavigationEvent> {
        let mut events = Vec::new();

        // A fresh attempt supersedes an unfinished current navigation.
        if self.current.started && !self.current.finished.is_settled() {
            self.current.finished.resolve(NavigationOutcome::Aborted);
            events.push(NavigationEvent::Aborted {
                navigation: self.current.id.clone(),
                url: self.current.url.clone(),
            });
        }

        let mut state = match self.pending.take() {
            Some(pending) if pending.loader_id.is_none() => pending,
            Some(pending) => {
                // The pending attempt was already bound to another loader;
                // this is a different navigation.
                pending.finished.resolve(NavigationOutcome::Aborted);
                if pending.started {
                    events.push(NavigationEvent::Aborted {
                        navigation: pending.id,
                        url: pending.url,
                    });
                }
                NavigationState::new(url)
            }
            None => NavigationState::new(url),
        };

        state.loader_id = Some(loader_id.to_string());
        state.url = url.to_string();
        state.started = true;
        events.push(NavigationEvent::Started {
            navigation: state.id.clone(),
            url: state.url.clone(),
        });
        trace!(navigation = %state.id, loader = %loader_id, "Navigation started");

        self.by_loader.insert(loader_id.to_string(), state.clone());
        self.pending = Some(state);
        events
    }

    /// CDP Page.frameNavigated: promote the loader's navigation.
    pub fn frame_navigated(&mut self, loader_id: &str, url: &str) -> Vec<NavigationEvent> {
        let mut events = Vec::new();

        let mut state = match self.by_loader.get(loader_id).cloned() {
            Some(state) => state,
            // Commit without a preceding start (initial documents and
            // some browser-initiated loads).
            None => {
                let state = NavigationState::new(url);
                self.by_loader.insert(loader_id.to_string(), state.clone());
                state
            }
        };

        if state.id != self.current.id {
            if !self.current.finished.is_settled() {
                self.current.finished.resolve(NavigationOutcome::Aborted);
                if self.current.started {
                    events.push(NavigationEvent::Aborted {
                        navigation: self.current.id.clone(),
                        url: self.current.url.clone(),
                    });
                }
            }
            if self
                .pending
                .as_ref()
                .is_some_and(|pending| pending.id == state.id)
            {
                self.pending = None;
                self.pending_url = None;
            }
            state.url = url.to_string();
            self.current = state;
        } else {
            self.current.url = url.to_string();
        }

        debug!(navigation = %self.current.id, url = %url, "Navigation committed");
        events.push(NavigationEvent::Committed {
            navigation: self.current.id.clone(),
            url: self.current.url.clone(),
        });
        events
    }

    /// CDP Page.navigatedWithinDocument with a fragment kind.
    ///
    /// The current navigation id is unchanged; the fragment attempt gets
    /// its own id, reusing a pending loaderless attempt when the fragment
    /// change came from a navigate command.
    pub fn fragment_navigated(&mut self, url: &str) -> Vec<NavigationEvent> {
        let state = match self.pending.take() {
            Some(pending) if pending.loader_id.is_none() => pending,
            other => {
                self.pending = other;
                NavigationState::new(url)
            }
        };
        self.pending_url = None;
        self.current.url = url.to_string();

        state.finished.resolve(NavigationOutcome::Fragment);
        debug!(navigation = %state.id, url = %url, "Fragment navigation");
        vec![NavigationEvent::Fragment {
            navigation: state.id.clone(),
            url: url.to_string(),
        }]
    }

    /// A same-document history update: the URL moves, nothing else.
    pub fn history_updated(&mut self, url: &str) {
        self.current.url = url.to_string();
    }

    /// The load lifecycle event fired for the given loader.
    pub fn load_fired(&mut self, loader_id: &str) {
        if self.current.loader_id.as_deref() == Some(loader_id) {
            self.current.finished.resolve(NavigationOutcome::Load);
        }
        if let Some(state) = self.by_loader.get(loader_id) {
            state.finished.resolve(NavigationOutcome::Load);
        }
    }

    /// Network loading failed for the given loader.
    pub fn loading_failed(&mut self, loader_id: &str, url: &str) -> Vec<NavigationEvent> {
        let Some(state) = self.by_loader.get(loader_id).cloned() else {
            return Vec::new();
        };
        if state.finished.is_settled() {
            return Vec::new();
        }
        state.finished.resolve(NavigationOutcome::Failed);
        if self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.id == state.id)
        {
            self.pending = None;
            self.pending_url = None;
        }
        debug!(navigation = %state.id, "Navigation failed");
        vec![NavigationEvent::Failed {
            navigation: state.id.clone(),
            url: url.to_string(),
        }]
    }

    /// Fail every unfinished attempt; used on context disposal.
    pub fn dispose(&mut self) {
        self.current.finished.resolve(NavigationOutcome::Aborted);
        if let Some(pending) = self.pending.take() {
            pending.finished.resolve(NavigationOutcome::Aborted);
        }
        self.pending_url = None;
    }
}

#[cfg(test)]
mod tests;
