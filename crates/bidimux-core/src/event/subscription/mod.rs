//! Subscription records and scope resolution.
//!
//! Subscriptions are flat records, not a nested map. Module names are
//! unrolled to their leaf event names when the subscription is created, so
//! leaves added to the protocol later are not retroactively included. The
//! `cdp` module is the exception: its event space is the open set of CDP
//! events, so the module name itself is stored and matched by prefix.

use std::collections::HashSet;

use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Leaf event names per module, used to unroll module subscriptions.
const EVENT_CATALOG: &[(&str, &[&str])] = &[
    (
        "browsingContext",
        &[
            "browsingContext.contextCreated",
            "browsingContext.contextDestroyed",
            "browsingContext.navigationStarted",
            "browsingContext.navigationCommitted",
            "browsingContext.fragmentNavigated",
            "browsingContext.navigationAborted",
            "browsingContext.navigationFailed",
            "browsingContext.domContentLoaded",
            "browsingContext.load",
            "browsingContext.userPromptOpened",
            "browsingContext.userPromptClosed",
        ],
    ),
    (
        "network",
        &[
            "network.authRequired",
            "network.beforeRequestSent",
            "network.fetchError",
            "network.responseCompleted",
            "network.responseStarted",
        ],
    ),
    (
        "script",
        &[
            "script.message",
            "script.realmCreated",
            "script.realmDestroyed",
        ],
    ),
    ("log", &["log.entryAdded"]),
];

/// Modules whose event space is open-ended; subscribing stores the module
/// name itself and events match by prefix.
const WILDCARD_MODULES: &[&str] = &["cdp", "goog:cdp"];

/// Expand one requested name into the set of stored names.
///
/// A leaf name is stored as-is; a known module name becomes its leaves; a
/// wildcard module is stored as the bare module name.
fn expand_event_name(name: &str) -> Result<Vec<String>> {
    if WILDCARD_MODULES.contains(&name) {
        return Ok(vec![name.to_string()]);
    }
    for (module, leaves) in EVENT_CATALOG {
        if name == *module {
            return Ok(leaves.iter().map(ToString::to_string).collect());
        }
        if leaves.contains(&name) {
            return Ok(vec![name.to_string()]);
        }
    }
    // Raw CDP event subscriptions like "cdp.Network.requestWillBeSent".
    for module in WILDCARD_MODULES {
        if name.starts_with(&format!("{module}.")) {
            return Ok(vec![name.to_string()]);
        }
    }
    Err(Error::invalid_argument(format!("Unknown event '{name}'")))
}

/// Where an event happened, as far as scoping is concerned.
#[derive(Debug, Clone, Default)]
pub struct EventScope {
    /// The context the event references, if any.
    pub context: Option<String>,
    /// Top-level ancestor of that context.
    pub top_level_context: Option<String>,
    /// User context owning that context.
    pub user_context: Option<String>,
}

impl EventScope {
    /// A global event not tied to any context.
    pub fn global() -> Self {
        Self::default()
    }
}

/// One subscription record.
#[derive(Debug, Clone)]
pub struct Subscription {
    /// Unique subscription id.
    pub id: String,
    /// Stored event names: leaves, plus bare wildcard module names.
    pub event_names: HashSet<String>,
    /// Top-level context scope; empty means unscoped.
    pub top_level_contexts: HashSet<String>,
    /// User context scope; empty means unscoped.
    pub user_contexts: HashSet<String>,
    /// Side-channel the subscriber registered on.
    pub channel: Option<String>,
    /// Monotonic creation order.
    pub priority: u64,
}

impl Subscription {
    /// Whether this record covers the event name.
    fn covers_event(&self, event: &str) -> bool {
        if self.event_names.contains(event) {
            return true;
        }
        // Wildcard module records match by module prefix.
        WILDCARD_MODULES.iter().any(|module| {
            self.event_names.contains(*module) && event.starts_with(&format!("{module}."))
        })
    }

    /// Whether this record's scope matches the event scope.
    ///
    /// User-context scope takes precedence over context scope; a record
    /// with neither is global.
    fn covers_scope(&self, scope: &EventScope) -> bool {
        if !self.user_contexts.is_empty() {
            return scope
                .user_context
                .as_ref()
                .is_some_and(|uc| self.user_contexts.contains(uc));
        }
        if !self.top_level_contexts.is_empty() {
            return scope
                .top_level_context
                .as_ref()
                .is_some_and(|tl| self.top_level_contexts.contains(tl));
        }
        true
    }

    /// Whether this record is unscoped.
    fn is_global(&self) -> bool {
        self.top_level_contexts.is_empty() && self.user_contexts.is_empty()
    }
}

/// The flat set of all subscription records.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    subscriptions: Vec<Subscription>,
    next_priority: u64,
}

impl SubscriptionManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscription and return its id.
    ///
    /// # Errors
    ///
    /// `invalid argument` when an event name is unknown.
    pub fn subscribe(
        &mut self,
        events: &[String],
        contexts: &[String],
        user_contexts: &[String],
        channel: Option<String>,
    ) -> Result<String> {
        let mut event_names = HashSet::new();
        for event in events {
            event_names.extend(expand_event_name(event)?);
        }
        if event_names.is_empty() {
            return Err(Error::invalid_argument("No events to subscribe to"));
        }

        let id = Uuid::new_v4().to_string();
        let priority = self.next_priority;
        self.next_priority += 1;

        debug!(
            subscription = %id,
            events = event_names.len(),
            contexts = contexts.len(),
            user_contexts = user_contexts.len(),
            "Subscription created"
        );

        self.subscriptions.push(Subscription {
            id: id.clone(),
            event_names,
            top_level_contexts: contexts.iter().cloned().collect(),
            user_contexts: user_contexts.iter().cloned().collect(),
            channel,
            priority,
        });
        Ok(id)
    }

    /// Remove whole records by id, atomically.
    ///
    /// # Errors
    ///
    /// `invalid argument` when any id is unknown; nothing is removed then.
    pub fn unsubscribe_by_id(&mut self, ids: &[String]) -> Result<()> {
        for id in ids {
            if !self.subscriptions.iter().any(|s| &s.id == id) {
                return Err(Error::invalid_argument(format!(
                    "No subscription with id '{id}'"
                )));
            }
        }
        self.subscriptions.retain(|s| !ids.contains(&s.id));
        debug!(removed = ids.len(), "Subscriptions removed by id");
        Ok(())
    }

    /// Remove (event, context) pairs from matching records.
    ///
    /// Every requested event/context pair must be covered by at least one
    /// record on the same channel, or the call fails without mutating.
    /// Records that only partially match are replaced by their remainders.
    ///
    /// # Errors
    ///
    /// `invalid argument` on unknown events or uncovered pairs.
    pub fn unsubscribe(
        &mut self,
        events: &[String],
        contexts: Option<&[String]>,
        channel: Option<&str>,
    ) -> Result<()> {
        let mut requested = HashSet::new();
        for event in events {
            requested.extend(expand_event_name(event)?);
        }

        let is_match = |s: &Subscription, event: &str, context: Option<&str>| -> bool {
            if s.channel.as_deref() != channel || !s.event_names.contains(event) {
                return false;
            }
            match context {
                // A global unsubscribe only touches global records.
                None => s.is_global(),
                // A scoped unsubscribe only touches records scoped to
                // that context.
                Some(c) => s.top_level_contexts.contains(c),
            }
        };

        // Validate first: every pair must be covered.
        let context_slots: Vec<Option<&str>> = match contexts {
            None => vec![None],
            Some(cs) => cs.iter().map(|c| Some(c.as_str())).collect(),
        };
        for event in &requested {
            for context in &context_slots {
                if !self
                    .subscriptions
                    .iter()
                    .any(|s| is_match(s, event, *context))
                {
                    return Err(Error::invalid_argument(format!(
                        "No subscription found for event '{event}'"
                    )));
                }
            }
        }

        // Mutate: drop matched events, split scoped records.
        let mut replacements = Vec::new();
        for subscription in self.subscriptions.drain(..) {
            let touches = requested
                .iter()
                .any(|e| context_slots.iter().any(|c| is_match(&subscription, e, *c)));
            if !touches {
                replacements.push(subscription);
                continue;
            }

            let kept_events: HashSet<String> = subscription
                .event_names
                .iter()
                .filter(|e| !requested.contains(*e))
                .cloned()
                .collect();
            let removed_events: HashSet<String> = subscription
                .event_names
                .iter()
                .filter(|e| requested.contains(*e))
                .cloned()
                .collect();

            // Remainder 1: untouched events keep the original scope.
            if !kept_events.is_empty() {
                let mut keep = subscription.clone();
                keep.event_names = kept_events;
                replacements.push(keep);
            }

            // Remainder 2: touched events survive for contexts outside the
            // request.
            if let Some(requested_contexts) = contexts {
                let kept_contexts: HashSet<String> = subscription
                    .top_level_contexts
                    .iter()
                    .filter(|c| !requested_contexts.contains(*c))
                    .cloned()
                    .collect();
                if !kept_contexts.is_empty() {
                    replacements.push(Subscription {
                        id: Uuid::new_v4().to_string(),
                        event_names: removed_events,
                        top_level_contexts: kept_contexts,
                        user_contexts: subscription.user_contexts.clone(),
                        channel: subscription.channel.clone(),
                        priority: subscription.priority,
                    });
                }
            }
        }
        self.subscriptions = replacements;
        Ok(())
    }

    /// The distinct side-channels that should receive `event` for `scope`,
    /// in subscription-priority order.
    pub fn channels_for(&self, event: &str, scope: &EventScope) -> Vec<Option<String>> {
        let mut matching: Vec<&Subscription> = self
            .subscriptions
            .iter()
            .filter(|s| s.covers_event(event) && s.covers_scope(scope))
            .collect();
        matching.sort_by_key(|s| s.priority);

        let mut seen = Vec::new();
        for subscription in matching {
            if !seen.contains(&subscription.channel) {
                seen.push(subscription.channel.clone());
            }
        }
        seen
    }

    /// Whether any record covers `event` for `scope`.
    pub fn is_subscribed(&self, event: &str, scope: &EventScope) -> bool {
        self.subscriptions
            .iter()
            .any(|s| s.covers_event(event) && s.covers_scope(scope))
    }

    /// Whether any record covers any event of `module` for `scope`.
    ///
    /// Used to decide per-target domain enablement (e.g. `Network.enable`).
    pub fn is_module_subscribed(&self, module: &str, scope: &EventScope) -> bool {
        let prefix = format!("{module}.");
        self.subscriptions.iter().any(|s| {
            s.covers_scope(scope)
                && s.event_names
                    .iter()
                    .any(|e| e == module || e.starts_with(&prefix))
        })
    }

    /// All subscription ids, oldest first.
    pub fn ids(&self) -> Vec<String> {
        let mut records: Vec<&Subscription> = self.subscriptions.iter().collect();
        records.sort_by_key(|s| s.priority);
        records.iter().map(|s| s.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests;
