//! Storage of all live realms.

use std::collections::HashMap;

use tracing::debug;

use bidimux_cdp::protocol::runtime::ExecutionContextId;

use crate::error::{Error, ErrorCode, Result};

use super::{Realm, RealmType};

/// Owner of every live [`Realm`], keyed by realm id.
///
/// Browsing contexts hold no realm references; the default realm of a
/// context is resolved by lookup here.
#[derive(Debug, Default)]
pub struct RealmStorage {
    realms: HashMap<String, Realm>,
}

impl RealmStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a realm.
    pub fn add(&mut self, realm: Realm) {
        debug!(realm = %realm.id(), context = ?realm.browsing_context_id(), "Realm registered");
        self.realms.insert(realm.id().to_string(), realm);
    }

    /// Look a realm up by id.
    ///
    /// # Errors
    ///
    /// `no such frame` when the realm is unknown.
    pub fn get(&self, realm_id: &str) -> Result<Realm> {
        self.realms.get(realm_id).cloned().ok_or_else(|| {
            Error::new(ErrorCode::NoSuchFrame, format!("Realm '{realm_id}' not found"))
        })
    }

    /// The window realm of a context: the default realm, or the named
    /// sandbox realm.
    pub fn find_window_realm(&self, context_id: &str, sandbox: Option<&str>) -> Option<Realm> {
        self.realms
            .values()
            .find(|realm| {
                realm.realm_type() == RealmType::Window
                    && realm.browsing_context_id() == Some(context_id)
                    && realm.sandbox() == sandbox
            })
            .cloned()
    }

    /// The realm backed by a CDP execution context on a session.
    pub fn find_by_execution_context(
        &self,
        session_id: Option<&str>,
        execution_context_id: ExecutionContextId,
    ) -> Option<Realm> {
        self.realms
            .values()
            .find(|realm| {
                realm.session().session_id() == session_id
                    && realm.execution_context_id() == execution_context_id
            })
            .cloned()
    }

    /// Realms matching the getRealms filters.
    pub fn realms(
        &self,
        context_id: Option<&str>,
        realm_type: Option<RealmType>,
    ) -> Vec<Realm> {
        let mut found: Vec<Realm> = self
            .realms
            .values()
            .filter(|realm| {
                context_id.is_none_or(|c| realm.browsing_context_id() == Some(c))
                    && realm_type.is_none_or(|t| realm.realm_type() == t)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id().cmp(b.id()));
        found
    }

    /// Remove one realm.
    pub fn remove(&mut self, realm_id: &str) -> Option<Realm> {
        self.realms.remove(realm_id)
    }

    /// Remove the realm backed by a CDP execution context.
    pub fn remove_by_execution_context(
        &mut self,
        session_id: Option<&str>,
        execution_context_id: ExecutionContextId,
    ) -> Option<Realm> {
        let id = self
            .find_by_execution_context(session_id, execution_context_id)?
            .id()
            .to_string();
        self.realms.remove(&id)
    }

    /// Remove every realm of a browsing context; used on context disposal.
    pub fn remove_for_context(&mut self, context_id: &str) -> Vec<Realm> {
        let ids: Vec<String> = self
            .realms
            .values()
            .filter(|realm| realm.browsing_context_id() == Some(context_id))
            .map(|realm| realm.id().to_string())
            .collect();
        ids.iter().filter_map(|id| self.realms.remove(id)).collect()
    }

    /// Remove every realm living on a CDP session; used when the session's
    /// execution contexts are cleared or the target detaches.
    pub fn remove_for_session(&mut self, session_id: Option<&str>) -> Vec<Realm> {
        let ids: Vec<String> = self
            .realms
            .values()
            .filter(|realm| realm.session().session_id() == session_id)
            .map(|realm| realm.id().to_string())
            .collect();
        ids.iter().filter_map(|id| self.realms.remove(id)).collect()
    }
}

#[cfg(test)]
mod tests;
