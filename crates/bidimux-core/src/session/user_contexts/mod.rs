//! User contexts (browser profiles) and their per-context overrides.

use std::collections::HashMap;

use bidimux_cdp::protocol::emulation::{
    SetGeolocationOverrideParams, SetLocaleOverrideParams, SetScreenOrientationOverrideParams,
    SetTimezoneOverrideParams,
};

use crate::error::{Error, ErrorCode, Result};

/// Id of the browser's default user context.
pub const DEFAULT_USER_CONTEXT: &str = "default";

/// Emulation overrides recorded for re-application on new targets.
#[derive(Debug, Clone, Default)]
pub struct EmulationOverrides {
    /// Geolocation override; `Some(None)` means cleared explicitly.
    pub geolocation: Option<SetGeolocationOverrideParams>,
    /// Locale override.
    pub locale: Option<SetLocaleOverrideParams>,
    /// Timezone override.
    pub timezone: Option<SetTimezoneOverrideParams>,
    /// Screen orientation override.
    pub screen_orientation: Option<SetScreenOrientationOverrideParams>,
}

/// Per-user-context configuration.
#[derive(Debug, Clone, Default)]
pub struct UserContextConfig {
    /// Whether targets of this user context ignore certificate errors.
    pub accept_insecure_certs: Option<bool>,
    /// Emulation overrides scoped to this user context.
    pub overrides: EmulationOverrides,
}

/// Storage of all live user contexts.
///
/// BiDi user context ids equal CDP browser context ids, except for the
/// literal `"default"`, which maps to the absent browser context.
#[derive(Debug)]
pub struct UserContextStorage {
    contexts: HashMap<String, UserContextConfig>,
}

impl Default for UserContextStorage {
    fn default() -> Self {
        let mut contexts = HashMap::new();
        contexts.insert(DEFAULT_USER_CONTEXT.to_string(), UserContextConfig::default());
        Self { contexts }
    }
}

impl UserContextStorage {
    /// Create a storage holding only the default user context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a created user context.
    pub fn add(&mut self, user_context: impl Into<String>, config: UserContextConfig) {
        self.contexts.insert(user_context.into(), config);
    }

    /// Remove a user context.
    ///
    /// # Errors
    ///
    /// `invalid argument` for the default context, `no such user context`
    /// for unknown ids.
    pub fn remove(&mut self, user_context: &str) -> Result<()> {
        if user_context == DEFAULT_USER_CONTEXT {
            return Err(Error::invalid_argument(
                "The default user context cannot be removed",
            ));
        }
        if self.contexts.remove(user_context).is_none() {
            return Err(Error::new(
                ErrorCode::NoSuchUserContext,
                format!("User context '{user_context}' not found"),
            ));
        }
        Ok(())
    }

    /// Assert a user context exists.
    ///
    /// # Errors
    ///
    /// `no such user context` for unknown ids.
    pub fn verify(&self, user_context: &str) -> Result<()> {
        if !self.contexts.contains_key(user_context) {
            return Err(Error::new(
                ErrorCode::NoSuchUserContext,
                format!("User context '{user_context}' not found"),
            ));
        }
        Ok(())
    }

    /// The configuration of a user context, if it exists.
    pub fn config(&self, user_context: &str) -> Option<&UserContextConfig> {
        self.contexts.get(user_context)
    }

    /// Mutable configuration access, creating unknown entries on demand
    /// is deliberately not offered; unknown ids are an error upstream.
    pub fn config_mut(&mut self, user_context: &str) -> Option<&mut UserContextConfig> {
        self.contexts.get_mut(user_context)
    }

    /// All user context ids, the default first.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.contexts.keys().cloned().collect();
        ids.sort_by(|a, b| {
            (a != DEFAULT_USER_CONTEXT)
                .cmp(&(b != DEFAULT_USER_CONTEXT))
                .then(a.cmp(b))
        });
        ids
    }

    /// The CDP browser context id for a BiDi user context id.
    pub fn browser_context_id(user_context: &str) -> Option<&str> {
        (user_context != DEFAULT_USER_CONTEXT).then_some(user_context)
    }

    /// The BiDi user context id for a CDP browser context id.
    pub fn user_context_id(browser_context_id: Option<&str>) -> String {
        browser_context_id
            .unwrap_or(DEFAULT_USER_CONTEXT)
            .to_string()
    }
}

#[cfg(test)]
mod tests;
