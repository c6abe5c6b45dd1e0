//! Client-registered preload scripts.
//!
//! A preload script is a function the mediator injects at document start
//! into every matching realm, via `Page.addScriptToEvaluateOnNewDocument`.
//! Channel arguments are materialised as in-page queues under well-known
//! globals; the realm router attaches a pump to each when the realm shows
//! up.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, ErrorCode, Result};
use crate::protocol::value::ChannelProperties;
use crate::realm::channel::CHANNEL_FACTORY;

/// The global name a preload channel queue is parked under.
pub fn channel_global_name(script_id: &str, index: usize) -> String {
    format!("__bidiChannel_{}_{index}", script_id.replace('-', ""))
}

/// One registered preload script.
#[derive(Debug, Clone)]
pub struct PreloadScript {
    /// BiDi script id.
    pub id: String,
    /// The user-supplied function source.
    pub function_declaration: String,
    /// Channel arguments, in argument order.
    pub channels: Vec<ChannelProperties>,
    /// Sandbox to evaluate in, if any.
    pub sandbox: Option<String>,
    /// Top-level contexts the script is scoped to; `None` is global.
    pub contexts: Option<Vec<String>>,
    /// User contexts the script is scoped to; `None` is global.
    pub user_contexts: Option<Vec<String>>,
    /// CDP script ids per target, for removal.
    pub cdp_ids: HashMap<String, String>,
}

impl PreloadScript {
    /// Create a script record with a fresh id.
    pub fn new(
        function_declaration: impl Into<String>,
        channels: Vec<ChannelProperties>,
        sandbox: Option<String>,
        contexts: Option<Vec<String>>,
        user_contexts: Option<Vec<String>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            function_declaration: function_declaration.into(),
            channels,
            sandbox,
            contexts,
            user_contexts,
            cdp_ids: HashMap::new(),
        }
    }

    /// The source installed on the CDP side: channel queues are parked
    /// under globals, then the user function runs with their send handles.
    pub fn wrapped_source(&self) -> String {
        let mut source = String::from("(() => {\n");
        let mut send_handles = Vec::new();
        for (index, _channel) in self.channels.iter().enumerate() {
            let global = channel_global_name(&self.id, index);
            source.push_str(&format!(
                "  globalThis['{global}'] = {CHANNEL_FACTORY};\n"
            ));
            send_handles.push(format!("globalThis['{global}'].sendMessage"));
        }
        source.push_str(&format!(
            "  ({})({});\n}})();",
            self.function_declaration,
            send_handles.join(", ")
        ));
        source
    }

    /// Whether the script applies to a top-level context in a user
    /// context.
    pub fn applies_to(&self, top_level_context: &str, user_context: &str) -> bool {
        if let Some(contexts) = &self.contexts {
            return contexts.iter().any(|c| c == top_level_context);
        }
        if let Some(user_contexts) = &self.user_contexts {
            return user_contexts.iter().any(|u| u == user_context);
        }
        true
    }

    /// Whether the script is unscoped.
    pub fn is_global(&self) -> bool {
        self.contexts.is_none() && self.user_contexts.is_none()
    }
}

/// Owner of all preload scripts.
#[derive(Debug, Default)]
pub struct PreloadScriptStorage {
    scripts: HashMap<String, PreloadScript>,
}

impl PreloadScriptStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a script.
    pub fn add(&mut self, script: PreloadScript) -> String {
        let id = script.id.clone();
        debug!(script = %id, channels = script.channels.len(), "Preload script added");
        self.scripts.insert(id.clone(), script);
        id
    }

    /// Remove a script, returning its per-target CDP ids for cleanup.
    ///
    /// # Errors
    ///
    /// `no such script` when the id is unknown.
    pub fn remove(&mut self, script_id: &str) -> Result<PreloadScript> {
        self.scripts.remove(script_id).ok_or_else(|| {
            Error::new(
                ErrorCode::NoSuchScript,
                format!("Preload script '{script_id}' not found"),
            )
        })
    }

    /// Look a script up.
    pub fn get(&self, script_id: &str) -> Option<&PreloadScript> {
        self.scripts.get(script_id)
    }

    /// Record the CDP id a script got on one target.
    pub fn record_cdp_id(&mut self, script_id: &str, target_id: &str, cdp_id: String) {
        if let Some(script) = self.scripts.get_mut(script_id) {
            script.cdp_ids.insert(target_id.to_string(), cdp_id);
        }
    }

    /// Scripts applying to a target of the given scope.
    pub fn scripts_for(&self, top_level_context: &str, user_context: &str) -> Vec<PreloadScript> {
        let mut scripts: Vec<PreloadScript> = self
            .scripts
            .values()
            .filter(|script| script.applies_to(top_level_context, user_context))
            .cloned()
            .collect();
        scripts.sort_by(|a, b| a.id.cmp(&b.id));
        scripts
    }

    /// All scripts.
    pub fn all(&self) -> Vec<PreloadScript> {
        self.scripts.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests;
