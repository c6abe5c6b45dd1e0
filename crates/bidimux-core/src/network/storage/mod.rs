//! Storage of network requests, intercepts, collectors and cache state.

use std::collections::{HashMap, HashSet};

use tracing::debug;
use uuid::Uuid;

use bidimux_cdp::protocol::fetch::{RequestPattern, RequestStage};

use crate::error::{Error, ErrorCode, Result};
use crate::protocol::network::{CacheBehavior, DataType, InterceptPhase, UrlPattern};

use super::NetworkRequest;
use super::url_pattern::CompiledPattern;

/// One registered intercept.
#[derive(Debug)]
pub struct Intercept {
    /// Intercept id.
    pub id: String,
    /// Phases the intercept pauses at.
    pub phases: Vec<InterceptPhase>,
    /// Compiled URL patterns; empty matches everything.
    pub patterns: Vec<CompiledPattern>,
    /// Top-level contexts the intercept is scoped to; empty is global.
    pub contexts: Vec<String>,
}

/// One registered data collector.
#[derive(Debug)]
pub struct DataCollector {
    /// Collector id.
    pub id: String,
    /// Data kinds collected.
    pub data_types: Vec<DataType>,
    /// Per-request byte cap.
    pub max_encoded_data_size: u64,
    /// Top-level contexts the collector is scoped to; empty is global.
    pub contexts: Vec<String>,
    /// User contexts the collector is scoped to; empty is global.
    pub user_contexts: Vec<String>,
}

/// Owner of all network mediation state.
#[derive(Debug, Default)]
pub struct NetworkStorage {
    requests: HashMap<String, NetworkRequest>,
    intercepts: HashMap<String, Intercept>,
    collectors: HashMap<String, DataCollector>,
    /// (collector, request) pairs whose data was released.
    disowned_data: HashSet<(String, String)>,
    /// Cache behavior default for new and existing targets.
    default_cache_behavior: CacheBehavior,
}

impl NetworkStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self {
            requests: HashMap::new(),
            intercepts: HashMap::new(),
            collectors: HashMap::new(),
            disowned_data: HashSet::new(),
            default_cache_behavior: CacheBehavior::Default,
        }
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// The request record for a CDP request id, created on first use.
    pub fn request_mut(
        &mut self,
        request_id: &str,
        context_id: Option<String>,
        session_id: Option<String>,
    ) -> &mut NetworkRequest {
        self.requests
            .entry(request_id.to_string())
            .or_insert_with(|| {
                NetworkRequest::new(request_id, context_id.clone(), session_id.clone())
            })
    }

    /// An existing request record.
    pub fn existing_request_mut(&mut self, request_id: &str) -> Option<&mut NetworkRequest> {
        self.requests.get_mut(request_id)
    }

    /// An existing request record, read-only.
    pub fn existing_request(&self, request_id: &str) -> Option<&NetworkRequest> {
        self.requests.get(request_id)
    }

    /// A request that is currently paused at an interception phase.
    ///
    /// # Errors
    ///
    /// `no such request` when unknown or not blocked.
    pub fn blocked_request_mut(&mut self, request_id: &str) -> Result<&mut NetworkRequest> {
        match self.requests.get_mut(request_id) {
            Some(request) if request.is_blocked() => Ok(request),
            Some(_) => Err(Error::new(
                ErrorCode::NoSuchRequest,
                format!("Request '{request_id}' is not blocked"),
            )),
            None => Err(Error::new(
                ErrorCode::NoSuchRequest,
                format!("Request '{request_id}' not found"),
            )),
        }
    }

    /// Find the request a Fetch-domain pause belongs to, by network id.
    pub fn request_for_network_id(&mut self, network_id: &str) -> Option<&mut NetworkRequest> {
        self.requests.get_mut(network_id)
    }

    /// Dispose every request owned by a CDP session; used on target
    /// detach.
    pub fn dispose_for_session(&mut self, session_id: &str) {
        for request in self.requests.values_mut() {
            if request.session_id() == Some(session_id) {
                request.dispose();
            }
        }
    }

    // =========================================================================
    // Intercepts
    // =========================================================================

    /// Register an intercept.
    ///
    /// # Errors
    ///
    /// `invalid argument` on empty phases or unparseable patterns.
    pub fn add_intercept(
        &mut self,
        phases: Vec<InterceptPhase>,
        url_patterns: Option<Vec<UrlPattern>>,
        contexts: Vec<String>,
    ) -> Result<String> {
        if phases.is_empty() {
            return Err(Error::invalid_argument("Intercept phases must not be empty"));
        }
        let patterns = url_patterns
            .unwrap_or_default()
            .iter()
            .map(CompiledPattern::compile)
            .collect::<Result<Vec<_>>>()?;

        let id = Uuid::new_v4().to_string();
        debug!(intercept = %id, phases = phases.len(), "Intercept added");
        self.intercepts.insert(
            id.clone(),
            Intercept {
                id: id.clone(),
                phases,
                patterns,
                contexts,
            },
        );
        Ok(id)
    }

    /// Remove an intercept.
    ///
    /// # Errors
    ///
    /// `no such intercept` when the id is unknown.
    pub fn remove_intercept(&mut self, intercept_id: &str) -> Result<()> {
        if self.intercepts.remove(intercept_id).is_none() {
            return Err(Error::new(
                ErrorCode::NoSuchIntercept,
                format!("Intercept '{intercept_id}' not found"),
            ));
        }
        debug!(intercept = %intercept_id, "Intercept removed");
        Ok(())
    }

    /// Whether any intercept exists.
    pub fn has_intercepts(&self) -> bool {
        !self.intercepts.is_empty()
    }

    /// The ids of intercepts matching one pause.
    pub fn matching_intercepts(
        &self,
        phase: InterceptPhase,
        url: &str,
        top_level_context: Option<&str>,
    ) -> Vec<String> {
        let mut ids: Vec<String> = self
            .intercepts
            .values()
            .filter(|intercept| {
                intercept.phases.contains(&phase)
                    && (intercept.contexts.is_empty()
                        || top_level_context
                            .is_some_and(|c| intercept.contexts.iter().any(|i| i == c)))
                    && (intercept.patterns.is_empty()
                        || intercept.patterns.iter().any(|p| p.matches(url)))
            })
            .map(|intercept| intercept.id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// The Fetch domain state all intercepts together require:
    /// the CDP request patterns and whether auth handling is needed.
    pub fn fetch_wanted(&self) -> (Vec<RequestPattern>, bool) {
        let mut stages: Vec<RequestStage> = Vec::new();
        let mut handle_auth = false;
        for intercept in self.intercepts.values() {
            for phase in &intercept.phases {
                match phase {
                    InterceptPhase::BeforeRequestSent => {
                        if !stages.contains(&RequestStage::Request) {
                            stages.push(RequestStage::Request);
                        }
                    }
                    InterceptPhase::ResponseStarted => {
                        if !stages.contains(&RequestStage::Response) {
                            stages.push(RequestStage::Response);
                        }
                    }
                    InterceptPhase::AuthRequired => handle_auth = true,
                }
            }
        }
        // Auth handling still needs the request stream paused at request
        // stage to observe challenges.
        if handle_auth && stages.is_empty() {
            stages.push(RequestStage::Request);
        }

        let patterns = stages
            .into_iter()
            .map(|stage| RequestPattern {
                url_pattern: Some("*".to_string()),
                resource_type: None,
                request_stage: Some(stage),
            })
            .collect();
        (patterns, handle_auth)
    }

    // =========================================================================
    // Cache behavior
    // =========================================================================

    /// The configured default cache behavior.
    pub fn default_cache_behavior(&self) -> CacheBehavior {
        self.default_cache_behavior
    }

    /// Set the default cache behavior for targets without an override.
    pub fn set_default_cache_behavior(&mut self, behavior: CacheBehavior) {
        self.default_cache_behavior = behavior;
    }

    // =========================================================================
    // Data collectors
    // =========================================================================

    /// Register a data collector.
    pub fn add_collector(
        &mut self,
        data_types: Vec<DataType>,
        max_encoded_data_size: u64,
        contexts: Vec<String>,
        user_contexts: Vec<String>,
    ) -> Result<String> {
        if data_types.is_empty() {
            return Err(Error::invalid_argument("dataTypes must not be empty"));
        }
        let id = Uuid::new_v4().to_string();
        self.collectors.insert(
            id.clone(),
            DataCollector {
                id: id.clone(),
                data_types,
                max_encoded_data_size,
                contexts,
                user_contexts,
            },
        );
        debug!(collector = %id, "Data collector added");
        Ok(id)
    }

    /// Remove a data collector.
    ///
    /// # Errors
    ///
    /// `no such network collector` when the id is unknown.
    pub fn remove_collector(&mut self, collector_id: &str) -> Result<()> {
        if self.collectors.remove(collector_id).is_none() {
            return Err(Error::new(
                ErrorCode::NoSuchNetworkCollector,
                format!("Collector '{collector_id}' not found"),
            ));
        }
        self.disowned_data
            .retain(|(collector, _)| collector != collector_id);
        Ok(())
    }

    /// Whether any collector wants response bodies for a context.
    pub fn collects_for(&self, top_level_context: Option<&str>, user_context: &str) -> bool {
        self.collectors.values().any(|collector| {
            (collector.contexts.is_empty()
                || top_level_context.is_some_and(|c| collector.contexts.iter().any(|i| i == c)))
                && (collector.user_contexts.is_empty()
                    || collector.user_contexts.iter().any(|u| u == user_context))
        })
    }

    /// Validate a getData call and resolve the collector to charge.
    ///
    /// # Errors
    ///
    /// `no such network collector` for unknown collectors, `no such
    /// request` for unknown requests, `no such network data` when the
    /// data was disowned or never collected.
    pub fn validate_get_data(
        &self,
        request_id: &str,
        collector_id: Option<&str>,
    ) -> Result<&DataCollector> {
        if !self.requests.contains_key(request_id) {
            return Err(Error::new(
                ErrorCode::NoSuchRequest,
                format!("Request '{request_id}' not found"),
            ));
        }
        let collector = match collector_id {
            Some(id) => self.collectors.get(id).ok_or_else(|| {
                Error::new(
                    ErrorCode::NoSuchNetworkCollector,
                    format!("Collector '{id}' not found"),
                )
            })?,
            None => self.collectors.values().next().ok_or_else(|| {
                Error::new(
                    ErrorCode::NoSuchNetworkData,
                    format!("No collector holds data for request '{request_id}'"),
                )
            })?,
        };
        if self
            .disowned_data
            .contains(&(collector.id.clone(), request_id.to_string()))
        {
            return Err(Error::new(
                ErrorCode::NoSuchNetworkData,
                format!("Data for request '{request_id}' was released"),
            ));
        }
        Ok(collector)
    }

    /// Release collected data for one (collector, request) pair.
    ///
    /// # Errors
    ///
    /// Propagates the same errors as [`Self::validate_get_data`].
    pub fn disown_data(&mut self, request_id: &str, collector_id: &str) -> Result<()> {
        self.validate_get_data(request_id, Some(collector_id))?;
        self.disowned_data
            .insert((collector_id.to_string(), request_id.to_string()));
        Ok(())
    }
}
