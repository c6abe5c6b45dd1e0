//! Storage domain types.
//!
//! Browser-context scoped cookie access. BiDi storage partitions are
//! resolved to browser contexts before these commands are issued.

use serde::{Deserialize, Serialize};

use super::network::{Cookie, CookieParam};
use super::target_domain::BrowserContextId;

/// Parameters for Storage.getCookies.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GetCookiesParams {
    /// Browser context to get cookies for; default context when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_context_id: Option<BrowserContextId>,
}

/// Result of Storage.getCookies.
#[derive(Debug, Clone, Deserialize)]
pub struct GetCookiesResult {
    /// Cookies in the browser context.
    pub cookies: Vec<Cookie>,
}

/// Parameters for Storage.setCookies.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SetCookiesParams {
    /// Cookies to set.
    pub cookies: Vec<CookieParam>,
    /// Browser context to set cookies in; default context when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_context_id: Option<BrowserContextId>,
}
