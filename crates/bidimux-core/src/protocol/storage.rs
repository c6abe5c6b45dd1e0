//! storage module parameters and results.

use serde::{Deserialize, Serialize};

use super::network::{BytesValue, Cookie, SameSite};

/// Which storage partition a cookie command addresses.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PartitionDescriptor {
    /// The partition of a browsing context.
    Context {
        /// Context id.
        context: String,
    },
    /// A storage key partition.
    StorageKey {
        /// User context the partition belongs to.
        #[serde(default)]
        user_context: Option<String>,
        /// Source origin of the partition.
        #[serde(default)]
        source_origin: Option<String>,
    },
}

/// Cookie filter for get/delete.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CookieFilter {
    /// Match by name.
    #[serde(default)]
    pub name: Option<String>,
    /// Match by value.
    #[serde(default)]
    pub value: Option<BytesValue>,
    /// Match by domain.
    #[serde(default)]
    pub domain: Option<String>,
    /// Match by path.
    #[serde(default)]
    pub path: Option<String>,
    /// Match by size.
    #[serde(default)]
    pub size: Option<u64>,
    /// Match by httpOnly attribute.
    #[serde(default)]
    pub http_only: Option<bool>,
    /// Match by secure attribute.
    #[serde(default)]
    pub secure: Option<bool>,
    /// Match by sameSite attribute.
    #[serde(default)]
    pub same_site: Option<SameSite>,
    /// Match by expiry time.
    #[serde(default)]
    pub expiry: Option<u64>,
}

/// A cookie to set.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialCookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: BytesValue,
    /// Cookie domain.
    pub domain: String,
    /// Cookie path.
    #[serde(default)]
    pub path: Option<String>,
    /// HttpOnly attribute.
    #[serde(default)]
    pub http_only: Option<bool>,
    /// Secure attribute.
    #[serde(default)]
    pub secure: Option<bool>,
    /// SameSite attribute.
    #[serde(default)]
    pub same_site: Option<SameSite>,
    /// Expiry, seconds since the epoch.
    #[serde(default)]
    pub expiry: Option<u64>,
}

/// Parameters for storage.getCookies.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GetCookiesParams {
    /// Cookie filter.
    #[serde(default)]
    pub filter: Option<CookieFilter>,
    /// Partition to read from.
    #[serde(default)]
    pub partition: Option<PartitionDescriptor>,
}

/// Parameters for storage.setCookie.
#[derive(Debug, Clone, Deserialize)]
pub struct SetCookieParams {
    /// The cookie to set.
    pub cookie: PartialCookie,
    /// Partition to write to.
    #[serde(default)]
    pub partition: Option<PartitionDescriptor>,
}

/// Parameters for storage.deleteCookies.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DeleteCookiesParams {
    /// Cookie filter.
    #[serde(default)]
    pub filter: Option<CookieFilter>,
    /// Partition to delete from.
    #[serde(default)]
    pub partition: Option<PartitionDescriptor>,
}

/// The partition key echoed by cookie commands.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartitionKey {
    /// User context of the partition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_context: Option<String>,
    /// Source origin of the partition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_origin: Option<String>,
}

/// Result of storage.getCookies.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCookiesResult {
    /// Matching cookies.
    pub cookies: Vec<Cookie>,
    /// The partition the cookies were read from.
    pub partition_key: PartitionKey,
}

/// Result of storage.setCookie and deleteCookies.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionKeyResult {
    /// The partition the command operated on.
    pub partition_key: PartitionKey,
}
