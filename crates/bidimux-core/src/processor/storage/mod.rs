//! storage.* commands: cookie access across storage partitions.

use serde_json::{Value, json};
use url::Url;

use bidimux_cdp::protocol::network::{
    Cookie as CdpCookie, CookieParam, CookiePartitionKey, DeleteCookiesParams as CdpDeleteCookies,
};
use bidimux_cdp::protocol::storage::{
    GetCookiesParams as CdpGetCookies, GetCookiesResult as CdpGetCookiesResult,
    SetCookiesParams as CdpSetCookies,
};

use crate::error::{Error, Result};
use crate::network::headers::{bytes_value_text, cookie_from_cdp, same_site_to_cdp};
use crate::protocol::storage::{
    CookieFilter, DeleteCookiesParams, GetCookiesParams, GetCookiesResult, PartialCookie,
    PartitionDescriptor, PartitionKey, PartitionKeyResult, SetCookieParams,
};
use crate::session::BidiSession;
use crate::session::user_contexts::UserContextStorage;

/// A resolved storage partition: the CDP browser context plus the source
/// origin used for partitioned cookies.
#[derive(Debug, Clone, Default)]
struct Partition {
    user_context: String,
    browser_context_id: Option<String>,
    source_origin: Option<String>,
}

impl Partition {
    fn key(&self) -> PartitionKey {
        PartitionKey {
            user_context: Some(self.user_context.clone()),
            source_origin: self.source_origin.clone(),
        }
    }
}

async fn resolve_partition(
    session: &BidiSession,
    descriptor: Option<&PartitionDescriptor>,
) -> Result<Partition> {
    match descriptor {
        None => Ok(Partition {
            user_context: crate::session::DEFAULT_USER_CONTEXT.to_string(),
            browser_context_id: None,
            source_origin: None,
        }),
        Some(PartitionDescriptor::Context { context }) => {
            let context = session.contexts().get(context).await?;
            let user_context = context.user_context().to_string();
            let source_origin = Url::parse(&context.url().await)
                .ok()
                .map(|url| url.origin().ascii_serialization());
            Ok(Partition {
                browser_context_id: UserContextStorage::browser_context_id(&user_context)
                    .map(str::to_string),
                user_context,
                source_origin,
            })
        }
        Some(PartitionDescriptor::StorageKey {
            user_context,
            source_origin,
        }) => {
            let user_context = user_context
                .clone()
                .unwrap_or_else(|| crate::session::DEFAULT_USER_CONTEXT.to_string());
            session
                .inner()
                .user_contexts
                .lock()
                .await
                .verify(&user_context)?;
            Ok(Partition {
                browser_context_id: UserContextStorage::browser_context_id(&user_context)
                    .map(str::to_string),
                user_context,
                source_origin: source_origin.clone(),
            })
        }
    }
}

/// Whether a CDP cookie belongs to the partition and passes the filter.
fn cookie_matches(
    cookie: &CdpCookie,
    filter: Option<&CookieFilter>,
    partition: &Partition,
) -> bool {
    // Partitioned cookies only show up in their own partition.
    if let Some(key) = &cookie.partition_key {
        match &partition.source_origin {
            Some(origin) => {
                if &key.top_level_site != origin {
                    return false;
                }
            }
            None => return false,
        }
    }

    let Some(filter) = filter else { return true };
    if filter.name.as_ref().is_some_and(|n| n != &cookie.name) {
        return false;
    }
    if filter
        .value
        .as_ref()
        .is_some_and(|v| bytes_value_text(v) != cookie.value)
    {
        return false;
    }
    if filter.domain.as_ref().is_some_and(|d| d != &cookie.domain) {
        return false;
    }
    if filter.path.as_ref().is_some_and(|p| p != &cookie.path) {
        return false;
    }
    if filter
        .size
        .is_some_and(|s| s != cookie.size.max(0) as u64)
    {
        return false;
    }
    if filter.http_only.is_some_and(|h| h != cookie.http_only) {
        return false;
    }
    if filter.secure.is_some_and(|s| s != cookie.secure) {
        return false;
    }
    if let Some(same_site) = filter.same_site {
        if crate::network::headers::same_site_from_cdp(cookie.same_site) != same_site {
            return false;
        }
    }
    if let Some(expiry) = filter.expiry {
        if cookie.session || (cookie.expires as u64) != expiry {
            return false;
        }
    }
    true
}

async fn partition_cookies(
    session: &BidiSession,
    filter: Option<&CookieFilter>,
    partition: &Partition,
) -> Result<Vec<CdpCookie>> {
    let result: CdpGetCookiesResult = session
        .browser()
        .send(
            "Storage.getCookies",
            Some(CdpGetCookies {
                browser_context_id: partition.browser_context_id.clone(),
            }),
        )
        .await
        .map_err(Error::from)?;

    Ok(result
        .cookies
        .into_iter()
        .filter(|cookie| cookie_matches(cookie, filter, partition))
        .collect())
}

/// storage.getCookies
pub async fn get_cookies(session: &BidiSession, params: GetCookiesParams) -> Result<Value> {
    let partition = resolve_partition(session, params.partition.as_ref()).await?;
    let cookies = partition_cookies(session, params.filter.as_ref(), &partition)
        .await?
        .iter()
        .map(cookie_from_cdp)
        .collect();

    Ok(json!(GetCookiesResult {
        cookies,
        partition_key: partition.key(),
    }))
}

fn cookie_param(cookie: &PartialCookie, partition: &Partition) -> CookieParam {
    CookieParam {
        name: cookie.name.clone(),
        value: bytes_value_text(&cookie.value),
        url: None,
        domain: Some(cookie.domain.clone()),
        path: cookie.path.clone(),
        secure: cookie.secure,
        http_only: cookie.http_only,
        same_site: Some(same_site_to_cdp(cookie.same_site)),
        expires: cookie.expiry.map(|e| e as f64),
        partition_key: partition
            .source_origin
            .as_ref()
            .map(|origin| CookiePartitionKey {
                top_level_site: origin.clone(),
                has_cross_site_ancestor: false,
            }),
    }
}

/// storage.setCookie
pub async fn set_cookie(session: &BidiSession, params: SetCookieParams) -> Result<Value> {
    let partition = resolve_partition(session, params.partition.as_ref()).await?;

    session
        .browser()
        .send_unit(
            "Storage.setCookies",
            Some(CdpSetCookies {
                cookies: vec![cookie_param(&params.cookie, &partition)],
                browser_context_id: partition.browser_context_id.clone(),
            }),
        )
        .await
        .map_err(|err| Error::unknown(format!("Unable to set cookie: {err}")))?;

    Ok(json!(PartitionKeyResult {
        partition_key: partition.key(),
    }))
}

/// storage.deleteCookies
pub async fn delete_cookies(session: &BidiSession, params: DeleteCookiesParams) -> Result<Value> {
    let partition = resolve_partition(session, params.partition.as_ref()).await?;
    let matching = partition_cookies(session, params.filter.as_ref(), &partition).await?;

    for cookie in matching {
        session
            .browser()
            .send_unit(
                "Network.deleteCookies",
                Some(CdpDeleteCookies {
                    name: cookie.name.clone(),
                    url: None,
                    domain: Some(cookie.domain.clone()),
                    path: Some(cookie.path.clone()),
                    partition_key: cookie.partition_key.clone(),
                }),
            )
            .await
            .map_err(Error::from)?;
    }

    Ok(json!(PartitionKeyResult {
        partition_key: partition.key(),
    }))
}
