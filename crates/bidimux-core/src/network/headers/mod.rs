//! Header and cookie translation between the two protocols.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;

use bidimux_cdp::protocol::fetch::HeaderEntry;
use bidimux_cdp::protocol::network::{
    Cookie as CdpCookie, CookieParam, CookieSameSite, Headers as CdpHeaders,
};

use crate::protocol::network::{BytesValue, Cookie, Header, SameSite, SetCookieHeader};

/// CDP header map to BiDi header list.
///
/// CDP folds repeated headers into one newline-separated value; each line
/// becomes its own BiDi header.
pub fn headers_from_cdp(headers: &CdpHeaders) -> Vec<Header> {
    let mut out = Vec::new();
    for (name, value) in headers {
        let value = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        for line in value.split('\n') {
            out.push(Header {
                name: name.clone(),
                value: BytesValue::String {
                    value: line.to_string(),
                },
            });
        }
    }
    out
}

/// Total byte size of a header list, as reported in `headersSize`.
pub fn headers_size(headers: &[Header]) -> u64 {
    headers
        .iter()
        .map(|h| h.name.len() + h.value.byte_len() + ": \r\n".len())
        .sum::<usize>() as u64
}

/// BiDi header list to the Fetch domain's entry list.
pub fn headers_to_fetch(headers: &[Header]) -> Vec<HeaderEntry> {
    headers
        .iter()
        .map(|h| HeaderEntry {
            name: h.name.clone(),
            value: bytes_value_text(&h.value),
        })
        .collect()
}

/// The textual form of a bytes value; base64 payloads are decoded
/// lossily.
pub fn bytes_value_text(value: &BytesValue) -> String {
    match value {
        BytesValue::String { value } => value.clone(),
        BytesValue::Base64 { value } => BASE64
            .decode(value)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default(),
    }
}

/// CDP SameSite to the BiDi spelling; an unset attribute reports as none.
pub fn same_site_from_cdp(same_site: Option<CookieSameSite>) -> SameSite {
    match same_site {
        Some(CookieSameSite::Strict) => SameSite::Strict,
        Some(CookieSameSite::Lax) => SameSite::Lax,
        Some(CookieSameSite::None) | None => SameSite::None,
    }
}

/// BiDi SameSite to CDP; an unset attribute defaults to Lax, matching the
/// browser's own default.
pub fn same_site_to_cdp(same_site: Option<SameSite>) -> CookieSameSite {
    match same_site {
        Some(SameSite::Strict) => CookieSameSite::Strict,
        Some(SameSite::None) => CookieSameSite::None,
        Some(SameSite::Lax) | None => CookieSameSite::Lax,
    }
}

/// CDP cookie to the BiDi shape.
pub fn cookie_from_cdp(cookie: &CdpCookie) -> Cookie {
    Cookie {
        name: cookie.name.clone(),
        value: BytesValue::String {
            value: cookie.value.clone(),
        },
        domain: cookie.domain.clone(),
        path: cookie.path.clone(),
        size: cookie.size.max(0) as u64,
        http_only: cookie.http_only,
        secure: cookie.secure,
        same_site: same_site_from_cdp(cookie.same_site),
        expiry: (!cookie.session && cookie.expires >= 0.0).then(|| cookie.expires as u64),
    }
}

/// A BiDi Set-Cookie header to the CDP cookie parameter used when a
/// response override carries cookies.
pub fn set_cookie_to_cdp(header: &SetCookieHeader) -> CookieParam {
    CookieParam {
        name: header.name.clone(),
        value: header
            .value
            .as_ref()
            .map(bytes_value_text)
            .unwrap_or_default(),
        url: None,
        domain: header.domain.clone(),
        path: header.path.clone(),
        secure: header.secure,
        http_only: header.http_only,
        same_site: Some(same_site_to_cdp(header.same_site)),
        expires: None,
        partition_key: None,
    }
}

/// Render a BiDi Set-Cookie header into its header-line form for
/// Fetch response overrides.
pub fn set_cookie_header_line(header: &SetCookieHeader) -> String {
    let mut line = format!(
        "{}={}",
        header.name,
        header.value.as_ref().map(bytes_value_text).unwrap_or_default()
    );
    if let Some(domain) = &header.domain {
        line.push_str(&format!("; Domain={domain}"));
    }
    if let Some(path) = &header.path {
        line.push_str(&format!("; Path={path}"));
    }
    if let Some(expiry) = &header.expiry {
        line.push_str(&format!("; Expires={expiry}"));
    }
    if let Some(max_age) = header.max_age {
        line.push_str(&format!("; Max-Age={max_age}"));
    }
    if header.secure == Some(true) {
        line.push_str("; Secure");
    }
    if header.http_only == Some(true) {
        line.push_str("; HttpOnly");
    }
    if let Some(same_site) = header.same_site {
        let spelled = match same_site {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        };
        line.push_str(&format!("; SameSite={spelled}"));
    }
    line
}

#[cfg(test)]
mod tests;
