//! Intercept URL pattern matching.

use url::Url;

use crate::error::{Error, Result};
use crate::protocol::network::UrlPattern;

/// A pattern compiled against normalised URL components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompiledPattern {
    /// Match the whole normalised URL.
    Exact(String),
    /// Match individual components; absent components match anything.
    Components {
        /// Scheme without the colon.
        protocol: Option<String>,
        /// Hostname.
        hostname: Option<String>,
        /// Port, with scheme defaults filled in.
        port: Option<String>,
        /// Path including the leading slash.
        pathname: Option<String>,
        /// Search without the leading question mark.
        search: Option<String>,
    },
}

impl CompiledPattern {
    /// Compile a wire pattern.
    ///
    /// # Errors
    ///
    /// `invalid argument` when a string pattern is not a valid URL.
    pub fn compile(pattern: &UrlPattern) -> Result<Self> {
        match pattern {
            UrlPattern::String { pattern } => {
                let url = Url::parse(pattern).map_err(|e| {
                    Error::invalid_argument(format!("Invalid URL pattern '{pattern}': {e}"))
                })?;
                Ok(Self::Exact(normalise(&url)))
            }
            UrlPattern::Pattern {
                protocol,
                hostname,
                port,
                pathname,
                search,
            } => Ok(Self::Components {
                protocol: protocol
                    .as_ref()
                    .map(|p| p.trim_end_matches(':').to_ascii_lowercase()),
                hostname: hostname.as_ref().map(|h| h.to_ascii_lowercase()),
                port: port.clone(),
                pathname: pathname.as_ref().map(|p| {
                    if p.starts_with('/') {
                        p.clone()
                    } else {
                        format!("/{p}")
                    }
                }),
                search: search.as_ref().map(|s| s.trim_start_matches('?').to_string()),
            }),
        }
    }

    /// Whether the pattern matches a request URL.
    pub fn matches(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        match self {
            Self::Exact(expected) => normalise(&parsed) == *expected,
            Self::Components {
                protocol,
                hostname,
                port,
                pathname,
                search,
            } => {
                if let Some(protocol) = protocol {
                    if parsed.scheme() != protocol {
                        return false;
                    }
                }
                if let Some(hostname) = hostname {
                    if parsed.host_str().unwrap_or("") != hostname {
                        return false;
                    }
                }
                if let Some(port) = port {
                    let effective = parsed
                        .port_or_known_default()
                        .map(|p| p.to_string())
                        .unwrap_or_default();
                    if &effective != port {
                        return false;
                    }
                }
                if let Some(pathname) = pathname {
                    if parsed.path() != pathname {
                        return false;
                    }
                }
                if let Some(search) = search {
                    if parsed.query().unwrap_or("") != search {
                        return false;
                    }
                }
                true
            }
        }
    }
}

/// Normalised URL form used for string-pattern equality.
fn normalise(url: &Url) -> String {
    url.to_string()
}
