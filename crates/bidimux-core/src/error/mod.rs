//! BiDi error taxonomy.
//!
//! Every failure that surfaces on the BiDi wire is sum-typed by one of the
//! spec-defined error codes. CDP-level failures are mapped into these codes
//! at the call sites that know the context; anything unmapped becomes
//! `unknown error` with the underlying message as the stacktrace.

use thiserror::Error;

use bidimux_cdp::CdpError;

/// Spec-defined BiDi error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Malformed or semantically invalid command parameters.
    InvalidArgument,
    /// A CSS/XPath/text selector failed to parse or match.
    InvalidSelector,
    /// The session id is not known.
    InvalidSessionId,
    /// Pointer coordinates outside the viewport.
    MoveTargetOutOfBounds,
    /// No user prompt is open.
    NoSuchAlert,
    /// The referenced element does not exist.
    NoSuchElement,
    /// The referenced frame does not exist.
    NoSuchFrame,
    /// The referenced handle does not exist.
    NoSuchHandle,
    /// The referenced history entry does not exist.
    NoSuchHistoryEntry,
    /// The referenced network intercept does not exist.
    NoSuchIntercept,
    /// The referenced node does not exist.
    NoSuchNode,
    /// The referenced preload script does not exist.
    NoSuchScript,
    /// The referenced request does not exist.
    NoSuchRequest,
    /// The referenced network data collector does not exist.
    NoSuchNetworkCollector,
    /// The referenced network data is not collected.
    NoSuchNetworkData,
    /// The referenced user context does not exist.
    NoSuchUserContext,
    /// A session could not be created.
    SessionNotCreated,
    /// The command method is not known.
    UnknownCommand,
    /// Any error not covered by a more specific code.
    UnknownError,
    /// The screenshot area was empty or capture failed.
    UnableToCaptureScreen,
    /// The browser could not be closed.
    UnableToCloseBrowser,
    /// A valid command that this implementation does not support.
    UnsupportedOperation,
}

impl ErrorCode {
    /// The wire spelling of the code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid argument",
            Self::InvalidSelector => "invalid selector",
            Self::InvalidSessionId => "invalid session id",
            Self::MoveTargetOutOfBounds => "move target out of bounds",
            Self::NoSuchAlert => "no such alert",
            Self::NoSuchElement => "no such element",
            Self::NoSuchFrame => "no such frame",
            Self::NoSuchHandle => "no such handle",
            Self::NoSuchHistoryEntry => "no such history entry",
            Self::NoSuchIntercept => "no such intercept",
            Self::NoSuchNode => "no such node",
            Self::NoSuchScript => "no such script",
            Self::NoSuchRequest => "no such request",
            Self::NoSuchNetworkCollector => "no such network collector",
            Self::NoSuchNetworkData => "no such network data",
            Self::NoSuchUserContext => "no such user context",
            Self::SessionNotCreated => "session not created",
            Self::UnknownCommand => "unknown command",
            Self::UnknownError => "unknown error",
            Self::UnableToCaptureScreen => "unable to capture screen",
            Self::UnableToCloseBrowser => "unable to close browser",
            Self::UnsupportedOperation => "unsupported operation",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A BiDi-level error: a code, a message and an optional stacktrace.
#[derive(Error, Debug, Clone)]
#[error("{code}: {message}")]
pub struct Error {
    /// Spec-defined error code.
    pub code: ErrorCode,
    /// Human readable message.
    pub message: String,
    /// Stacktrace of the underlying failure, if any.
    pub stacktrace: Option<String>,
}

impl Error {
    /// Build an error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            stacktrace: None,
        }
    }

    /// `invalid argument` with the given message.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    /// `unknown error` carrying the underlying failure as stacktrace.
    pub fn unknown(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            stacktrace: Some(message.clone()),
            code: ErrorCode::UnknownError,
            message,
        }
    }

    /// Attach a stacktrace.
    #[must_use]
    pub fn with_stacktrace(mut self, stacktrace: impl Into<String>) -> Self {
        self.stacktrace = Some(stacktrace.into());
        self
    }
}

impl From<CdpError> for Error {
    /// Fallback mapping for CDP failures that no call site translated into
    /// a more specific code.
    fn from(err: CdpError) -> Self {
        Self::unknown(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_argument(err.to_string())
    }
}

/// Convenience result alias for command handlers.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests;
