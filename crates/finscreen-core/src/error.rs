use finscreen_fields::ValidationResult;
use serde::Serialize;
use thiserror::Error;

use crate::http_client::HttpError;

/// Ticker validation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TickerError {
    #[error("ticker cannot be empty")]
    Empty,
    #[error("ticker length {len} exceeds max {max}")]
    TooLong { len: usize, max: usize },
    #[error("ticker must start with an ASCII letter: '{ch}'")]
    InvalidStart { ch: char },
    #[error("ticker contains invalid character '{ch}' at index {index}")]
    InvalidChar { ch: char, index: usize },
}

/// Rejected screening filters. Raised while building or compiling a filter
/// spec, always before any network activity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("'{first}' and '{second}' cannot be combined")]
    Conflicting { first: String, second: String },
}

impl FilterError {
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn conflicting(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::Conflicting {
            first: first.into(),
            second: second.into(),
        }
    }

    /// The offending key (the first one for conflicts).
    pub fn key(&self) -> &str {
        match self {
            Self::InvalidValue { key, .. } => key,
            Self::Conflicting { first, .. } => first,
        }
    }
}

/// Why a single response row was dropped.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseIssue {
    #[error("row has no ticker")]
    MissingTicker,
    #[error("invalid ticker '{value}': {reason}")]
    InvalidTicker { value: String, reason: String },
    #[error("row has no usable values")]
    EmptyRow,
    #[error("unreadable row: {message}")]
    Malformed { message: String },
}

/// Whole-response conditions that produce an empty, non-fatal result.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseIssue {
    #[error("expected CSV but received an HTML document")]
    UnexpectedHtml,
    #[error("no results table found in the HTML document")]
    NoTable,
    #[error("response body is empty")]
    EmptyBody,
    #[error("unreadable CSV header: {message}")]
    MalformedHeader { message: String },
}

/// Top-level error for screening calls.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    InvalidTicker(#[from] TickerError),

    #[error("no API key configured; set FINVIZ_API_KEY")]
    MissingApiKey,

    #[error("request failed after {attempts} attempt(s): {source}")]
    Network {
        attempts: u32,
        #[source]
        source: HttpError,
    },

    #[error("upstream returned HTTP {status} after {attempts} attempt(s)")]
    Status { status: u16, attempts: u32 },

    #[error("unknown fields requested: {}", .0.invalid_fields.join(", "))]
    UnknownFields(ValidationResult),
}

impl ScreenError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Filter(FilterError::InvalidValue { .. }) => "screen.invalid_filter",
            Self::Filter(FilterError::Conflicting { .. }) => "screen.conflicting_filter",
            Self::InvalidTicker(_) => "screen.invalid_ticker",
            Self::MissingApiKey => "screen.missing_api_key",
            Self::Network { .. } => "screen.network",
            Self::Status { .. } => "screen.upstream_status",
            Self::UnknownFields(_) => "screen.unknown_fields",
        }
    }

    /// Whether a later call with the same input may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { source, .. } => source.retryable(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
