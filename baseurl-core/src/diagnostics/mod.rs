mod sink;

pub use sink::*;

use std::fmt;
use thiserror::Error;

/// Non-fatal anomalies raised while detecting the current URL.
///
/// None of these abort request processing. They are handed to a
/// [`DiagnosticSink`] and detection continues with a degraded value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("host '{host}' is not allowed, falling back to 'localhost'; allowed domains: {allowed}")]
    HostNotAllowed { host: String, allowed: AllowedDomains },

    #[error("IDN host '{host}' could not be converted to unicode: {reason}")]
    IdnaUnavailable { host: String, reason: String },

    #[error("detected url '{url}' is not a valid absolute URL, falling back to 'localhost': {reason}")]
    UnparsableHost { url: String, reason: String },
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::HostNotAllowed { .. } => DiagnosticKind::HostNotAllowed,
            Self::IdnaUnavailable { .. } => DiagnosticKind::IdnaUnavailable,
            Self::UnparsableHost { .. } => DiagnosticKind::UnparsableHost,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    HostNotAllowed,
    IdnaUnavailable,
    UnparsableHost,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HostNotAllowed => "host_not_allowed",
            Self::IdnaUnavailable => "idna_unavailable",
            Self::UnparsableHost => "unparsable_host",
        }
    }
}

/// Sorted copy of the allow-list at the time a host was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AllowedDomains(pub Vec<String>);

impl fmt::Display for AllowedDomains {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0.join("\", \""))
    }
}
