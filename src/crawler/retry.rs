//! Retry classification
//!
//! Deciding whether a failed request is worth repeating is a pure function of
//! the transport error kind and the HTTP status, so it can be tested without a
//! network. The fetcher owns the loop and the backoff sleep.

use std::error::Error as StdError;
use std::time::Duration;

/// Default pause before retrying a timeout or a rate limited request
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(3);

/// Transport-level failure categories relevant to retrying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Deadline exceeded
    Timeout,
    /// Redirect limit hit
    TooManyRedirects,
    /// The URL scheme cannot be fetched
    UnsupportedScheme,
    /// TLS certificate was not trusted
    Certificate,
    /// Connection could not be established
    Connect,
    /// Any other transport failure without a response
    Other,
}

impl ErrorKind {
    /// Classifies a reqwest error
    pub fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_redirect() {
            Self::TooManyRedirects
        } else if chain_mentions(err, &["certificate", "unknownissuer"]) {
            Self::Certificate
        } else if err.is_builder() && chain_mentions(err, &["scheme"]) {
            Self::UnsupportedScheme
        } else if err.is_connect() {
            Self::Connect
        } else {
            Self::Other
        }
    }
}

fn chain_mentions(err: &(dyn StdError + 'static), needles: &[&str]) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        let message = e.to_string().to_lowercase();
        if needles.iter().any(|n| message.contains(n)) {
            return true;
        }
        current = e.source();
    }
    false
}

/// Outcome of a retry classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Try again after pausing for `backoff`
    Retry { backoff: Duration },
    /// Give up and surface the outcome as is
    Terminal,
}

impl RetryDecision {
    pub fn is_retry(&self) -> bool {
        matches!(self, Self::Retry { .. })
    }
}

/// Decides whether an attempt should be repeated
///
/// `error` is set when no response was received, `status` when one was.
/// Any `Fn(Option<ErrorKind>, Option<u16>) -> RetryDecision` closure is a policy.
pub trait RetryPolicy: Send + Sync {
    fn decide(&self, error: Option<ErrorKind>, status: Option<u16>) -> RetryDecision;
}

impl<F> RetryPolicy for F
where
    F: Fn(Option<ErrorKind>, Option<u16>) -> RetryDecision + Send + Sync,
{
    fn decide(&self, error: Option<ErrorKind>, status: Option<u16>) -> RetryDecision {
        self(error, status)
    }
}

/// The standard retry table
///
/// | Condition | Decision |
/// |-----------|----------|
/// | Timeout | Retry after backoff |
/// | Too many redirects | Terminal |
/// | Unsupported scheme | Terminal |
/// | Untrusted certificate | Terminal |
/// | No response (connect or other transport failure) | Retry |
/// | HTTP 404 | Terminal |
/// | HTTP 429 | Retry after backoff |
/// | HTTP 5xx except 501 | Retry |
/// | Anything else | Terminal |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseRetryPolicy {
    pub backoff: Duration,
}

impl BaseRetryPolicy {
    pub fn new(backoff: Duration) -> Self {
        Self { backoff }
    }
}

impl Default for BaseRetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BACKOFF)
    }
}

impl RetryPolicy for BaseRetryPolicy {
    fn decide(&self, error: Option<ErrorKind>, status: Option<u16>) -> RetryDecision {
        let retry_now = RetryDecision::Retry {
            backoff: Duration::ZERO,
        };
        let retry_later = RetryDecision::Retry {
            backoff: self.backoff,
        };

        match error {
            Some(ErrorKind::Timeout) => return retry_later,
            Some(ErrorKind::TooManyRedirects)
            | Some(ErrorKind::UnsupportedScheme)
            | Some(ErrorKind::Certificate) => return RetryDecision::Terminal,
            Some(ErrorKind::Connect) | Some(ErrorKind::Other) | None => {}
        }

        match status {
            None => retry_now,
            Some(404) => RetryDecision::Terminal,
            Some(429) => retry_later,
            Some(501) => RetryDecision::Terminal,
            Some(code) if code >= 500 => retry_now,
            Some(_) => RetryDecision::Terminal,
        }
    }
}
