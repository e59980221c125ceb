// src/checker/http.rs
// =============================================================================
// This module checks if URLs are alive by making HTTP HEAD requests.
//
// Key functionality:
// - One HEAD request per URL, following redirects, with fixed browser-like
//   headers (some sites answer differently without them)
// - The HTTP status is the result: a 404 is a successful check whose
//   status happens to be 404
// - Network failures are recorded on the result, never raised
// - At most `limit` requests in flight, with decile progress reporting
//
// The actual HTTP call sits behind the `Transport` trait so the batch logic
// can be tested without a network.
// =============================================================================

use async_trait::async_trait;
use futures::stream::{self, StreamExt}; // StreamExt gives us .buffer_unordered()
use futures::FutureExt; // FutureExt gives us .catch_unwind()
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, LOCATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::{Serialize, Serializer};
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::error::{CheckError, TransportError};
use super::progress::{ProgressEvent, ProgressTracker};

/// Default number of HEAD requests allowed in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 50;

pub const CHECK_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/41.0.2228.0 Safari/537.36";
pub const CHECK_COOKIE: &str = "cpc=10; path=/;";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_REDIRECTS: usize = 10;

/// Sentinel status recorded when a response arrives without a status code.
pub const NO_STATUS: i32 = -1;

// -----------------------------------------------------------------------------
// Results
// -----------------------------------------------------------------------------

/// What happened when we probed one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The server answered with this HTTP status (any status, 2xx or not)
    Status { code: u16 },
    /// The transport produced a response without a status code
    NoStatus,
    /// The request never produced a response
    Failed { error: TransportError },
}

/// The result of checking a single link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub url: String,
    pub outcome: LinkOutcome,
}

impl CheckResult {
    pub fn status(url: impl Into<String>, code: u16) -> Self {
        Self {
            url: url.into(),
            outcome: LinkOutcome::Status { code },
        }
    }

    pub fn failed(url: impl Into<String>, error: TransportError) -> Self {
        Self {
            url: url.into(),
            outcome: LinkOutcome::Failed { error },
        }
    }

    /// The HTTP status, `-1` when the response had none, `None` on failure.
    pub fn status_code(&self) -> Option<i32> {
        match &self.outcome {
            LinkOutcome::Status { code } => Some(i32::from(*code)),
            LinkOutcome::NoStatus => Some(NO_STATUS),
            LinkOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&TransportError> {
        match &self.outcome {
            LinkOutcome::Failed { error } => Some(error),
            _ => None,
        }
    }

    /// A link is OK when it answered with a 2xx or 3xx status.
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, LinkOutcome::Status { code } if (200..400).contains(&code))
    }
}

// Serialized flat, the way a report consumer expects it:
// {"url": "...", "status_code": 404, "error": null}
impl Serialize for CheckResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Flat<'a> {
            url: &'a str,
            status_code: Option<i32>,
            error: Option<String>,
        }

        Flat {
            url: &self.url,
            status_code: self.status_code(),
            error: self.error().map(ToString::to_string),
        }
        .serialize(serializer)
    }
}

// -----------------------------------------------------------------------------
// Transport
// -----------------------------------------------------------------------------

/// Issues a single HEAD request.
///
/// `Ok(Some(code))` is any HTTP answer, `Ok(None)` a response without a
/// status, `Err` a request that never got an answer.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn head(&self, url: &str) -> Result<Option<u16>, TransportError>;
}

/// The real transport, backed by a pooled reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(CHECK_USER_AGENT));
        headers.insert(COOKIE, HeaderValue::from_static(CHECK_COOKIE));

        // Redirects are followed in `head`: reqwest's own policy strips the
        // Cookie header when a redirect changes host
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn head(&self, url: &str) -> Result<Option<u16>, TransportError> {
        let mut current = Url::parse(url).map_err(|e| TransportError::InvalidUrl(format!("{url}: {e}")))?;

        for hop in 0..=MAX_REDIRECTS {
            let response = self
                .client
                .head(current.clone())
                .send()
                .await
                .map_err(|e| TransportError::from_reqwest(&e))?;

            let status = response.status();
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok());

            // reqwest always carries a status on a response
            let Some(location) = location.filter(|_| is_followed_redirect(status)) else {
                return Ok(Some(status.as_u16()));
            };

            if hop == MAX_REDIRECTS {
                return Err(TransportError::TooManyRedirects);
            }

            let next = current
                .join(location)
                .map_err(|e| TransportError::InvalidUrl(format!("{location}: {e}")))?;
            debug!(from = %current, to = %next, "following redirect");
            current = next;
        }

        Err(TransportError::TooManyRedirects)
    }
}

// The statuses a browser follows; 300 and 304 are answers in their own right
fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

// -----------------------------------------------------------------------------
// Checker
// -----------------------------------------------------------------------------

/// Runs HEAD checks through a transport.
///
/// The checker only holds the transport; every `check_all` call builds its
/// own accumulator, so one checker can serve concurrent batches.
#[derive(Debug)]
pub struct LinkChecker<T = HttpTransport> {
    transport: T,
}

impl LinkChecker<HttpTransport> {
    /// A checker using the real HTTP transport.
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self::with_transport(HttpTransport::new()?))
    }
}

impl<T: Transport> LinkChecker<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Checks one URL. Never fails: problems end up in the result.
    pub async fn check_one(&self, url: &str) -> CheckResult {
        // A panic inside the transport is a failure of this URL only
        let attempt = AssertUnwindSafe(self.transport.head(url))
            .catch_unwind()
            .await;

        let outcome = match attempt {
            Ok(Ok(Some(code))) => LinkOutcome::Status { code },
            Ok(Ok(None)) => LinkOutcome::NoStatus,
            Ok(Err(error)) => LinkOutcome::Failed { error },
            Err(panic) => LinkOutcome::Failed {
                error: TransportError::Panicked(panic_message(panic.as_ref())),
            },
        };

        debug!(url, ?outcome, "checked link");
        CheckResult {
            url: url.to_string(),
            outcome,
        }
    }

    /// Checks every URL with at most `limit` requests in flight.
    ///
    /// Progress milestones are logged at info level.
    pub async fn check_all(&self, urls: &[String], limit: usize) -> Result<Vec<CheckResult>, CheckError> {
        self.check_all_with(urls, limit, |_| {}).await
    }

    /// Like [`check_all`](Self::check_all), also handing every progress
    /// milestone to `on_progress`.
    pub async fn check_all_with<F>(
        &self,
        urls: &[String],
        limit: usize,
        mut on_progress: F,
    ) -> Result<Vec<CheckResult>, CheckError>
    where
        F: FnMut(ProgressEvent),
    {
        if limit == 0 {
            return Err(CheckError::InvalidLimit);
        }

        info!(count = urls.len(), limit, "checking links");

        let total = urls.len();
        let mut tracker = ProgressTracker::new(total);
        let mut tested = Vec::with_capacity(total);

        // URLs are pulled off the front as slots free up; results come back
        // in completion order
        let mut checks = stream::iter(urls)
            .map(|url| self.check_one(url))
            .buffer_unordered(limit);

        while let Some(result) = checks.next().await {
            tested.push(result);
            if let Some(event) = tracker.record() {
                info!("{event}");
                on_progress(event);
            }
        }

        if tested.len() != total {
            return Err(CheckError::Incomplete {
                expected: total,
                received: tracker.completed(),
            });
        }

        Ok(tested)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
