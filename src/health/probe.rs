//! Single bounded HTTP probe.
//!
//! # Responsibilities
//! - Issue one GET against a URL under a hard deadline
//! - Tell "too slow" apart from "could not connect"
//! - Return the status, a bounded body prefix and time-to-headers
//!
//! # Design Decisions
//! - The outcome is decided once the response head arrives; connect and
//!   headers run under the deadline and are cancelled by dropping the future
//! - The body is read afterwards, up to `max_body_bytes` and only for what
//!   is left of the same deadline. A body that is too long, too slow or cut
//!   off leaves `body_complete` false instead of failing the exchange
//! - No retries

use std::future::Future;
use std::time::{Duration, Instant};

use axum::body::{Body, Bytes};
use futures_util::StreamExt;
use axum::http::{header, Method, Request};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use tokio::time;

const USER_AGENT: &str = concat!("service-monitor/", env!("CARGO_PKG_VERSION"));

/// Result of one probe attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// Response headers arrived within the deadline.
    Success {
        status: u16,
        /// At most `max_body_bytes` of the body.
        body: Bytes,
        /// False when the body was truncated, stalled past the deadline or
        /// broke off mid-stream.
        body_complete: bool,
        /// Time until response headers arrived.
        elapsed: Duration,
    },
    /// The deadline elapsed before response headers arrived.
    DeadlineExceeded { elapsed: Duration },
    /// Network-level failure other than the deadline: refused, reset, DNS.
    TransportFailure { elapsed: Duration, reason: String },
}

impl ProbeOutcome {
    pub fn elapsed(&self) -> Duration {
        match self {
            ProbeOutcome::Success { elapsed, .. }
            | ProbeOutcome::DeadlineExceeded { elapsed }
            | ProbeOutcome::TransportFailure { elapsed, .. } => *elapsed,
        }
    }
}

/// Something that can probe a URL.
pub trait Probe: Send + Sync {
    fn probe(&self, url: &str, timeout: Duration) -> impl Future<Output = ProbeOutcome> + Send;
}

#[derive(Debug, Error)]
enum ExchangeError {
    #[error("invalid request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("request failed: {0}")]
    Send(#[from] hyper_util::client::legacy::Error),
}

/// Plain-HTTP probe backed by a pooled hyper client.
#[derive(Clone)]
pub struct HttpProbe {
    client: Client<HttpConnector, Body>,
    max_body_bytes: usize,
}

impl HttpProbe {
    pub fn new(max_body_bytes: usize) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Self {
            client,
            max_body_bytes,
        }
    }

    /// Send the request and return the status with the still-unread body.
    async fn send(&self, url: &str) -> Result<(u16, Body), ExchangeError> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(url)
            .header(header::USER_AGENT, USER_AGENT)
            .body(Body::empty())?;

        let response = self.client.request(request).await?;
        let status = response.status().as_u16();
        Ok((status, Body::new(response.into_body())))
    }

    /// Collect at most `max_body_bytes` of `body` before `deadline`.
    async fn read_prefix(&self, body: Body, deadline: time::Instant) -> (Bytes, bool) {
        let mut stream = body.into_data_stream();
        let mut buf = Vec::new();

        loop {
            match time::timeout_at(deadline, stream.next()).await {
                Ok(None) => return (Bytes::from(buf), true),
                Ok(Some(Ok(chunk))) => {
                    let room = self.max_body_bytes - buf.len();
                    if chunk.len() > room {
                        buf.extend_from_slice(&chunk[..room]);
                        return (Bytes::from(buf), false);
                    }
                    buf.extend_from_slice(&chunk);
                }
                Ok(Some(Err(e))) => {
                    tracing::debug!(error = %e, "Response body broke off");
                    return (Bytes::from(buf), false);
                }
                Err(_) => return (Bytes::from(buf), false),
            }
        }
    }
}

impl Probe for HttpProbe {
    fn probe(&self, url: &str, timeout: Duration) -> impl Future<Output = ProbeOutcome> + Send {
        async move {
            let start = Instant::now();
            let deadline = time::Instant::now() + timeout;

            let (status, body) = match time::timeout_at(deadline, self.send(url)).await {
                Ok(Ok(head)) => head,
                Ok(Err(e)) => {
                    return ProbeOutcome::TransportFailure {
                        elapsed: start.elapsed(),
                        reason: e.to_string(),
                    }
                }
                Err(_) => {
                    return ProbeOutcome::DeadlineExceeded {
                        elapsed: start.elapsed(),
                    }
                }
            };
            let elapsed = start.elapsed();

            let (body, body_complete) = self.read_prefix(body, deadline).await;
            ProbeOutcome::Success {
                status,
                body,
                body_complete,
                elapsed,
            }
        }
    }
}
