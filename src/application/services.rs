use crate::application::cancellation::CancelSignal;
use crate::application::validator::RequestValidator;
use crate::domain::entities::{PreparedRequest, RequestDescription, ResponseDescription};
use crate::domain::errors::{ErrorDescription, ErrorKind};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info};

/// Raw exchange result as the transport reports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub reason: Option<String>,
    /// Every received header, duplicates kept as separate pairs. Names are
    /// lowercase. Pairs follow hyper's `HeaderMap` order: all values of one
    /// name sit together where that name first appeared, so a name repeated
    /// around other headers does not keep its exact wire position.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Failures a transport can report
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("DNS resolution failed for '{host}': {reason}")]
    Dns { host: String, reason: String },

    #[error("Connection to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TLS handshake failed: {0}")]
    Tls(String),

    #[error("HTTP protocol error: {0}")]
    Protocol(String),

    #[error("Connection closed before the response completed")]
    Cancelled,

    #[error("Transport timed out")]
    TimedOut,

    #[error("{0}")]
    Other(String),
}

impl From<TransportError> for ErrorDescription {
    fn from(err: TransportError) -> Self {
        let message = err.to_string();
        match err {
            TransportError::Dns { .. }
            | TransportError::Connect { .. }
            | TransportError::Tls(_)
            | TransportError::Protocol(_)
            | TransportError::Cancelled => ErrorDescription::network_failure(message),
            TransportError::TimedOut => ErrorDescription::new(ErrorKind::Timeout, message),
            TransportError::Other(_) => ErrorDescription::unknown(message),
        }
    }
}

/// Trait for HTTP transports to enable mocking and dependency inversion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: PreparedRequest) -> Result<TransportResponse, TransportError>;
}

/// Application service that turns a request description into exactly one
/// response or error description
///
/// Holds no per-request state, so concurrent sends are independent.
pub struct RequestExecutor {
    http_client: Box<dyn HttpClient>,
    timeout: Option<Duration>,
}

impl RequestExecutor {
    pub fn new(http_client: Box<dyn HttpClient>) -> Self {
        Self {
            http_client,
            timeout: None,
        }
    }

    /// Bounds every send; a call still pending after `timeout` fails with
    /// `Timeout` and its transport operation is dropped.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Sends a request that cannot be cancelled
    pub async fn send(
        &self,
        request: RequestDescription,
    ) -> Result<ResponseDescription, ErrorDescription> {
        self.send_with_cancel(request, CancelSignal::never()).await
    }

    /// Sends a request, resolving with `Aborted` if `cancel` fires first
    pub async fn send_with_cancel(
        &self,
        request: RequestDescription,
        cancel: CancelSignal,
    ) -> Result<ResponseDescription, ErrorDescription> {
        let result = self.execute(request, cancel).await;
        match &result {
            Ok(response) => info!(
                status = response.status,
                elapsed_ms = response.elapsed_ms,
                "request completed"
            ),
            Err(err) => info!(kind = %err.kind, message = %err.message, "request failed"),
        }
        result
    }

    async fn execute(
        &self,
        request: RequestDescription,
        mut cancel: CancelSignal,
    ) -> Result<ResponseDescription, ErrorDescription> {
        let prepared = RequestValidator::validate(request)?;
        debug!(
            method = %prepared.method,
            url = %prepared.url.as_str(),
            headers = prepared.headers.len(),
            "dispatching request"
        );

        let started = Instant::now();
        let transport_response = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ErrorDescription::aborted()),
            outcome = self.exchange(prepared) => outcome?,
        };
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        ResponseNormalizer::normalize(transport_response, elapsed_ms)
    }

    async fn exchange(&self, request: PreparedRequest) -> Result<TransportResponse, ErrorDescription> {
        let call = self.http_client.send(request);
        match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(outcome) => outcome.map_err(ErrorDescription::from),
                Err(_) => Err(ErrorDescription::timeout(limit)),
            },
            None => call.await.map_err(ErrorDescription::from),
        }
    }
}

/// Converts transport output into the caller-facing response shape
struct ResponseNormalizer;

impl ResponseNormalizer {
    fn normalize(
        response: TransportResponse,
        elapsed_ms: f64,
    ) -> Result<ResponseDescription, ErrorDescription> {
        if !(100..=599).contains(&response.status) {
            return Err(ErrorDescription::unknown(format!(
                "Transport reported out-of-range status {}",
                response.status
            )));
        }

        Ok(ResponseDescription {
            status: response.status,
            status_text: response.reason.unwrap_or_default(),
            headers: response.headers,
            body: String::from_utf8_lossy(&response.body).into_owned(),
            elapsed_ms,
        })
    }
}
