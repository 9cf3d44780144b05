//! postie: a small HTTP request tool.
//!
//! [`RequestExecutor`] validates a [`RequestDescription`], performs exactly
//! one exchange over an [`HttpClient`] transport and hands back either a
//! [`ResponseDescription`] or an [`ErrorDescription`]. The CLI and the
//! interactive form are thin callers on top of it.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application::cancellation::{CancelHandle, CancelSignal, cancellation};
pub use application::services::{HttpClient, RequestExecutor, TransportError, TransportResponse};
pub use application::validator::{RequestValidator, normalize_headers};
pub use domain::entities::{
    HeaderEntry, Method, PreparedRequest, RequestDescription, ResponseDescription, StatusClass,
};
pub use domain::errors::{ErrorDescription, ErrorKind};
pub use infrastructure::http_client::HyperHttpClient;
