use crate::application::services::{HttpClient, TransportError, TransportResponse};
use crate::domain::entities::{Method as DomainMethod, PreparedRequest};
use crate::domain::value_objects::{Body, Url};

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::client::conn::http1;
use hyper::header::HOST;
use hyper::{Method, Request as HyperRequest, Response as HyperResponse};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, lookup_host};
use tokio_native_tls::{TlsConnector, TlsStream, native_tls};
use tracing::debug;

/// Infrastructure implementation of HttpClient using Hyper
/// Opens one connection per request: DNS lookup, TCP connect, optional TLS,
/// then a single HTTP/1.1 exchange
#[derive(Debug, Clone, Default)]
pub struct HyperHttpClient;

impl HyperHttpClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn send(&self, request: PreparedRequest) -> Result<TransportResponse, TransportError> {
        let url = request.url.clone();
        let stream = Connector::connect(&url).await?;
        let hyper_request = RequestAdapter::to_hyper_request(request)?;

        let hyper_response = if url.is_https() {
            let tls_stream = Connector::upgrade_tls(&url, stream).await?;
            self.execute_http_request(tls_stream, hyper_request).await?
        } else {
            self.execute_http_request(stream, hyper_request).await?
        };

        ResponseAdapter::to_transport_response(hyper_response).await
    }
}

impl HyperHttpClient {
    async fn execute_http_request<S>(
        &self,
        stream: S,
        request: HyperRequest<Full<Bytes>>,
    ) -> Result<HyperResponse<Incoming>, TransportError>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let mut builder = http1::Builder::new();
        builder.title_case_headers(true);

        let (mut sender, connection) = builder
            .handshake::<_, Full<Bytes>>(TokioIo::new(stream))
            .await
            .map_err(ErrorAdapter::from_hyper)?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                debug!("connection closed with error: {}", e);
            }
        });

        sender
            .send_request(request)
            .await
            .map_err(ErrorAdapter::from_hyper)
    }
}

/// Establishes the byte stream a request travels over
struct Connector;

impl Connector {
    async fn connect(url: &Url) -> Result<TcpStream, TransportError> {
        let host = url.host();
        let port = url.port();

        let addrs: Vec<SocketAddr> = lookup_host((host, port))
            .await
            .map_err(|e| TransportError::Dns {
                host: host.to_string(),
                reason: e.to_string(),
            })?
            .collect();
        if addrs.is_empty() {
            return Err(TransportError::Dns {
                host: host.to_string(),
                reason: "no addresses found".to_string(),
            });
        }

        debug!(host, port, candidates = addrs.len(), "connecting");
        TcpStream::connect(&addrs[..])
            .await
            .map_err(|source| TransportError::Connect {
                addr: url.host_header(),
                source,
            })
    }

    async fn upgrade_tls(
        url: &Url,
        stream: TcpStream,
    ) -> Result<TlsStream<TcpStream>, TransportError> {
        let connector = native_tls::TlsConnector::new()
            .map_err(|e| TransportError::Tls(e.to_string()))?;
        TlsConnector::from(connector)
            .connect(url.host(), stream)
            .await
            .map_err(|e| TransportError::Tls(e.to_string()))
    }
}

/// Adapter for converting prepared requests to Hyper requests
struct RequestAdapter;

impl RequestAdapter {
    fn to_hyper_request(request: PreparedRequest) -> Result<HyperRequest<Full<Bytes>>, TransportError> {
        let method = MethodAdapter::to_hyper_method(request.method);
        let body = BodyAdapter::to_hyper_body(request.body);

        let mut builder = HyperRequest::builder()
            .method(method)
            .uri(request.url.request_target());

        builder = HeaderAdapter::add_headers(builder, &request.headers);
        builder = HeaderAdapter::add_host(builder, &request.url, &request.headers);

        builder
            .body(body)
            .map_err(|e| TransportError::Other(format!("Failed to build HTTP request: {}", e)))
    }
}

/// Adapter for converting Hyper responses to transport responses
struct ResponseAdapter;

impl ResponseAdapter {
    async fn to_transport_response(
        response: HyperResponse<Incoming>,
    ) -> Result<TransportResponse, TransportError> {
        let status = response.status();
        let reason = response
            .extensions()
            .get::<hyper::ext::ReasonPhrase>()
            .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned())
            .or_else(|| status.canonical_reason().map(str::to_string));
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = Self::extract_response_body(response).await?;

        Ok(TransportResponse {
            status: status.as_u16(),
            reason,
            headers,
            body,
        })
    }

    async fn extract_response_body(response: HyperResponse<Incoming>) -> Result<Vec<u8>, TransportError> {
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .map_err(ErrorAdapter::from_hyper)?
            .to_bytes();

        Ok(body_bytes.to_vec())
    }
}

/// Adapter for converting domain HTTP methods to Hyper methods
struct MethodAdapter;

impl MethodAdapter {
    fn to_hyper_method(domain_method: DomainMethod) -> Method {
        match domain_method {
            DomainMethod::Get => Method::GET,
            DomainMethod::Post => Method::POST,
            DomainMethod::Put => Method::PUT,
            DomainMethod::Patch => Method::PATCH,
            DomainMethod::Delete => Method::DELETE,
            DomainMethod::Head => Method::HEAD,
            DomainMethod::Options => Method::OPTIONS,
        }
    }
}

/// Adapter for converting request bodies to Hyper bodies
struct BodyAdapter;

impl BodyAdapter {
    fn to_hyper_body(body: Option<Body>) -> Full<Bytes> {
        match body {
            Some(body) => Full::new(Bytes::from(body.into_bytes())),
            None => Full::new(Bytes::new()),
        }
    }
}

/// Adapter for handling HTTP headers
struct HeaderAdapter;

impl HeaderAdapter {
    fn add_headers(
        mut builder: http::request::Builder,
        headers: &[(String, String)],
    ) -> http::request::Builder {
        for (key, value) in headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        builder
    }

    fn add_host(
        builder: http::request::Builder,
        url: &Url,
        headers: &[(String, String)],
    ) -> http::request::Builder {
        let has_host = headers.iter().any(|(key, _)| key.eq_ignore_ascii_case("host"));
        if has_host {
            builder
        } else {
            builder.header(HOST, url.host_header())
        }
    }
}

/// Adapter for classifying Hyper errors
struct ErrorAdapter;

impl ErrorAdapter {
    fn from_hyper(err: hyper::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::TimedOut
        } else if err.is_canceled() {
            TransportError::Cancelled
        } else {
            TransportError::Protocol(err.to_string())
        }
    }
}
