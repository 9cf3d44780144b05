use crate::domain::errors::ErrorDescription;
use hyper::http::Uri;

/// Represents a validated absolute `http`/`https` URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url(pub Uri);

impl Url {
    /// Creates a new Url with validation
    ///
    /// # Arguments
    /// * `url` - The URL string to parse
    ///
    /// # Returns
    /// * `Ok(Url)` - Validated URL with a scheme and a host
    /// * `Err(ErrorDescription)` - `InvalidUrl` if the URL is empty, unparsable,
    ///   not `http`/`https`, has no host, or names a port outside `0..=65535`
    pub fn new(url: &str) -> Result<Self, ErrorDescription> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ErrorDescription::invalid_url("URL cannot be empty"));
        }

        let uri = url
            .parse::<Uri>()
            .map_err(|e| ErrorDescription::invalid_url(format!("Invalid URL '{url}': {e}")))?;

        match uri.scheme_str() {
            Some("http" | "https") => {}
            Some(other) => {
                return Err(ErrorDescription::invalid_url(format!(
                    "Unsupported scheme '{other}': URL must start with http:// or https://"
                )));
            }
            None => {
                return Err(ErrorDescription::invalid_url(format!(
                    "Invalid URL '{url}': URL must start with http:// or https://"
                )));
            }
        }

        if uri.host().is_none_or(str::is_empty) {
            return Err(ErrorDescription::invalid_url(format!(
                "Invalid URL '{url}': missing host"
            )));
        }

        if let Some(port) = uri.authority().and_then(|a| explicit_port(a.as_str())) {
            if port.parse::<u16>().is_err() {
                return Err(ErrorDescription::invalid_url(format!(
                    "Invalid URL '{url}': bad port '{port}'"
                )));
            }
        }

        Ok(Url(uri))
    }

    /// Returns the URL as a string
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }

    pub fn is_https(&self) -> bool {
        self.0.scheme_str() == Some("https")
    }

    /// Host without IPv6 brackets, suitable for DNS lookup and TLS SNI.
    pub fn host(&self) -> &str {
        self.0
            .host()
            .unwrap_or_default()
            .trim_start_matches('[')
            .trim_end_matches(']')
    }

    pub fn port(&self) -> u16 {
        self.0
            .port_u16()
            .unwrap_or(if self.is_https() { 443 } else { 80 })
    }

    /// Value for the `Host` header: host plus any explicit port. Userinfo
    /// is never included.
    pub fn host_header(&self) -> String {
        let host = self.0.host().unwrap_or_default();
        match self.0.port_u16() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    /// Origin-form request target: path plus query, never empty.
    pub fn request_target(&self) -> String {
        match self.0.path_and_query().map(|pq| pq.as_str()) {
            None | Some("") => "/".to_string(),
            Some(pq) if pq.starts_with('?') => format!("/{pq}"),
            Some(pq) => pq.to_string(),
        }
    }
}

/// Text after the port colon of an authority, if one is present and non-empty.
fn explicit_port(authority: &str) -> Option<&str> {
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, rest)| rest);
    let after_host = match host_port.rfind(']') {
        Some(idx) => &host_port[idx + 1..],
        None => host_port,
    };
    after_host
        .rsplit_once(':')
        .map(|(_, port)| port)
        .filter(|port| !port.is_empty())
}

/// Represents a non-empty request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body(String);

impl Body {
    /// Returns `None` for an empty body so that it is treated as absent.
    pub fn new(body: &str) -> Option<Self> {
        (!body.is_empty()).then(|| Body(body.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;

    #[test]
    fn accepts_absolute_http_and_https_urls() {
        let url = Url::new("https://example.test/ok?x=1").unwrap();
        assert!(url.is_https());
        assert_eq!(url.host(), "example.test");
        assert_eq!(url.port(), 443);
        assert_eq!(url.request_target(), "/ok?x=1");

        let url = Url::new("http://localhost:8080").unwrap();
        assert!(!url.is_https());
        assert_eq!(url.port(), 8080);
        assert_eq!(url.host_header(), "localhost:8080");
        assert_eq!(url.request_target(), "/");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let url = Url::new("  http://example.test/a  ").unwrap();
        assert_eq!(url.request_target(), "/a");
    }

    #[test]
    fn rejects_empty_url() {
        let err = Url::new("   ").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidUrl);
    }

    #[test]
    fn rejects_url_without_scheme() {
        let err = Url::new("not-a-url").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidUrl);
        assert!(err.message.contains("http://"));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = Url::new("ftp://example.test/file").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidUrl);
        assert!(err.message.contains("ftp"));
    }

    #[test]
    fn rejects_unparsable_url() {
        let err = Url::new("http://exa mple.test/").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidUrl);
    }

    #[test]
    fn strips_brackets_from_ipv6_hosts() {
        let url = Url::new("http://[::1]:3000/x").unwrap();
        assert_eq!(url.host(), "::1");
        assert_eq!(url.host_header(), "[::1]:3000");
    }

    #[test]
    fn rejects_out_of_range_port() {
        let err = Url::new("http://example.test:99999/").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidUrl);
        assert!(err.message.contains("99999"));
    }

    #[test]
    fn rejects_non_numeric_port() {
        let err = Url::new("http://example.test:abc/").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidUrl);
    }

    #[test]
    fn accepts_highest_port() {
        assert_eq!(Url::new("http://example.test:65535/").unwrap().port(), 65535);
    }

    #[test]
    fn host_header_leaves_out_credentials() {
        let url = Url::new("http://user:pw@example.test/").unwrap();
        assert_eq!(url.host_header(), "example.test");
        assert_eq!(url.host(), "example.test");

        let url = Url::new("https://user@example.test:8443/").unwrap();
        assert_eq!(url.host_header(), "example.test:8443");
    }

    #[test]
    fn empty_body_is_absent() {
        assert!(Body::new("").is_none());
        assert_eq!(Body::new("{}").unwrap().as_str(), "{}");
    }
}
