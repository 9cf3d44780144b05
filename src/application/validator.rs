use crate::domain::entities::{HeaderEntry, Method, PreparedRequest, RequestDescription};
use crate::domain::errors::ErrorDescription;
use crate::domain::value_objects::{Body, Url};
use http::{HeaderName, HeaderValue};
use tracing::warn;

/// Domain service for the validation phase
/// Runs synchronously, before any network activity
pub struct RequestValidator;

impl RequestValidator {
    /// Turns raw caller input into a [`PreparedRequest`].
    ///
    /// The URL is checked first, then the method; both failures are reported
    /// as `InvalidUrl`. Headers are normalized with [`normalize_headers`].
    pub fn validate(request: RequestDescription) -> Result<PreparedRequest, ErrorDescription> {
        let url = Url::new(&request.url)?;
        let method: Method = request.method.parse()?;
        let headers = normalize_headers(&request.headers);
        let body = Body::new(&request.body);

        if body.is_some() && !method.has_body_semantics() {
            warn!(%method, "request body sent with a method that has no body semantics");
        }

        Ok(PreparedRequest {
            method,
            url,
            headers,
            body,
        })
    }
}

/// Reduces the caller's header rows to the pairs that reach the transport.
///
/// Disabled rows are skipped, keys and values are trimmed, and pairs that
/// end up empty are dropped. Pairs that are not legal HTTP header
/// names/values are dropped with a warning. Order and duplicates survive.
pub fn normalize_headers(entries: &[HeaderEntry]) -> Vec<(String, String)> {
    entries
        .iter()
        .filter(|entry| entry.enabled)
        .filter_map(|entry| {
            let key = entry.key.trim();
            let value = entry.value.trim();
            if key.is_empty() || value.is_empty() {
                return None;
            }
            if HeaderName::from_bytes(key.as_bytes()).is_err()
                || HeaderValue::from_str(value).is_err()
            {
                warn!(header = key, "dropping header that is not valid HTTP");
                return None;
            }
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn disabled_headers_never_survive() {
        let entries = vec![
            HeaderEntry::new("Accept", "application/json"),
            HeaderEntry::disabled("Authorization", "Bearer secret"),
            HeaderEntry::disabled("X-Debug", "1"),
        ];

        let headers = normalize_headers(&entries);

        assert_eq!(headers, pairs(&[("Accept", "application/json")]));
    }

    #[test]
    fn keys_and_values_are_trimmed() {
        let entries = vec![HeaderEntry::new(" X-Test ", " 1 ")];
        assert_eq!(normalize_headers(&entries), pairs(&[("X-Test", "1")]));
    }

    #[test]
    fn blank_keys_or_values_are_dropped() {
        let entries = vec![
            HeaderEntry::new("", "value"),
            HeaderEntry::new("   ", "value"),
            HeaderEntry::new("X-Empty", ""),
            HeaderEntry::new("X-Blank", " \t "),
            HeaderEntry::new("X-Kept", "yes"),
        ];

        assert_eq!(normalize_headers(&entries), pairs(&[("X-Kept", "yes")]));
    }

    #[test]
    fn order_and_duplicates_are_preserved() {
        let entries = vec![
            HeaderEntry::new("Accept", "text/html"),
            HeaderEntry::new("X-Trace", "a"),
            HeaderEntry::new("Accept", "application/json"),
        ];

        assert_eq!(
            normalize_headers(&entries),
            pairs(&[
                ("Accept", "text/html"),
                ("X-Trace", "a"),
                ("Accept", "application/json"),
            ])
        );
    }

    #[test]
    fn illegal_header_names_are_dropped() {
        let entries = vec![
            HeaderEntry::new("Bad Header", "1"),
            HeaderEntry::new("X-Line", "a\nb"),
            HeaderEntry::new("X-Ok", "1"),
        ];

        assert_eq!(normalize_headers(&entries), pairs(&[("X-Ok", "1")]));
    }

    #[test]
    fn validate_normalizes_method_to_enum() {
        let prepared =
            RequestValidator::validate(RequestDescription::new("post", "http://example.test/"))
                .unwrap();
        assert_eq!(prepared.method, Method::Post);
        assert_eq!(prepared.method.as_str(), "POST");
    }

    #[test]
    fn validate_rejects_bad_url_before_method() {
        let err = RequestValidator::validate(RequestDescription::new("BREW", "not-a-url"))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidUrl);
        assert!(err.message.contains("URL"));
    }

    #[test]
    fn validate_rejects_unknown_method() {
        let err = RequestValidator::validate(RequestDescription::new("BREW", "http://pot.test/"))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidUrl);
        assert!(err.message.contains("BREW"));
    }

    #[test]
    fn validate_treats_empty_body_as_absent() {
        let prepared =
            RequestValidator::validate(RequestDescription::new("POST", "http://example.test/"))
                .unwrap();
        assert!(prepared.body.is_none());
    }

    #[test]
    fn validate_keeps_body_on_get() {
        let request = RequestDescription::new("GET", "http://example.test/").with_body("payload");
        let prepared = RequestValidator::validate(request).unwrap();
        assert_eq!(prepared.body.unwrap().as_str(), "payload");
    }
}
