use crate::domain::entities::{HeaderEntry, RequestDescription};
use anyhow::{Context, Result, anyhow};
use serde_json::Value;

/// Assembles a [`RequestDescription`] from command-line style input.
///
/// Method and URL are passed through untouched; the executor validates
/// them. Header syntax and `--json` bodies are checked here.
pub struct RequestBuilder {
    method: String,
    url: String,
    headers: Vec<HeaderEntry>,
    body: String,
    json: bool,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: "GET".to_string(),
            url: String::new(),
            headers: Vec::new(),
            body: String::new(),
            json: false,
        }
    }

    pub fn method(mut self, method: &str) -> Self {
        self.method = method.to_string();
        self
    }

    pub fn url(mut self, raw_url: &str) -> Self {
        self.url = raw_url.to_string();
        self
    }

    /// Parses `Key: Value` pairs; a leading `!` adds the header disabled.
    pub fn headers(mut self, raw_headers: &[String]) -> Result<Self> {
        for raw in raw_headers {
            let (enabled, pair) = match raw.strip_prefix('!') {
                Some(rest) => (false, rest),
                None => (true, raw.as_str()),
            };
            let (key, value) = pair.split_once(':').ok_or_else(|| {
                anyhow!("Invalid header format: '{}'. Use 'Key: Value'", raw)
            })?;
            self.headers.push(HeaderEntry {
                key: key.to_string(),
                value: value.to_string(),
                enabled,
            });
        }
        Ok(self)
    }

    /// Sets the body; `@path` reads it from a file.
    pub fn body(mut self, data: &Option<String>) -> Result<Self> {
        if let Some(data) = data {
            self.body = match data.strip_prefix('@') {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read body from '{}'", path))?,
                None => data.clone(),
            };
        }
        Ok(self)
    }

    /// Marks the body as JSON: it must parse, and a JSON content type is
    /// added unless one is already set.
    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn build(mut self) -> Result<RequestDescription> {
        if self.json {
            if !self.body.is_empty() {
                serde_json::from_str::<Value>(&self.body)
                    .map_err(|e| anyhow!("Invalid JSON body: {}", e))?;
            }
            let has_content_type = self
                .headers
                .iter()
                .any(|h| h.enabled && h.key.trim().eq_ignore_ascii_case("content-type"));
            if !has_content_type {
                self.headers
                    .push(HeaderEntry::new("Content-Type", "application/json"));
            }
        }

        Ok(RequestDescription {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        })
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_to_get_without_body() {
        let request = RequestBuilder::new().url("http://example.test").build().unwrap();
        assert_eq!(request.method, "GET");
        assert_eq!(request.url, "http://example.test");
        assert!(request.headers.is_empty());
        assert!(request.body.is_empty());
    }

    #[test]
    fn parses_headers_and_keeps_raw_spacing() {
        let request = RequestBuilder::new()
            .headers(&strings(&["Accept: application/json", "X-Time: 12:30"]))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.headers[0], HeaderEntry::new("Accept", " application/json"));
        assert_eq!(request.headers[1], HeaderEntry::new("X-Time", " 12:30"));
    }

    #[test]
    fn bang_prefix_disables_header() {
        let request = RequestBuilder::new()
            .headers(&strings(&["!Authorization: Bearer t"]))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(
            request.headers,
            vec![HeaderEntry::disabled("Authorization", " Bearer t")]
        );
    }

    #[test]
    fn rejects_header_without_colon() {
        let err = RequestBuilder::new()
            .headers(&strings(&["NoColonHere"]))
            .err()
            .unwrap();
        assert!(err.to_string().contains("Invalid header format"));
    }

    #[test]
    fn body_reads_from_file_with_at_prefix() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"from\":\"file\"}}").unwrap();
        let arg = Some(format!("@{}", file.path().display()));

        let request = RequestBuilder::new().body(&arg).unwrap().build().unwrap();

        assert_eq!(request.body, "{\"from\":\"file\"}");
    }

    #[test]
    fn missing_body_file_is_an_error() {
        let arg = Some("@/definitely/not/here.json".to_string());
        let err = RequestBuilder::new().body(&arg).err().unwrap();
        assert!(err.to_string().contains("Failed to read body"));
    }

    #[test]
    fn json_flag_validates_body_and_adds_content_type() {
        let request = RequestBuilder::new()
            .method("POST")
            .body(&Some("{\"a\":1}".to_string()))
            .unwrap()
            .json(true)
            .build()
            .unwrap();

        assert_eq!(
            request.headers,
            vec![HeaderEntry::new("Content-Type", "application/json")]
        );
    }

    #[test]
    fn json_flag_keeps_existing_content_type() {
        let request = RequestBuilder::new()
            .headers(&strings(&["content-type: application/vnd.api+json"]))
            .unwrap()
            .body(&Some("[]".to_string()))
            .unwrap()
            .json(true)
            .build()
            .unwrap();

        assert_eq!(request.headers.len(), 1);
    }

    #[test]
    fn json_flag_rejects_malformed_body() {
        let err = RequestBuilder::new()
            .body(&Some("{not json".to_string()))
            .unwrap()
            .json(true)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Invalid JSON body"));
    }
}
