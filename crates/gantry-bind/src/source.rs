//! Request access behind a narrow seam.
//!
//! The binder never touches transport types directly; it consumes a
//! [`RequestSource`], which hands over pre-decoded name/value pairs
//! and an optionally buffered body. [`BufferedRequest`] is the stock
//! implementation over the `http` crate's types, and its builder keeps
//! test setup terse.

use bytes::Bytes;
use http::header::HeaderMap;
use http::{Method, Uri};

/// Read-only view of one buffered HTTP request.
///
/// `query_pairs` values are already percent-decoded and trimmed.
/// `header_pairs` carry one entry per distinct header name, multiple
/// values joined with `", "`. `body_text` distinguishes an absent body
/// (`None`) from a present-but-empty one (`Some("")`).
pub trait RequestSource {
    /// Dispatch key in `"METHOD path"` form.
    fn route_key(&self) -> &str;

    /// Decoded query pairs, in wire order.
    fn query_pairs(&self) -> &[(String, String)];

    /// Header pairs, one entry per distinct name.
    fn header_pairs(&self) -> &[(String, String)];

    /// The buffered body, if any was supplied.
    fn body_text(&self) -> Option<&str>;
}

/// A fully buffered request assembled from `http` primitives.
#[derive(Debug, Clone)]
pub struct BufferedRequest {
    route_key: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl BufferedRequest {
    /// Builds a request from already-parsed HTTP parts.
    #[must_use]
    pub fn new(method: &Method, uri: &Uri, headers: &HeaderMap, body: Option<&Bytes>) -> Self {
        let route_key = format!("{method} {}", uri.path());

        let query = uri
            .query()
            .map(|raw| {
                form_urlencoded::parse(raw.as_bytes())
                    .map(|(name, value)| (name.into_owned(), value.trim().to_string()))
                    .collect()
            })
            .unwrap_or_default();

        let mut header_pairs = Vec::new();
        for name in headers.keys() {
            let joined = headers
                .get_all(name)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .collect::<Vec<_>>()
                .join(", ");
            header_pairs.push((name.as_str().to_string(), joined));
        }

        let body = body.map(|bytes| String::from_utf8_lossy(bytes).into_owned());

        Self {
            route_key,
            query,
            headers: header_pairs,
            body,
        }
    }

    /// Starts a builder with `GET /` defaults.
    #[must_use]
    pub fn builder() -> BufferedRequestBuilder {
        BufferedRequestBuilder::default()
    }
}

impl RequestSource for BufferedRequest {
    fn route_key(&self) -> &str {
        &self.route_key
    }

    fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    fn header_pairs(&self) -> &[(String, String)] {
        &self.headers
    }

    fn body_text(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// Incremental construction of a [`BufferedRequest`].
///
/// ```
/// use gantry_bind::BufferedRequest;
/// use gantry_bind::RequestSource;
/// use http::Method;
///
/// let request = BufferedRequest::builder()
///     .method(Method::POST)
///     .path("/api/launch")
///     .query_pair("count", "3")
///     .body(r#"{"name":"unit-1"}"#)
///     .build();
///
/// assert_eq!(request.route_key(), "POST /api/launch");
/// ```
#[derive(Debug)]
pub struct BufferedRequestBuilder {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl Default for BufferedRequestBuilder {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: "/".to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }
}

impl BufferedRequestBuilder {
    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the request path for the route key.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Parses a URI, taking its path and decoded query pairs.
    #[must_use]
    pub fn uri(mut self, uri: &Uri) -> Self {
        self.path = uri.path().to_string();
        if let Some(raw) = uri.query() {
            self.query.extend(
                form_urlencoded::parse(raw.as_bytes())
                    .map(|(name, value)| (name.into_owned(), value.trim().to_string())),
            );
        }
        self
    }

    /// Appends one already-decoded query pair. The value is trimmed
    /// the same way URI-derived pairs are.
    #[must_use]
    pub fn query_pair(mut self, name: impl Into<String>, value: &str) -> Self {
        self.query.push((name.into(), value.trim().to_string()));
        self
    }

    /// Appends one header pair.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Supplies a body. Passing an empty string still counts as a
    /// present body.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Finishes the request.
    #[must_use]
    pub fn build(self) -> BufferedRequest {
        BufferedRequest {
            route_key: format!("{} {}", self.method, self.path),
            query: self.query,
            headers: self.headers,
            body: self.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_decoding_and_trimming() {
        let uri: Uri = "http://svc.test/app?a=%20%20padded%20%20&b=x+y&c".parse().unwrap();
        let request = BufferedRequest::new(&Method::GET, &uri, &HeaderMap::new(), None);

        assert_eq!(
            request.query_pairs(),
            &[
                ("a".to_string(), "padded".to_string()),
                ("b".to_string(), "x y".to_string()),
                ("c".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_route_key_includes_method_and_path() {
        let uri: Uri = "/widgets/17?x=1".parse().unwrap();
        let request = BufferedRequest::new(&Method::DELETE, &uri, &HeaderMap::new(), None);
        assert_eq!(request.route_key(), "DELETE /widgets/17");
    }

    #[test]
    fn test_multi_value_headers_are_joined() {
        let mut headers = HeaderMap::new();
        headers.append("x-tag", "one".parse().unwrap());
        headers.append("x-tag", "two".parse().unwrap());
        let uri: Uri = "/".parse().unwrap();
        let request = BufferedRequest::new(&Method::GET, &uri, &headers, None);

        assert_eq!(
            request.header_pairs(),
            &[("x-tag".to_string(), "one, two".to_string())]
        );
    }

    #[test]
    fn test_body_presence_is_preserved() {
        let uri: Uri = "/".parse().unwrap();
        let empty = Bytes::new();
        let with_body = BufferedRequest::new(&Method::POST, &uri, &HeaderMap::new(), Some(&empty));
        assert_eq!(with_body.body_text(), Some(""));

        let without = BufferedRequest::new(&Method::POST, &uri, &HeaderMap::new(), None);
        assert_eq!(without.body_text(), None);
    }

    #[test]
    fn test_builder_defaults() {
        let request = BufferedRequest::builder().build();
        assert_eq!(request.route_key(), "GET /");
        assert!(request.query_pairs().is_empty());
        assert_eq!(request.body_text(), None);
    }
}
