//! HTTP request and response types exchanged with a `Transport`.
//!
//! # Design
//! Requests and responses are plain data. `RequestExecutor` builds an
//! `HttpRequest`, hands it to a transport, and normalizes the `HttpResponse`
//! it gets back. The executor never touches a socket itself, so the request
//! and response halves can be tested without a network.
//!
//! All fields use owned types (`String`, `Vec`) so values can be recorded and
//! replayed freely in tests.

use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Map a method name onto a verb. `post`, `put` and `delete` (any ASCII
    /// case) select their verb; every other name, including typos, is GET.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("post") {
            HttpMethod::Post
        } else if name.eq_ignore_ascii_case("put") {
            HttpMethod::Put
        } else if name.eq_ignore_ascii_case("delete") {
            HttpMethod::Delete
        } else {
            HttpMethod::Get
        }
    }

    /// Whether `name` is one of the four verbs `from_name` recognizes.
    pub fn is_known_name(name: &str) -> bool {
        ["get", "post", "put", "delete"]
            .iter()
            .any(|known| name.eq_ignore_ascii_case(known))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl From<&str> for HttpMethod {
    fn from(name: &str) -> Self {
        HttpMethod::from_name(name)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `url` is the fully resolved target (base host plus endpoint).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a header value by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Set a header, replacing any existing header with the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => *slot = (name, value),
            None => self.headers.push((name, value)),
        }
    }
}

/// An HTTP response described as plain data.
///
/// `reason` is the status reason phrase, e.g. `"Not Found"`. `body` holds
/// the raw bytes as received; it need not be UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
