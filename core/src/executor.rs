//! Builds, sends and normalizes one HTTP request.
//!
//! # Design
//! `RequestExecutor` holds an immutable `ClientConfig` and a `Transport`.
//! A call is split in three steps: `build_request` (pure), the transport
//! round-trip, and `parse_response` (pure). Nothing is cached between calls;
//! the base host is resolved again every time.

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{Outcome, Payload};

/// Method, endpoint, payload and headers describing one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub endpoint: String,
    pub payload: Payload,
    pub headers: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Descriptor from a method name. Names other than get/post/put/delete
    /// are sent as GET and logged at warn level.
    pub fn with_method_name(name: &str, endpoint: impl Into<String>) -> Self {
        if !HttpMethod::is_known_name(name) {
            warn!(method = name, "unrecognized HTTP method, sending GET");
        }
        Self::new(HttpMethod::from_name(name), endpoint)
    }

    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Performs requests against the configured API host.
#[derive(Debug, Clone)]
pub struct RequestExecutor<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl RequestExecutor<UreqTransport> {
    /// Executor for the ambient host. A `None` token falls back to
    /// `API_TOKEN`, read once here.
    pub fn new(token: Option<String>) -> Self {
        Self::with_config(ClientConfig::with_token_or_env(token))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport)
    }
}

impl<T: Transport> RequestExecutor<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send one request and normalize its response.
    ///
    /// Statuses other than 200/201 come back as `Ok(Outcome::Failure)`.
    /// URL, transport and JSON parse failures are `Err`.
    pub fn perform(
        &self,
        method: HttpMethod,
        endpoint: &str,
        payload: &Payload,
        headers: &[(String, String)],
    ) -> Result<Outcome, ApiError> {
        let request = self.build_request(method, endpoint, payload, headers)?;
        debug!(
            method = %request.method,
            url = %request.url,
            has_body = request.body.is_some(),
            "sending request"
        );
        let response = self.transport.execute(&request)?;
        debug!(status = response.status, url = %request.url, "received response");
        parse_response(response)
    }

    pub fn perform_request(&self, descriptor: &RequestDescriptor) -> Result<Outcome, ApiError> {
        self.perform(
            descriptor.method,
            &descriptor.endpoint,
            &descriptor.payload,
            &descriptor.headers,
        )
    }

    /// Resolve the URL and assemble headers and body without sending
    /// anything.
    pub fn build_request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        payload: &Payload,
        headers: &[(String, String)],
    ) -> Result<HttpRequest, ApiError> {
        let raw = format!("{}{}", self.config.host.resolve(), endpoint);
        let url = Url::parse(&raw).map_err(|source| ApiError::InvalidUrl {
            url: raw.clone(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::UnsupportedScheme {
                scheme: url.scheme().to_string(),
                url: raw,
            });
        }

        let mut request = HttpRequest {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        };
        if let Some(token) = &self.config.token {
            request.set_header("Authorization", format!("Bearer {token}"));
        }
        request.set_header("Content-Type", "application/json");
        for (name, value) in headers {
            request.set_header(name.as_str(), value.as_str());
        }

        if !payload.is_empty() {
            request.body = Some(serde_json::to_string(payload).map_err(ApiError::Serialization)?);
        }
        Ok(request)
    }
}

/// Map a response onto an `Outcome`.
///
/// Only 200 and 201 bodies are parsed; an empty body parses to `null`.
/// Every other status keeps the raw body, decoded lossily when it is not
/// UTF-8.
pub fn parse_response(response: HttpResponse) -> Result<Outcome, ApiError> {
    match response.status {
        200 | 201 => {
            let data = if response.body.iter().all(u8::is_ascii_whitespace) {
                Value::Null
            } else {
                serde_json::from_slice(&response.body).map_err(|source| ApiError::Parse {
                    status: response.status,
                    source,
                })?
            };
            Ok(Outcome::Success { data })
        }
        _ => Ok(Outcome::Failure {
            error: response.reason,
            details: String::from_utf8_lossy(&response.body).into_owned(),
        }),
    }
}
