//! Error types for the request executor.
//!
//! # Design
//! Only unexpected failures are errors. A response with any status other
//! than 200/201 is not an `ApiError`; it comes back as
//! `Outcome::Failure` carrying the reason phrase and raw body.

use thiserror::Error;

/// Failures that abort a call before a normalized outcome exists.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Base host plus endpoint did not form a valid URL.
    #[error("invalid url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The URL parsed but is not http or https.
    #[error("unsupported url scheme `{scheme}` in `{url}`")]
    UnsupportedScheme { url: String, scheme: String },

    /// The connection could not be made or the response could not be read.
    #[error("transport failed: {0}")]
    Transport(#[from] ureq::Error),

    /// A 200/201 response carried a body that is not valid JSON.
    #[error("HTTP {status} response body is not valid JSON: {source}")]
    Parse {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// Typed attributes could not be serialized into a payload.
    #[error("payload serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Typed attributes serialized to something other than a JSON object.
    #[error("payload must serialize to a JSON object, got {kind}")]
    PayloadNotObject { kind: &'static str },
}
