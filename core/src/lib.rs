//! Blocking JSON API client core with a users resource client.
//!
//! # Overview
//! `RequestExecutor` turns a method, endpoint, payload and header list into
//! one HTTP request, sends it over a fresh connection, and normalizes the
//! response into an `Outcome`. `UserClient` maps create/update/delete/get
//! onto fixed executor calls.
//!
//! # Design
//! - The executor holds only immutable configuration (host source, token).
//! - Request building and response parsing are pure; I/O lives behind the
//!   `Transport` trait so tests can script responses.
//! - Statuses other than 200/201 are data (`Outcome::Failure`), not errors.
//!   `ApiError` is reserved for URL, transport and JSON parse failures.

pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{UserClient, UserOperation};
pub use config::{ClientConfig, Environment, Host};
pub use error::ApiError;
pub use executor::{parse_response, RequestDescriptor, RequestExecutor};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{to_payload, Outcome, Payload, UserAttributes};
