//! Host selection and credentials.
//!
//! # Design
//! `Host::Ambient` reads `API_ENV` on every call, so flipping the variable
//! reroutes an existing client. `Host::Fixed` and `Host::Custom` pin the
//! base URL at construction for deterministic tests and self-hosted
//! deployments. The token is read once, at construction.

use std::env;

pub const PRODUCTION_BASE_URL: &str = "https://api.production.com/v1";
pub const SANDBOX_BASE_URL: &str = "https://sandbox.api.com/v1";

/// Environment variable names.
pub mod vars {
    /// Bearer token used when none is passed to the constructor.
    pub const API_TOKEN: &str = "API_TOKEN";
    /// `production` selects the production host; anything else is sandbox.
    pub const API_ENV: &str = "API_ENV";
}

/// Deployment environment that decides the base host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Sandbox,
}

impl Environment {
    /// Read `API_ENV` from the process environment.
    pub fn current() -> Self {
        Self::from_setting(env::var(vars::API_ENV).ok().as_deref())
    }

    pub fn from_setting(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("production") => Environment::Production,
            _ => Environment::Sandbox,
        }
    }

    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_BASE_URL,
            Environment::Sandbox => SANDBOX_BASE_URL,
        }
    }
}

/// Where the base URL comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Host {
    /// Decided by `API_ENV`, evaluated on every call.
    #[default]
    Ambient,
    Fixed(Environment),
    /// Explicit base URL. `Host::custom` drops a trailing `/`.
    Custom(String),
}

impl Host {
    pub fn custom(base_url: &str) -> Self {
        Host::Custom(base_url.trim_end_matches('/').to_string())
    }

    pub fn resolve(&self) -> &str {
        match self {
            Host::Ambient => Environment::current().base_url(),
            Host::Fixed(environment) => environment.base_url(),
            Host::Custom(url) => url,
        }
    }
}

/// Immutable configuration owned by a `RequestExecutor`.
#[derive(Clone, Default)]
pub struct ClientConfig {
    pub host: Host,
    pub token: Option<String>,
}

impl ClientConfig {
    pub fn new(host: Host, token: Option<String>) -> Self {
        Self { host, token }
    }

    /// Ambient host, token from `API_TOKEN`.
    pub fn from_env() -> Self {
        Self::with_token_or_env(None)
    }

    /// Ambient host; the given token, or `API_TOKEN` when `None`.
    pub fn with_token_or_env(token: Option<String>) -> Self {
        Self {
            host: Host::Ambient,
            token: token.or_else(|| env::var(vars::API_TOKEN).ok()),
        }
    }

    pub fn with_host(mut self, host: Host) -> Self {
        self.host = host;
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

// Keeps the token out of debug output and logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
