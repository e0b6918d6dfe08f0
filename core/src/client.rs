//! User resource client.
//!
//! # Design
//! Each operation is one row in a route table (`UserOperation::route`) that
//! fixes the HTTP method and endpoint template. `UserClient` turns a row plus
//! an id and payload into a single `RequestExecutor::perform` call and returns
//! its result untouched.

use std::fmt::Display;

use crate::error::ApiError;
use crate::executor::RequestExecutor;
use crate::http::HttpMethod;
use crate::transport::{Transport, UreqTransport};
use crate::types::{Outcome, Payload};

/// CRUD operations on the `/users` resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserOperation {
    Create,
    Update,
    Delete,
    Get,
}

impl UserOperation {
    /// Method and endpoint template. `{id}` is replaced by the user id.
    pub fn route(self) -> (HttpMethod, &'static str) {
        match self {
            UserOperation::Create => (HttpMethod::Post, "/users"),
            UserOperation::Update => (HttpMethod::Put, "/users/{id}"),
            UserOperation::Delete => (HttpMethod::Delete, "/users/{id}"),
            UserOperation::Get => (HttpMethod::Get, "/users/{id}"),
        }
    }

    pub fn endpoint(self, id: Option<&str>) -> String {
        let (_, template) = self.route();
        match id {
            Some(id) => template.replace("{id}", id),
            None => template.to_string(),
        }
    }
}

/// Synchronous client for the users API.
#[derive(Debug, Clone)]
pub struct UserClient<T = UreqTransport> {
    executor: RequestExecutor<T>,
}

impl UserClient<UreqTransport> {
    /// Client for the ambient host with the token from `API_TOKEN`.
    pub fn from_env() -> Self {
        Self::new(RequestExecutor::new(None))
    }
}

impl<T: Transport> UserClient<T> {
    pub fn new(executor: RequestExecutor<T>) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &RequestExecutor<T> {
        &self.executor
    }

    /// POST `/users` with `attrs` as the body.
    pub fn create(&self, attrs: &Payload) -> Result<Outcome, ApiError> {
        self.call(UserOperation::Create, None, attrs)
    }

    /// PUT `/users/{id}` with `attrs` as the body.
    pub fn update(&self, id: impl Display, attrs: &Payload) -> Result<Outcome, ApiError> {
        self.call(UserOperation::Update, Some(id.to_string().as_str()), attrs)
    }

    /// DELETE `/users/{id}`.
    pub fn delete(&self, id: impl Display) -> Result<Outcome, ApiError> {
        self.call(UserOperation::Delete, Some(id.to_string().as_str()), &Payload::new())
    }

    /// GET `/users/{id}`.
    pub fn get(&self, id: impl Display) -> Result<Outcome, ApiError> {
        self.call(UserOperation::Get, Some(id.to_string().as_str()), &Payload::new())
    }

    fn call(
        &self,
        operation: UserOperation,
        id: Option<&str>,
        payload: &Payload,
    ) -> Result<Outcome, ApiError> {
        let (method, _) = operation.route();
        self.executor.perform(method, &operation.endpoint(id), payload, &[])
    }
}
