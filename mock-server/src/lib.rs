use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// What the `/echo` route saw, returned as JSON.
#[derive(Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

#[derive(Default)]
pub struct Store {
    next_id: u64,
    users: HashMap<u64, User>,
}

pub type Db = Arc<RwLock<Store>>;

pub const INVALID_NAME: &str = "invalid name";
pub const USER_NOT_FOUND: &str = "user not found";

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/users", post(create_user))
        .route(
            "/users/{id}",
            axum::routing::get(get_user).put(update_user).delete(delete_user),
        )
        .route("/echo", any(echo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn valid_name(name: &str) -> bool {
    !name.trim().is_empty()
}

async fn create_user(State(db): State<Db>, Json(input): Json<CreateUser>) -> Response {
    if !valid_name(&input.name) {
        return (StatusCode::UNPROCESSABLE_ENTITY, INVALID_NAME).into_response();
    }
    let mut store = db.write().await;
    store.next_id += 1;
    let user = User {
        id: store.next_id,
        name: input.name,
        email: input.email,
    };
    store.users.insert(user.id, user.clone());
    tracing::info!(id = user.id, "created user");
    (StatusCode::CREATED, Json(user)).into_response()
}

async fn get_user(State(db): State<Db>, Path(id): Path<u64>) -> Response {
    let store = db.read().await;
    match store.users.get(&id) {
        Some(user) => Json(user.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, USER_NOT_FOUND).into_response(),
    }
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateUser>,
) -> Response {
    if input.name.as_deref().is_some_and(|name| !valid_name(name)) {
        return (StatusCode::UNPROCESSABLE_ENTITY, INVALID_NAME).into_response();
    }
    let mut store = db.write().await;
    let Some(user) = store.users.get_mut(&id) else {
        return (StatusCode::NOT_FOUND, USER_NOT_FOUND).into_response();
    };
    if let Some(name) = input.name {
        user.name = name;
    }
    if let Some(email) = input.email {
        user.email = Some(email);
    }
    tracing::info!(id, "updated user");
    Json(user.clone()).into_response()
}

// Answers 200 with a `null` body on success.
async fn delete_user(State(db): State<Db>, Path(id): Path<u64>) -> Response {
    let mut store = db.write().await;
    match store.users.remove(&id) {
        Some(_) => {
            tracing::info!(id, "deleted user");
            Json(()).into_response()
        }
        None => (StatusCode::NOT_FOUND, USER_NOT_FOUND).into_response(),
    }
}

async fn echo(method: Method, headers: HeaderMap, body: String) -> Json<Echo> {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    Json(Echo {
        method: method.to_string(),
        headers,
        body: (!body.is_empty()).then_some(body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_to_json() {
        let user = User {
            id: 42,
            name: "Ana".to_string(),
            email: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json, serde_json::json!({"id": 42, "name": "Ana"}));
    }

    #[test]
    fn create_user_email_is_optional() {
        let input: CreateUser = serde_json::from_str(r#"{"name":"Bob"}"#).unwrap();
        assert_eq!(input.name, "Bob");
        assert!(input.email.is_none());
    }

    #[test]
    fn create_user_rejects_missing_name() {
        let result: Result<CreateUser, _> = serde_json::from_str(r#"{"email":"a@b.c"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_user_all_fields_optional() {
        let input: UpdateUser = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.name.is_none());
        assert!(input.email.is_none());
    }

    #[test]
    fn blank_names_are_invalid() {
        assert!(!valid_name(""));
        assert!(!valid_name("   "));
        assert!(valid_name("Bob"));
    }
}
