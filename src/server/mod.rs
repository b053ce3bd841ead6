//! HTTP server exposing the chat endpoint.
//!
//! `POST /chat` carries the documented placeholder contract: every
//! well-formed, non-empty query gets HTTP 200 and the same fixed reply.
//! Malformed bodies and empty queries are pinned to HTTP 400.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;

use crate::error::AppError;
use crate::models::{ChatRequest, ChatResponse, ServerConfig};

/// Fixed reply for every valid query until retrieval-augmented generation
/// is wired in.
pub const PLACEHOLDER_RESPONSE: &str =
    "This is a placeholder response. Ask about indexed courses once chat is wired up.";

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

/// Injected server state; replaces module-level globals.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<StateInner>,
}

struct StateInner {
    reply: String,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StateInner {
                reply: PLACEHOLDER_RESPONSE.to_string(),
            }),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the router with its routes and state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Bind the configured address and serve until the process is
/// interrupted.
pub async fn run(config: &ServerConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .bind
        .parse()
        .map_err(|_| AppError::Server(format!("invalid bind address: {}", config.bind)))?;

    let listener = TcpListener::bind(addr).await?;
    println!("coursebot chat server listening on http://{}", addr);

    axum::serve(listener, router(AppState::new())).await?;
    Ok(())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorBody>)> {
    let Json(request) =
        payload.map_err(|e| bad_request(format!("invalid request body: {}", e)))?;

    if request.query.trim().is_empty() {
        return Err(bad_request("query must not be empty"));
    }

    Ok(Json(ChatResponse {
        response: state.inner.reply.clone(),
    }))
}

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            message: message.into(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn spawn_server() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(AppState::new())).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn test_chat_returns_fixed_placeholder() {
        let addr = spawn_server().await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("http://{}/chat", addr))
            .json(&json!({"query": "which rust courses are cheap?"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body: ChatResponse = response.json().await.unwrap();
        assert_eq!(body.response, PLACEHOLDER_RESPONSE);
    }

    #[tokio::test]
    async fn test_chat_response_independent_of_query() {
        let addr = spawn_server().await;
        let client = reqwest::Client::new();

        let mut bodies = Vec::new();
        for query in ["a", "completely different question"] {
            let response = client
                .post(format!("http://{}/chat", addr))
                .json(&json!({"query": query}))
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), 200);
            bodies.push(response.text().await.unwrap());
        }
        assert_eq!(bodies[0], bodies[1]);
    }

    #[tokio::test]
    async fn test_chat_missing_query_is_400() {
        let addr = spawn_server().await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("http://{}/chat", addr))
            .json(&json!({"message": "no query field"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_chat_empty_query_is_400() {
        let addr = spawn_server().await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("http://{}/chat", addr))
            .json(&json!({"query": "   "}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_healthz() {
        let addr = spawn_server().await;
        let response = reqwest::get(format!("http://{}/healthz", addr))
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }
}
