//! HTTP prediction endpoint.
//!
//! `POST /predict` with `{"email": "..."}` answers `{"result": "Phishing" | "Legitimate"}`,
//! or 400 with `{"error": "..."}` when the payload carries no usable email.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::dataset::Label;
use crate::error::Result;
use crate::inference::InferenceContext;

/// Prediction request
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Any JSON value; falsy values count as absent
    #[serde(default)]
    pub email: Option<Value>,
}

impl PredictRequest {
    /// The email text, or why the request carries none.
    pub fn email_text(self) -> std::result::Result<String, ApiError> {
        match self.email {
            None => Err(ApiError::MissingEmail),
            Some(value) if is_falsy(&value) => Err(ApiError::MissingEmail),
            Some(Value::String(text)) => Ok(text),
            Some(other) => Err(ApiError::InvalidPayload(format!(
                "`email` must be a string, got {}",
                other
            ))),
        }
    }
}

/// `null`, `false`, zero, `""`, `[]` and `{}`.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Prediction response
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub result: Label,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Request validation failures, all answered with 400
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No email content provided")]
    MissingEmail,

    #[error("Invalid JSON payload: {0}")]
    InvalidPayload(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidPayload(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// Build the router with the prediction route, permissive CORS and request tracing
pub fn router(context: Arc<InferenceContext>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/predict", post(predict))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}

/// Binds `listen_addr` and serves until Ctrl-C
pub async fn serve(listen_addr: &str, context: Arc<InferenceContext>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!("🌐 Server listening on http://{}", listener.local_addr()?);
    info!(
        "💬 Try: curl -X POST http://{}/predict -H 'Content-Type: application/json' -d '{{\"email\": \"Free money now, click here!!!\"}}'",
        listen_addr
    );

    axum::serve(listener, router(context))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

async fn predict(
    State(context): State<Arc<InferenceContext>>,
    payload: std::result::Result<Json<PredictRequest>, JsonRejection>,
) -> std::result::Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload?;
    let email = request.email_text()?;

    let result = context.classify(&email);
    debug!("Classified {} chars as {}", email.len(), result);

    Ok(Json(PredictResponse { result }))
}
