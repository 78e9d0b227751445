use std::fmt::Display;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, instrument, warn};

use carbomatic_core::llm::anthropic::API_KEY_ENV;
use carbomatic_core::llm::{AnthropicClient, LlmError};
use carbomatic_core::{CarbRequest, CarbResult, MealPlanRequest, MealPlanResult, MealPlanner};

use crate::config::CarbomaticConfig;

/// Static acknowledgement served at `/`.
pub const LIVENESS_MESSAGE: &str = "Carbomatic API is running";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Flat error model: every failure is a 500 with a `detail` message.
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn internal(err: impl Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }

    pub fn meal_plan(err: impl Display) -> Self {
        Self::internal(format!("Error generating meal plan: {err}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = json!({ "detail": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Shared, immutable server state built once at startup.
#[derive(Clone, Default)]
pub struct AppState {
    /// `None` when no API key was configured; meal plan requests then fail
    /// with a configuration error before any network call.
    planner: Option<Arc<MealPlanner>>,
}

impl AppState {
    pub fn new(planner: Option<MealPlanner>) -> Self {
        Self {
            planner: planner.map(Arc::new),
        }
    }

    /// Build the state from resolved configuration.
    pub fn from_config(config: &CarbomaticConfig) -> Self {
        let planner = match &config.anthropic {
            Some(anthropic) => {
                info!(model = %anthropic.model, "meal plan generation enabled");
                let client = AnthropicClient::new(anthropic.clone());
                Some(MealPlanner::new(Arc::new(client)).with_max_tokens(config.max_tokens))
            }
            None => {
                warn!("{API_KEY_ENV} not found; meal plan requests will fail");
                None
            }
        };
        Self::new(planner)
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

fn endpoints() -> Router<AppState> {
    Router::new()
        .route("/calculate-carbs", post(calculate_carbs).options(preflight))
        .route(
            "/generate-meal-plan",
            post(generate_meal_plan).options(preflight),
        )
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/", get(index))
        .merge(endpoints())
        .nest("/api", endpoints())
        .layer(cors)
        .layer(middleware::map_response(stamp_cors_headers))
        .with_state(state)
}

/// Cross-origin headers carried by every response, preflight or not.
async fn stamp_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(config: &CarbomaticConfig) -> Result<()> {
    let app = build_router(AppState::from_config(config));
    let addr: SocketAddr = format!("{}:{}", config.bind, config.port).parse()?;
    info!("carbomatic serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("carbomatic serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index() -> Json<serde_json::Value> {
    Json(json!({ "message": LIVENESS_MESSAGE }))
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

#[instrument(skip_all)]
async fn calculate_carbs(body: Bytes) -> Result<Json<CarbResult>, AppError> {
    let request = CarbRequest::from_json(&body).map_err(|e| {
        warn!("rejected carb calculation: {e}");
        AppError::internal(e)
    })?;
    Ok(Json(carbomatic_core::calculate(&request)))
}

#[instrument(skip_all)]
async fn generate_meal_plan(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MealPlanResult>, AppError> {
    let request = MealPlanRequest::from_json(&body).map_err(AppError::meal_plan)?;

    let planner = state.planner.as_deref().ok_or_else(|| {
        AppError::meal_plan(LlmError::MissingCredential {
            env_var: API_KEY_ENV,
        })
    })?;

    let result = planner.plan(&request).await.map_err(|e| {
        warn!("meal plan generation failed: {e}");
        AppError::meal_plan(e)
    })?;
    Ok(Json(result))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
