// 🌐 HTTP API - axum router over the chart engine
//
// GET  /api/health
// POST /api/bazi   body { "userData": { ... } } → { "chart": ChartReport }

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::calendar::CalendarProvider;
use crate::chart::{compute_chart, ChartSettings};
use crate::error::{ChartError, ErrorPayload, ValidationError};
use crate::report::ChartReport;
use crate::request::RequestEnvelope;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    provider: Arc<dyn CalendarProvider + Send + Sync>,
    settings: ChartSettings,
}

impl AppState {
    pub fn new(provider: Arc<dyn CalendarProvider + Send + Sync>, settings: ChartSettings) -> Self {
        AppState { provider, settings }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
pub struct ChartResponse {
    pub chart: ChartReport,
}

/// A chart failure rendered as a status code plus `ErrorPayload`.
pub struct ApiError(ChartError);

impl From<ChartError> for ApiError {
    fn from(err: ChartError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            ChartError::Validation(_) => StatusCode::BAD_REQUEST,
            ChartError::CalendarProvider(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ChartError::InternalInvariant(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "chart request failed");
        } else {
            tracing::info!(error = %self.0, kind = self.0.kind(), "chart request rejected");
        }
        (status, Json(ErrorPayload::from(&self.0))).into_response()
    }
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
    })
}

async fn compute(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChartResponse>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        ChartError::from(ValidationError::new("body", rejection.body_text()))
    })?;
    let envelope = RequestEnvelope::from_value(&body).map_err(ChartError::from)?;

    let moment = envelope.user_data.validate().map_err(ChartError::from)?;
    let chart = compute_chart(&moment, &state.settings, state.provider.as_ref())?;
    tracing::info!(civil = %moment.civil, longitude = moment.longitude, "chart computed");

    Ok(Json(ChartResponse {
        chart: ChartReport::from(&chart),
    }))
}

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/bazi", post(compute))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}
