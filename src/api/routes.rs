use crate::auth::{SESSION_COOKIE, SessionValidator};
use crate::report::ReportView;
use crate::report::service::{ReportError, WeeklyReportService};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::CookieJar;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::error;

#[derive(Clone)]
pub struct ApiState {
    pub reports: WeeklyReportService,
    pub sessions: Arc<dyn SessionValidator>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/weekly-report/latest", get(weekly_report_latest))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn weekly_report_latest(
    State(state): State<ApiState>,
    jar: CookieJar,
) -> ApiResult<Json<ReportView>> {
    let user_id = authenticated_user(state.sessions.as_ref(), &jar)?;
    let report = state.reports.get_or_create_latest_report(user_id).await?;

    Ok(Json(report))
}

fn authenticated_user(sessions: &dyn SessionValidator, jar: &CookieJar) -> ApiResult<i64> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().trim())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

    sessions
        .validate_session(token)?
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired session".to_string()))
}

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug)]
enum ApiError {
    Unauthorized(String),
    BadRequest(String),
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::Internal(value)
    }
}

impl From<ReportError> for ApiError {
    fn from(value: ReportError) -> Self {
        match value {
            ReportError::Validation(error) => Self::BadRequest(error.to_string()),
            ReportError::Storage(error) => Self::Internal(error),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
            }
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Internal(error) => {
                error!(error = %format!("{error:#}"), "weekly report request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
