use axum::{
	Json, Router,
	extract::{
		Query, State,
		rejection::{JsonRejection, QueryRejection},
	},
	http::{HeaderMap, StatusCode, header::AUTHORIZATION},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;
use decyde_service::{
	AdminOverview, AreaCoverage, Caller, CompareRequest, CompareResponse, CoverageRequest, Error,
	LogDiagnostics, RedirectRequest, RedirectResponse,
};

pub const HEADER_USER_ID: &str = "X-Decyde-User-Id";

pub fn router(state: AppState) -> Router {
	let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

	Router::new()
		.route("/health", get(health))
		.route("/v1/coverage", get(coverage))
		.route("/v1/compare", post(compare))
		.route("/v1/redirects", post(record_redirect))
		.layer(cors)
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/overview", get(overview))
		.route("/v1/admin/diagnostics", get(diagnostics))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn coverage(
	State(state): State<AppState>,
	query: Result<Query<CoverageRequest>, QueryRejection>,
) -> Result<Json<AreaCoverage>, ApiError> {
	let Query(req) = query.map_err(|err| ApiError::invalid_body(err.body_text()))?;
	let response = state.service.coverage(req).await?;

	Ok(Json(response))
}

async fn compare(
	State(state): State<AppState>,
	headers: HeaderMap,
	payload: Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Json<CompareResponse>, ApiError> {
	let Json(req) = payload.map_err(|err| ApiError::invalid_body(err.body_text()))?;
	let response = state.service.compare(req, &caller_from(&headers)).await?;

	Ok(Json(response))
}

async fn record_redirect(
	State(state): State<AppState>,
	headers: HeaderMap,
	payload: Result<Json<RedirectRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RedirectResponse>), ApiError> {
	let Json(req) = payload.map_err(|err| ApiError::invalid_body(err.body_text()))?;
	let response = state.service.record_redirect(req, &caller_from(&headers)).await?;

	Ok((StatusCode::ACCEPTED, Json(response)))
}

async fn overview(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<AdminOverview>, ApiError> {
	let response = state.service.overview(&caller_from(&headers)).await?;

	Ok(Json(response))
}

async fn diagnostics(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<LogDiagnostics>, ApiError> {
	let response = state.service.activity_diagnostics(&caller_from(&headers))?;

	Ok(Json(response))
}

fn caller_from(headers: &HeaderMap) -> Caller {
	Caller {
		user_id: header_value(headers, HEADER_USER_ID).map(str::to_string),
		bearer_token: bearer_token(headers),
	}
}

/// The auth scheme name is matched case-insensitively.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
	let (scheme, token) = header_value(headers, AUTHORIZATION.as_str())?.split_once(' ')?;
	let token = token.trim();

	if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
		return None;
	}

	Some(token.to_string())
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
	headers
		.get(name)
		.and_then(|value| value.to_str().ok())
		.map(str::trim)
		.filter(|value| !value.is_empty())
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}

	fn invalid_body(message: String) -> Self {
		Self::new(StatusCode::BAD_REQUEST, "invalid_request", message, None)
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { field, message } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", message, Some(vec![field])),
			Error::Unauthorized { message } =>
				Self::new(StatusCode::UNAUTHORIZED, "unauthorized", message, None),
			Error::Forbidden { message } =>
				Self::new(StatusCode::FORBIDDEN, "forbidden", message, None),
			Error::StoreUnavailable { message } => {
				tracing::error!(error = %message, "Store unavailable.");

				Self::new(
					StatusCode::SERVICE_UNAVAILABLE,
					"store_unavailable",
					"Activity logs could not be read.",
					None,
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}
