use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::get,
};
use serde::{Deserialize, Serialize};

use bds_service::{
	CompanyDetail, CompanyListRequest, CompanyPageResponse, Error, HealthResponse,
	InvolvementListRequest, StatisticsResponse,
};
use bds_storage::models::SuggestionRow;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/api/companies", get(list_companies))
		.route("/api/companies/{id}", get(get_company))
		.route("/api/involvement/{involvement_type}", get(list_by_involvement))
		.route("/api/search/suggestions", get(suggestions))
		.route("/api/stats", get(stats))
		.route("/api/health", get(health))
		.with_state(state)
}

#[derive(Debug, Deserialize)]
struct SuggestionQuery {
	q: Option<String>,
}

async fn list_companies(
	State(state): State<AppState>,
	Query(req): Query<CompanyListRequest>,
) -> Result<Json<CompanyPageResponse>, ApiError> {
	let response = state.service.list_companies(req).await?;

	Ok(Json(response))
}

async fn get_company(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<CompanyDetail>, ApiError> {
	let response = state.service.get_company(&id).await?;

	Ok(Json(response))
}

async fn list_by_involvement(
	State(state): State<AppState>,
	Path(involvement_type): Path<String>,
	Query(req): Query<InvolvementListRequest>,
) -> Result<Json<CompanyPageResponse>, ApiError> {
	let response = state.service.list_by_involvement(&involvement_type, req).await?;

	Ok(Json(response))
}

async fn suggestions(
	State(state): State<AppState>,
	Query(query): Query<SuggestionQuery>,
) -> Result<Json<Vec<SuggestionRow>>, ApiError> {
	let response = state.service.suggestions(query.q.as_deref()).await?;

	Ok(Json(response))
}

async fn stats(State(state): State<AppState>) -> Result<Json<StatisticsResponse>, ApiError> {
	let response = state.service.statistics().await?;

	Ok(Json(response))
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
	let report = state.service.health().await;
	let status =
		if report.is_healthy() { StatusCode::OK } else { StatusCode::INTERNAL_SERVER_ERROR };

	(status, Json(report))
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
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message, field } => ApiError::new(
				StatusCode::BAD_REQUEST,
				"invalid_request",
				message,
				field.map(|field| vec![field]),
			),
			Error::NotFound { .. } =>
				ApiError::new(StatusCode::NOT_FOUND, "not_found", "Company not found.", None),
			Error::Storage { message } => {
				tracing::error!(error = %message, "Storage request failed.");

				ApiError::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"internal_error",
					"Internal server error.",
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
