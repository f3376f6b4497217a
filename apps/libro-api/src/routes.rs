use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;
use libro_service::{AskRequest, AskResponse, CorpusStatus, Error};

pub fn router(state: AppState) -> Router {
	Router::new().route("/health", get(health)).route("/v1/chat", post(chat)).with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/corpus", get(corpus_status))
		.route("/v1/admin/corpus/reload", post(corpus_reload))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn chat(
	State(state): State<AppState>,
	Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
	let response = state.service.ask(payload).await?;

	Ok(Json(response))
}

async fn corpus_status(State(state): State<AppState>) -> Json<CorpusStatus> {
	Json(state.service.corpus_status())
}

async fn corpus_reload(State(state): State<AppState>) -> Result<Json<CorpusStatus>, ApiError> {
	let status = state.service.reload_corpus().await?;

	Ok(Json(status))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				ApiError::new(StatusCode::BAD_REQUEST, "invalid_request", message),
			Error::Corpus(err) => {
				tracing::error!(error = %err, "Corpus unavailable.");

				ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "corpus_unavailable", err.to_string())
			},
			Error::Provider { message } => {
				tracing::error!(error = %message, "Provider failed.");

				ApiError::new(StatusCode::BAD_GATEWAY, "provider_error", message)
			},
			Error::Internal { message } => {
				tracing::error!(error = %message, "Internal failure.");

				ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
