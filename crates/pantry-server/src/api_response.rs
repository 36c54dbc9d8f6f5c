// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error response helpers for HTTP handlers.
//!
//! Every helper yields `(StatusCode, Json<T>)` so handlers can write
//! `return forbidden("...").into_response();`.

use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use pantry_server_api::ErrorResponse;
use pantry_server_auth::AuthError;
use pantry_server_db::DbError;
use serde::Serialize;

use crate::validation::ValidationError;

/// Trait for API error response types that have `error` and `message` fields.
pub trait ApiErrorResponse: Serialize + Send {
	fn new(error: impl Into<String>, message: impl Into<String>) -> Self;
}

impl ApiErrorResponse for ErrorResponse {
	fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
		ErrorResponse::new(error, message)
	}
}

/// Create a 400 Bad Request response.
pub fn bad_request<T: ApiErrorResponse>(
	error: impl Into<String>,
	message: impl Into<String>,
) -> (StatusCode, Json<T>) {
	(StatusCode::BAD_REQUEST, Json(T::new(error, message)))
}

/// Create a 400 Bad Request response from a [`ValidationError`].
pub fn validation_error<T: ApiErrorResponse>(e: ValidationError) -> (StatusCode, Json<T>) {
	(StatusCode::BAD_REQUEST, Json(T::new(e.error, e.message)))
}

/// Create a 400 Bad Request response for a body that is not the expected JSON.
pub fn json_rejection<T: ApiErrorResponse>(e: JsonRejection) -> (StatusCode, Json<T>) {
	bad_request("invalid_body", e.body_text())
}

/// Create a 401 Unauthorized response.
pub fn unauthorized<T: ApiErrorResponse>(message: impl Into<String>) -> (StatusCode, Json<T>) {
	(StatusCode::UNAUTHORIZED, Json(T::new("unauthorized", message)))
}

/// Create a 403 Forbidden response.
pub fn forbidden<T: ApiErrorResponse>(message: impl Into<String>) -> (StatusCode, Json<T>) {
	(StatusCode::FORBIDDEN, Json(T::new("forbidden", message)))
}

/// Create a 409 Conflict response.
pub fn conflict<T: ApiErrorResponse>(
	error: impl Into<String>,
	message: impl Into<String>,
) -> (StatusCode, Json<T>) {
	(StatusCode::CONFLICT, Json(T::new(error, message)))
}

/// Create a 500 Internal Server Error response.
///
/// The message is fixed; callers log the underlying error themselves.
pub fn internal_error<T: ApiErrorResponse>() -> (StatusCode, Json<T>) {
	(
		StatusCode::INTERNAL_SERVER_ERROR,
		Json(T::new("internal_error", "An internal error occurred")),
	)
}

/// Map a persistence error to a response, logging anything that becomes a 500.
pub fn db_error<T: ApiErrorResponse>(e: DbError) -> (StatusCode, Json<T>) {
	match e {
		DbError::Conflict(message) => conflict("conflict", message),
		DbError::NotFound(message) => (StatusCode::NOT_FOUND, Json(T::new("not_found", message))),
		other => {
			tracing::error!(error = %other, "database operation failed");
			internal_error()
		}
	}
}

/// Map an authentication error to a response.
pub fn auth_error<T: ApiErrorResponse>(e: AuthError) -> (StatusCode, Json<T>) {
	if e.is_internal() {
		tracing::error!(error = %e, "authentication failure");
		return internal_error();
	}
	let status =
		StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
	let code = match status {
		StatusCode::FORBIDDEN => "forbidden",
		_ => "unauthorized",
	};
	(status, Json(T::new(code, e.to_string())))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn conflict_keeps_repository_message() {
		let (status, Json(body)) =
			db_error::<ErrorResponse>(DbError::Conflict("email is already registered".into()));
		assert_eq!(status, StatusCode::CONFLICT);
		assert_eq!(body.message, "email is already registered");
	}

	#[test]
	fn internal_errors_do_not_leak_details() {
		let (status, Json(body)) =
			db_error::<ErrorResponse>(DbError::Internal("disk exploded at /var/lib".into()));
		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
		assert!(!body.message.contains("/var/lib"));
	}

	#[test]
	fn invalid_sign_up_token_is_unauthorized() {
		let (status, Json(body)) = auth_error::<ErrorResponse>(AuthError::InvalidSignUpToken);
		assert_eq!(status, StatusCode::UNAUTHORIZED);
		assert_eq!(body.error, "unauthorized");
	}

	#[test]
	fn hashing_failure_is_internal() {
		let (status, _) = auth_error::<ErrorResponse>(AuthError::HashingError("salt".into()));
		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	}
}
