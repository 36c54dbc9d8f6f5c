// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password login and logout.

use axum::{
	extract::{rejection::JsonRejection, State},
	http::{header::SET_COOKIE, HeaderValue, StatusCode},
	response::{IntoResponse, Response},
	Json,
};
use chrono::Duration;
use pantry_server_api::{ErrorResponse, LoginRequest, LoginResponse};
use pantry_server_audit::AuditEventType;
use pantry_server_auth::{
	generate_session_token, hash_session_token, verify_password, AuthError, Session,
};
use serde_json::json;

use crate::{
	api::AppState,
	api_response::{auth_error, db_error, internal_error, json_rejection, validation_error},
	auth_middleware::RequireAuth,
	client_info::ClientInfo,
	validation::validate_login,
};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session created", body = LoginResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Wrong email or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
/// POST /api/auth/login - Exchange email and password for a session token.
///
/// The token is returned in the body and as an HttpOnly cookie.
#[tracing::instrument(skip(state, client, payload))]
pub async fn login(
	State(state): State<AppState>,
	client: ClientInfo,
	payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
	let Json(payload) = match payload {
		Ok(payload) => payload,
		Err(e) => return json_rejection::<ErrorResponse>(e).into_response(),
	};
	if let Err(e) = validate_login(&payload) {
		return validation_error::<ErrorResponse>(e).into_response();
	}

	let credentials = match state.user_repo.get_credentials_by_email(&payload.email).await {
		Ok(credentials) => credentials,
		Err(e) => return db_error::<ErrorResponse>(e).into_response(),
	};

	let Some(credentials) = credentials else {
		return login_failed(&state, &client, None);
	};

	let password = payload.password.clone();
	let hash = credentials.password_hash.clone();
	let verified = match tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await
	{
		Ok(Ok(verified)) => verified,
		Ok(Err(e)) => return auth_error::<ErrorResponse>(e).into_response(),
		Err(e) => {
			tracing::error!(error = %e, "password verification task failed");
			return internal_error::<ErrorResponse>().into_response();
		}
	};

	let user = credentials.user;
	if !verified {
		return login_failed(&state, &client, Some(&user));
	}

	let ttl_hours = i64::try_from(state.auth_config.session_ttl_hours).unwrap_or(i64::MAX / 3600);
	let token = generate_session_token();
	let session = Session::new(user.id, Duration::hours(ttl_hours));

	if let Err(e) = state
		.session_repo
		.create_session(&session, &hash_session_token(&token))
		.await
	{
		return db_error::<ErrorResponse>(e).into_response();
	}

	state.audit_service.log(
		client
			.audit(AuditEventType::Login)
			.actor(user.id)
			.resource("session", session.id.to_string())
			.action(format!("{} signed in", user.full_name))
			.build(),
	);

	tracing::info!(user_id = %user.id, session_id = %session.id, "user logged in");

	let cookie = session_cookie(
		&state.auth_config.session_cookie_name,
		&token,
		ttl_hours.saturating_mul(3600),
	);
	let mut response = (
		StatusCode::OK,
		Json(LoginResponse {
			token,
			expires_at: session.expires_at,
		}),
	)
		.into_response();
	if let Ok(value) = HeaderValue::from_str(&cookie) {
		response.headers_mut().insert(SET_COOKIE, value);
	}
	response
}

/// Unknown email and wrong password are indistinguishable to the caller.
fn login_failed(
	state: &AppState,
	client: &ClientInfo,
	user: Option<&pantry_server_auth::User>,
) -> Response {
	let mut entry = client
		.audit(AuditEventType::LoginFailed)
		.action("Login failed")
		.details(json!({ "known_user": user.is_some() }));
	if let Some(user) = user {
		entry = entry.resource("user", user.id.to_string());
	}
	state.audit_service.log(entry.build());

	auth_error::<ErrorResponse>(AuthError::InvalidCredentials).into_response()
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Session ended"),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
/// POST /api/auth/logout - End the current session.
#[tracing::instrument(skip(state, current_user, client), fields(user_id = %current_user.id()))]
pub async fn logout(
	State(state): State<AppState>,
	RequireAuth(current_user): RequireAuth,
	client: ClientInfo,
) -> Response {
	if let Err(e) = state
		.session_repo
		.delete_session(&current_user.session_id)
		.await
	{
		return db_error::<ErrorResponse>(e).into_response();
	}

	state.audit_service.log(
		client
			.audit(AuditEventType::Logout)
			.actor(*current_user.id())
			.resource("session", current_user.session_id.to_string())
			.action(format!("{} signed out", current_user.user.full_name))
			.build(),
	);

	let mut response = StatusCode::NO_CONTENT.into_response();
	let cookie = session_cookie(&state.auth_config.session_cookie_name, "", 0);
	if let Ok(value) = HeaderValue::from_str(&cookie) {
		response.headers_mut().insert(SET_COOKIE, value);
	}
	response
}

fn session_cookie(name: &str, value: &str, max_age_secs: i64) -> String {
	format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cookie_is_http_only() {
		let cookie = session_cookie("pantry_session", "abc", 3600);
		assert!(cookie.starts_with("pantry_session=abc;"));
		assert!(cookie.contains("HttpOnly"));
		assert!(cookie.contains("Max-Age=3600"));
	}

	#[test]
	fn clearing_cookie_expires_it() {
		let cookie = session_cookie("pantry_session", "", 0);
		assert!(cookie.starts_with("pantry_session=;"));
		assert!(cookie.ends_with("Max-Age=0"));
	}
}
