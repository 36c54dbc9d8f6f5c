// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sign-up token HTTP handlers.
//!
//! Administrators create and revoke tokens; anyone holding a token can
//! redeem it once to register. Audit entries are queued and never delay or
//! fail the response.

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use pantry_server_api::{
	CreateSignUpRequest, ErrorResponse, RedeemSignUpRequest, SignUpTokenResponse, UserResponse,
};
use pantry_server_audit::AuditEventType;
use pantry_server_auth::{hash_password, AuthError, NewUser, SignUpToken};
use serde_json::json;

use crate::{
	api::AppState,
	api_response::{auth_error, db_error, internal_error, json_rejection, validation_error},
	auth_middleware::RequireAuth,
	client_info::ClientInfo,
	validation::{validate_create_sign_up, validate_redeem},
};

const SIGN_UP_RESOURCE: &str = "sign_up";

#[utoipa::path(
    get,
    path = "/api/users/sign-ups",
    responses(
        (status = 200, description = "Open sign-up tokens, oldest first", body = Vec<SignUpTokenResponse>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "sign-ups"
)]
/// GET /api/users/sign-ups - List tokens that have not been redeemed.
#[tracing::instrument(skip(state))]
pub async fn list_sign_ups(State(state): State<AppState>) -> impl IntoResponse {
	match state.sign_up_repo.list_sign_ups().await {
		Ok(sign_ups) => {
			let items: Vec<SignUpTokenResponse> =
				sign_ups.into_iter().map(SignUpTokenResponse::from).collect();
			(StatusCode::OK, Json(items)).into_response()
		}
		Err(e) => db_error::<ErrorResponse>(e).into_response(),
	}
}

#[utoipa::path(
    post,
    path = "/api/users/sign-ups",
    request_body = CreateSignUpRequest,
    responses(
        (status = 201, description = "Token created", body = SignUpTokenResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "sign-ups"
)]
/// POST /api/users/sign-ups - Mint a new single-use token.
#[tracing::instrument(skip(state, current_user, client, payload), fields(actor_id = %current_user.id()))]
pub async fn create_sign_up(
	State(state): State<AppState>,
	RequireAuth(current_user): RequireAuth,
	client: ClientInfo,
	payload: Result<Json<CreateSignUpRequest>, JsonRejection>,
) -> impl IntoResponse {
	let Json(payload) = match payload {
		Ok(payload) => payload,
		Err(e) => return json_rejection::<ErrorResponse>(e).into_response(),
	};
	if let Err(e) = validate_create_sign_up(&payload) {
		return validation_error::<ErrorResponse>(e).into_response();
	}

	let sign_up = SignUpToken::new(payload.name.trim(), payload.admin);

	if let Err(e) = state.sign_up_repo.create_sign_up(&sign_up).await {
		return db_error::<ErrorResponse>(e).into_response();
	}

	state.audit_service.log(
		client
			.audit(AuditEventType::SignUpTokenCreated)
			.actor(*current_user.id())
			.resource(SIGN_UP_RESOURCE, sign_up.name.clone())
			.action(format!("Created by {}", current_user.user.full_name))
			.details(json!({ "admin": sign_up.admin }))
			.build(),
	);

	tracing::info!(name = %sign_up.name, "sign-up token created");

	(StatusCode::CREATED, Json(SignUpTokenResponse::from(sign_up))).into_response()
}

#[utoipa::path(
    post,
    path = "/api/users/sign-ups/{token}",
    params(
        ("token" = String, Path, description = "Sign-up token value")
    ),
    request_body = RedeemSignUpRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid registration details", body = ErrorResponse),
        (status = 401, description = "Unknown or already used token", body = ErrorResponse),
        (status = 409, description = "Email or username already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "sign-ups"
)]
/// POST /api/users/sign-ups/{token} - Register a new user with a token.
///
/// The user's admin flag comes from the token, never from the request.
/// An unknown token is rejected with 401 before the body is looked at.
#[tracing::instrument(skip(state, token, client, payload))]
pub async fn redeem_sign_up(
	State(state): State<AppState>,
	Path(token): Path<String>,
	client: ClientInfo,
	payload: Result<Json<RedeemSignUpRequest>, JsonRejection>,
) -> impl IntoResponse {
	match state.sign_up_repo.get_sign_up(&token).await {
		Ok(Some(_)) => {}
		Ok(None) => {
			tracing::debug!("redemption attempted with unknown token");
			return auth_error::<ErrorResponse>(AuthError::InvalidSignUpToken).into_response();
		}
		Err(e) => return db_error::<ErrorResponse>(e).into_response(),
	}

	let Json(payload) = match payload {
		Ok(payload) => payload,
		Err(e) => return json_rejection::<ErrorResponse>(e).into_response(),
	};
	if let Err(e) = validate_redeem(&payload) {
		return validation_error::<ErrorResponse>(e).into_response();
	}

	let RedeemSignUpRequest {
		full_name,
		email,
		password,
		username,
	} = payload;

	let password_hash = match tokio::task::spawn_blocking(move || hash_password(&password)).await {
		Ok(Ok(hash)) => hash,
		Ok(Err(e)) => return auth_error::<ErrorResponse>(e).into_response(),
		Err(e) => {
			tracing::error!(error = %e, "password hashing task failed");
			return internal_error::<ErrorResponse>().into_response();
		}
	};

	// `is_admin` is overwritten from the token inside the transaction.
	let new_user = NewUser::new(full_name, &email, password_hash, false).with_username(username);

	let redemption = match state.sign_up_repo.redeem_sign_up(&token, new_user).await {
		Ok(Some(redemption)) => redemption,
		// Another request redeemed or revoked it after our lookup.
		Ok(None) => {
			return auth_error::<ErrorResponse>(AuthError::InvalidSignUpToken).into_response()
		}
		Err(e) => return db_error::<ErrorResponse>(e).into_response(),
	};

	let user = redemption.user;

	state.audit_service.log(
		client
			.audit(AuditEventType::SignUpTokenUsed)
			.actor(user.id)
			.resource(SIGN_UP_RESOURCE, redemption.sign_up.name.clone())
			.action(format!("New User {}", user.full_name))
			.details(json!({ "admin": user.is_admin }))
			.build(),
	);

	tracing::info!(user_id = %user.id, admin = user.is_admin, "sign-up token redeemed");

	(StatusCode::CREATED, Json(UserResponse::from(user))).into_response()
}

#[utoipa::path(
    delete,
    path = "/api/users/sign-ups/{token}",
    params(
        ("token" = String, Path, description = "Sign-up token value")
    ),
    responses(
        (status = 204, description = "Token deleted, or it did not exist"),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "sign-ups"
)]
/// DELETE /api/users/sign-ups/{token} - Revoke a token.
///
/// Deleting a token that does not exist is not an error.
#[tracing::instrument(skip(state, current_user, client, token), fields(actor_id = %current_user.id()))]
pub async fn delete_sign_up(
	State(state): State<AppState>,
	RequireAuth(current_user): RequireAuth,
	client: ClientInfo,
	Path(token): Path<String>,
) -> impl IntoResponse {
	let removed = match state.sign_up_repo.delete_sign_up(&token).await {
		Ok(removed) => removed,
		Err(e) => return db_error::<ErrorResponse>(e).into_response(),
	};
	let existed = removed.is_some();

	// The audit entry names the token; its value is never recorded.
	let mut entry = client
		.audit(AuditEventType::SignUpTokenDeleted)
		.actor(*current_user.id())
		.action(format!("Deleted by {}", current_user.user.full_name))
		.details(json!({ "existed": existed }));
	if let Some(sign_up) = removed {
		entry = entry.resource(SIGN_UP_RESOURCE, sign_up.name);
	}
	state.audit_service.log(entry.build());

	tracing::info!(existed, "sign-up token deleted");

	StatusCode::NO_CONTENT.into_response()
}
