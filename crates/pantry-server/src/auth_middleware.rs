// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication middleware for Axum.
//!
//! [`auth_layer`] resolves the caller from a session cookie or bearer token
//! and stores an [`AuthContext`] as a request extension. It never rejects a
//! request; route layers ([`crate::role_middleware::RequireRole`]) and the
//! [`RequireAuth`] extractor decide what an anonymous caller may do.
//!
//! # Security Properties
//!
//! - Tokens are hashed with SHA-256 before lookup and are never logged.
//! - Expired sessions are treated as absent.

use axum::{
	body::Body,
	extract::{FromRequestParts, State},
	http::{request::Parts, Request},
	middleware::Next,
	response::{IntoResponse, Response},
};
use pantry_server_api::ErrorResponse;
use pantry_server_auth::{
	extract_bearer_token, extract_session_cookie, hash_session_token, AuthContext, CurrentUser,
};
use pantry_server_db::SessionStore;
use tracing::instrument;

use crate::{api::AppState, api_response::unauthorized};

/// Resolve the request's credentials into an [`AuthContext`].
///
/// The session cookie is tried first, then an `Authorization: Bearer` token.
#[instrument(
	name = "auth_layer",
	skip(state, request, next),
	fields(
		auth_method = tracing::field::Empty,
		user_id = tracing::field::Empty,
	)
)]
pub async fn auth_layer(
	State(state): State<AppState>,
	mut request: Request<Body>,
	next: Next,
) -> Response {
	let headers = request.headers();
	let span = tracing::Span::current();

	let candidates = [
		(
			"session",
			extract_session_cookie(headers, &state.auth_config.session_cookie_name),
		),
		("bearer", extract_bearer_token(headers)),
	];

	for (method, token) in candidates {
		let Some(token) = token else { continue };
		if let Some(auth_ctx) = authenticate_session(&token, state.session_repo.as_ref()).await {
			if let Some(ref current) = auth_ctx.current_user {
				span.record("auth_method", method);
				span.record("user_id", tracing::field::display(current.id()));
			}
			request.extensions_mut().insert(auth_ctx);
			return next.run(request).await;
		}
	}

	span.record("auth_method", "none");
	request
		.extensions_mut()
		.insert(AuthContext::unauthenticated());
	next.run(request).await
}

#[instrument(skip(token, session_repo), fields(session_id = tracing::field::Empty))]
async fn authenticate_session(
	token: &str,
	session_repo: &dyn SessionStore,
) -> Option<AuthContext> {
	let token_hash = hash_session_token(token);

	let (session, user) = match session_repo.get_session_by_token_hash(&token_hash).await {
		Ok(Some(found)) => found,
		Ok(None) => {
			tracing::debug!("Session not found for token hash");
			return None;
		}
		Err(e) => {
			tracing::error!(error = %e, "Failed to look up session");
			return None;
		}
	};

	tracing::Span::current().record("session_id", tracing::field::display(&session.id));

	if session.is_expired() {
		tracing::debug!(session_id = %session.id, "Session expired");
		return None;
	}

	Some(AuthContext::authenticated(CurrentUser::new(
		user, session.id,
	)))
}

/// Extractor for handlers that need the caller.
///
/// Rejects with 401 when [`auth_layer`] found no valid credentials.
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
	S: Send + Sync,
{
	type Rejection = Response;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		parts
			.extensions
			.get::<AuthContext>()
			.and_then(|ctx| ctx.require_user().ok().cloned())
			.map(RequireAuth)
			.ok_or_else(|| {
				unauthorized::<ErrorResponse>("Authentication required").into_response()
			})
	}
}
