// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Route-level authorization.
//!
//! [`RequireRole`] is applied with `route_layer` so every handler behind it
//! is checked before it runs:
//!
//! ```ignore
//! Router::new()
//!     .route("/api/users/sign-ups", post(create_sign_up))
//!     .route_layer(RequireRole::admin());
//! ```
//!
//! Unauthenticated requests get 401, authenticated callers without the
//! required role get 403. Denials are logged with the user id only.

use axum::{
	body::Body,
	http::Request,
	response::{IntoResponse, Response},
};
use pantry_server_api::ErrorResponse;
use pantry_server_auth::AuthContext;
use pin_project_lite::pin_project;
use std::{
	future::Future,
	pin::Pin,
	task::{Context, Poll},
};
use tower::{Layer, Service};

use crate::api_response::{forbidden, internal_error, unauthorized};

/// Route layer for role checks.
///
/// Reads the [`AuthContext`] left by [`crate::auth_middleware::auth_layer`];
/// a request without one is treated as anonymous.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireRole {
	require_admin: bool,
}

impl RequireRole {
	/// Any signed-in user.
	pub fn authenticated() -> Self {
		Self {
			require_admin: false,
		}
	}

	/// Administrators only.
	pub fn admin() -> Self {
		Self {
			require_admin: true,
		}
	}
}

impl<S> Layer<S> for RequireRole {
	type Service = RequireRoleService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		RequireRoleService {
			inner,
			require_admin: self.require_admin,
		}
	}
}

/// Service wrapper for [`RequireRole`] layer.
#[derive(Clone)]
pub struct RequireRoleService<S> {
	inner: S,
	require_admin: bool,
}

impl<S> Service<Request<Body>> for RequireRoleService<S>
where
	S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
	S::Future: Send,
{
	type Response = Response;
	type Error = S::Error;
	type Future = RequireRoleFuture<S::Future>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Request<Body>) -> Self::Future {
		let current_user = req
			.extensions()
			.get::<AuthContext>()
			.and_then(|ctx| ctx.current_user.as_ref());

		let Some(current_user) = current_user else {
			tracing::debug!(
				require_admin = self.require_admin,
				"Role check denied: not authenticated"
			);
			return RequireRoleFuture::Rejected {
				resp: Some(unauthorized::<ErrorResponse>("Authentication required").into_response()),
			};
		};

		if self.require_admin && !current_user.is_admin() {
			tracing::info!(
				user_id = %current_user.id(),
				require_admin = self.require_admin,
				"Role check denied: insufficient privileges"
			);
			return RequireRoleFuture::Rejected {
				resp: Some(forbidden::<ErrorResponse>("Insufficient permissions").into_response()),
			};
		}

		tracing::debug!(user_id = %current_user.id(), "Role check passed");

		RequireRoleFuture::Inner {
			fut: self.inner.call(req),
		}
	}
}

pin_project! {
	/// Future for [`RequireRoleService`].
	#[project = RequireRoleFutureProj]
	pub enum RequireRoleFuture<F> {
		Inner { #[pin] fut: F },
		Rejected { resp: Option<Response> },
	}
}

impl<F, E> Future for RequireRoleFuture<F>
where
	F: Future<Output = Result<Response, E>>,
{
	type Output = Result<Response, E>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		match self.project() {
			RequireRoleFutureProj::Inner { fut } => fut.poll(cx),
			RequireRoleFutureProj::Rejected { resp } => Poll::Ready(Ok(resp
				.take()
				.unwrap_or_else(|| internal_error::<ErrorResponse>().into_response()))),
		}
	}
}
