// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request authentication context.
//!
//! ```text
//! Request → Bearer header / session cookie → hash → session lookup → AuthContext
//! ```
//!
//! The HTTP layer that performs the lookup lives in `pantry-server`; this
//! module holds the types it produces and the header parsing it relies on.
//! Token values are never logged.

use http::header::{AUTHORIZATION, COOKIE};
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::types::{SessionId, UserId};
use crate::user::User;

pub const SESSION_COOKIE_NAME: &str = "pantry_session";

/// The authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
	pub user: User,
	pub session_id: SessionId,
}

impl CurrentUser {
	pub fn new(user: User, session_id: SessionId) -> Self {
		Self { user, session_id }
	}

	pub fn id(&self) -> &UserId {
		&self.user.id
	}

	pub fn is_admin(&self) -> bool {
		self.user.is_admin
	}
}

/// Authentication state attached to every request as an extension.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
	pub current_user: Option<CurrentUser>,
}

impl AuthContext {
	pub fn unauthenticated() -> Self {
		Self { current_user: None }
	}

	pub fn authenticated(current_user: CurrentUser) -> Self {
		Self {
			current_user: Some(current_user),
		}
	}

	pub fn is_authenticated(&self) -> bool {
		self.current_user.is_some()
	}

	pub fn user(&self) -> Option<&CurrentUser> {
		self.current_user.as_ref()
	}

	pub fn require_user(&self) -> Result<&CurrentUser, AuthRequired> {
		self.current_user.as_ref().ok_or(AuthRequired)
	}
}

#[derive(Debug, Clone, Copy)]
pub struct AuthRequired;

impl std::fmt::Display for AuthRequired {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "authentication required")
	}
}

impl std::error::Error for AuthRequired {}

/// Read the session token from the `Cookie` header.
pub fn extract_session_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
	headers
		.get(COOKIE)?
		.to_str()
		.ok()?
		.split(';')
		.find_map(|cookie| {
			let (name, value) = cookie.trim().split_once('=')?;
			(name == cookie_name && !value.is_empty()).then(|| value.to_string())
		})
}

/// Read `Authorization: Bearer <token>`. Any other scheme yields `None`.
#[instrument(level = "trace", skip_all)]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	headers
		.get(AUTHORIZATION)?
		.to_str()
		.ok()?
		.strip_prefix("Bearer ")
		.map(str::trim)
		.filter(|token| !token.is_empty())
		.map(str::to_string)
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::Utc;
	use http::HeaderValue;

	fn make_test_user(is_admin: bool) -> User {
		User {
			id: UserId::generate(),
			username: None,
			full_name: "Test User".to_string(),
			email: "test@example.com".to_string(),
			is_admin,
			created_at: Utc::now(),
			updated_at: Utc::now(),
		}
	}

	mod auth_context {
		use super::*;

		#[test]
		fn unauthenticated_requires_user_fails() {
			let ctx = AuthContext::unauthenticated();
			assert!(!ctx.is_authenticated());
			assert!(ctx.require_user().is_err());
		}

		#[test]
		fn authenticated_exposes_user() {
			let user = make_test_user(true);
			let user_id = user.id;
			let ctx = AuthContext::authenticated(CurrentUser::new(user, SessionId::generate()));

			let current = ctx.require_user().unwrap();
			assert_eq!(current.id(), &user_id);
			assert!(current.is_admin());
		}
	}

	mod cookie_extraction {
		use super::*;

		#[test]
		fn finds_named_cookie_among_others() {
			let mut headers = HeaderMap::new();
			headers.insert(
				COOKIE,
				HeaderValue::from_static("theme=dark; pantry_session=abc123; lang=en"),
			);
			assert_eq!(
				extract_session_cookie(&headers, SESSION_COOKIE_NAME),
				Some("abc123".to_string())
			);
		}

		#[test]
		fn missing_cookie_is_none() {
			let mut headers = HeaderMap::new();
			headers.insert(COOKIE, HeaderValue::from_static("theme=dark"));
			assert!(extract_session_cookie(&headers, SESSION_COOKIE_NAME).is_none());
			assert!(extract_session_cookie(&HeaderMap::new(), SESSION_COOKIE_NAME).is_none());
		}

		#[test]
		fn empty_cookie_value_is_none() {
			let mut headers = HeaderMap::new();
			headers.insert(COOKIE, HeaderValue::from_static("pantry_session="));
			assert!(extract_session_cookie(&headers, SESSION_COOKIE_NAME).is_none());
		}
	}

	mod bearer_extraction {
		use super::*;

		#[test]
		fn extracts_bearer_token() {
			let mut headers = HeaderMap::new();
			headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok_123"));
			assert_eq!(extract_bearer_token(&headers), Some("tok_123".to_string()));
		}

		#[test]
		fn other_schemes_are_ignored() {
			let mut headers = HeaderMap::new();
			headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
			assert!(extract_bearer_token(&headers).is_none());
		}

		#[test]
		fn empty_bearer_is_none() {
			let mut headers = HeaderMap::new();
			headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
			assert!(extract_bearer_token(&headers).is_none());
		}
	}
}
