// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared harness for the server test binaries: a router over a temp-file
//! database with an admin and a member already signed in.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use axum::{
	body::Body,
	http::{header::HeaderName, header::HeaderValue, Method, Request, StatusCode},
	response::Response,
	Router,
};
use chrono::Duration;
use pantry_common_config::SecretString;
use pantry_server_auth::{
	generate_session_token, hash_password, hash_session_token, NewUser, Session, User,
};
use serde::Serialize;
use tempfile::TempDir;
use tower::ServiceExt;

use pantry_server::{
	api::{create_app_state, create_router, AppState},
	ServerConfig,
};

pub const FIXTURE_PASSWORD: &str = "correct-horse-battery";

#[derive(Clone)]
pub struct TestUser {
	pub user: User,
	pub session_token: String,
	/// Present the token as a cookie instead of a bearer header.
	pub via_cookie: bool,
}

impl TestUser {
	pub fn auth_header(&self) -> (HeaderName, HeaderValue) {
		if self.via_cookie {
			(
				HeaderName::from_static("cookie"),
				HeaderValue::from_str(&format!("pantry_session={}", self.session_token)).unwrap(),
			)
		} else {
			(
				HeaderName::from_static("authorization"),
				HeaderValue::from_str(&format!("Bearer {}", self.session_token)).unwrap(),
			)
		}
	}
}

#[derive(Clone)]
pub struct Fixtures {
	pub admin: TestUser,
	pub member: TestUser,
}

pub struct TestApp {
	pub router: Router,
	pub fixtures: Fixtures,
	pub state: AppState,
	_temp_dir: TempDir,
}

impl TestApp {
	pub async fn new() -> Self {
		let temp_dir = tempfile::tempdir().unwrap();
		let db_path = temp_dir.path().join("test_pantry.db");
		let db_url = format!("sqlite:{}", db_path.display());

		let pool = pantry_server_db::create_pool(&db_url, 4).await.unwrap();
		pantry_server_db::run_migrations(&pool).await.unwrap();

		let config = ServerConfig::default();
		let state = create_app_state(pool, &config).await.unwrap();
		let fixtures = create_fixtures(&state).await;
		let router = create_router(state.clone());

		Self {
			router,
			fixtures,
			state,
			_temp_dir: temp_dir,
		}
	}

	pub async fn get(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self
			.request(Method::GET, path, user, Option::<()>::None)
			.await
	}

	pub async fn post(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::POST, path, user, Some(body)).await
	}

	/// POST with extra request headers, e.g. `user-agent` or `x-forwarded-for`.
	pub async fn post_with_headers(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
		headers: &[(&'static str, &str)],
	) -> Response<Body> {
		self
			.request_with_headers(Method::POST, path, user, Some(body), headers)
			.await
	}

	pub async fn delete(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self
			.request(Method::DELETE, path, user, Option::<()>::None)
			.await
	}

	async fn request<T: Serialize>(
		&self,
		method: Method,
		path: &str,
		user: Option<&TestUser>,
		body: Option<T>,
	) -> Response<Body> {
		self.request_with_headers(method, path, user, body, &[]).await
	}

	async fn request_with_headers<T: Serialize>(
		&self,
		method: Method,
		path: &str,
		user: Option<&TestUser>,
		body: Option<T>,
		headers: &[(&'static str, &str)],
	) -> Response<Body> {
		let mut builder = Request::builder().method(method).uri(path);

		for (name, value) in headers {
			builder = builder.header(*name, *value);
		}

		if let Some(test_user) = user {
			let (name, value) = test_user.auth_header();
			builder = builder.header(name, value);
		}

		let request_body = match body {
			Some(b) => {
				builder = builder.header("content-type", "application/json");
				Body::from(serde_json::to_string(&b).unwrap())
			}
			None => Body::empty(),
		};

		let request = builder.body(request_body).unwrap();
		self.router.clone().oneshot(request).await.unwrap()
	}

	/// Wait until the audit log holds at least `count` entries of `event_type`.
	///
	/// Audit delivery is asynchronous, so tests poll instead of asserting
	/// straight after the request.
	pub async fn wait_for_events(&self, event_type: &str, count: usize) -> Vec<serde_json::Value> {
		let path = format!("/api/events?event_type={event_type}&limit=500");
		for _ in 0..100 {
			let response = self.get(&path, Some(&self.fixtures.admin)).await;
			assert_eq!(response.status(), StatusCode::OK);
			let body = json_body(response).await;
			let items = body["items"].as_array().cloned().unwrap_or_default();
			if items.len() >= count {
				return items;
			}
			tokio::time::sleep(std::time::Duration::from_millis(20)).await;
		}
		panic!("timed out waiting for {count} '{event_type}' audit events");
	}
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	if bytes.is_empty() {
		return serde_json::Value::Null;
	}
	serde_json::from_slice(&bytes).unwrap()
}

async fn create_fixtures(state: &AppState) -> Fixtures {
	let admin = create_test_user(state, "admin@test.com", "Admin User", true, false).await;
	let member = create_test_user(state, "member@test.com", "Member User", false, true).await;
	Fixtures { admin, member }
}

pub async fn create_test_user(
	state: &AppState,
	email: &str,
	full_name: &str,
	is_admin: bool,
	via_cookie: bool,
) -> TestUser {
	let password_hash = hash_password(&SecretString::from(FIXTURE_PASSWORD)).unwrap();
	let user = state
		.user_repo
		.create_user(&NewUser::new(full_name, email, password_hash, is_admin))
		.await
		.unwrap();

	let session_token = generate_session_token();
	let session = Session::new(user.id, Duration::hours(1));
	state
		.session_repo
		.create_session(&session, &hash_session_token(&session_token))
		.await
		.unwrap();

	TestUser {
		user,
		session_token,
		via_cookie,
	}
}
