// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for sign-up token routes.

use axum::http::{Method, StatusCode};
use serde_json::json;

use super::{run_authz_cases, AuthzCase};
use crate::common::{json_body, TestApp};

#[tokio::test]
async fn sign_up_routes_authz_matrix() {
	let app = TestApp::new().await;
	let admin = app.fixtures.admin.clone();
	let member = app.fixtures.member.clone();
	let create_body = json!({ "name": "Matrix", "admin": false });

	let cases = [
		AuthzCase {
			name: "anonymous cannot list",
			method: Method::GET,
			path: "/api/users/sign-ups".into(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "member can list",
			method: Method::GET,
			path: "/api/users/sign-ups".into(),
			user: Some(member.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "admin can list",
			method: Method::GET,
			path: "/api/users/sign-ups".into(),
			user: Some(admin.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "anonymous cannot create",
			method: Method::POST,
			path: "/api/users/sign-ups".into(),
			user: None,
			body: Some(create_body.clone()),
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "member cannot create",
			method: Method::POST,
			path: "/api/users/sign-ups".into(),
			user: Some(member.clone()),
			body: Some(create_body.clone()),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "admin can create",
			method: Method::POST,
			path: "/api/users/sign-ups".into(),
			user: Some(admin.clone()),
			body: Some(create_body.clone()),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "anonymous cannot delete",
			method: Method::DELETE,
			path: "/api/users/sign-ups/whatever".into(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "member cannot delete",
			method: Method::DELETE,
			path: "/api/users/sign-ups/whatever".into(),
			user: Some(member.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "admin can delete",
			method: Method::DELETE,
			path: "/api/users/sign-ups/whatever".into(),
			user: Some(admin.clone()),
			body: None,
			expected_status: StatusCode::NO_CONTENT,
		},
		AuthzCase {
			name: "anonymous may attempt redemption",
			method: Method::POST,
			path: "/api/users/sign-ups/not-a-token".into(),
			user: None,
			body: Some(json!({
				"full_name": "Nobody",
				"email": "nobody@example.com",
				"password": "long-enough-password"
			})),
			expected_status: StatusCode::UNAUTHORIZED,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn member_create_leaves_no_token_behind() {
	let app = TestApp::new().await;
	let member = &app.fixtures.member;

	let response = app
		.post(
			"/api/users/sign-ups",
			Some(member),
			json!({ "name": "Sneaky", "admin": true }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);
	let body = json_body(response).await;
	assert_eq!(body["error"], "forbidden");

	let listed = json_body(app.get("/api/users/sign-ups", Some(member)).await).await;
	assert_eq!(listed.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn member_delete_leaves_token_in_place() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;
	let member = &app.fixtures.member;

	let created = json_body(
		app.post(
			"/api/users/sign-ups",
			Some(admin),
			json!({ "name": "Keep me", "admin": false }),
		)
		.await,
	)
	.await;
	let token = created["token"].as_str().unwrap();

	let response = app
		.delete(&format!("/api/users/sign-ups/{token}"), Some(member))
		.await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);

	let listed = json_body(app.get("/api/users/sign-ups", Some(admin)).await).await;
	assert_eq!(listed.as_array().unwrap().len(), 1);
	assert_eq!(listed[0]["token"], token);
}

#[tokio::test]
async fn unknown_session_token_is_anonymous() {
	let app = TestApp::new().await;
	let mut forged = app.fixtures.admin.clone();
	forged.session_token = "0".repeat(64);

	let response = app.get("/api/users/sign-ups", Some(&forged)).await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
