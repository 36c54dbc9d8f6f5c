// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for the audit log and profile routes.

use axum::http::{Method, StatusCode};

use super::{run_authz_cases, AuthzCase};
use crate::common::TestApp;

#[tokio::test]
async fn events_and_profile_authz_matrix() {
	let app = TestApp::new().await;
	let admin = app.fixtures.admin.clone();
	let member = app.fixtures.member.clone();

	let cases = [
		AuthzCase {
			name: "anonymous cannot read events",
			method: Method::GET,
			path: "/api/events".into(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "member cannot read events",
			method: Method::GET,
			path: "/api/events".into(),
			user: Some(member.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "admin can read events",
			method: Method::GET,
			path: "/api/events".into(),
			user: Some(admin.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "unknown event type is rejected",
			method: Method::GET,
			path: "/api/events?event_type=not_a_thing".into(),
			user: Some(admin.clone()),
			body: None,
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "anonymous has no profile",
			method: Method::GET,
			path: "/api/users/self".into(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "member sees own profile",
			method: Method::GET,
			path: "/api/users/self".into(),
			user: Some(member.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "health is public",
			method: Method::GET,
			path: "/health".into(),
			user: None,
			body: None,
			expected_status: StatusCode::OK,
		},
	];

	run_authz_cases(&app, &cases).await;
}
