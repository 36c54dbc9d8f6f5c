// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{http::StatusCode, response::IntoResponse, Json};
use pantry_server_api::{ErrorResponse, UserResponse};

use crate::auth_middleware::RequireAuth;

#[utoipa::path(
    get,
    path = "/api/users/self",
    responses(
        (status = 200, description = "The signed-in user", body = UserResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "users"
)]
/// GET /api/users/self - Return the caller's own profile.
pub async fn get_current_user(RequireAuth(current_user): RequireAuth) -> impl IntoResponse {
	(StatusCode::OK, Json(UserResponse::from(current_user.user)))
}
