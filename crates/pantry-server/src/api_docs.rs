// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OpenAPI documentation for pantry-server.
//!
//! Interactive documentation is served at `/api/docs` and the raw JSON
//! document at `/api/openapi.json`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pantry Server API",
        version = "1.0.0",
        description = "Invitation-based user registration. Administrators mint single-use sign-up tokens that new users redeem to create an account.",
        license(name = "Proprietary"),
        contact(
            name = "Geoffrey Huntley",
            email = "ghuntley@ghuntley.com",
            url = "https://ghuntley.com"
        )
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "sign-ups", description = "Sign-up token minting, redemption and revocation"),
        (name = "auth", description = "Password login and session management"),
        (name = "users", description = "User profile"),
        (name = "events", description = "Audit log (administrators only)"),
        (name = "health", description = "Health checks")
    ),
    paths(
        crate::routes::sign_ups::list_sign_ups,
        crate::routes::sign_ups::create_sign_up,
        crate::routes::sign_ups::redeem_sign_up,
        crate::routes::sign_ups::delete_sign_up,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::users::get_current_user,
        crate::routes::events::list_events,
        crate::routes::health::health_check,
    ),
    components(
        schemas(
            pantry_server_api::CreateSignUpRequest,
            pantry_server_api::SignUpTokenResponse,
            pantry_server_api::RedeemSignUpRequest,
            pantry_server_api::UserResponse,
            pantry_server_api::LoginRequest,
            pantry_server_api::LoginResponse,
            pantry_server_api::AuditEventResponse,
            pantry_server_api::ListAuditEventsResponse,
            pantry_server_api::HealthResponse,
            pantry_server_api::HealthStatus,
            pantry_server_api::ErrorResponse,
        )
    )
)]
pub struct ApiDoc;
