// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

pub mod auth;
pub mod error;
pub mod events;
pub mod health;
pub mod sign_ups;
pub mod users;

pub use auth::{LoginRequest, LoginResponse};
pub use error::ErrorResponse;
pub use events::{AuditEventResponse, ListAuditEventsParams, ListAuditEventsResponse};
pub use health::{HealthResponse, HealthStatus};
pub use sign_ups::{CreateSignUpRequest, RedeemSignUpRequest, SignUpTokenResponse};
pub use users::UserResponse;
