// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pantry sign-up server.
//!
//! Administrators mint single-use sign-up tokens, new users redeem them to
//! register, and every change is recorded in the audit log.

pub mod api;
pub mod api_docs;
pub mod api_response;
pub mod auth_middleware;
pub mod client_info;
pub mod error;
pub mod role_middleware;
pub mod routes;
pub mod validation;

pub use api::{create_app_state, create_router, AppState};
pub use api_docs::ApiDoc;
pub use error::ServerError;
pub use pantry_server_config::ServerConfig;
