// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router construction.

use axum::{
	middleware::from_fn_with_state,
	routing::{delete, get, post},
	Router,
};
use pantry_common_config::SecretString;
use pantry_server_audit::{
	AuditEventType, AuditFilterConfig, AuditLogEntry, AuditService, AuditSink, SqliteAuditSink,
	TracingAuditSink,
};
use pantry_server_auth::{hash_password, NewUser};
use pantry_server_config::{AuthConfig, BootstrapAdmin, ServerConfig};
use pantry_server_db::{
	AuditRepository, AuditStore, SessionRepository, SessionStore, SignUpRepository, SignUpStore,
	UserRepository, UserStore,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
	auth_middleware::auth_layer, error::ServerError, role_middleware::RequireRole, routes,
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub sign_up_repo: Arc<dyn SignUpStore>,
	pub user_repo: Arc<dyn UserStore>,
	pub session_repo: Arc<dyn SessionStore>,
	pub audit_repo: Arc<dyn AuditStore>,
	pub audit_service: Arc<AuditService>,
	pub auth_config: AuthConfig,
}

/// Build the application state from a migrated pool.
///
/// Starts the audit pipeline and, if configured and the user table is empty,
/// creates the bootstrap administrator. Must be called inside a Tokio runtime.
pub async fn create_app_state(
	pool: SqlitePool,
	config: &ServerConfig,
) -> Result<AppState, ServerError> {
	let audit_service = Arc::new(create_audit_service(pool.clone(), config)?);

	let state = AppState {
		sign_up_repo: Arc::new(SignUpRepository::new(pool.clone())),
		user_repo: Arc::new(UserRepository::new(pool.clone())),
		session_repo: Arc::new(SessionRepository::new(pool.clone())),
		audit_repo: Arc::new(AuditRepository::new(pool.clone())),
		audit_service,
		auth_config: config.auth.clone(),
		pool,
	};

	if let Some(admin) = &config.auth.bootstrap_admin {
		bootstrap_admin(&state, admin).await?;
	}

	Ok(state)
}

fn create_audit_service(
	pool: SqlitePool,
	config: &ServerConfig,
) -> Result<AuditService, ServerError> {
	let audit = &config.audit;
	let global_filter = AuditFilterConfig::with_min_severity(&audit.min_severity)?;

	let mut sinks: Vec<Arc<dyn AuditSink>> = Vec::new();
	if audit.enabled {
		sinks.push(Arc::new(SqliteAuditSink::new(pool, AuditFilterConfig::default())));
		if audit.log_events {
			sinks.push(Arc::new(TracingAuditSink::new(AuditFilterConfig::default())));
		}
	} else {
		tracing::warn!("audit logging disabled; events will be discarded");
	}

	tracing::info!(
		sinks = sinks.len(),
		queue_capacity = audit.queue_capacity,
		overflow_policy = ?audit.queue_overflow_policy,
		min_severity = %global_filter.min_severity,
		"audit pipeline started"
	);

	Ok(AuditService::new(
		global_filter,
		audit.queue_capacity,
		audit.queue_overflow_policy,
		sinks,
	))
}

/// Create the configured administrator when no users exist yet.
#[tracing::instrument(skip(state, admin), fields(email = %admin.email))]
async fn bootstrap_admin(state: &AppState, admin: &BootstrapAdmin) -> Result<(), ServerError> {
	let existing = state.user_repo.count_users().await?;
	if existing > 0 {
		tracing::debug!(existing, "users already present, skipping bootstrap admin");
		return Ok(());
	}

	let password: SecretString = admin.password.clone();
	let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

	let user = state
		.user_repo
		.create_user(&NewUser::new(
			admin.full_name.clone(),
			&admin.email,
			password_hash,
			true,
		))
		.await?;

	state.audit_service.log(
		AuditLogEntry::builder(AuditEventType::UserCreated)
			.actor(user.id)
			.resource("user", user.id.to_string())
			.action("Bootstrap administrator created")
			.build(),
	);

	tracing::info!(user_id = %user.id, "bootstrap administrator created");
	Ok(())
}

/// Create the API router with all routes.
pub fn create_router(state: AppState) -> Router {
	let public = Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/api/auth/login", post(routes::auth::login))
		.route(
			"/api/users/sign-ups/{token}",
			post(routes::sign_ups::redeem_sign_up),
		);

	let authenticated = Router::new()
		.route("/api/users/sign-ups", get(routes::sign_ups::list_sign_ups))
		.route("/api/users/self", get(routes::users::get_current_user))
		.route("/api/auth/logout", post(routes::auth::logout))
		.route_layer(RequireRole::authenticated());

	let admin = Router::new()
		.route("/api/users/sign-ups", post(routes::sign_ups::create_sign_up))
		.route(
			"/api/users/sign-ups/{token}",
			delete(routes::sign_ups::delete_sign_up),
		)
		.route("/api/events", get(routes::events::list_events))
		.route_layer(RequireRole::admin());

	Router::new()
		.merge(public)
		.merge(authenticated)
		.merge(admin)
		.layer(from_fn_with_state(state.clone(), auth_layer))
		.with_state(state)
		.merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", crate::api_docs::ApiDoc::openapi()))
}
