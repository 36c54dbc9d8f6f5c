// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Audit log view for administrators.

use axum::{
	extract::{Query, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use pantry_server_api::{
	AuditEventResponse, ErrorResponse, ListAuditEventsParams, ListAuditEventsResponse,
};
use pantry_server_audit::AuditEventType;

use crate::{
	api::AppState,
	api_response::{bad_request, db_error},
};

#[utoipa::path(
    get,
    path = "/api/events",
    params(ListAuditEventsParams),
    responses(
        (status = 200, description = "Recent audit entries, newest first", body = ListAuditEventsResponse),
        (status = 400, description = "Unknown event type", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
/// GET /api/events - List recent audit entries.
#[tracing::instrument(skip(state))]
pub async fn list_events(
	State(state): State<AppState>,
	Query(params): Query<ListAuditEventsParams>,
) -> impl IntoResponse {
	let event_type = match params.event_type.as_deref().map(parse_event_type).transpose() {
		Ok(event_type) => event_type,
		Err(name) => {
			return bad_request::<ErrorResponse>(
				"invalid_event_type",
				format!("Unknown event type '{name}'"),
			)
			.into_response();
		}
	};

	match state.audit_repo.list_recent(event_type, params.limit).await {
		Ok(entries) => {
			let items = entries.into_iter().map(AuditEventResponse::from).collect();
			(StatusCode::OK, Json(ListAuditEventsResponse { items })).into_response()
		}
		Err(e) => db_error::<ErrorResponse>(e).into_response(),
	}
}

fn parse_event_type(name: &str) -> Result<AuditEventType, String> {
	serde_json::from_value(serde_json::Value::String(name.to_string()))
		.map_err(|_| name.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_snake_case_names() {
		assert_eq!(
			parse_event_type("sign_up_token_used").unwrap(),
			AuditEventType::SignUpTokenUsed
		);
		assert_eq!(parse_event_type("nope").unwrap_err(), "nope");
	}
}
