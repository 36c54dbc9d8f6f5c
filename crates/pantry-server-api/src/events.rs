// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Audit log listing types.

use chrono::{DateTime, Utc};
use pantry_server_audit::AuditLogEntry;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct ListAuditEventsParams {
	/// Maximum number of entries, 1 to 500. Defaults to 50.
	pub limit: Option<i64>,
	/// Only return entries of this event type, e.g. `sign_up_token_used`.
	pub event_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuditEventResponse {
	pub id: String,
	pub timestamp: DateTime<Utc>,
	pub event_type: String,
	pub severity: String,
	pub actor_user_id: Option<String>,
	pub resource_type: Option<String>,
	pub resource_id: Option<String>,
	pub action: String,
	pub ip_address: Option<String>,
	pub user_agent: Option<String>,
	pub request_id: Option<String>,
	#[cfg_attr(feature = "openapi", schema(value_type = Object))]
	pub details: serde_json::Value,
}

impl From<AuditLogEntry> for AuditEventResponse {
	fn from(entry: AuditLogEntry) -> Self {
		Self {
			id: entry.id.to_string(),
			timestamp: entry.timestamp,
			event_type: entry.event_type.to_string(),
			severity: entry.severity.to_string(),
			actor_user_id: entry.actor_user_id.map(|id| id.to_string()),
			resource_type: entry.resource_type,
			resource_id: entry.resource_id,
			action: entry.action,
			ip_address: entry.ip_address,
			user_agent: entry.user_agent,
			request_id: entry.request_id,
			details: entry.details,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListAuditEventsResponse {
	pub items: Vec<AuditEventResponse>,
}
