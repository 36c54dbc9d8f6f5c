// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Mirrors audit events into the application log under the `pantry_audit`
//! target, at a level derived from the event severity.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::Level;

use super::{AuditSink, AuditSinkError};
use crate::event::{AuditLogEntry, AuditSeverity};
use crate::filter::AuditFilterConfig;

pub struct TracingAuditSink {
	filter: AuditFilterConfig,
}

impl TracingAuditSink {
	pub fn new(filter: AuditFilterConfig) -> Self {
		Self { filter }
	}
}

pub fn severity_to_level(severity: AuditSeverity) -> Level {
	match severity {
		AuditSeverity::Debug => Level::DEBUG,
		AuditSeverity::Info | AuditSeverity::Notice => Level::INFO,
		AuditSeverity::Warning => Level::WARN,
		AuditSeverity::Error | AuditSeverity::Critical => Level::ERROR,
	}
}

// `tracing` macros need the level at compile time.
macro_rules! emit_audit_event {
	($macro:ident, $entry:expr, $details:expr) => {
		tracing::$macro!(
			target: "pantry_audit",
			event_type = %$entry.event_type,
			severity = %$entry.severity,
			id = %$entry.id,
			timestamp = %$entry.timestamp.to_rfc3339(),
			action = %$entry.action,
			actor_user_id = $entry.actor_user_id.map(|u| u.to_string()),
			resource_type = $entry.resource_type.as_deref(),
			resource_id = $entry.resource_id.as_deref(),
			ip_address = $entry.ip_address.as_deref(),
			user_agent = $entry.user_agent.as_deref(),
			request_id = $entry.request_id.as_deref(),
			details = $details,
			"audit event"
		)
	};
}

#[async_trait]
impl AuditSink for TracingAuditSink {
	fn name(&self) -> &str {
		"tracing"
	}

	fn filter(&self) -> &AuditFilterConfig {
		&self.filter
	}

	async fn publish(&self, event: Arc<AuditLogEntry>) -> Result<(), AuditSinkError> {
		let details = if event.details.is_null() {
			None
		} else {
			Some(event.details.to_string())
		};

		match severity_to_level(event.severity) {
			Level::TRACE => emit_audit_event!(trace, event, details),
			Level::DEBUG => emit_audit_event!(debug, event, details),
			Level::INFO => emit_audit_event!(info, event, details),
			Level::WARN => emit_audit_event!(warn, event, details),
			Level::ERROR => emit_audit_event!(error, event, details),
		}

		Ok(())
	}
}
