// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

use crate::error::AuditError;
use crate::event::{AuditEventType, AuditLogEntry, AuditSeverity};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditFilterConfig {
	pub min_severity: AuditSeverity,
	pub include_events: Option<Vec<AuditEventType>>,
	pub exclude_events: Option<Vec<AuditEventType>>,
}

impl Default for AuditFilterConfig {
	fn default() -> Self {
		Self {
			min_severity: AuditSeverity::Info,
			include_events: None,
			exclude_events: None,
		}
	}
}

impl AuditFilterConfig {
	/// Filter that only checks severity, parsed from a config value such as `"warning"`.
	pub fn with_min_severity(min_severity: &str) -> Result<Self, AuditError> {
		let min_severity = min_severity
			.parse()
			.map_err(|e| AuditError::ConfigError(format!("{e}")))?;
		Ok(Self {
			min_severity,
			..Self::default()
		})
	}

	pub fn allows(&self, entry: &AuditLogEntry) -> bool {
		if entry.severity < self.min_severity {
			return false;
		}

		if let Some(ref exclude) = self.exclude_events {
			if exclude.contains(&entry.event_type) {
				return false;
			}
		}

		if let Some(ref include) = self.include_events {
			if !include.contains(&entry.event_type) {
				return false;
			}
		}

		true
	}
}
