// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Audit logging configuration section.

use serde::{Deserialize, Serialize};

const DEFAULT_QUEUE_CAPACITY: usize = 10000;

/// What `AuditService::log` does when the queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueueOverflowPolicy {
	#[default]
	DropNewest,
	DropOldest,
	Block,
}

impl QueueOverflowPolicy {
	/// Unknown names fall back to the default rather than failing startup.
	pub fn from_name(name: &str) -> Self {
		match name.to_ascii_lowercase().as_str() {
			"drop_oldest" => QueueOverflowPolicy::DropOldest,
			"block" => QueueOverflowPolicy::Block,
			_ => QueueOverflowPolicy::DropNewest,
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuditConfigLayer {
	pub enabled: Option<bool>,
	pub queue_capacity: Option<usize>,
	pub queue_overflow_policy: Option<QueueOverflowPolicy>,
	pub min_severity: Option<String>,
	/// Mirror every audit event into the application log.
	pub log_events: Option<bool>,
}

impl AuditConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
		if other.queue_capacity.is_some() {
			self.queue_capacity = other.queue_capacity;
		}
		if other.queue_overflow_policy.is_some() {
			self.queue_overflow_policy = other.queue_overflow_policy;
		}
		if other.min_severity.is_some() {
			self.min_severity = other.min_severity;
		}
		if other.log_events.is_some() {
			self.log_events = other.log_events;
		}
	}

	pub fn finalize(self) -> AuditConfig {
		AuditConfig {
			enabled: self.enabled.unwrap_or(true),
			queue_capacity: self.queue_capacity.unwrap_or(DEFAULT_QUEUE_CAPACITY),
			queue_overflow_policy: self.queue_overflow_policy.unwrap_or_default(),
			min_severity: self.min_severity.unwrap_or_else(|| "info".to_string()),
			log_events: self.log_events.unwrap_or(true),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditConfig {
	pub enabled: bool,
	pub queue_capacity: usize,
	pub queue_overflow_policy: QueueOverflowPolicy,
	pub min_severity: String,
	pub log_events: bool,
}

impl Default for AuditConfig {
	fn default() -> Self {
		AuditConfigLayer::default().finalize()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_values() {
		let config = AuditConfig::default();
		assert!(config.enabled);
		assert_eq!(config.queue_capacity, 10000);
		assert_eq!(
			config.queue_overflow_policy,
			QueueOverflowPolicy::DropNewest
		);
		assert_eq!(config.min_severity, "info");
		assert!(config.log_events);
	}

	#[test]
	fn test_layer_finalize_with_values() {
		let layer = AuditConfigLayer {
			enabled: Some(false),
			queue_capacity: Some(16),
			queue_overflow_policy: Some(QueueOverflowPolicy::Block),
			min_severity: Some("warning".to_string()),
			log_events: Some(false),
		};
		let config = layer.finalize();
		assert!(!config.enabled);
		assert_eq!(config.queue_capacity, 16);
		assert_eq!(config.queue_overflow_policy, QueueOverflowPolicy::Block);
		assert_eq!(config.min_severity, "warning");
		assert!(!config.log_events);
	}

	#[test]
	fn test_queue_overflow_policy_serde() {
		let drop_oldest: QueueOverflowPolicy = serde_json::from_str(r#""drop_oldest""#).unwrap();
		assert_eq!(drop_oldest, QueueOverflowPolicy::DropOldest);
		let block: QueueOverflowPolicy = serde_json::from_str(r#""block""#).unwrap();
		assert_eq!(block, QueueOverflowPolicy::Block);
	}

	#[test]
	fn test_queue_overflow_policy_from_name() {
		assert_eq!(
			QueueOverflowPolicy::from_name("DROP_OLDEST"),
			QueueOverflowPolicy::DropOldest
		);
		assert_eq!(
			QueueOverflowPolicy::from_name("nonsense"),
			QueueOverflowPolicy::DropNewest
		);
	}

	#[test]
	fn test_toml_section() {
		let layer: AuditConfigLayer = toml::from_str(
			r#"
queue_capacity = 64
queue_overflow_policy = "drop_oldest"
"#,
		)
		.unwrap();
		assert_eq!(layer.queue_capacity, Some(64));
		assert_eq!(
			layer.queue_overflow_policy,
			Some(QueueOverflowPolicy::DropOldest)
		);
	}
}
