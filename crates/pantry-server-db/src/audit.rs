// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Read side of the audit log written by `SqliteAuditSink`.

use async_trait::async_trait;
use pantry_server_audit::{AuditEventType, AuditLogEntry, AuditSeverity, UserId};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

use crate::error::{parse_timestamp, DbError, Result};

pub const DEFAULT_AUDIT_PAGE: i64 = 50;
pub const MAX_AUDIT_PAGE: i64 = 500;

#[async_trait]
pub trait AuditStore: Send + Sync {
	async fn list_recent(
		&self,
		event_type: Option<AuditEventType>,
		limit: Option<i64>,
	) -> Result<Vec<AuditLogEntry>>;
}

#[derive(Clone)]
pub struct AuditRepository {
	pool: SqlitePool,
}

impl AuditRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Newest first. `limit` defaults to 50 and is clamped to 1..=500.
	#[tracing::instrument(skip(self))]
	pub async fn list_recent(
		&self,
		event_type: Option<AuditEventType>,
		limit: Option<i64>,
	) -> Result<Vec<AuditLogEntry>> {
		let limit = limit
			.unwrap_or(DEFAULT_AUDIT_PAGE)
			.clamp(1, MAX_AUDIT_PAGE);

		let rows = sqlx::query(
			r#"
			SELECT id, timestamp, event_type, severity, actor_user_id, resource_type,
			       resource_id, action, ip_address, user_agent, request_id, details
			FROM audit_logs
			WHERE (?1 IS NULL OR event_type = ?1)
			ORDER BY timestamp DESC, rowid DESC
			LIMIT ?2
			"#,
		)
		.bind(event_type.map(|e| e.to_string()))
		.bind(limit)
		.fetch_all(&self.pool)
		.await?;

		let mut entries = Vec::with_capacity(rows.len());
		for row in &rows {
			match parse_audit_row(row) {
				Ok(entry) => entries.push(entry),
				// Rows written by a newer build may carry unknown event types.
				Err(e) => tracing::warn!(error = %e, "skipping unreadable audit row"),
			}
		}
		Ok(entries)
	}
}

#[async_trait]
impl AuditStore for AuditRepository {
	async fn list_recent(
		&self,
		event_type: Option<AuditEventType>,
		limit: Option<i64>,
	) -> Result<Vec<AuditLogEntry>> {
		self.list_recent(event_type, limit).await
	}
}

fn parse_audit_row(row: &SqliteRow) -> Result<AuditLogEntry> {
	let id: String = row.get("id");
	let timestamp: String = row.get("timestamp");
	let event_type: String = row.get("event_type");
	let severity: String = row.get("severity");
	let actor_user_id: Option<String> = row.get("actor_user_id");
	let details: Option<String> = row.get("details");

	let event_type: AuditEventType =
		serde_json::from_value(serde_json::Value::String(event_type))?;
	let severity = severity
		.parse::<AuditSeverity>()
		.map_err(|e| DbError::Internal(format!("{e}")))?;

	Ok(AuditLogEntry {
		id: Uuid::parse_str(&id)
			.map_err(|e| DbError::Internal(format!("Invalid audit id: {e}")))?,
		timestamp: parse_timestamp(&timestamp, "timestamp")?,
		event_type,
		severity,
		actor_user_id: actor_user_id
			.map(|s| s.parse::<UserId>())
			.transpose()
			.map_err(|e| DbError::Internal(format!("Invalid actor_user_id: {e}")))?,
		resource_type: row.get("resource_type"),
		resource_id: row.get("resource_id"),
		action: row.get("action"),
		ip_address: row.get("ip_address"),
		user_agent: row.get("user_agent"),
		request_id: row.get("request_id"),
		details: details
			.map(|s| serde_json::from_str(&s))
			.transpose()?
			.unwrap_or(serde_json::Value::Null),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;
	use pantry_server_audit::{AuditFilterConfig, AuditSink, SqliteAuditSink};
	use serde_json::json;
	use std::sync::Arc;

	async fn seed(pool: &SqlitePool, entries: Vec<AuditLogEntry>) {
		let sink = SqliteAuditSink::new(pool.clone(), AuditFilterConfig::default());
		for entry in entries {
			sink.publish(Arc::new(entry)).await.unwrap();
		}
	}

	#[tokio::test]
	async fn newest_first_with_limit() {
		let pool = create_test_pool().await;
		let mut entries = Vec::new();
		for i in 0..5 {
			let mut entry = AuditLogEntry::builder(AuditEventType::SignUpTokenCreated)
				.action(format!("Created by admin {i}"))
				.build();
			entry.timestamp += chrono::Duration::seconds(i);
			entries.push(entry);
		}
		seed(&pool, entries).await;

		let repo = AuditRepository::new(pool);
		let listed = repo.list_recent(None, Some(2)).await.unwrap();
		assert_eq!(listed.len(), 2);
		assert_eq!(listed[0].action, "Created by admin 4");
		assert_eq!(listed[1].action, "Created by admin 3");
	}

	#[tokio::test]
	async fn round_trips_through_sink() {
		let pool = create_test_pool().await;
		let actor = UserId::generate();
		let entry = AuditLogEntry::builder(AuditEventType::SignUpTokenUsed)
			.actor(actor)
			.resource("sign_up", "Alice")
			.action("New User Alice Smith")
			.details(json!({ "admin": true }))
			.build();
		let id = entry.id;
		seed(&pool, vec![entry]).await;

		let listed = AuditRepository::new(pool)
			.list_recent(None, None)
			.await
			.unwrap();
		assert_eq!(listed.len(), 1);
		let got = &listed[0];
		assert_eq!(got.id, id);
		assert_eq!(got.event_type, AuditEventType::SignUpTokenUsed);
		assert_eq!(got.severity, AuditSeverity::Info);
		assert_eq!(got.actor_user_id, Some(actor));
		assert_eq!(got.resource_id.as_deref(), Some("Alice"));
		assert_eq!(got.details, json!({ "admin": true }));
	}

	#[tokio::test]
	async fn filters_by_event_type() {
		let pool = create_test_pool().await;
		seed(
			&pool,
			vec![
				AuditLogEntry::builder(AuditEventType::Login).build(),
				AuditLogEntry::builder(AuditEventType::SignUpTokenDeleted).build(),
			],
		)
		.await;

		let listed = AuditRepository::new(pool)
			.list_recent(Some(AuditEventType::SignUpTokenDeleted), None)
			.await
			.unwrap();
		assert_eq!(listed.len(), 1);
		assert_eq!(listed[0].event_type, AuditEventType::SignUpTokenDeleted);
	}

	#[tokio::test]
	async fn unknown_event_types_are_skipped() {
		let pool = create_test_pool().await;
		sqlx::query(
			r#"
			INSERT INTO audit_logs (id, timestamp, event_type, severity, action, created_at)
			VALUES (?, ?, 'from_the_future', 'info', 'x', ?)
			"#,
		)
		.bind(Uuid::new_v4().to_string())
		.bind(chrono::Utc::now().to_rfc3339())
		.bind(chrono::Utc::now().to_rfc3339())
		.execute(&pool)
		.await
		.unwrap();

		let listed = AuditRepository::new(pool).list_recent(None, None).await.unwrap();
		assert!(listed.is_empty());
	}
}
