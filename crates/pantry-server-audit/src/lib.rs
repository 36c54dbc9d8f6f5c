// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Best-effort audit logging.
//!
//! Handlers build an [`AuditLogEntry`] and hand it to [`AuditService::log`],
//! which returns immediately. Delivery to sinks happens on a background task
//! and failures never reach the request that produced the event.

pub mod error;
pub mod event;
pub mod filter;
pub mod pipeline;
mod queue;
pub mod sink;

pub use error::{AuditError, AuditSinkError};
pub use event::{
	AuditEventType, AuditLogBuilder, AuditLogEntry, AuditSeverity, UnknownSeverity, UserId,
};
pub use filter::AuditFilterConfig;
pub use pipeline::AuditService;
pub use sink::AuditSink;

pub use pantry_server_config::{AuditConfig, QueueOverflowPolicy};

#[cfg(feature = "sink-sqlite")]
pub use sink::sqlite::SqliteAuditSink;

#[cfg(feature = "sink-tracing")]
pub use sink::tracing::TracingAuditSink;
