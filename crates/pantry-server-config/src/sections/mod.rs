// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections for pantry-server.

pub mod audit;
pub mod auth;
pub mod database;
pub mod http;
pub mod logging;

pub use audit::{AuditConfig, AuditConfigLayer, QueueOverflowPolicy};
pub use auth::{AuthConfig, AuthConfigLayer, BootstrapAdmin};
pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
