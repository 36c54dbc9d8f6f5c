// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client metadata attached to audit entries.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use pantry_server_audit::{AuditEventType, AuditLogBuilder, AuditLogEntry};

const MAX_HEADER_LEN: usize = 512;

/// Where a request came from, as far as its headers say.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
	pub ip_address: Option<String>,
	pub user_agent: Option<String>,
	pub request_id: Option<String>,
}

impl ClientInfo {
	#[tracing::instrument(level = "trace", skip(headers))]
	pub fn from_headers(headers: &HeaderMap) -> Self {
		Self {
			ip_address: extract_client_ip(headers),
			user_agent: header_str(headers, "user-agent"),
			request_id: header_str(headers, "x-request-id"),
		}
	}

	/// Start an audit entry carrying this client's metadata.
	pub fn audit(&self, event_type: AuditEventType) -> AuditLogBuilder {
		let mut builder = AuditLogEntry::builder(event_type);
		if let Some(ip) = &self.ip_address {
			builder = builder.ip_address(ip.clone());
		}
		if let Some(ua) = &self.user_agent {
			builder = builder.user_agent(ua.clone());
		}
		if let Some(id) = &self.request_id {
			builder = builder.request_id(id.clone());
		}
		builder
	}
}

impl<S> FromRequestParts<S> for ClientInfo
where
	S: Send + Sync,
{
	type Rejection = Infallible;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		Ok(Self::from_headers(&parts.headers))
	}
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
	let value = headers.get(name)?.to_str().ok()?.trim();
	if value.is_empty() {
		return None;
	}
	Some(value.chars().take(MAX_HEADER_LEN).collect())
}

/// Client IP from proxy headers, in order of preference:
/// 1. `X-Forwarded-For` (first address in the chain)
/// 2. `X-Real-IP`
/// 3. `CF-Connecting-IP`
fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
	if let Some(xff) = header_str(headers, "x-forwarded-for") {
		let first = xff.split(',').next().map(str::trim).unwrap_or_default();
		if !first.is_empty() {
			return Some(first.to_string());
		}
	}
	header_str(headers, "x-real-ip").or_else(|| header_str(headers, "cf-connecting-ip"))
}
