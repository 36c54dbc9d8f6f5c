// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Login sessions.
//!
//! A session token is 32 random bytes, hex encoded. The database only holds
//! its SHA-256 hash; the plaintext is handed to the client once at login and
//! presented back as a bearer token or cookie.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::{SessionId, UserId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
	pub id: SessionId,
	pub user_id: UserId,
	pub created_at: DateTime<Utc>,
	pub expires_at: DateTime<Utc>,
}

impl Session {
	pub fn new(user_id: UserId, ttl: Duration) -> Self {
		let now = Utc::now();
		Self {
			id: SessionId::generate(),
			user_id,
			created_at: now,
			expires_at: now + ttl,
		}
	}

	pub fn is_expired(&self) -> bool {
		Utc::now() > self.expires_at
	}
}

pub fn generate_session_token() -> String {
	let bytes: [u8; 32] = rand::thread_rng().gen();
	hex::encode(bytes)
}

/// SHA-256 of the token, hex encoded. This is the lookup key in storage.
pub fn hash_session_token(token: &str) -> String {
	let mut hasher = Sha256::new();
	hasher.update(token.as_bytes());
	hex::encode(hasher.finalize())
}
