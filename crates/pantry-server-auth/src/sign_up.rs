// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sign-up tokens.
//!
//! An administrator mints a token and hands it to a prospective user out of
//! band. Redeeming it creates an account whose admin flag is copied from the
//! token; the token is deleted in the same transaction. A token exists until
//! it is redeemed or revoked, and there is no other state.
//!
//! Token values are the hex form of a version-1 UUID (timestamp, clock
//! sequence, node). They are unique, not secret-grade random.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of a token's display name.
pub const MAX_SIGN_UP_NAME_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpToken {
	pub token: String,
	/// Display label chosen by the issuing admin, usually the invitee's name.
	pub name: String,
	/// Whether the redeemed account becomes an administrator.
	pub admin: bool,
	pub created_at: DateTime<Utc>,
}

impl SignUpToken {
	pub fn new(name: impl Into<String>, admin: bool) -> Self {
		Self {
			token: generate_sign_up_token(),
			name: name.into(),
			admin,
			created_at: Utc::now(),
		}
	}
}

/// Generate a token value: 32 lowercase hex characters.
///
/// The node id is random per call, with the multicast bit set as RFC 4122
/// requires for ids that are not a real MAC address.
pub fn generate_sign_up_token() -> String {
	let mut node_id: [u8; 6] = rand::thread_rng().gen();
	node_id[0] |= 0x01;
	Uuid::now_v1(&node_id).simple().to_string()
}
