// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! ID newtypes.
//!
//! Type-safe wrappers around UUIDs so a [`UserId`] cannot be passed where a
//! [`SessionId`] is expected. Both serialize transparently as UUID strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random (v4) ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			pub fn into_inner(self) -> Uuid {
				self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl FromStr for $name {
			type Err = uuid::Error;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Uuid::parse_str(s).map(Self)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user.");
define_id_type!(SessionId, "Unique identifier for a login session.");

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn generated_ids_are_unique() {
		assert_ne!(UserId::generate(), UserId::generate());
	}

	#[test]
	fn display_and_parse_agree() {
		let id = SessionId::generate();
		let parsed: SessionId = id.to_string().parse().unwrap();
		assert_eq!(id, parsed);
	}

	#[test]
	fn serializes_as_bare_uuid_string() {
		let uuid = Uuid::new_v4();
		let json = serde_json::to_string(&UserId::new(uuid)).unwrap();
		assert_eq!(json, format!("\"{uuid}\""));
	}

	#[test]
	fn parse_rejects_garbage() {
		assert!("not-a-uuid".parse::<UserId>().is_err());
	}
}
