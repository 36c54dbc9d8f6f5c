// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Argon2id password hashing.
//!
//! Hashes are PHC strings (`$argon2id$v=19$...`) carrying their own salt and
//! parameters, so verification keeps working if the defaults change.

use argon2::password_hash::{
	rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use pantry_common_config::SecretString;

use crate::argon2_config::argon2_instance;
use crate::error::AuthError;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &SecretString) -> Result<String, AuthError> {
	let salt = SaltString::generate(&mut OsRng);

	argon2_instance()
		.hash_password(password.expose().as_bytes(), &salt)
		.map(|hash| hash.to_string())
		.map_err(|e| AuthError::HashingError(e.to_string()))
}

/// Check a plaintext password against a stored PHC hash.
///
/// A malformed stored hash is an error; a mismatch is `Ok(false)`.
pub fn verify_password(password: &SecretString, hash: &str) -> Result<bool, AuthError> {
	let parsed =
		PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

	Ok(argon2_instance()
		.verify_password(password.expose().as_bytes(), &parsed)
		.is_ok())
}
