// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication primitives for Pantry.
//!
//! This crate provides:
//! - User and session types
//! - Sign-up tokens: single-use invitations that let a new user register
//! - Argon2id password hashing
//! - Request auth context and header extraction helpers
//!
//! # Security Considerations
//!
//! - Passwords are stored as Argon2id PHC strings, never plaintext
//! - Session tokens are stored as SHA-256 hashes; the plaintext is only
//!   returned once, at login
//! - Plaintext passwords travel as [`pantry_common_config::SecretString`]

mod argon2_config;
pub mod error;
pub mod middleware;
pub mod password;
pub mod session;
pub mod sign_up;
pub mod types;
pub mod user;

pub use error::AuthError;
pub use middleware::{
	extract_bearer_token, extract_session_cookie, AuthContext, AuthRequired, CurrentUser,
};
pub use password::{hash_password, verify_password};
pub use session::{generate_session_token, hash_session_token, Session};
pub use sign_up::{generate_sign_up_token, SignUpToken};
pub use types::*;
pub use user::{normalize_email, NewUser, User, UserCredentials};
