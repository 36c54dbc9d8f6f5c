// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! # pantry-server-db
//!
//! Persistence for the Pantry server, SQLite via sqlx.
//!
//! ## Repository Pattern
//!
//! Each domain has a `*Store` trait describing its operations and a
//! `*Repository` struct holding a `SqlitePool` that implements it by
//! delegating to inherent methods. Handlers depend on the traits.
//!
//! ## Error Handling
//!
//! | Variant | When |
//! |---------|------|
//! | `Conflict` | Unique constraint violation (duplicate email, username, token) |
//! | `Sqlx` | Unexpected database errors, propagated with `?` |
//! | `Internal` | Stored data that cannot be parsed |
//!
//! Lookups where absence is normal return `Result<Option<T>>`; deletes
//! return `Result<bool>`.
//!
//! ## Storage conventions
//!
//! Ids are UUID strings and timestamps are RFC 3339 strings, both `TEXT`.

pub mod audit;
mod error;
pub mod migrations;
pub mod pool;
pub mod session;
pub mod sign_up;
pub mod user;

#[cfg(test)]
pub mod testing;

pub use audit::{AuditRepository, AuditStore, DEFAULT_AUDIT_PAGE, MAX_AUDIT_PAGE};
pub use error::{DbError, Result};
pub use migrations::run_migrations;
pub use pool::create_pool;
pub use session::{SessionRepository, SessionStore};
pub use sign_up::{Redemption, SignUpRepository, SignUpStore};
pub use user::{UserRepository, UserStore};
