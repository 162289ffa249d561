//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification

mod password;

pub use password::{PasswordError, hash_password, reject_unknown_user, verify_password};
