//! Core business logic for TranTrac.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! The only outbound integration is the spreadsheet client, kept behind a trait.
//!
//! # Modules
//!
//! - `auth` - Password hashing
//! - `import` - Bank CSV normalization
//! - `sheets` - Spreadsheet sync client
//! - `transaction` - Single transaction form rules
//! - `reminder` - Monthly import reminder

pub mod auth;
pub mod import;
pub mod reminder;
pub mod sheets;
pub mod transaction;
