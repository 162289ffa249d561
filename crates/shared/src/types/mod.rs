//! Common types used across the application.

pub mod amount;

pub use amount::{Amount, AmountError};
