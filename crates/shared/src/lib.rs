//! Shared types, errors, and configuration for TranTrac.
//!
//! This crate provides common types used across all other crates:
//! - Locale-aware amount type with decimal precision
//! - Session tokens and their claims
//! - Application-wide error types
//! - Configuration management
//! - Outbound email

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::{
    AppConfig, EmailConfig, ImportConfig, SenderRuleConfig, SheetsConfig, SiteConfig,
};
pub use email::{EmailError, EmailService, Mailer};
pub use error::AppError;
pub use jwt::{JwtConfig, JwtError, JwtService};
pub use types::Amount;

#[cfg(any(test, feature = "mock"))]
pub use email::MockMailer;
