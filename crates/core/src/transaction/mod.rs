//! Single transaction entry.
//!
//! This module provides:
//! - Validation of the transaction form against the available choices
//! - The row appended to the expenses sheet
//! - Form defaults (account and date)

mod defaults;
mod form;

#[cfg(test)]
mod form_props;

pub use defaults::{default_account, local_today};
pub use form::{
    Choice, FormChoices, FormField, TransactionForm, TransactionFormError, ValidTransaction,
    messages, validate,
};
