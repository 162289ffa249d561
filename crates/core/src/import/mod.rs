//! Bank CSV import.
//!
//! Turns a bank export into two outbound row batches (credits and debits) and
//! the set of category/subcategory pairs referenced by the debits. Nothing in
//! here touches the database or the spreadsheet; orchestration lives in the
//! HTTP layer.

mod error;
mod normalizer;
mod sender;

#[cfg(test)]
mod normalizer_props;

pub use error::ImportError;
pub use normalizer::{
    CategoryPair, ImportBatch, ImportNormalizer, MAX_DESCRIPTION_CHARS, REQUIRED_COLUMNS,
    truncate_description,
};
pub use sender::{SenderDirectory, SenderRule};

/// Message shown after a complete import.
pub const SUCCESS_MESSAGE: &str = "File importato con successo";
