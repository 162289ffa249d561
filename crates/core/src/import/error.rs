//! Import error types.

use thiserror::Error;

/// Reasons an import is rejected before anything is written.
///
/// The `Display` output is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// The header row lacks some required columns.
    #[error("Il file CSV non contiene le seguenti colonne: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// An `Importo` cell is not a number.
    #[error("Il file CSV contiene valori non numerici nella colonna Importo.")]
    NonNumericAmount {
        /// The offending cell.
        value: String,
    },

    /// The file is not valid UTF-8 CSV.
    #[error("Il file CSV non è leggibile")]
    Unreadable {
        /// Underlying parser error.
        reason: String,
    },
}

impl ImportError {
    /// Create an unreadable-file error.
    #[must_use]
    pub fn unreadable(reason: impl Into<String>) -> Self {
        Self::Unreadable {
            reason: reason.into(),
        }
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::unreadable(err.to_string())
    }
}
