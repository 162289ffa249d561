//! Spreadsheet synchronization.
//!
//! Every outbound write goes through [`SheetClient`]. Handlers use the
//! [`sync_rows`] and [`fetch_rows`] helpers, which log failures and turn them
//! into sentinels so a broken sheet never aborts a request.

mod error;
mod google;

use async_trait::async_trait;
use tracing::{debug, warn};

pub use error::SheetError;
pub use google::GoogleSheetsClient;

/// Income rows from CSV imports.
pub const CREDITS_SHEET: &str = "ENTRATE";
/// Expense rows from CSV imports and the transaction form.
pub const DEBITS_SHEET: &str = "USCITE";
/// Category/subcategory pairs.
pub const CATEGORIES_SHEET: &str = "CATEGORIE";
/// Data range of [`CATEGORIES_SHEET`], below the header row.
pub const CATEGORIES_RANGE: &str = "A2:B";

/// Generic message shown when a sync fails.
pub const SYNC_FAILURE_MESSAGE: &str = "Ops, qualcosa è andato storto..";

/// Remote spreadsheet access.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait SheetClient: Send + Sync {
    /// Appends rows after the last used row of `sheet`.
    ///
    /// Succeeds only when every row was written.
    async fn append(&self, sheet: &str, rows: &[Vec<String>]) -> Result<(), SheetError>;

    /// Reads `range` (A1 notation without the sheet name) from `sheet`.
    async fn read(&self, sheet: &str, range: &str) -> Result<Vec<Vec<String>>, SheetError>;
}

/// Appends `rows` to `sheet`, returning whether the write succeeded.
///
/// An empty batch is not sent and counts as a success.
pub async fn sync_rows(client: &dyn SheetClient, sheet: &str, rows: &[Vec<String>]) -> bool {
    if rows.is_empty() {
        return true;
    }

    match client.append(sheet, rows).await {
        Ok(()) => {
            debug!(sheet, rows = rows.len(), "Rows appended");
            true
        }
        Err(e) => {
            warn!(sheet, rows = rows.len(), error = %e, "Failed to append rows");
            false
        }
    }
}

/// Reads `range` from `sheet`, or `None` when the read fails.
pub async fn fetch_rows(
    client: &dyn SheetClient,
    sheet: &str,
    range: &str,
) -> Option<Vec<Vec<String>>> {
    match client.read(sheet, range).await {
        Ok(rows) => Some(rows),
        Err(e) => {
            warn!(sheet, range, error = %e, "Failed to read rows");
            None
        }
    }
}
