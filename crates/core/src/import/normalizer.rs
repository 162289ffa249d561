//! CSV normalization.
//!
//! Bank exports use Italian number formatting (`-1.234,56`) and carry a
//! balance line (`Saldo ...`) that must never reach the sheet.

use std::collections::HashSet;

use trantrac_shared::{Amount, ImportConfig};

use super::error::ImportError;
use super::sender::SenderDirectory;

/// Columns every bank export must carry, in the order they are reported.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Data operazione",
    "Importo",
    "Descrizione",
    "Categoria",
    "Sottocategoria",
    "Codice identificativo",
];

/// Longest description written to the sheet, ellipsis included.
pub const MAX_DESCRIPTION_CHARS: usize = 50;

const ELLIPSIS: &str = "...";
const BALANCE_MARKER: &str = "Saldo";

/// A category name with one of its subcategory names (possibly empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryPair {
    /// Category name.
    pub category: String,
    /// Subcategory name; empty when the row has none.
    pub subcategory: String,
}

impl CategoryPair {
    /// Creates a pair.
    #[must_use]
    pub fn new(category: impl Into<String>, subcategory: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            subcategory: subcategory.into(),
        }
    }
}

/// Rows ready to be appended to the sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBatch {
    /// Income rows: `[sender, date, amount, description, category, identifier]`.
    pub credits: Vec<Vec<String>>,
    /// Expense rows: `[user, date, amount, description, category, subcategory, tag, identifier]`.
    pub debits: Vec<Vec<String>>,
    /// Distinct pairs referenced by debit rows, in first-seen order.
    pub category_pairs: Vec<CategoryPair>,
}

impl ImportBatch {
    /// Total number of rows in both batches.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.credits.len() + self.debits.len()
    }
}

/// Truncates a description to [`MAX_DESCRIPTION_CHARS`] characters.
///
/// Longer text keeps its first 47 characters followed by `...`.
#[must_use]
pub fn truncate_description(description: &str) -> String {
    if description.chars().count() <= MAX_DESCRIPTION_CHARS {
        return description.to_string();
    }

    let keep = MAX_DESCRIPTION_CHARS - ELLIPSIS.len();
    let mut truncated: String = description.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Column positions resolved from the header row.
struct Columns {
    date: usize,
    amount: usize,
    description: usize,
    category: usize,
    subcategory: usize,
    identifier: usize,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, ImportError> {
        let position = |name: &str| headers.iter().position(|header| header == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|&&name| position(name).is_none())
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::MissingColumns(missing));
        }

        let index = |name: &str| position(name).unwrap_or_default();
        Ok(Self {
            date: index(REQUIRED_COLUMNS[0]),
            amount: index(REQUIRED_COLUMNS[1]),
            description: index(REQUIRED_COLUMNS[2]),
            category: index(REQUIRED_COLUMNS[3]),
            subcategory: index(REQUIRED_COLUMNS[4]),
            identifier: index(REQUIRED_COLUMNS[5]),
        })
    }
}

/// Converts a bank export into sheet rows.
#[derive(Debug, Clone)]
pub struct ImportNormalizer {
    senders: SenderDirectory,
    shared_tag: String,
}

impl ImportNormalizer {
    /// Creates a normalizer.
    #[must_use]
    pub fn new(senders: SenderDirectory, shared_tag: impl Into<String>) -> Self {
        Self {
            senders,
            shared_tag: shared_tag.into(),
        }
    }

    /// Builds a normalizer from the `import` configuration section.
    #[must_use]
    pub fn from_config(config: &ImportConfig) -> Self {
        Self::new(SenderDirectory::from_config(config), &config.shared_tag)
    }

    /// Normalizes a CSV export on behalf of `display_name`.
    ///
    /// The whole file is validated before a batch is returned: a missing
    /// column, an unreadable record or a single non-numeric amount rejects
    /// the import.
    pub fn normalize(&self, data: &[u8], display_name: &str) -> Result<ImportBatch, ImportError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(data);

        let columns = Columns::resolve(reader.headers()?)?;

        let mut batch = ImportBatch::default();
        let mut seen = HashSet::new();

        for record in reader.records() {
            let record = record?;
            if is_skipped(&record) {
                continue;
            }

            let field = |index: usize| record.get(index).unwrap_or_default();

            let raw_amount = field(columns.amount);
            let amount = Amount::parse_bank(raw_amount).map_err(|_| {
                ImportError::NonNumericAmount {
                    value: raw_amount.to_string(),
                }
            })?;
            let mut amount_text = raw_amount.replace('+', "").trim().to_string();
            if amount.value().is_zero() {
                amount_text = amount_text.trim_start_matches('-').to_string();
            }
            let description = truncate_description(field(columns.description));

            if amount.is_credit() {
                batch.credits.push(vec![
                    self.senders.resolve(field(columns.description)).to_string(),
                    field(columns.date).to_string(),
                    amount_text,
                    description,
                    field(columns.category).to_string(),
                    field(columns.identifier).to_string(),
                ]);
            } else {
                let pair = CategoryPair::new(field(columns.category), field(columns.subcategory));
                if seen.insert(pair.clone()) {
                    batch.category_pairs.push(pair);
                }

                batch.debits.push(vec![
                    display_name.to_string(),
                    field(columns.date).to_string(),
                    amount_text.trim_start_matches('-').to_string(),
                    description,
                    field(columns.category).to_string(),
                    field(columns.subcategory).to_string(),
                    self.shared_tag.clone(),
                    field(columns.identifier).to_string(),
                ]);
            }
        }

        Ok(batch)
    }
}

impl Default for ImportNormalizer {
    fn default() -> Self {
        Self::from_config(&ImportConfig::default())
    }
}

/// Blank lines and balance lines are not transactions.
fn is_skipped(record: &csv::StringRecord) -> bool {
    record.iter().all(str::is_empty) || record.iter().any(|value| value.contains(BALANCE_MARKER))
}
