//! Property-based tests for CSV normalization.

use std::collections::HashSet;

use proptest::prelude::*;

use super::normalizer::{CategoryPair, ImportNormalizer, REQUIRED_COLUMNS, truncate_description};

const CATEGORIES: [&str; 4] = ["Food", "Home", "Transport", "Svago"];
const SUBCATEGORIES: [&str; 4] = ["", "Groceries", "Rent", "Cinema"];

/// One generated bank row.
#[derive(Debug, Clone)]
struct BankRow {
    cents: i64,
    description: String,
    category: &'static str,
    subcategory: &'static str,
}

impl BankRow {
    /// Formats the amount the way the bank does: `-12,34`, `+5,00`.
    fn amount_text(&self) -> String {
        let sign = if self.cents < 0 { "-" } else { "+" };
        let abs = self.cents.abs();
        format!("\"{sign}{},{:02}\"", abs / 100, abs % 100)
    }

    fn to_line(&self, index: usize) -> String {
        format!(
            "01/01/2025,{},{},{},{},ID{index}",
            self.amount_text(),
            self.description,
            self.category,
            self.subcategory
        )
    }
}

fn bank_row() -> impl Strategy<Value = BankRow> {
    (
        -1_000_000i64..1_000_000i64,
        "[a-zA-Z ]{0,80}".prop_filter("balance marker", |d| !d.contains("Saldo")),
        prop::sample::select(CATEGORIES.to_vec()),
        prop::sample::select(SUBCATEGORIES.to_vec()),
    )
        .prop_map(|(cents, description, category, subcategory)| BankRow {
            cents,
            description,
            category,
            subcategory,
        })
}

fn to_csv(rows: &[BankRow]) -> String {
    let mut csv = REQUIRED_COLUMNS.join(",");
    csv.push('\n');
    for (index, row) in rows.iter().enumerate() {
        csv.push_str(&row.to_line(index));
        csv.push('\n');
    }
    csv
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every debit pair is reported exactly once, and nothing else is.
    #[test]
    fn prop_debit_pairs_reported_once(rows in prop::collection::vec(bank_row(), 0..40)) {
        let batch = ImportNormalizer::default()
            .normalize(to_csv(&rows).as_bytes(), "Mario")
            .unwrap();

        let expected: HashSet<CategoryPair> = rows
            .iter()
            .filter(|row| row.cents < 0)
            .map(|row| CategoryPair::new(row.category, row.subcategory))
            .collect();
        let reported: HashSet<CategoryPair> = batch.category_pairs.iter().cloned().collect();

        prop_assert_eq!(reported.len(), batch.category_pairs.len());
        prop_assert_eq!(reported, expected);
    }

    /// Rows are routed by sign; zero counts as a credit.
    #[test]
    fn prop_rows_routed_by_sign(rows in prop::collection::vec(bank_row(), 0..40)) {
        let batch = ImportNormalizer::default()
            .normalize(to_csv(&rows).as_bytes(), "Mario")
            .unwrap();

        let debits = rows.iter().filter(|row| row.cents < 0).count();
        prop_assert_eq!(batch.debits.len(), debits);
        prop_assert_eq!(batch.credits.len(), rows.len() - debits);

        for debit in &batch.debits {
            prop_assert_eq!(debit.len(), 8);
            prop_assert!(!debit[2].starts_with('-'));
            prop_assert_eq!(debit[6].as_str(), "Comune");
        }
        for credit in &batch.credits {
            prop_assert_eq!(credit.len(), 6);
            prop_assert!(!credit[2].contains('+'));
        }
    }

    /// Descriptions never exceed fifty characters.
    #[test]
    fn prop_truncation(description in "\\PC{0,120}") {
        let truncated = truncate_description(&description);
        let length = description.chars().count();

        prop_assert!(truncated.chars().count() <= 50);
        if length <= 50 {
            prop_assert_eq!(truncated, description);
        } else {
            let prefix: String = description.chars().take(47).collect();
            prop_assert_eq!(truncated, format!("{prefix}..."));
        }
    }
}
