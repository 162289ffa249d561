//! Property-based tests for the transaction amount rule.

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::form::{Choice, FormChoices, FormField, TransactionForm, messages, validate};

fn submission(amount: &str) -> (TransactionForm, FormChoices) {
    let category = Choice::new(Uuid::new_v4(), "Food");
    let subcategory = Choice::new(Uuid::new_v4(), "Groceries");
    let account = Choice::new(Uuid::new_v4(), "Conto");

    let form = TransactionForm {
        amount: amount.to_string(),
        date: "2025-03-01".to_string(),
        description: "Spesa".to_string(),
        category: category.id.to_string(),
        subcategory: subcategory.id.to_string(),
        bank_account: account.id.to_string(),
    };
    let choices = FormChoices {
        categories: vec![category],
        subcategories: vec![subcategory],
        accounts: vec![account],
    };
    (form, choices)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Amounts at or below zero are always rejected.
    #[test]
    fn prop_non_positive_rejected(cents in -9_999_999_999i64..=0) {
        let amount = Decimal::new(cents, 2).to_string();
        let (form, choices) = submission(&amount);

        let err = validate(&form, &choices).unwrap_err();
        prop_assert_eq!(err.field(FormField::Amount), Some(messages::NOT_POSITIVE));
    }

    /// Positive amounts within the digit limits are accepted.
    #[test]
    fn prop_positive_accepted(cents in 1i64..=9_999_999_999i64, comma in any::<bool>()) {
        let mut amount = Decimal::new(cents, 2).to_string();
        if comma {
            amount = amount.replace('.', ",");
        }
        let (form, choices) = submission(&amount);

        let valid = validate(&form, &choices).unwrap();
        prop_assert_eq!(valid.amount.value(), Decimal::new(cents, 2));
    }
}
