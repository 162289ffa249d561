//! Transaction form validation.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use trantrac_shared::Amount;
use trantrac_shared::types::AmountError;
use uuid::Uuid;

/// Longest accepted description.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// User-facing validation messages.
pub mod messages {
    /// A required field is empty.
    pub const REQUIRED: &str = "Questo campo è obbligatorio.";
    /// The selected id is not among the choices.
    pub const INVALID_CHOICE: &str =
        "Seleziona una scelta valida. La scelta effettuata non compare tra quelle disponibili.";
    /// The amount is not a number.
    pub const INVALID_NUMBER: &str = "Inserisci un numero.";
    /// The amount has too many digits.
    pub const TOO_MANY_DIGITS: &str = "Assicurati che non vi siano più di 10 cifre in totale.";
    /// The amount has too many decimal places.
    pub const TOO_MANY_DECIMALS: &str = "Assicurati che non vi siano più di 2 cifre decimali.";
    /// The amount is zero or negative.
    pub const NOT_POSITIVE: &str = "Il valore inserito deve essere maggiore di zero";
    /// The date is not `YYYY-MM-DD`.
    pub const INVALID_DATE: &str = "Inserisci una data valida.";
}

/// A selectable option: a category, a subcategory or an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Row id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
}

impl Choice {
    /// Creates a choice.
    #[must_use]
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Options offered by the form.
#[derive(Debug, Clone, Default)]
pub struct FormChoices {
    /// All categories, sorted by name.
    pub categories: Vec<Choice>,
    /// Subcategories of the selected category; empty when none is selected.
    pub subcategories: Vec<Choice>,
    /// Bank accounts.
    pub accounts: Vec<Choice>,
}

/// Raw form submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransactionForm {
    /// Amount, `,` or `.` as decimal separator.
    pub amount: String,
    /// Date, `YYYY-MM-DD`.
    pub date: String,
    /// Free text.
    pub description: String,
    /// Category id.
    pub category: String,
    /// Subcategory id.
    pub subcategory: String,
    /// Account id.
    pub bank_account: String,
}

impl TransactionForm {
    /// The submitted category id, if it parses.
    #[must_use]
    pub fn category_id(&self) -> Option<Uuid> {
        Uuid::parse_str(self.category.trim()).ok()
    }
}

/// Form fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    /// `amount`
    Amount,
    /// `date`
    Date,
    /// `description`
    Description,
    /// `category`
    Category,
    /// `subcategory`
    Subcategory,
    /// `bank_account`
    BankAccount,
}

impl FormField {
    /// The HTML input name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::Date => "date",
            Self::Description => "description",
            Self::Category => "category",
            Self::Subcategory => "subcategory",
            Self::BankAccount => "bank_account",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field errors of a rejected submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("invalid transaction form: {} field(s) rejected", .errors.len())]
pub struct TransactionFormError {
    errors: BTreeMap<FormField, String>,
}

impl TransactionFormError {
    fn add(&mut self, field: FormField, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    /// The error for `field`, if any.
    #[must_use]
    pub fn field(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Iterates over rejected fields in display order.
    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.errors.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// True when no field was rejected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTransaction {
    /// Strictly positive amount.
    pub amount: Amount,
    /// Transaction date.
    pub date: NaiveDate,
    /// Trimmed description.
    pub description: String,
    /// Selected category.
    pub category: Choice,
    /// Selected subcategory.
    pub subcategory: Choice,
    /// Selected account.
    pub account: Choice,
}

impl ValidTransaction {
    /// The row appended to the expenses sheet.
    #[must_use]
    pub fn sheet_row(&self, display_name: &str) -> Vec<String> {
        vec![
            display_name.to_string(),
            self.date.format("%Y-%m-%d").to_string(),
            self.amount.to_sheet_text(),
            self.description.clone(),
            self.category.name.clone(),
            self.subcategory.name.clone(),
            self.account.name.clone(),
        ]
    }
}

/// Validates a submission against the offered choices.
///
/// All fields are checked; the error carries one message per rejected field.
pub fn validate(
    form: &TransactionForm,
    choices: &FormChoices,
) -> Result<ValidTransaction, TransactionFormError> {
    let mut errors = TransactionFormError::default();

    let amount = parse_amount(&form.amount)
        .map_err(|message| errors.add(FormField::Amount, message))
        .ok();
    let date = parse_date(&form.date)
        .map_err(|message| errors.add(FormField::Date, message))
        .ok();
    let description = parse_description(&form.description)
        .map_err(|message| errors.add(FormField::Description, message))
        .ok();
    let category = select(&form.category, &choices.categories)
        .map_err(|message| errors.add(FormField::Category, message))
        .ok();
    let subcategory = select(&form.subcategory, &choices.subcategories)
        .map_err(|message| errors.add(FormField::Subcategory, message))
        .ok();
    let account = select(&form.bank_account, &choices.accounts)
        .map_err(|message| errors.add(FormField::BankAccount, message))
        .ok();

    match (amount, date, description, category, subcategory, account) {
        (
            Some(amount),
            Some(date),
            Some(description),
            Some(category),
            Some(subcategory),
            Some(account),
        ) => Ok(ValidTransaction {
            amount,
            date,
            description,
            category: category.clone(),
            subcategory: subcategory.clone(),
            account: account.clone(),
        }),
        _ => Err(errors),
    }
}

fn parse_amount(raw: &str) -> Result<Amount, &'static str> {
    if raw.trim().is_empty() {
        return Err(messages::REQUIRED);
    }

    let amount = Amount::parse_form(raw).map_err(|e| match e {
        AmountError::NotNumeric(_) => messages::INVALID_NUMBER,
        AmountError::TooManyDigits => messages::TOO_MANY_DIGITS,
        AmountError::TooManyDecimalPlaces => messages::TOO_MANY_DECIMALS,
    })?;

    if amount.is_positive() {
        Ok(amount)
    } else {
        Err(messages::NOT_POSITIVE)
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(messages::REQUIRED);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| messages::INVALID_DATE)
}

fn parse_description(raw: &str) -> Result<String, String> {
    let description = raw.trim();
    if description.is_empty() {
        return Err(messages::REQUIRED.to_string());
    }

    let length = description.chars().count();
    if length > MAX_DESCRIPTION_LEN {
        return Err(format!(
            "Assicurati che questo valore non contenga più di {MAX_DESCRIPTION_LEN} caratteri (ne ha {length})."
        ));
    }
    Ok(description.to_string())
}

fn select<'a>(raw: &str, choices: &'a [Choice]) -> Result<&'a Choice, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(messages::REQUIRED);
    }

    Uuid::parse_str(raw)
        .ok()
        .and_then(|id| choices.iter().find(|choice| choice.id == id))
        .ok_or(messages::INVALID_CHOICE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    struct Fixture {
        choices: FormChoices,
        form: TransactionForm,
    }

    fn fixture() -> Fixture {
        let food = Choice::new(Uuid::new_v4(), "Food");
        let groceries = Choice::new(Uuid::new_v4(), "Groceries");
        let account = Choice::new(Uuid::new_v4(), "Conto Comune");

        let form = TransactionForm {
            amount: "100,50".into(),
            date: "2025-01-15".into(),
            description: "  Spesa settimanale ".into(),
            category: food.id.to_string(),
            subcategory: groceries.id.to_string(),
            bank_account: account.id.to_string(),
        };

        Fixture {
            choices: FormChoices {
                categories: vec![food],
                subcategories: vec![groceries],
                accounts: vec![account],
            },
            form,
        }
    }

    #[test]
    fn test_valid_submission() {
        let Fixture { choices, form } = fixture();
        let valid = validate(&form, &choices).unwrap();

        assert_eq!(valid.amount.value(), dec!(100.50));
        assert_eq!(valid.description, "Spesa settimanale");
        assert_eq!(
            valid.sheet_row("Mario"),
            vec![
                "Mario",
                "2025-01-15",
                "100,50",
                "Spesa settimanale",
                "Food",
                "Groceries",
                "Conto Comune"
            ]
        );
    }

    #[rstest]
    #[case("0", messages::NOT_POSITIVE)]
    #[case("-5", messages::NOT_POSITIVE)]
    #[case("0,00", messages::NOT_POSITIVE)]
    #[case("", messages::REQUIRED)]
    #[case("dieci", messages::INVALID_NUMBER)]
    #[case("1,234", messages::TOO_MANY_DECIMALS)]
    #[case("123456789", messages::TOO_MANY_DIGITS)]
    fn test_amount_rejected(#[case] amount: &str, #[case] expected: &str) {
        let Fixture { choices, mut form } = fixture();
        form.amount = amount.into();

        let err = validate(&form, &choices).unwrap_err();
        assert_eq!(err.field(FormField::Amount), Some(expected));
        assert_eq!(err.iter().count(), 1);
    }

    #[test]
    fn test_subcategory_of_another_category_rejected() {
        let Fixture { choices, mut form } = fixture();
        form.subcategory = Uuid::new_v4().to_string();

        let err = validate(&form, &choices).unwrap_err();
        assert_eq!(err.field(FormField::Subcategory), Some(messages::INVALID_CHOICE));
    }

    #[test]
    fn test_all_errors_collected() {
        let err = validate(&TransactionForm::default(), &FormChoices::default()).unwrap_err();

        let fields: Vec<FormField> = err.iter().map(|(field, _)| field).collect();
        assert_eq!(
            fields,
            vec![
                FormField::Amount,
                FormField::Date,
                FormField::Description,
                FormField::Category,
                FormField::Subcategory,
                FormField::BankAccount,
            ]
        );
        assert!(err.iter().all(|(_, message)| message == messages::REQUIRED));
    }

    #[test]
    fn test_invalid_date_and_long_description() {
        let Fixture { choices, mut form } = fixture();
        form.date = "15/01/2025".into();
        form.description = "a".repeat(201);

        let err = validate(&form, &choices).unwrap_err();
        assert_eq!(err.field(FormField::Date), Some(messages::INVALID_DATE));
        assert_eq!(
            err.field(FormField::Description),
            Some("Assicurati che questo valore non contenga più di 200 caratteri (ne ha 201).")
        );
    }

    #[test]
    fn test_category_id() {
        let Fixture { form, choices } = fixture();
        assert_eq!(form.category_id(), Some(choices.categories[0].id));
        assert_eq!(TransactionForm::default().category_id(), None);
    }
}
