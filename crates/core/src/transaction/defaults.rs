//! Initial values for the transaction form.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::warn;

use super::form::Choice;

/// The account named like the user, else the first account.
#[must_use]
pub fn default_account<'a>(accounts: &'a [Choice], display_name: &str) -> Option<&'a Choice> {
    accounts
        .iter()
        .find(|account| !display_name.is_empty() && account.name == display_name)
        .or_else(|| accounts.first())
}

/// Today's date in the given IANA time zone.
///
/// Unknown zone names fall back to UTC.
#[must_use]
pub fn local_today(time_zone: &str) -> NaiveDate {
    let now = Utc::now();
    match time_zone.parse::<Tz>() {
        Ok(tz) => now.with_timezone(&tz).date_naive(),
        Err(_) => {
            warn!(time_zone, "Unknown time zone, using UTC");
            now.date_naive()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn accounts() -> Vec<Choice> {
        ["Conto Comune", "Mario", "Lucia"]
            .into_iter()
            .map(|name| Choice::new(Uuid::new_v4(), name))
            .collect()
    }

    #[test]
    fn test_account_matching_display_name() {
        let accounts = accounts();
        assert_eq!(default_account(&accounts, "Mario").map(|a| a.name.as_str()), Some("Mario"));
    }

    #[test]
    fn test_account_fallback_to_first() {
        let accounts = accounts();
        assert_eq!(
            default_account(&accounts, "Giulia").map(|a| a.name.as_str()),
            Some("Conto Comune")
        );
        assert_eq!(
            default_account(&accounts, "").map(|a| a.name.as_str()),
            Some("Conto Comune")
        );
        assert!(default_account(&[], "Mario").is_none());
    }

    #[test]
    fn test_local_today_is_near_utc() {
        let utc = Utc::now().date_naive();
        let rome = local_today("Europe/Rome");
        assert!((rome - utc).num_days().abs() <= 1);
        assert_eq!(local_today("Not/AZone"), Utc::now().date_naive());
    }
}
