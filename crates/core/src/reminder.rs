//! Monthly import reminder.
//!
//! Admin users get a plain-text email pointing them to the CSV upload page.

use std::fmt;

use tracing::{info, warn};
use trantrac_shared::Mailer;

/// Reminder subject line.
pub const SUBJECT: &str = "Reminder: Import transazioni bancarie";

/// Printed when nobody qualifies as a recipient.
pub const NO_RECIPIENTS_MESSAGE: &str = "No admin users found. Email not sent.";

/// Path of the CSV upload page.
pub const UPLOAD_PATH: &str = "/upload_csv/";

const GREETING: &str = "Ciao,\n\n\
Questo è un promemoria mensile per ricordarti di importare le transazioni bancarie.";

const SIGNATURE: &str = "Grazie,\nTranTrac";

/// A composed reminder email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

impl Reminder {
    /// Composes the reminder, linking the upload page when `site_url` is set.
    #[must_use]
    pub fn compose(site_url: Option<&str>) -> Self {
        let site_url = site_url.map(|url| url.trim().trim_end_matches('/')).unwrap_or_default();

        let instructions = if site_url.is_empty() {
            "Accedi all'applicazione e vai alla pagina di upload CSV per aggiungere \
             le nuove transazioni del mese."
                .to_string()
        } else {
            format!(
                "Accedi alla pagina di upload CSV per aggiungere le nuove transazioni del mese:\n\
                 {site_url}{UPLOAD_PATH}"
            )
        };

        Self {
            subject: SUBJECT.to_string(),
            body: format!("{GREETING}\n\n{instructions}\n\n{SIGNATURE}"),
        }
    }
}

/// Result of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The email was accepted by the relay.
    Sent {
        /// Recipient address.
        email: String,
    },
    /// Sending failed.
    Failed {
        /// Recipient address.
        email: String,
        /// Error description.
        error: String,
    },
}

impl fmt::Display for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent { email } => write!(f, "Email sent to {email}"),
            Self::Failed { email, error } => write!(f, "Failed to send email to {email}: {error}"),
        }
    }
}

/// Outcome of a reminder run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderSummary {
    /// One entry per recipient, in sending order.
    pub deliveries: Vec<Delivery>,
}

impl ReminderSummary {
    /// Number of emails sent.
    #[must_use]
    pub fn sent(&self) -> usize {
        self.deliveries
            .iter()
            .filter(|delivery| matches!(delivery, Delivery::Sent { .. }))
            .count()
    }

    /// Number of failed deliveries.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.deliveries.len() - self.sent()
    }
}

impl fmt::Display for ReminderSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Summary: {} emails sent, {} failed",
            self.sent(),
            self.failed()
        )
    }
}

/// Sends `reminder` to every recipient.
///
/// A failed delivery is recorded and does not stop the run.
pub async fn send_reminders(
    mailer: &dyn Mailer,
    reminder: &Reminder,
    recipients: &[String],
) -> ReminderSummary {
    let mut summary = ReminderSummary::default();

    for email in recipients {
        let delivery = match mailer.send_email(email, &reminder.subject, &reminder.body).await {
            Ok(()) => {
                info!(%email, "Reminder sent");
                Delivery::Sent {
                    email: email.clone(),
                }
            }
            Err(e) => {
                warn!(%email, error = %e, "Reminder delivery failed");
                Delivery::Failed {
                    email: email.clone(),
                    error: e.to_string(),
                }
            }
        };
        summary.deliveries.push(delivery);
    }

    info!(sent = summary.sent(), failed = summary.failed(), "Reminder run finished");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use trantrac_shared::{EmailError, MockMailer};

    #[test]
    fn test_compose_with_site_url() {
        let reminder = Reminder::compose(Some("https://trantrac.example.com/"));

        assert_eq!(reminder.subject, SUBJECT);
        assert!(reminder.body.contains("https://trantrac.example.com/upload_csv/"));
        assert!(!reminder.body.contains("Accedi all'applicazione"));
        assert!(reminder.body.starts_with("Ciao,"));
        assert!(reminder.body.ends_with("TranTrac"));
    }

    #[test]
    fn test_compose_without_site_url() {
        for site_url in [None, Some(""), Some("  ")] {
            let reminder = Reminder::compose(site_url);
            assert!(reminder.body.contains("Accedi all'applicazione"));
            assert!(!reminder.body.contains(UPLOAD_PATH));
        }
    }

    #[tokio::test]
    async fn test_send_reminders_counts_failures() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send_email()
            .withf(|to, subject, _| to == "admin@example.com" && subject == SUBJECT)
            .times(1)
            .returning(|_, _, _| Ok(()));
        mailer
            .expect_send_email()
            .withf(|to, _, _| to == "staff@example.com")
            .times(1)
            .returning(|_, _, _| Err(EmailError::SendError("connection refused".into())));

        let recipients = vec!["admin@example.com".to_string(), "staff@example.com".to_string()];
        let summary = send_reminders(&mailer, &Reminder::compose(None), &recipients).await;

        assert_eq!(summary.sent(), 1);
        assert_eq!(summary.failed(), 1);
        assert_eq!(
            summary.deliveries[0].to_string(),
            "Email sent to admin@example.com"
        );
        assert_eq!(
            summary.deliveries[1].to_string(),
            "Failed to send email to staff@example.com: Failed to send email: connection refused"
        );
        assert_eq!(summary.to_string(), "Summary: 1 emails sent, 1 failed");
    }

    #[tokio::test]
    async fn test_send_reminders_no_recipients() {
        let mut mailer = MockMailer::new();
        mailer.expect_send_email().never();

        let summary = send_reminders(&mailer, &Reminder::compose(None), &[]).await;
        assert_eq!(summary, ReminderSummary::default());
    }
}
