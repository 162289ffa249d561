//! Monthly reminder to import the bank export.
//!
//! Emails every staff or superuser account a link to the upload page. Meant
//! to be run from cron on the first day of the month.
//!
//! Usage: reminder

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trantrac_core::reminder::{NO_RECIPIENTS_MESSAGE, Reminder, send_reminders};
use trantrac_db::{UserRepository, connect_with};
use trantrac_shared::{AppConfig, EmailService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trantrac=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let db = connect_with(&config.database).await?;

    let recipients = UserRepository::new(db).admin_emails().await?;
    if recipients.is_empty() {
        println!("{NO_RECIPIENTS_MESSAGE}");
        return Ok(());
    }

    let mailer = EmailService::new(config.email.clone());
    let reminder = Reminder::compose(config.app.site_url.as_deref());
    let summary = send_reminders(&mailer, &reminder, &recipients).await;

    for delivery in &summary.deliveries {
        println!("{delivery}");
    }
    println!("{summary}");

    Ok(())
}
