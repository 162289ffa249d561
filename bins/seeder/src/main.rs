//! Bootstrap data for a fresh TranTrac database.
//!
//! Creates an admin user and the bank accounts offered by the transaction
//! form. Safe to run repeatedly: existing rows are left alone.
//!
//! Environment:
//! - `DATABASE_URL`
//! - `SEED_ADMIN_EMAIL`, `SEED_ADMIN_PASSWORD`, `SEED_ADMIN_DISPLAY_NAME`
//! - `SEED_ACCOUNTS`: comma separated account names
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use sea_orm::DatabaseConnection;
use trantrac_core::auth::hash_password;
use trantrac_db::{AccountRepository, CreateUserInput, UserRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = trantrac_db::connect(&database_url).await?;

    println!("Seeding admin user...");
    seed_admin(&db).await?;

    println!("Seeding bank accounts...");
    seed_accounts(&db).await?;

    println!("Seeding complete!");
    Ok(())
}

/// Creates the admin user unless the email is already taken.
async fn seed_admin(db: &DatabaseConnection) -> anyhow::Result<()> {
    let Ok(email) = std::env::var("SEED_ADMIN_EMAIL") else {
        println!("  SEED_ADMIN_EMAIL not set, skipping...");
        return Ok(());
    };
    let email = email.trim().to_string();

    let users = UserRepository::new(db.clone());
    if users.email_exists(&email).await? {
        println!("  Admin user {email} already exists, skipping...");
        return Ok(());
    }

    let password = std::env::var("SEED_ADMIN_PASSWORD")
        .context("SEED_ADMIN_PASSWORD must be set to create the admin user")?;
    let display_name =
        std::env::var("SEED_ADMIN_DISPLAY_NAME").unwrap_or_else(|_| "Admin".to_string());

    let user = users
        .create(CreateUserInput {
            email,
            password_hash: hash_password(&password)?,
            display_name,
            is_staff: true,
            is_superuser: true,
        })
        .await?;
    println!("  Created admin user {} ({})", user.email, user.display_name);

    Ok(())
}

/// Creates each account listed in `SEED_ACCOUNTS`.
async fn seed_accounts(db: &DatabaseConnection) -> anyhow::Result<()> {
    let names = account_names(&std::env::var("SEED_ACCOUNTS").unwrap_or_default());
    if names.is_empty() {
        println!("  SEED_ACCOUNTS not set, skipping...");
        return Ok(());
    }

    let accounts = AccountRepository::new(db.clone());
    for name in names {
        let (account, created) = accounts.get_or_create(&name).await?;
        if created {
            println!("  Created account {}", account.name);
        } else {
            println!("  Account {} already exists, skipping...", account.name);
        }
    }

    Ok(())
}

/// Splits a comma separated list, dropping blanks.
fn account_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_names() {
        assert_eq!(
            account_names(" Conto Comune, Mario ,,Lucia"),
            vec!["Conto Comune", "Mario", "Lucia"]
        );
        assert!(account_names("").is_empty());
        assert!(account_names(" , ").is_empty());
    }
}
