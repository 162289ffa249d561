//! Integration tests for the usage ledger rankings.

mod common;

use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use trantrac_db::{
    CategoryRepository, CreateUserInput, UsageRepository, UserRepository,
    repositories::DEFAULT_SHORTCUT_LIMIT,
};
use uuid::Uuid;

struct Fixture {
    usage: UsageRepository,
    user_id: Uuid,
    pairs: Vec<(Uuid, Uuid)>,
}

/// Creates a user and the pairs Food/Cafe, Food/Groceries, Home/Rent.
async fn fixture(db: DatabaseConnection) -> Fixture {
    let user = UserRepository::new(db.clone())
        .create(CreateUserInput {
            email: "mario@example.com".into(),
            password_hash: "$argon2id$test_hash".into(),
            display_name: "Mario".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    let categories = CategoryRepository::new(db.clone());
    let food = categories.create("Food").await.unwrap();
    let home = categories.create("Home").await.unwrap();
    let cafe = categories.create_subcategory(food.id, "Cafe", true).await.unwrap();
    let groceries = categories
        .create_subcategory(food.id, "Groceries", true)
        .await
        .unwrap();
    let rent = categories.create_subcategory(home.id, "Rent", true).await.unwrap();

    Fixture {
        usage: UsageRepository::new(db),
        user_id: user.id,
        pairs: vec![(food.id, cafe.id), (food.id, groceries.id), (home.id, rent.id)],
    }
}

#[tokio::test]
async fn test_recent_orders_by_last_use() {
    let f = fixture(common::setup_db().await).await;
    let now = Utc::now();
    let (cafe, groceries, rent) = (f.pairs[0], f.pairs[1], f.pairs[2]);

    f.usage
        .record_at(f.user_id, cafe.0, cafe.1, now - Duration::hours(3))
        .await
        .unwrap();
    f.usage
        .record_at(f.user_id, rent.0, rent.1, now - Duration::hours(2))
        .await
        .unwrap();
    f.usage
        .record_at(f.user_id, groceries.0, groceries.1, now - Duration::hours(1))
        .await
        .unwrap();
    f.usage.record_at(f.user_id, cafe.0, cafe.1, now).await.unwrap();

    let recent = f.usage.recent(DEFAULT_SHORTCUT_LIMIT).await.unwrap();
    let names: Vec<&str> = recent.iter().map(|s| s.subcategory_name.as_str()).collect();
    assert_eq!(names, vec!["Cafe", "Groceries", "Rent"]);
    assert_eq!(recent[0].category_name, "Food");
    assert_eq!(recent[2].category_name, "Home");
}

#[tokio::test]
async fn test_most_used_orders_by_count() {
    let f = fixture(common::setup_db().await).await;
    let (cafe, groceries, rent) = (f.pairs[0], f.pairs[1], f.pairs[2]);

    for _ in 0..3 {
        f.usage.record(f.user_id, rent.0, rent.1).await.unwrap();
    }
    for _ in 0..2 {
        f.usage.record(f.user_id, cafe.0, cafe.1).await.unwrap();
    }
    f.usage.record(f.user_id, groceries.0, groceries.1).await.unwrap();

    let ranked = f.usage.most_used(DEFAULT_SHORTCUT_LIMIT).await.unwrap();
    let names: Vec<&str> = ranked.iter().map(|s| s.subcategory_name.as_str()).collect();
    assert_eq!(names, vec!["Rent", "Cafe", "Groceries"]);
}

#[tokio::test]
async fn test_rankings_respect_limit() {
    let f = fixture(common::setup_db().await).await;
    for (category, subcategory) in &f.pairs {
        f.usage.record(f.user_id, *category, *subcategory).await.unwrap();
    }

    assert_eq!(f.usage.recent(2).await.unwrap().len(), 2);
    assert_eq!(f.usage.most_used(1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_rankings_empty() {
    let f = fixture(common::setup_db().await).await;
    assert!(f.usage.recent(DEFAULT_SHORTCUT_LIMIT).await.unwrap().is_empty());
    assert!(f.usage.most_used(DEFAULT_SHORTCUT_LIMIT).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_record_rejects_unknown_rows() {
    let f = fixture(common::setup_db().await).await;
    let result = f
        .usage
        .record(f.user_id, Uuid::new_v4(), f.pairs[0].1)
        .await;
    assert!(result.is_err());
}
