//! Integration tests for Account repository.

mod common;

use trantrac_db::AccountRepository;

#[tokio::test]
async fn test_accounts_listed_by_name() {
    let repo = AccountRepository::new(common::setup_db().await);
    repo.create("Mario").await.unwrap();
    repo.create("Conto Comune").await.unwrap();

    let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|a| a.name).collect();
    assert_eq!(names, vec!["Conto Comune", "Mario"]);
}

#[tokio::test]
async fn test_get_or_create() {
    let repo = AccountRepository::new(common::setup_db().await);

    let (first, created) = repo.get_or_create("Mario").await.unwrap();
    assert!(created);
    let (second, created) = repo.get_or_create("Mario").await.unwrap();
    assert!(!created);
    assert_eq!(first.id, second.id);

    assert_eq!(repo.find_by_id(first.id).await.unwrap(), Some(first));
    assert!(repo.find_by_name("Lucia").await.unwrap().is_none());
}
