//! Home page and expense submission tests.

mod common;

use axum::http::StatusCode;
use common::{FakeSheets, TestApp, body_text};
use trantrac_db::{AccountRepository, CategoryRepository, UsageRepository};
use uuid::Uuid;

struct Ids {
    food: Uuid,
    groceries: Uuid,
    casa: Uuid,
    mario: Uuid,
}

async fn ids(app: &TestApp) -> Ids {
    let categories = CategoryRepository::new(app.db.clone());
    let food = categories.find_by_name("Food").await.unwrap().unwrap();
    let casa = categories.find_by_name("Casa").await.unwrap().unwrap();
    let groceries = categories.subcategories_for(food.id).await.unwrap()[0].id;
    let mario = AccountRepository::new(app.db.clone())
        .find_by_name("Mario")
        .await
        .unwrap()
        .unwrap()
        .id;

    Ids {
        food: food.id,
        groceries,
        casa: casa.id,
        mario,
    }
}

fn form_body(ids: &Ids, amount: &str) -> String {
    format!(
        "amount={amount}&date=2025-03-14&description=Spesa+settimanale&category={}&subcategory={}&bank_account={}",
        ids.food, ids.groceries, ids.mario
    )
}

#[tokio::test]
async fn test_index_full_page() {
    let app = TestApp::spawn(FakeSheets::new()).await;
    app.seed().await;
    let ids = ids(&app).await;

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Ciao Mario"));
    assert!(html.contains(r#"id="transaction-form""#));
    // Account named like the user is preselected.
    assert!(html.contains(&format!(r#"value="{}" selected>Mario"#, ids.mario)));
}

#[tokio::test]
async fn test_index_htmx_returns_form_with_preselection() {
    let app = TestApp::spawn(FakeSheets::new()).await;
    app.seed().await;
    let ids = ids(&app).await;

    let response = app
        .get_htmx(&format!(
            "/?category={}&subcategory={}",
            ids.food, ids.groceries
        ))
        .await;
    let html = body_text(response).await;

    assert!(html.starts_with("<form"));
    assert!(!html.contains("Ciao Mario"));
    assert!(html.contains(&format!(r#"value="{}" selected>Food"#, ids.food)));
    assert!(html.contains(&format!(r#"value="{}" selected>Groceries"#, ids.groceries)));
    assert!(!html.contains("Bollette"));
}

#[tokio::test]
async fn test_submit_appends_row_and_records_usage() {
    let app = TestApp::spawn(FakeSheets::new()).await;
    app.seed().await;
    let ids = ids(&app).await;

    let response = app.post_form("/", &form_body(&ids, "12.50")).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(response.headers()["HX-Refresh"], "true");
    assert_eq!(
        app.sheets.rows_for("USCITE"),
        vec![vec![
            "Mario".to_string(),
            "2025-03-14".to_string(),
            "12,50".to_string(),
            "Spesa settimanale".to_string(),
            "Food".to_string(),
            "Groceries".to_string(),
            "Mario".to_string(),
        ]]
    );

    let recent = UsageRepository::new(app.db.clone()).recent(6).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].category_name, "Food");
    assert_eq!(recent[0].subcategory_name, "Groceries");
}

#[tokio::test]
async fn test_submit_rejects_non_positive_amount() {
    let app = TestApp::spawn(FakeSheets::new()).await;
    app.seed().await;
    let ids = ids(&app).await;

    for amount in ["0", "-5"] {
        let response = app.post_form("/", &form_body(&ids, amount)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            body_text(response)
                .await
                .contains("Il valore inserito deve essere maggiore di zero")
        );
    }

    assert!(app.sheets.appends().is_empty());
    assert!(UsageRepository::new(app.db.clone()).recent(6).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_rejects_subcategory_of_other_category() {
    let app = TestApp::spawn(FakeSheets::new()).await;
    app.seed().await;
    let ids = ids(&app).await;

    let body = format!(
        "amount=10&date=2025-03-14&description=Luce&category={}&subcategory={}&bank_account={}",
        ids.casa, ids.groceries, ids.mario
    );
    let response = app.post_form("/", &body).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(r#"id="error_subcategory""#));
    assert!(app.sheets.appends().is_empty());
}

#[tokio::test]
async fn test_submit_sync_failure_keeps_form_and_skips_usage() {
    let app = TestApp::spawn(FakeSheets::new().failing("USCITE")).await;
    app.seed().await;
    let ids = ids(&app).await;

    let response = app.post_form("/", &form_body(&ids, "12,50")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Ops, qualcosa è andato storto.."));
    assert!(html.contains(r#"value="12,50""#));
    assert!(UsageRepository::new(app.db.clone()).recent(6).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_shortcuts_rendered_after_submit() {
    let app = TestApp::spawn(FakeSheets::new()).await;
    app.seed().await;
    let ids = ids(&app).await;

    app.post_form("/", &form_body(&ids, "3")).await;
    let html = body_text(app.get("/").await).await;

    assert!(html.contains("Recenti"));
    assert!(html.contains("Food › Groceries"));
    assert!(html.contains(&format!(
        "/?category={}&amp;subcategory={}",
        ids.food, ids.groceries
    )));
}
