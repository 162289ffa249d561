//! Category management: creation modals, subcategory options and the sheet refresh.

use axum::{
    Form, Router,
    extract::{Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::{info, warn};
use trantrac_core::sheets::{CATEGORIES_RANGE, CATEGORIES_SHEET, fetch_rows, sync_rows};
use trantrac_core::transaction::{Choice, messages};
use trantrac_db::CategoryRepository;
use uuid::Uuid;

use crate::{ApiError, AppState, views};

use super::redirect_home;

/// Longest accepted category or subcategory name.
pub const MAX_NAME_LEN: usize = 100;

/// Alert shown when the categories sheet cannot be read.
pub const REFRESH_FAILURE_MESSAGE: &str = "Impossibile recuperare i dati dal foglio Google.";

/// Creates the category router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/add_category/", get(category_modal).post(add_category))
        .route(
            "/add-subcategory/",
            get(subcategory_modal).post(add_subcategory),
        )
        .route("/load_subcategory/", get(load_subcategory))
        .route("/refresh-categories/", get(refresh_categories))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CategoryQuery {
    category: String,
}

/// New category form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CategoryForm {
    /// Category name.
    pub name: String,
}

/// New subcategory form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubcategoryForm {
    /// Subcategory name.
    pub name: String,
    /// Parent category id.
    pub category: String,
}

/// Trimmed name, or the message for the name field.
fn clean_name(raw: &str) -> Result<&str, String> {
    let name = raw.trim();
    let length = name.chars().count();
    if name.is_empty() {
        Err(messages::REQUIRED.to_string())
    } else if length > MAX_NAME_LEN {
        Err(format!(
            "Assicurati che questo valore non contenga più di {MAX_NAME_LEN} caratteri (ne ha {length})."
        ))
    } else {
        Ok(name)
    }
}

async fn category_choices(repo: &CategoryRepository) -> Result<Vec<Choice>, ApiError> {
    Ok(repo
        .list()
        .await?
        .into_iter()
        .map(|category| Choice::new(category.id, category.name))
        .collect())
}

/// GET /add_category/
async fn category_modal() -> Html<String> {
    Html(views::category_form("", None))
}

/// POST /add_category/ - Local only, nothing is sent to the sheet.
async fn add_category(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CategoryForm>,
) -> Result<Response, ApiError> {
    let name = match clean_name(&form.name) {
        Ok(name) => name,
        Err(message) => {
            return Ok(Html(views::category_form(&form.name, Some(message.as_str()))).into_response());
        }
    };

    let category = CategoryRepository::new((*state.db).clone())
        .create(name)
        .await?;
    info!(category_id = %category.id, name = %category.name, "Category created");

    Ok(redirect_home(&headers))
}

/// GET /add-subcategory/?category=<id>
async fn subcategory_modal(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Html<String>, ApiError> {
    let categories = category_choices(&CategoryRepository::new((*state.db).clone())).await?;

    Ok(Html(views::subcategory_form(
        &categories,
        query.category.trim(),
        "",
        None,
        None,
    )))
}

/// POST /add-subcategory/ - Create, then mirror the pair to the categories sheet.
async fn add_subcategory(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SubcategoryForm>,
) -> Result<Response, ApiError> {
    let repo = CategoryRepository::new((*state.db).clone());

    let category = match Uuid::parse_str(form.category.trim()) {
        Ok(id) => repo.find_by_id(id).await?,
        Err(_) => None,
    };
    let category_error = match &category {
        Some(_) => None,
        None if form.category.trim().is_empty() => Some(messages::REQUIRED),
        None => Some(messages::INVALID_CHOICE),
    };
    let name = clean_name(&form.name);
    let name_error = name.as_ref().err().cloned();

    let (Some(category), Ok(name)) = (category, name) else {
        let categories = category_choices(&repo).await?;
        let html = views::subcategory_form(
            &categories,
            form.category.trim(),
            &form.name,
            category_error,
            name_error.as_deref(),
        );
        return Ok(Html(html).into_response());
    };

    let subcategory = repo.create_subcategory(category.id, name, false).await?;
    info!(
        subcategory_id = %subcategory.id,
        category = %category.name,
        name = %subcategory.name,
        "Subcategory created"
    );

    if !subcategory.skip_sheet_save {
        let row = vec![category.name.clone(), subcategory.name.clone()];
        if !sync_rows(state.sheets.as_ref(), CATEGORIES_SHEET, &[row]).await {
            warn!(subcategory_id = %subcategory.id, "Subcategory kept locally without sheet row");
        }
    }

    Ok(redirect_home(&headers))
}

/// GET /load_subcategory/?category=<id> - `<option>` list for the form.
async fn load_subcategory(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Html<String>, ApiError> {
    let subcategories = match Uuid::parse_str(query.category.trim()) {
        Ok(id) => CategoryRepository::new((*state.db).clone())
            .subcategories_for(id)
            .await?
            .into_iter()
            .map(|subcategory| Choice::new(subcategory.id, subcategory.name))
            .collect(),
        Err(_) => vec![],
    };

    Ok(Html(views::subcategory_options(&subcategories)))
}

/// GET /refresh-categories/ - Mirror the categories sheet locally.
async fn refresh_categories(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let Some(rows) = fetch_rows(state.sheets.as_ref(), CATEGORIES_SHEET, CATEGORIES_RANGE).await
    else {
        return Ok(Html(views::alert(REFRESH_FAILURE_MESSAGE)).into_response());
    };

    let summary = CategoryRepository::new((*state.db).clone())
        .refresh_from_rows(&rows)
        .await?;
    info!(
        rows = rows.len(),
        categories_created = summary.categories_created,
        subcategories_created = summary.subcategories_created,
        "Categories refreshed from sheet"
    );

    Ok(redirect_home(&headers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("  Casa  "), Ok("Casa"));
        assert_eq!(clean_name("   "), Err(messages::REQUIRED.to_string()));
        assert!(clean_name(&"x".repeat(MAX_NAME_LEN)).is_ok());
        assert_eq!(
            clean_name(&"x".repeat(MAX_NAME_LEN + 1)),
            Err("Assicurati che questo valore non contenga più di 100 caratteri (ne ha 101).".to_string())
        );
    }
}
