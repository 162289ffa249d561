//! Home page and expense submission.

use axum::{
    Form, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use sea_orm::DbErr;
use serde::Deserialize;
use tracing::{debug, error, info};
use trantrac_core::sheets::{DEBITS_SHEET, SYNC_FAILURE_MESSAGE, sync_rows};
use trantrac_core::transaction::{
    Choice, FormChoices, TransactionForm, TransactionFormError, default_account, local_today,
    validate,
};
use trantrac_db::{
    AccountRepository, CategoryRepository, DEFAULT_SHORTCUT_LIMIT, UsageRepository,
};
use uuid::Uuid;

use crate::{
    ApiError, AppState,
    middleware::auth::CurrentUser,
    views::{self, is_htmx_request},
};

/// Creates the transaction router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(index).post(submit))
}

/// Values preselected by a shortcut link.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Preselect {
    category: String,
    subcategory: String,
}

/// Options for the form; subcategories only for a known category.
pub(crate) async fn load_choices(
    state: &AppState,
    category: Option<Uuid>,
) -> Result<FormChoices, DbErr> {
    let category_repo = CategoryRepository::new((*state.db).clone());
    let account_repo = AccountRepository::new((*state.db).clone());

    let categories = category_repo
        .list()
        .await?
        .into_iter()
        .map(|category| Choice::new(category.id, category.name))
        .collect();
    let subcategories = match category {
        Some(id) => category_repo
            .subcategories_for(id)
            .await?
            .into_iter()
            .map(|subcategory| Choice::new(subcategory.id, subcategory.name))
            .collect(),
        None => vec![],
    };
    let accounts = account_repo
        .list()
        .await?
        .into_iter()
        .map(|account| Choice::new(account.id, account.name))
        .collect();

    Ok(FormChoices {
        categories,
        subcategories,
        accounts,
    })
}

/// GET / - Shortcuts and a blank form; only the form for HTMX.
async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
    user: CurrentUser,
    Query(preselect): Query<Preselect>,
) -> Result<Html<String>, ApiError> {
    let category_id = Uuid::parse_str(preselect.category.trim()).ok();
    let choices = load_choices(&state, category_id).await?;

    let form = TransactionForm {
        date: local_today(&state.site.time_zone)
            .format("%Y-%m-%d")
            .to_string(),
        category: preselect.category,
        subcategory: preselect.subcategory,
        bank_account: default_account(&choices.accounts, user.display_name())
            .map(|account| account.id.to_string())
            .unwrap_or_default(),
        ..TransactionForm::default()
    };
    let form_html =
        views::transaction_form(&form, &choices, &TransactionFormError::default(), None);

    if is_htmx_request(&headers) {
        return Ok(Html(form_html));
    }

    let usage_repo = UsageRepository::new((*state.db).clone());
    let recent = usage_repo.recent(DEFAULT_SHORTCUT_LIMIT).await?;
    let most_used = usage_repo.most_used(DEFAULT_SHORTCUT_LIMIT).await?;

    Ok(Html(views::base_html(
        "Nuova spesa",
        &views::index_content(
            user.display_name(),
            &views::shortcuts("Recenti", &recent),
            &views::shortcuts("Più usate", &most_used),
            &form_html,
        ),
    )))
}

/// POST / - Validate, append to the expenses sheet, record usage.
async fn submit(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(form): Form<TransactionForm>,
) -> Result<Response, ApiError> {
    let choices = load_choices(&state, form.category_id()).await?;

    let transaction = match validate(&form, &choices) {
        Ok(transaction) => transaction,
        Err(errors) => {
            debug!(user_id = %user.id(), error = %errors, "Transaction form rejected");
            return Ok(Html(views::transaction_form(&form, &choices, &errors, None)).into_response());
        }
    };

    let row = transaction.sheet_row(user.display_name());
    if !sync_rows(state.sheets.as_ref(), DEBITS_SHEET, &[row]).await {
        return Ok(Html(views::transaction_form(
            &form,
            &choices,
            &TransactionFormError::default(),
            Some(SYNC_FAILURE_MESSAGE),
        ))
        .into_response());
    }

    let usage_repo = UsageRepository::new((*state.db).clone());
    if let Err(e) = usage_repo
        .record(
            user.id(),
            transaction.category.id,
            transaction.subcategory.id,
        )
        .await
    {
        error!(error = %e, "Failed to record category usage");
    }

    info!(
        user_id = %user.id(),
        amount = %transaction.amount,
        category = %transaction.category.name,
        "Transaction synced"
    );
    Ok((StatusCode::NO_CONTENT, [("HX-Refresh", "true")]).into_response())
}
