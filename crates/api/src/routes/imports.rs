//! Bank CSV upload.

use std::path::Path;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tracing::{error, info, warn};
use trantrac_core::import::SUCCESS_MESSAGE;
use trantrac_core::sheets::{
    CATEGORIES_SHEET, CREDITS_SHEET, DEBITS_SHEET, SYNC_FAILURE_MESSAGE, sync_rows,
};
use trantrac_core::transaction::messages;
use trantrac_db::CategoryRepository;
use trantrac_shared::AppError;

use crate::{
    ApiError, AppState,
    middleware::auth::CurrentUser,
    views::{self, page_response},
};

use super::redirect_home;

/// Multipart field carrying the file.
pub const FILE_FIELD: &str = "csv_file";

/// Shown when the uploaded file name does not end in `.csv`.
pub const WRONG_EXTENSION_MESSAGE: &str = "Il file deve essere in formato csv";

/// Largest accepted upload.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Creates the import router.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/upload_csv/",
        get(upload_page)
            .post(upload_csv)
            .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
    )
}

/// Result of one import, shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// True when every row reached the sheet.
    pub success: bool,
    /// User-facing message.
    pub message: String,
}

impl ImportOutcome {
    fn succeeded() -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Imports a bank export on behalf of `display_name`.
///
/// Categories referenced by the debits are created locally first and new pairs
/// are mirrored to the categories sheet; that mirror does not decide the
/// outcome. Credits and debits are both sent, and the import succeeds only if
/// both appends do. Local rows are kept when a later step fails.
pub async fn import_csv_core(state: &AppState, data: &[u8], display_name: &str) -> ImportOutcome {
    let batch = match state.normalizer.normalize(data, display_name) {
        Ok(batch) => batch,
        Err(e) => {
            warn!(error = %e, "CSV rejected");
            return ImportOutcome::failed(e.to_string());
        }
    };

    let category_rows = match CategoryRepository::new((*state.db).clone())
        .materialize_pairs(&batch.category_pairs)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Failed to create imported categories");
            return ImportOutcome::failed(SYNC_FAILURE_MESSAGE);
        }
    };

    let sheets = state.sheets.as_ref();
    sync_rows(sheets, CATEGORIES_SHEET, &category_rows).await;
    let credits_synced = sync_rows(sheets, CREDITS_SHEET, &batch.credits).await;
    let debits_synced = sync_rows(sheets, DEBITS_SHEET, &batch.debits).await;

    if credits_synced && debits_synced {
        info!(
            credits = batch.credits.len(),
            debits = batch.debits.len(),
            new_pairs = category_rows.len(),
            "CSV imported"
        );
        ImportOutcome::succeeded()
    } else {
        ImportOutcome::failed(SYNC_FAILURE_MESSAGE)
    }
}

/// GET /upload_csv/
async fn upload_page(headers: HeaderMap) -> Html<String> {
    Html(page_response(
        &headers,
        "Importa CSV",
        &views::upload_form(None, None),
    ))
}

/// POST /upload_csv/
async fn upload_csv(
    State(state): State<AppState>,
    headers: HeaderMap,
    user: CurrentUser,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(bad_upload)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(bad_upload)?;
        upload = Some((file_name, data));
    }

    let Some((file_name, data)) = upload.filter(|(file_name, _)| !file_name.is_empty()) else {
        return Ok(Html(views::upload_form(Some(messages::REQUIRED), None)).into_response());
    };

    if !has_csv_extension(&file_name) {
        return Ok(
            Html(views::upload_form(Some(WRONG_EXTENSION_MESSAGE), None)).into_response(),
        );
    }

    info!(user_id = %user.id(), file_name = %file_name, bytes = data.len(), "CSV upload received");
    let outcome = import_csv_core(&state, &data, user.display_name()).await;

    if outcome.success {
        Ok(redirect_home(&headers))
    } else {
        Ok(Html(views::upload_form(None, Some(outcome.message.as_str()))).into_response())
    }
}

fn has_csv_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("csv"))
}

fn bad_upload(e: MultipartError) -> ApiError {
    ApiError(AppError::Validation(e.body_text()))
}
