//! Route definitions.

use axum::{
    Router,
    http::{HeaderMap, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Redirect, Response},
};

use trantrac_shared::AppError;

use crate::{ApiError, AppState, middleware::auth::session_middleware, views::is_htmx_request};

pub mod auth;
pub mod categories;
pub mod health;
pub mod imports;
pub mod transactions;
pub mod users;

/// Creates the router: login and health are public, every page needs a session.
#[allow(clippy::needless_pass_by_value)]
pub fn app_routes(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(transactions::routes())
        .merge(categories::routes())
        .merge(imports::routes())
        .merge(users::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
        .fallback(not_found)
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError(AppError::NotFound(uri.path().to_string()))
}

/// Back to the home page: `HX-Redirect` for HTMX, `303` otherwise.
pub(crate) fn redirect_home(headers: &HeaderMap) -> Response {
    if is_htmx_request(headers) {
        (StatusCode::NO_CONTENT, [("HX-Redirect", "/")]).into_response()
    } else {
        Redirect::to("/").into_response()
    }
}
