//! Account self-deletion.

use axum::{
    Router,
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse},
    routing::get,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::info;
use trantrac_db::UserRepository;

use crate::{
    ApiError, AppState,
    middleware::auth::{CurrentUser, SESSION_COOKIE},
    views::{self, page_response},
};

/// Creates the user router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/users/delete/", get(delete_page).post(delete_user))
}

/// GET /users/delete/
async fn delete_page(headers: HeaderMap, user: CurrentUser) -> Html<String> {
    Html(page_response(
        &headers,
        "Elimina account",
        &views::user_delete_form(user.display_name(), &user.0.email),
    ))
}

/// POST /users/delete/ - Removes the account and its usage facts, then ends the session.
async fn delete_user(
    State(state): State<AppState>,
    jar: CookieJar,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    UserRepository::new((*state.db).clone())
        .delete(user.id())
        .await?;
    info!(user_id = %user.id(), "User deleted");

    Ok((
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Html(views::user_deleted_page()),
    ))
}
