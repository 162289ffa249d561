//! Login and logout.

use axum::{
    Form, Router,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use tracing::info;
use trantrac_core::auth::{reject_unknown_user, verify_password};
use trantrac_db::UserRepository;

use crate::{
    ApiError, AppState,
    middleware::auth::{LOGIN_PATH, SESSION_COOKIE, safe_next},
    views,
};

/// Shown for unknown emails, wrong passwords and inactive users alike.
pub const INVALID_LOGIN_MESSAGE: &str = "Email o password non validi.";

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(LOGIN_PATH, get(login_page).post(login))
        .route("/accounts/logout/", post(logout))
}

#[derive(Debug, Deserialize)]
struct NextQuery {
    next: Option<String>,
}

/// Login form fields.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    /// Login email.
    pub email: String,
    /// Plain-text password.
    pub password: String,
    /// Where to go after login.
    pub next: Option<String>,
}

/// GET /accounts/login/
async fn login_page(Query(query): Query<NextQuery>) -> Html<String> {
    Html(views::login_page(
        "",
        safe_next(query.next.as_deref()),
        None,
    ))
}

/// POST /accounts/login/ - Verify credentials and set the session cookie.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let next = safe_next(form.next.as_deref());
    let email = form.email.trim();
    let user_repo = UserRepository::new((*state.db).clone());

    let Some(user) = user_repo.find_by_email(email).await? else {
        reject_unknown_user(&form.password);
        info!(email, "Login attempt for unknown user");
        return Ok(invalid_login(email, next));
    };

    if !verify_password(&form.password, &user.password_hash)? {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Ok(invalid_login(email, next));
    }

    if !user.is_active {
        info!(user_id = %user.id, "Login attempt for inactive user");
        return Ok(invalid_login(email, next));
    }

    let token = state
        .jwt_service
        .generate_session_token(user.id, &user.email)?;
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.site.secure_cookies);

    info!(user_id = %user.id, "User logged in");
    Ok((jar.add(cookie), Redirect::to(next)).into_response())
}

/// POST /accounts/logout/
async fn logout(jar: CookieJar) -> impl IntoResponse {
    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Redirect::to(LOGIN_PATH),
    )
}

fn invalid_login(email: &str, next: &str) -> Response {
    Html(views::login_page(email, next, Some(INVALID_LOGIN_MESSAGE))).into_response()
}
