//! Cookie session middleware for page routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, Uri, header::LOCATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};
use trantrac_db::{UserRepository, entities::users};
use trantrac_shared::{AppError, JwtError};
use uuid::Uuid;

use crate::{ApiError, AppState};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "trantrac_session";

/// Path of the login page.
pub const LOGIN_PATH: &str = "/accounts/login/";

/// Session middleware.
///
/// Loads the active user named by the session cookie into the request
/// extensions. Anything else is sent to the login page with a `next`
/// parameter pointing back at the requested path.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string()) else {
        return login_redirect(request.uri());
    };

    let claims = match state.jwt_service.validate_token(&token) {
        Ok(claims) => claims,
        Err(JwtError::Expired) => {
            debug!("Session expired");
            return login_redirect(request.uri());
        }
        Err(e) => {
            warn!(error = %e, "Rejected session cookie");
            return login_redirect(request.uri());
        }
    };

    let user_repo = UserRepository::new((*state.db).clone());
    match user_repo.find_by_id(claims.user_id()).await {
        Ok(Some(user)) if user.is_active => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Ok(_) => {
            debug!(user_id = %claims.user_id(), "Session for unknown or inactive user");
            login_redirect(request.uri())
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// `302` to the login page, remembering where the user was going.
#[must_use]
pub fn login_redirect(target: &Uri) -> Response {
    let next = target
        .path_and_query()
        .map_or_else(|| target.path().to_string(), ToString::to_string);
    let location = format!("{LOGIN_PATH}?next={}", urlencoding::encode(&next));

    (StatusCode::FOUND, [(LOCATION, location)]).into_response()
}

/// The redirect target after login: a local absolute path, else `/`.
#[must_use]
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

/// The logged-in user, set by [`session_middleware`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub users::Model);

impl CurrentUser {
    /// User ID.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.0.id
    }

    /// Name used in greetings, sheet rows and the default account.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.0.display_name
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| ApiError(AppError::Unauthorized("no session".to_string())))
    }
}
