use auth::AuthClaims;
use auth::Credential;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use axum::Extension;
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::pages;
use super::redirect::local_or_home;
use super::redirect::HOME;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::PageRequest;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::users::list_users::ListUsersQuery;
use crate::inbound::http::router::AppState;

pub async fn home(claims: Option<Extension<AuthClaims>>) -> Html<String> {
    let claims = claims.map(|Extension(claims)| claims);
    Html(pages::home(claims.as_ref()))
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginPageQuery {
    pub return_url: Option<String>,
}

pub async fn login_page(Query(query): Query<LoginPageQuery>) -> Html<String> {
    Html(pages::login(None, "", query.return_url.as_deref()))
}

#[derive(Clone, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
    /// Checkbox; present only when ticked
    remember_me: Option<String>,
    return_url: Option<String>,
}

impl LoginForm {
    fn remember_me(&self) -> bool {
        matches!(self.remember_me.as_deref(), Some("true" | "on"))
    }
}

pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let remember_me = form.remember_me();
    let command = LoginCommand::new(form.username.clone(), form.password, remember_me);

    match state.auth_service.login(command, &*state.sessions).await {
        Ok(outcome) => {
            let Credential::Session(session) = outcome.credential else {
                tracing::error!("Session authenticator issued a non-session credential");
                return error_page(StatusCode::INTERNAL_SERVER_ERROR, None, "Sign-in failed");
            };

            let target = local_or_home(form.return_url.as_deref()).to_string();
            let jar = jar.add(state.sessions.session_cookie(&session));

            (jar, Redirect::to(&target)).into_response()
        }
        Err(e @ (AuthError::InvalidCredentials | AuthError::AccountInactive)) => Html(pages::login(
            Some(&e.to_string()),
            &form.username,
            form.return_url.as_deref(),
        ))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Sign-in failed");
            error_page(StatusCode::INTERNAL_SERVER_ERROR, None, "Sign-in failed")
        }
    }
}

pub async fn logout(
    State(state): State<AppState>,
    claims: Option<Extension<AuthClaims>>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    if let Some(Extension(claims)) = claims {
        tracing::info!(user_id = %claims.subject_id, "User signed out");
    }

    (jar.add(state.sessions.end_session()), Redirect::to(HOME))
}

pub async fn access_denied(claims: Option<Extension<AuthClaims>>) -> (StatusCode, Html<String>) {
    let claims = claims.map(|Extension(claims)| claims);
    (
        StatusCode::FORBIDDEN,
        Html(pages::access_denied(claims.as_ref())),
    )
}

pub async fn users_page(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Query(query): Query<ListUsersQuery>,
) -> Response {
    let request = PageRequest::new(query.page_number, query.page_size);

    match state.user_service.list_users(request).await {
        Ok(page) => Html(pages::users(&claims, &page)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list users");
            error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(&claims),
                "Users could not be loaded",
            )
        }
    }
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    Path(id): Path<String>,
) -> Response {
    let Ok(user_id) = UserId::from_string(&id) else {
        return error_page(StatusCode::BAD_REQUEST, Some(&claims), "Invalid user id");
    };

    match state.user_service.delete_user(&user_id).await {
        Ok(()) => {
            tracing::info!(user_id = %user_id, deleted_by = %claims.username, "User removed via web");
            Redirect::to("/users").into_response()
        }
        Err(e @ UserError::NotFound(_)) => {
            error_page(StatusCode::NOT_FOUND, Some(&claims), &e.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to delete user");
            error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(&claims),
                "User could not be deleted",
            )
        }
    }
}

fn error_page(status: StatusCode, claims: Option<&AuthClaims>, message: &str) -> Response {
    (status, Html(pages::error(claims, message))).into_response()
}
