//! Signed-in home page and profile picture.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::middleware::auth::LOGIN_PATH;
use crate::middleware::{RequireAccount, clear_current_account};
use crate::models::{Account, CurrentAccount};
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub account: Account,
}

/// Load the full account behind the session.
async fn load_account(state: &AppState, current: &CurrentAccount) -> Result<Option<Account>> {
    Ok(state.accounts().find_by_username(&current.username).await?)
}

/// Greet the signed-in account.
///
/// A session whose account no longer exists is discarded.
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    RequireAccount(current): RequireAccount,
) -> Result<Response> {
    let Some(account) = load_account(&state, &current).await? else {
        tracing::warn!(account_id = %current.id, "Session refers to a missing account");
        clear_current_account(&session).await?;
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    Ok(HomeTemplate { account }.into_response())
}

/// Serve the signed-in account's profile picture.
pub async fn profile_pic(
    State(state): State<AppState>,
    RequireAccount(current): RequireAccount,
) -> Result<Response> {
    let picture = load_account(&state, &current)
        .await?
        .and_then(|account| account.profile_pic)
        .ok_or_else(|| AppError::NotFound("profile picture".to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, picture.content_type),
            (header::CACHE_CONTROL, "private, no-cache".to_string()),
        ],
        picture.data,
    )
        .into_response())
}
