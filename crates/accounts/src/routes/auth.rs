//! Registration, login and logout handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::{Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::forms::login::{self as login_form, INVALID_LOGIN_MESSAGE};
use crate::forms::registration::{self as registration_form, USERNAME_TAKEN_MESSAGE};
use crate::forms::{Field, FormErrors, LoginForm, RegistrationForm, Upload};
use crate::middleware::auth::LOGIN_PATH;
use crate::middleware::{clear_current_account, set_current_account};
use crate::models::CurrentAccount;
use crate::services::auth::{AccountService, AuthError};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub form: RegistrationForm,
    pub errors: FormErrors,
    pub fields: &'static [Field],
}

impl RegisterTemplate {
    fn new(form: RegistrationForm, errors: FormErrors) -> Self {
        Self {
            form,
            errors,
            fields: registration_form::FIELDS,
        }
    }
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub form: LoginForm,
    pub errors: FormErrors,
    pub fields: &'static [Field],
}

impl LoginTemplate {
    fn new(form: LoginForm, errors: FormErrors) -> Self {
        Self {
            form,
            errors,
            fields: login_form::FIELDS,
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the empty registration form.
pub async fn register_page() -> impl IntoResponse {
    RegisterTemplate::new(RegistrationForm::default(), FormErrors::default())
}

/// Handle registration form submission.
///
/// Invalid submissions re-render the form with the submitted values and
/// errors. A valid one creates a school admin account and redirects to login.
pub async fn register(State(state): State<AppState>, multipart: Multipart) -> Result<Response> {
    let (form, upload) = read_registration(multipart).await?;

    add_breadcrumb(
        "auth",
        "Registration submitted",
        Some(&[("username", form.username.trim())]),
    );

    let registration = match form.validate(upload.as_ref(), state.config().max_profile_pic_bytes)
    {
        Ok(registration) => registration,
        Err(errors) => {
            tracing::debug!(
                fields = ?errors.field_names().collect::<Vec<_>>(),
                "Registration rejected"
            );
            return Ok(RegisterTemplate::new(form, errors).into_response());
        }
    };

    match AccountService::new(state.accounts())
        .register(registration)
        .await
    {
        Ok(_) => Ok(Redirect::to(LOGIN_PATH).into_response()),
        Err(AuthError::UsernameTaken) => {
            let mut errors = FormErrors::default();
            errors.add_non_field(USERNAME_TAKEN_MESSAGE);
            Ok(RegisterTemplate::new(form, errors).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Split a multipart registration body into text fields and the optional
/// profile picture.
async fn read_registration(mut multipart: Multipart) -> Result<(RegistrationForm, Option<Upload>)> {
    let mut form = RegistrationForm::default();
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == registration_form::PROFILE_PIC.name {
            let file_name = field.file_name().map(str::to_owned);
            let data = field.bytes().await?.to_vec();
            upload = Some(Upload { file_name, data });
        } else {
            let value = field.text().await?;
            form.set(&name, value);
        }
    }

    Ok((form, upload))
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the empty login form.
pub async fn login_page() -> impl IntoResponse {
    LoginTemplate::new(LoginForm::default(), FormErrors::default())
}

/// Handle login form submission.
///
/// On success the session ID is rotated, the account is stored in the
/// session and the browser is sent home.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let credentials = match form.validate() {
        Ok(credentials) => credentials,
        Err(errors) => return Ok(LoginTemplate::new(form, errors).into_response()),
    };

    match AccountService::new(state.accounts())
        .authenticate(&credentials)
        .await
    {
        Ok(account) => {
            set_current_account(&session, &CurrentAccount::from(&account)).await?;
            set_sentry_user(&account.id, account.username.as_str());
            tracing::info!(account_id = %account.id, "Account logged in");
            Ok(Redirect::to("/").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!(username = %credentials.username, "Login failed");
            let mut errors = FormErrors::default();
            errors.add_non_field(INVALID_LOGIN_MESSAGE);
            Ok(LoginTemplate::new(form, errors).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Handle logout.
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_account(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to(LOGIN_PATH))
}
