//! School admin login form.

use secrecy::SecretString;
use serde::Deserialize;

use school_admin_core::Username;

use super::{Field, FormErrors, Widget, clean_field};

pub const INVALID_LOGIN_MESSAGE: &str = "Please enter a correct username and password.";

pub const USERNAME: Field = Field::required(
    "username",
    "Username",
    Widget::Text,
    Some(Username::MAX_LENGTH),
);
pub const PASSWORD: Field = Field::required("password", "Password", Widget::Password, None);

/// Rule table for the login form, in display order.
pub const FIELDS: &[Field] = &[USERNAME, PASSWORD];

/// Raw login submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Username and password that passed the form rules, ready to authenticate.
///
/// The username is not parsed into a [`Username`] here: a malformed name
/// simply matches no account, and reporting it differently would reveal
/// which half of the credentials was wrong.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl LoginForm {
    /// The value to pre-fill for `name` when re-rendering.
    #[must_use]
    pub fn value(&self, name: &str) -> &str {
        match name {
            "username" => &self.username,
            _ => "",
        }
    }

    /// Check that both fields are present and within bounds.
    ///
    /// # Errors
    ///
    /// Returns the collected field errors.
    pub fn validate(&self) -> Result<Credentials, FormErrors> {
        let mut errors = FormErrors::default();

        let username = clean_field(&USERNAME, &self.username, &mut errors, |v| Ok(v.to_owned()));
        let password = clean_field(&PASSWORD, &self.password, &mut errors, |v| Ok(v.to_owned()));

        match (username, password) {
            (Some(username), Some(password)) if errors.is_empty() => Ok(Credentials {
                username,
                password: SecretString::from(password),
            }),
            _ => Err(errors),
        }
    }
}
