//! Form definitions: the validation component.
//!
//! Each form is described by a static table of [`Field`] rules. The same
//! table drives validation (presence, length, type checks) and HTML rendering
//! (label, input type, CSS class, `maxlength`, `required`), so the two never
//! disagree.
//!
//! Validation collects every problem it finds into [`FormErrors`] rather than
//! stopping at the first one; the templates show each message beside its
//! field and form-level messages above the form.

pub mod login;
pub mod registration;

use std::collections::BTreeMap;

pub use login::{Credentials, LoginForm};
pub use registration::{RegistrationForm, Upload, ValidRegistration};

/// Message for a required field left empty.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// How a field is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    Text,
    Email,
    Password,
    File,
}

impl Widget {
    /// The `<input type>` attribute.
    #[must_use]
    pub const fn input_type(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Password => "password",
            Self::File => "file",
        }
    }

    /// CSS class hint for the input element.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::File => "input-file w-full p-2",
            Self::Text | Self::Email | Self::Password => "input w-full p-2",
        }
    }

    /// Whether submitted values are echoed back when the form is re-rendered.
    #[must_use]
    pub const fn renders_value(self) -> bool {
        matches!(self, Self::Text | Self::Email)
    }
}

/// One row of a form's rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Form field name, as submitted.
    pub name: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    pub widget: Widget,
    pub required: bool,
    /// Maximum length in characters, if bounded.
    pub max_length: Option<usize>,
}

impl Field {
    /// A required field with an optional length bound.
    #[must_use]
    pub const fn required(
        name: &'static str,
        label: &'static str,
        widget: Widget,
        max_length: Option<usize>,
    ) -> Self {
        Self {
            name,
            label,
            widget,
            required: true,
            max_length,
        }
    }

    /// An optional field with an optional length bound.
    #[must_use]
    pub const fn optional(
        name: &'static str,
        label: &'static str,
        widget: Widget,
        max_length: Option<usize>,
    ) -> Self {
        Self {
            name,
            label,
            widget,
            required: false,
            max_length,
        }
    }

    /// Apply the presence and length rules to a raw submitted value.
    ///
    /// Text values are trimmed; password values are taken verbatim. Returns
    /// `Ok(None)` for an empty optional field.
    ///
    /// # Errors
    ///
    /// Returns the message to show beside the field.
    pub fn clean(&self, raw: &str) -> Result<Option<String>, String> {
        let value = if self.widget == Widget::Password {
            raw
        } else {
            raw.trim()
        };

        if value.is_empty() {
            return if self.required {
                Err(REQUIRED_MESSAGE.to_owned())
            } else {
                Ok(None)
            };
        }

        if let Some(max) = self.max_length {
            let len = value.chars().count();
            if len > max {
                return Err(format!(
                    "Ensure this value has at most {max} characters (it has {len})."
                ));
            }
        }

        Ok(Some(value.to_owned()))
    }
}

/// Clean `raw` with `field`'s rules, then convert it with `parse`.
///
/// Any failure is recorded against the field and yields `None`.
pub(crate) fn clean_field<T>(
    field: &Field,
    raw: &str,
    errors: &mut FormErrors,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Option<T> {
    let result = field
        .clean(raw)
        .and_then(|value| value.map(|v| parse(&v)).transpose());

    match result {
        Ok(value) => value,
        Err(message) => {
            errors.add_field(field.name, message);
            None
        }
    }
}

/// Validation errors for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
    non_field: Vec<String>,
}

impl FormErrors {
    /// Record an error against a single field.
    pub fn add_field(&mut self, name: &'static str, message: impl Into<String>) {
        self.fields.entry(name).or_default().push(message.into());
    }

    /// Record a form-level error.
    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    /// Errors for `name`, empty if it has none.
    #[must_use]
    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map_or(&[], Vec::as_slice)
    }

    /// Form-level errors.
    #[must_use]
    pub fn non_field(&self) -> &[String] {
        &self.non_field
    }

    /// Names of fields that have errors.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: Field = Field::required("name", "Name", Widget::Text, Some(5));
    const SECRET: Field = Field::required("secret", "Secret", Widget::Password, None);
    const NOTE: Field = Field::optional("note", "Note", Widget::Text, None);

    #[test]
    fn test_clean_trims_text() {
        assert_eq!(NAME.clean("  ada "), Ok(Some("ada".to_owned())));
    }

    #[test]
    fn test_clean_keeps_password_whitespace() {
        assert_eq!(SECRET.clean(" p1 "), Ok(Some(" p1 ".to_owned())));
    }

    #[test]
    fn test_clean_required() {
        assert_eq!(NAME.clean("   "), Err(REQUIRED_MESSAGE.to_owned()));
        assert_eq!(SECRET.clean(""), Err(REQUIRED_MESSAGE.to_owned()));
        assert_eq!(NOTE.clean(""), Ok(None));
    }

    #[test]
    fn test_clean_max_length_counts_chars() {
        assert!(NAME.clean("ééééé").is_ok());
        assert_eq!(
            NAME.clean("abcdef"),
            Err("Ensure this value has at most 5 characters (it has 6).".to_owned())
        );
    }

    #[test]
    fn test_clean_field_records_parse_error() {
        let mut errors = FormErrors::default();
        let value: Option<u8> = clean_field(&NAME, "abc", &mut errors, |v| {
            v.parse().map_err(|_| "not a number".to_owned())
        });
        assert_eq!(value, None);
        assert_eq!(errors.field("name"), ["not a number".to_owned()]);
    }

    #[test]
    fn test_form_errors() {
        let mut errors = FormErrors::default();
        assert!(errors.is_empty());
        assert!(errors.field("name").is_empty());

        errors.add_field("name", "first");
        errors.add_field("name", "second");
        errors.add_non_field("whole form");

        assert!(!errors.is_empty());
        assert_eq!(errors.field("name").len(), 2);
        assert_eq!(errors.non_field(), ["whole form".to_owned()]);
        assert_eq!(errors.field_names().collect::<Vec<_>>(), ["name"]);
    }

    #[test]
    fn test_widget_hints() {
        assert_eq!(Widget::Email.input_type(), "email");
        assert_eq!(Widget::File.css_class(), "input-file w-full p-2");
        assert!(!Widget::Password.renders_value());
        assert!(Widget::Text.renders_value());
    }
}
