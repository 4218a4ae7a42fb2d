//! School admin registration form.

use secrecy::SecretString;
use serde::Deserialize;

use school_admin_core::{Email, PhoneNumber, Username};

use super::{Field, FormErrors, Widget, clean_field};
use crate::models::ProfileImage;

pub const INVALID_EMAIL_MESSAGE: &str = "Enter a valid email address.";
pub const INVALID_USERNAME_MESSAGE: &str = "Enter a valid username. This value may contain only \
     letters, numbers, and @/./+/-/_ characters.";
pub const INVALID_PHONE_MESSAGE: &str = "Enter a phone number using digits only.";
pub const INVALID_IMAGE_MESSAGE: &str = "Upload a valid image. The file you uploaded was either \
     not an image or a corrupted image.";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match";
pub const USERNAME_TAKEN_MESSAGE: &str = "A user with that username already exists.";

pub const USERNAME: Field = Field::required(
    "username",
    "Username",
    Widget::Text,
    Some(Username::MAX_LENGTH),
);
pub const EMAIL: Field = Field::required("email", "Email", Widget::Email, Some(Email::MAX_LENGTH));
pub const PASSWORD: Field = Field::required("password", "Password", Widget::Password, None);
pub const CONFIRM_PASSWORD: Field = Field::required(
    "confirm_password",
    "Confirm password",
    Widget::Password,
    None,
);
pub const FIRST_NAME: Field = Field::required("first_name", "First name", Widget::Text, Some(255));
pub const LAST_NAME: Field = Field::required("last_name", "Last name", Widget::Text, Some(255));
pub const PHONE_NUMBER: Field = Field::required(
    "phone_number",
    "Phone number",
    Widget::Text,
    Some(PhoneNumber::MAX_LENGTH),
);
pub const ADDRESS: Field = Field::required("address", "Address", Widget::Text, Some(100));
pub const PROFILE_PIC: Field = Field::optional("profile_pic", "Profile picture", Widget::File, None);

/// Rule table for the registration form, in display order.
pub const FIELDS: &[Field] = &[
    USERNAME,
    EMAIL,
    PASSWORD,
    CONFIRM_PASSWORD,
    FIRST_NAME,
    LAST_NAME,
    PHONE_NUMBER,
    ADDRESS,
    PROFILE_PIC,
];

/// Raw registration submission.
///
/// Missing fields deserialize as empty strings so that they are reported as
/// "required" rather than rejecting the whole request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub address: String,
}

/// A file part from a multipart submission.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    /// Client-supplied file name, if any.
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

impl Upload {
    /// Browsers send an empty part when no file was chosen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.file_name.as_deref().is_none_or(str::is_empty)
    }
}

/// A registration submission that passed every rule.
#[derive(Debug, Clone)]
pub struct ValidRegistration {
    pub username: Username,
    pub email: Email,
    pub password: SecretString,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: PhoneNumber,
    pub address: String,
    pub profile_pic: Option<ProfileImage>,
}

impl RegistrationForm {
    /// Set a field by its submitted name. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "username" => &mut self.username,
            "email" => &mut self.email,
            "password" => &mut self.password,
            "confirm_password" => &mut self.confirm_password,
            "first_name" => &mut self.first_name,
            "last_name" => &mut self.last_name,
            "phone_number" => &mut self.phone_number,
            "address" => &mut self.address,
            _ => return,
        };
        *slot = value;
    }

    /// The value to pre-fill for `name` when re-rendering.
    ///
    /// Password fields are never echoed back.
    #[must_use]
    pub fn value(&self, name: &str) -> &str {
        match name {
            "username" => &self.username,
            "email" => &self.email,
            "first_name" => &self.first_name,
            "last_name" => &self.last_name,
            "phone_number" => &self.phone_number,
            "address" => &self.address,
            _ => "",
        }
    }

    /// Run every field rule and the password confirmation check.
    ///
    /// A password mismatch fails validation like any field error; nothing
    /// downstream may persist a submission that returns `Err`.
    ///
    /// # Errors
    ///
    /// Returns all collected field and form-level errors.
    pub fn validate(
        &self,
        profile_pic: Option<&Upload>,
        max_profile_pic_bytes: usize,
    ) -> Result<ValidRegistration, FormErrors> {
        let mut errors = FormErrors::default();

        let username = clean_field(&USERNAME, &self.username, &mut errors, |v| {
            Username::parse(v).map_err(|_| INVALID_USERNAME_MESSAGE.to_owned())
        });
        let email = clean_field(&EMAIL, &self.email, &mut errors, |v| {
            Email::parse(v).map_err(|_| INVALID_EMAIL_MESSAGE.to_owned())
        });
        let password = clean_field(&PASSWORD, &self.password, &mut errors, |v| Ok(v.to_owned()));
        let confirm_password = clean_field(
            &CONFIRM_PASSWORD,
            &self.confirm_password,
            &mut errors,
            |v| Ok(v.to_owned()),
        );
        let first_name = clean_field(&FIRST_NAME, &self.first_name, &mut errors, |v| {
            Ok(v.to_owned())
        });
        let last_name = clean_field(&LAST_NAME, &self.last_name, &mut errors, |v| {
            Ok(v.to_owned())
        });
        let phone_number = clean_field(&PHONE_NUMBER, &self.phone_number, &mut errors, |v| {
            PhoneNumber::parse(v).map_err(|_| INVALID_PHONE_MESSAGE.to_owned())
        });
        let address = clean_field(&ADDRESS, &self.address, &mut errors, |v| Ok(v.to_owned()));
        let profile_pic = clean_profile_pic(profile_pic, max_profile_pic_bytes, &mut errors);

        if let (Some(password), Some(confirm)) = (&password, &confirm_password)
            && password != confirm
        {
            errors.add_non_field(PASSWORD_MISMATCH_MESSAGE);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        match (
            username,
            email,
            password,
            first_name,
            last_name,
            phone_number,
            address,
        ) {
            (
                Some(username),
                Some(email),
                Some(password),
                Some(first_name),
                Some(last_name),
                Some(phone_number),
                Some(address),
            ) => Ok(ValidRegistration {
                username,
                email,
                password: SecretString::from(password),
                first_name,
                last_name,
                phone_number,
                address,
                profile_pic,
            }),
            _ => Err(errors),
        }
    }
}

fn clean_profile_pic(
    upload: Option<&Upload>,
    max_bytes: usize,
    errors: &mut FormErrors,
) -> Option<ProfileImage> {
    let upload = upload.filter(|u| !u.is_empty())?;

    if upload.data.len() > max_bytes {
        errors.add_field(
            PROFILE_PIC.name,
            format!(
                "Ensure the file is at most {max_bytes} bytes (it has {}).",
                upload.data.len()
            ),
        );
        return None;
    }

    let image = ProfileImage::from_bytes(upload.data.clone());
    if image.is_none() {
        errors.add_field(PROFILE_PIC.name, INVALID_IMAGE_MESSAGE);
    }
    image
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use image::ImageFormat;

    use super::*;
    use crate::forms::REQUIRED_MESSAGE;
    use crate::models::account::tests::encoded_image;

    const MAX_BYTES: usize = 1024;

    fn ada() -> RegistrationForm {
        RegistrationForm {
            username: "ada".to_owned(),
            email: "ada@x.com".to_owned(),
            password: "p1".to_owned(),
            confirm_password: "p1".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "L".to_owned(),
            phone_number: "1234567890".to_owned(),
            address: "1 Rd".to_owned(),
        }
    }

    #[test]
    fn test_valid_submission() {
        let valid = ada().validate(None, MAX_BYTES).unwrap();
        assert_eq!(valid.username.as_str(), "ada");
        assert_eq!(valid.email.as_str(), "ada@x.com");
        assert_eq!(valid.password.expose_secret(), "p1");
        assert_eq!(valid.phone_number.as_str(), "1234567890");
        assert!(valid.profile_pic.is_none());
    }

    #[test]
    fn test_password_mismatch_is_form_level() {
        let mut form = ada();
        form.confirm_password = "p2".to_owned();

        let errors = form.validate(None, MAX_BYTES).unwrap_err();
        assert_eq!(errors.non_field(), [PASSWORD_MISMATCH_MESSAGE.to_owned()]);
        assert_eq!(errors.field_names().count(), 0);
    }

    #[test]
    fn test_invalid_email() {
        for bad in ["ada", "ada@", "@x.com", "ada@x", "ada @x.com"] {
            let mut form = ada();
            form.email = bad.to_owned();

            let errors = form.validate(None, MAX_BYTES).unwrap_err();
            assert_eq!(
                errors.field("email"),
                [INVALID_EMAIL_MESSAGE.to_owned()],
                "{bad}"
            );
            assert_eq!(errors.field_names().collect::<Vec<_>>(), ["email"]);
        }
    }

    #[test]
    fn test_phone_number_too_long() {
        let mut form = ada();
        form.phone_number = "12345678901".to_owned();

        let errors = form.validate(None, MAX_BYTES).unwrap_err();
        assert_eq!(
            errors.field("phone_number"),
            ["Ensure this value has at most 10 characters (it has 11).".to_owned()]
        );
    }

    #[test]
    fn test_phone_number_digits_only() {
        let mut form = ada();
        form.phone_number = "555-0100".to_owned();

        let errors = form.validate(None, MAX_BYTES).unwrap_err();
        assert_eq!(
            errors.field("phone_number"),
            [INVALID_PHONE_MESSAGE.to_owned()]
        );
    }

    #[test]
    fn test_empty_submission_reports_every_required_field() {
        let errors = RegistrationForm::default()
            .validate(None, MAX_BYTES)
            .unwrap_err();

        let required: Vec<&str> = FIELDS.iter().filter(|f| f.required).map(|f| f.name).collect();
        let mut reported: Vec<&str> = errors.field_names().collect();
        reported.sort_unstable();
        let mut expected = required.clone();
        expected.sort_unstable();

        assert_eq!(reported, expected);
        assert!(errors.non_field().is_empty());
    }

    #[test]
    fn test_whitespace_only_is_missing() {
        let mut form = ada();
        form.first_name = "   ".to_owned();

        let errors = form.validate(None, MAX_BYTES).unwrap_err();
        assert_eq!(
            errors.field("first_name"),
            [REQUIRED_MESSAGE.to_owned()]
        );
    }

    #[test]
    fn test_text_fields_are_trimmed() {
        let mut form = ada();
        form.username = "  ada  ".to_owned();
        form.address = " 1 Rd ".to_owned();

        let valid = form.validate(None, MAX_BYTES).unwrap();
        assert_eq!(valid.username.as_str(), "ada");
        assert_eq!(valid.address, "1 Rd");
    }

    #[test]
    fn test_passwords_keep_surrounding_whitespace() {
        let mut form = ada();
        form.password = " p1 ".to_owned();
        form.confirm_password = " p1 ".to_owned();

        let valid = form.validate(None, MAX_BYTES).unwrap();
        assert_eq!(valid.password.expose_secret(), " p1 ");

        let mut form = ada();
        form.confirm_password = "p1 ".to_owned();
        let errors = form.validate(None, MAX_BYTES).unwrap_err();
        assert_eq!(errors.non_field(), [PASSWORD_MISMATCH_MESSAGE.to_owned()]);
    }

    #[test]
    fn test_address_max_length() {
        let mut form = ada();
        form.address = "a".repeat(101);

        let errors = form.validate(None, MAX_BYTES).unwrap_err();
        assert_eq!(errors.field("address").len(), 1);
    }

    #[test]
    fn test_invalid_username() {
        let mut form = ada();
        form.username = "ada lovelace".to_owned();

        let errors = form.validate(None, MAX_BYTES).unwrap_err();
        assert_eq!(
            errors.field("username"),
            [INVALID_USERNAME_MESSAGE.to_owned()]
        );
    }

    #[test]
    fn test_empty_upload_is_ignored() {
        let upload = Upload {
            file_name: Some(String::new()),
            data: Vec::new(),
        };
        let valid = ada().validate(Some(&upload), MAX_BYTES).unwrap();
        assert!(valid.profile_pic.is_none());
    }

    #[test]
    fn test_image_upload_accepted() {
        let upload = Upload {
            file_name: Some("me.gif".to_owned()),
            data: encoded_image(ImageFormat::Gif),
        };
        let valid = ada().validate(Some(&upload), MAX_BYTES).unwrap();
        assert_eq!(valid.profile_pic.unwrap().content_type, "image/gif");
    }

    #[test]
    fn test_corrupt_image_upload_rejected() {
        let upload = Upload {
            file_name: Some("me.png".to_owned()),
            data: b"\x89PNG\r\n\x1a\nthis is not an image".to_vec(),
        };
        let errors = ada().validate(Some(&upload), MAX_BYTES).unwrap_err();
        assert_eq!(
            errors.field("profile_pic"),
            [INVALID_IMAGE_MESSAGE.to_owned()]
        );
    }

    #[test]
    fn test_non_image_upload_rejected() {
        let upload = Upload {
            file_name: Some("notes.txt".to_owned()),
            data: b"just text".to_vec(),
        };
        let errors = ada().validate(Some(&upload), MAX_BYTES).unwrap_err();
        assert_eq!(
            errors.field("profile_pic"),
            [INVALID_IMAGE_MESSAGE.to_owned()]
        );
    }

    #[test]
    fn test_oversized_upload_rejected() {
        let mut data = b"GIF89a".to_vec();
        data.resize(MAX_BYTES + 1, 0);
        let upload = Upload {
            file_name: Some("big.gif".to_owned()),
            data,
        };
        let errors = ada().validate(Some(&upload), MAX_BYTES).unwrap_err();
        assert_eq!(errors.field("profile_pic").len(), 1);
    }

    #[test]
    fn test_set_and_value() {
        let mut form = RegistrationForm::default();
        form.set("username", "ada".to_owned());
        form.set("password", "secret".to_owned());
        form.set("unknown", "ignored".to_owned());

        assert_eq!(form.value("username"), "ada");
        assert_eq!(form.password, "secret");
        assert_eq!(form.value("password"), "");
        assert_eq!(form.value("unknown"), "");
    }
}
