//! Account domain types.
//!
//! These types represent validated domain objects separate from database row types.

use core::fmt;
use std::io::Cursor;

use chrono::{DateTime, Utc};
use image::{ImageFormat, ImageReader, Limits};

use school_admin_core::{AccountId, Email, PhoneNumber, Username};

/// A school admin account (domain type).
#[derive(Clone)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// Login name, unique across accounts.
    pub username: Username,
    /// Contact email address.
    pub email: Email,
    /// Argon2 PHC string. Never the plaintext password.
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: PhoneNumber,
    pub address: String,
    /// Optional uploaded profile picture.
    pub profile_pic: Option<ProfileImage>,
    /// The single role flag this service knows about.
    pub is_school_admin: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// First and last name joined for display.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("phone_number", &self.phone_number)
            .field("address", &self.address)
            .field("profile_pic", &self.profile_pic)
            .field("is_school_admin", &self.is_school_admin)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// An account ready to insert: validated fields plus the password hash.
#[derive(Clone)]
pub struct NewAccount {
    pub username: Username,
    pub email: Email,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: PhoneNumber,
    pub address: String,
    pub profile_pic: Option<ProfileImage>,
    pub is_school_admin: bool,
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("profile_pic", &self.profile_pic)
            .finish_non_exhaustive()
    }
}

/// An uploaded profile picture.
#[derive(Clone, PartialEq, Eq)]
pub struct ProfileImage {
    /// MIME type detected from the image bytes.
    pub content_type: String,
    /// Raw image bytes.
    pub data: Vec<u8>,
}

/// Largest accepted width or height of a profile picture, in pixels.
const MAX_PROFILE_PIC_DIMENSION: u32 = 8192;

impl ProfileImage {
    /// Build a profile image from raw bytes.
    ///
    /// The format is guessed from the content and the whole image is decoded,
    /// so a valid header followed by garbage is rejected. Returns `None`
    /// unless the bytes decode as PNG, JPEG, GIF or WebP.
    #[must_use]
    pub fn from_bytes(data: Vec<u8>) -> Option<Self> {
        let mut reader = ImageReader::new(Cursor::new(data.as_slice()))
            .with_guessed_format()
            .ok()?;

        let format = reader.format()?;
        if !matches!(
            format,
            ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif | ImageFormat::WebP
        ) {
            return None;
        }

        let mut limits = Limits::default();
        limits.max_image_width = Some(MAX_PROFILE_PIC_DIMENSION);
        limits.max_image_height = Some(MAX_PROFILE_PIC_DIMENSION);
        reader.limits(limits);

        if let Err(e) = reader.decode() {
            tracing::debug!(error = %e, ?format, "Profile picture failed to decode");
            return None;
        }

        Some(Self {
            content_type: format.to_mime_type().to_owned(),
            data,
        })
    }
}

impl fmt::Debug for ProfileImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileImage")
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}
