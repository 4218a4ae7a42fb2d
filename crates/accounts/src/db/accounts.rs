//! `PostgreSQL` account repository.

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::BoxFuture;
use sqlx::PgPool;

use school_admin_core::{AccountId, Email, PhoneNumber, Username};

use super::{AccountStore, RepositoryError};
use crate::models::{Account, NewAccount, ProfileImage};

const ACCOUNT_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, \
     phone_number, address, profile_pic, profile_pic_content_type, is_school_admin, \
     created_at, updated_at";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` account queries.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: i32,
    username: String,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    phone_number: String,
    address: String,
    profile_pic: Option<Vec<u8>>,
    profile_pic_content_type: Option<String>,
    is_school_admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let phone_number = PhoneNumber::parse(&row.phone_number).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid phone number in database: {e}"))
        })?;

        let profile_pic = match (row.profile_pic, row.profile_pic_content_type) {
            (Some(data), Some(content_type)) => Some(ProfileImage { content_type, data }),
            (None, None) => None,
            _ => {
                return Err(RepositoryError::DataCorruption(
                    "profile picture stored without its content type".to_owned(),
                ));
            }
        };

        Ok(Self {
            id: AccountId::new(row.id),
            username,
            email,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            phone_number,
            address: row.address,
            profile_pic,
            is_school_admin: row.is_school_admin,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Account store backed by `PostgreSQL`.
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    /// Create a new account store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert(&self, account: &NewAccount) -> Result<Account, RepositoryError> {
        let (profile_pic, content_type) = account
            .profile_pic
            .as_ref()
            .map(|pic| (pic.data.as_slice(), pic.content_type.as_str()))
            .unzip();

        let query = format!(
            r"
            INSERT INTO accounts.account
                (username, email, password_hash, first_name, last_name,
                 phone_number, address, profile_pic, profile_pic_content_type,
                 is_school_admin)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {ACCOUNT_COLUMNS}
            "
        );

        let row = sqlx::query_as::<_, AccountRow>(&query)
            .bind(&account.username)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(&account.first_name)
            .bind(&account.last_name)
            .bind(&account.phone_number)
            .bind(&account.address)
            .bind(profile_pic)
            .bind(content_type)
            .bind(account.is_school_admin)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict("username already exists".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        row.try_into()
    }

    /// Get an account by its username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, RepositoryError> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts.account WHERE username = $1");

        let row = sqlx::query_as::<_, AccountRow>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }
}

impl AccountStore for PgAccountStore {
    fn create<'a>(
        &'a self,
        account: &'a NewAccount,
    ) -> BoxFuture<'a, Result<Account, RepositoryError>> {
        self.insert(account).boxed()
    }

    fn find_by_username<'a>(
        &'a self,
        username: &'a Username,
    ) -> BoxFuture<'a, Result<Option<Account>, RepositoryError>> {
        self.get_by_username(username).boxed()
    }

    fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>> {
        async move {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok(())
        }
        .boxed()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row() -> AccountRow {
        let now = Utc::now();
        AccountRow {
            id: 1,
            username: "ada".to_owned(),
            email: "ada@x.com".to_owned(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            phone_number: "5551234567".to_owned(),
            address: "1 Analytical Way".to_owned(),
            profile_pic: None,
            profile_pic_content_type: None,
            is_school_admin: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn new_account(username: &str) -> NewAccount {
        NewAccount {
            username: Username::parse(username).unwrap(),
            email: Email::parse("ada@x.com").unwrap(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            phone_number: PhoneNumber::parse("5551234567").unwrap(),
            address: "1 Analytical Way".to_owned(),
            profile_pic: None,
            is_school_admin: true,
        }
    }

    #[test]
    fn test_valid_row_converts() {
        let account = Account::try_from(row()).unwrap();
        assert_eq!(account.id, AccountId::new(1));
        assert_eq!(account.username.as_str(), "ada");
        assert_eq!(account.email.as_str(), "ada@x.com");
        assert_eq!(account.phone_number.as_str(), "5551234567");
        assert!(account.profile_pic.is_none());
        assert!(account.is_school_admin);
    }

    #[test]
    fn test_row_with_picture_converts() {
        let row = AccountRow {
            profile_pic: Some(vec![1, 2, 3]),
            profile_pic_content_type: Some("image/png".to_owned()),
            ..row()
        };
        let pic = Account::try_from(row).unwrap().profile_pic.unwrap();
        assert_eq!(pic.content_type, "image/png");
        assert_eq!(pic.data, vec![1, 2, 3]);
    }

    #[test]
    fn test_picture_without_content_type_is_corruption() {
        let row = AccountRow {
            profile_pic: Some(vec![1, 2, 3]),
            ..row()
        };
        assert!(matches!(
            Account::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));

        let row = AccountRow {
            profile_pic_content_type: Some("image/png".to_owned()),
            ..self::row()
        };
        assert!(matches!(
            Account::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_invalid_stored_fields_are_corruption() {
        let bad_username = AccountRow {
            username: "not a username".to_owned(),
            ..row()
        };
        let bad_email = AccountRow {
            email: "nobody".to_owned(),
            ..row()
        };
        let bad_phone = AccountRow {
            phone_number: "555-1234".to_owned(),
            ..row()
        };

        for row in [bad_username, bad_email, bad_phone] {
            assert!(matches!(
                Account::try_from(row),
                Err(RepositoryError::DataCorruption(_))
            ));
        }
    }

    /// Needs a `PostgreSQL` server: `DATABASE_URL=... cargo test -- --ignored`.
    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_duplicate_username_is_conflict(pool: PgPool) {
        let store = PgAccountStore::new(pool);

        let created = store.insert(&new_account("ada")).await.unwrap();
        assert_eq!(created.username.as_str(), "ada");

        let err = store.insert(&new_account("ada")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let found = store
            .get_by_username(&Username::parse("ada").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);
    }
}
