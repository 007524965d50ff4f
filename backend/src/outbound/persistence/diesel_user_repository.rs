//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Uniqueness of username and email is enforced by the table's unique
//! constraints; the adapter never pre-checks, so concurrent registrations
//! race on the database and exactly one insert wins.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserInsertError, UserPersistenceError, UserRepository};
use crate::domain::{
    DisplayName, EmailAddress, NewUser, PasswordHash, ProfileImageUrl, StoredUser, User,
    UserDraft, UserId, Username,
};

use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;
use super::user_persistence_error_mapping::{map_diesel_error, map_insert_error, map_pool_error};

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_stored(row: UserRow) -> Result<StoredUser, UserPersistenceError> {
    let invalid = |field: &str, err: &dyn std::fmt::Display| {
        UserPersistenceError::query(format!("stored user has invalid {field}: {err}"))
    };
    let username = Username::new(row.username).map_err(|err| invalid("username", &err))?;
    let email = EmailAddress::new(row.email).map_err(|err| invalid("email", &err))?;
    let profile_image = row
        .profile_image_url
        .as_deref()
        .map(ProfileImageUrl::parse)
        .transpose()
        .map_err(|err| invalid("profile image url", &err))?;

    Ok(StoredUser {
        user: User::new(UserDraft {
            id: UserId::from_uuid(row.id),
            username,
            email,
            display_name: DisplayName::new(&row.display_name),
            profile_image,
            created_at: row.created_at,
        }),
        password_hash: PasswordHash::from_phc(row.password_hash),
    })
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    row_to_stored(row).map(|stored| stored.user)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserInsertError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id.as_uuid(),
            username: user.username.as_ref(),
            email: user.email.as_ref(),
            display_name: user.display_name.as_ref(),
            password_hash: user.password_hash.as_str(),
        };

        let inserted = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_insert_error)?;
        Ok(row_to_user(inserted)?)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_user)
            .transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_stored)
            .transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_stored)
            .transpose()
    }

    async fn update_profile_image(
        &self,
        id: &UserId,
        url: &ProfileImageUrl,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(users::table.find(*id.as_uuid()))
            .set((
                users::profile_image_url.eq(Some(url.as_ref())),
                users::updated_at.eq(Utc::now()),
            ))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_user)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    #[fixture]
    fn row() -> UserRow {
        let created_at = Utc
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .single()
            .expect("valid timestamp");
        UserRow {
            id: Uuid::new_v4(),
            username: "ada".to_owned(),
            email: "ada@example.com".to_owned(),
            display_name: "Ada Lovelace".to_owned(),
            profile_image_url: Some("https://cdn.example.com/profile/a/me.png".to_owned()),
            password_hash: "$argon2id$v=19$stub".to_owned(),
            created_at,
            updated_at: created_at,
        }
    }

    #[rstest]
    fn row_converts_to_stored_user(row: UserRow) {
        let id = row.id;
        let stored = row_to_stored(row).expect("valid row");

        assert_eq!(stored.user.id().as_uuid(), &id);
        assert_eq!(stored.user.username().as_ref(), "ada");
        assert_eq!(
            stored.user.profile_image().map(|url| url.as_url().as_str()),
            Some("https://cdn.example.com/profile/a/me.png")
        );
        assert_eq!(stored.password_hash.as_str(), "$argon2id$v=19$stub");
    }

    #[rstest]
    fn corrupt_rows_map_to_query_errors(mut row: UserRow) {
        row.email = "not-an-email".to_owned();
        let err = row_to_stored(row).expect_err("invalid email rejected");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }
}
