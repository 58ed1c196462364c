//! User Storage
//! Mission: Persist user accounts with bcrypt-hashed passwords

use crate::auth::models::User;
use crate::db::{is_unique_violation, Database};
use anyhow::{Context, Result};
use bcrypt::{hash, verify};
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use tracing::info;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at";

/// User storage backed by the shared database
pub struct UserStore {
    db: Database,
    bcrypt_cost: u32,
    // Verified against for unknown emails so both login failures cost one bcrypt round
    dummy_hash: String,
}

impl UserStore {
    pub fn new(db: Database, bcrypt_cost: u32) -> Result<Self> {
        let dummy_hash =
            hash(Uuid::new_v4().to_string(), bcrypt_cost).context("Failed to hash password")?;
        Ok(Self {
            db,
            bcrypt_cost,
            dummy_hash,
        })
    }

    /// Get user by (already normalized) email
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.db.with_conn(|conn| {
            let sql = format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS);
            let user = conn
                .query_row(&sql, params![email], user_from_row)
                .optional()
                .context("Failed to look up user by email")?;
            Ok(user)
        })
    }

    /// Hash `password` with the configured cost
    pub fn hash_password(&self, password: &str) -> Result<String> {
        hash(password, self.bcrypt_cost).context("Failed to hash password")
    }

    /// Create a new user. Returns `None` when the email is already taken.
    pub fn create_user(&self, name: &str, email: &str, password: &str) -> Result<Option<User>> {
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: self.hash_password(password)?,
            created_at: Utc::now().to_rfc3339(),
        };

        let inserted = self.db.with_conn(|conn| {
            let result = conn.execute(
                "INSERT INTO users (id, name, email, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    user.id.to_string(),
                    user.name,
                    user.email,
                    user.password_hash,
                    user.created_at,
                ],
            );
            match result {
                Ok(_) => Ok(true),
                Err(e) if is_unique_violation(&e) => Ok(false),
                Err(e) => Err(e).context("Failed to insert user"),
            }
        })?;

        if !inserted {
            return Ok(None);
        }

        info!("Created user: {} ({})", user.email, user.id);
        Ok(Some(user))
    }

    /// Verify email and password. Unknown email and wrong password both yield `None`.
    pub fn verify_password(&self, email: &str, password: &str) -> Result<Option<User>> {
        match self.get_user_by_email(email)? {
            Some(user) => {
                let valid =
                    verify(password, &user.password_hash).context("Failed to verify password")?;
                Ok(valid.then_some(user))
            }
            None => {
                let _ = verify(password, &self.dummy_hash);
                Ok(None)
            }
        }
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let id: String = row.get(0)?;
    let id = Uuid::parse_str(&id).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(User {
        id,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_store() -> (UserStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let db = Database::open(temp_file.path().to_str().unwrap()).unwrap();
        (UserStore::new(db, 4).unwrap(), temp_file)
    }

    #[test]
    fn test_create_and_retrieve_user() {
        let (store, _temp) = create_test_store();

        let user = store
            .create_user("TestUser", "testuser@example.com", "testpass")
            .unwrap()
            .unwrap();
        assert_eq!(user.name, "TestUser");
        assert_ne!(user.password_hash, "testpass");

        let by_email = store
            .get_user_by_email("testuser@example.com")
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_email.name, "TestUser");
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let (store, _temp) = create_test_store();

        assert!(store
            .create_user("A", "dup@example.com", "pass")
            .unwrap()
            .is_some());
        assert!(store
            .create_user("B", "dup@example.com", "other")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_password_verification() {
        let (store, _temp) = create_test_store();
        store
            .create_user("TestUser", "testuser@example.com", "testpass")
            .unwrap();

        // Correct password
        assert!(store
            .verify_password("testuser@example.com", "testpass")
            .unwrap()
            .is_some());

        // Incorrect password
        assert!(store
            .verify_password("testuser@example.com", "wrongpass")
            .unwrap()
            .is_none());

        // Non-existent user
        assert!(store
            .verify_password("nobody@example.com", "testpass")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_unknown_user_lookup() {
        let (store, _temp) = create_test_store();
        assert!(store.get_user_by_email("ghost@example.com").unwrap().is_none());
    }
}
