//! Application State
//! Mission: The explicitly constructed service graph handed to every handler

use crate::auth::{CredentialService, JwtHandler, UserStore};
use crate::config::Config;
use crate::db::Database;
use crate::notes::NoteStore;
use anyhow::Result;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<CredentialService>,
    pub jwt_handler: Arc<JwtHandler>,
    pub notes: Arc<NoteStore>,
}

impl AppState {
    /// Wire stores and services on top of an open database
    pub fn new(
        db: Database,
        jwt_secret: &str,
        token_ttl_hours: i64,
        bcrypt_cost: u32,
    ) -> Result<Self> {
        let users = Arc::new(UserStore::new(db.clone(), bcrypt_cost)?);
        let jwt_handler = Arc::new(JwtHandler::with_expiration(jwt_secret, token_ttl_hours));
        let credentials = Arc::new(CredentialService::new(users, jwt_handler.clone()));
        let notes = Arc::new(NoteStore::new(db));

        Ok(Self {
            credentials,
            jwt_handler,
            notes,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let db = Database::open(&config.database_url)?;
        Self::new(
            db,
            &config.jwt_secret,
            config.token_ttl_hours,
            config.bcrypt_cost,
        )
    }
}
