//! Credential Service
//! Mission: Register accounts and exchange credentials for session tokens

use crate::auth::{
    jwt::JwtHandler,
    models::{normalize_email, LoginResponse, MessageResponse},
    user_store::UserStore,
};
use crate::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};

pub struct CredentialService {
    users: Arc<UserStore>,
    jwt: Arc<JwtHandler>,
}

impl CredentialService {
    pub fn new(users: Arc<UserStore>, jwt: Arc<JwtHandler>) -> Self {
        Self { users, jwt }
    }

    /// Store a new account. No token is issued here.
    pub fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<MessageResponse, AppError> {
        let name = name.trim();
        let email = normalize_email(email);

        if name.is_empty() {
            return Err(AppError::validation("name is required"));
        }
        if email.is_empty() {
            return Err(AppError::validation("email is required"));
        }
        if password.is_empty() {
            return Err(AppError::validation("pass is required"));
        }

        if self.users.get_user_by_email(&email)?.is_some() {
            warn!("Registration rejected, email in use: {}", email);
            return Err(AppError::DuplicateEmail);
        }

        // The unique index settles concurrent registrations for the same email.
        let user = self
            .users
            .create_user(name, &email, password)?
            .ok_or(AppError::DuplicateEmail)?;

        info!("Registered user {} ({})", user.email, user.id);
        Ok(MessageResponse::new("User registered successfully"))
    }

    /// Verify credentials and issue a session token
    pub fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AppError> {
        let email = normalize_email(email);

        if email.is_empty() {
            return Err(AppError::validation("email is required"));
        }
        if password.is_empty() {
            return Err(AppError::validation("pass is required"));
        }

        let Some(user) = self.users.verify_password(&email, password)? else {
            warn!("Failed login attempt: {}", email);
            return Err(AppError::InvalidCredentials);
        };

        let (token, expires_in) = self.jwt.generate_token(&user)?;

        info!("Login successful: {} ({})", user.email, user.id);

        Ok(LoginResponse {
            msg: "Login successful".to_string(),
            token,
            expires_in,
        })
    }
}
