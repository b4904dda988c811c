//! Registration and login.

use circle_database::{NewUser, UserRepository};
use tracing::{info, warn};

use super::summarize;
use crate::types::{LoginOutcome, LoginRequest, RegisterRequest, UserError, UserResult, UserSummary};
use crate::utils::password::{hash_password_blocking, verify_password_blocking};
use crate::utils::validation::{normalize_email, require_field, require_secret, validate_email};
use crate::utils::SessionIssuer;

/// Service for registering accounts and issuing sessions
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    sessions: SessionIssuer,
}

impl AuthService {
    pub fn new(users: UserRepository, sessions: SessionIssuer) -> Self {
        Self { users, sessions }
    }

    pub fn sessions(&self) -> &SessionIssuer {
        &self.sessions
    }

    /// Create an account. Does not log the user in.
    pub async fn register(&self, request: RegisterRequest) -> UserResult<UserSummary> {
        let username = require_field(&request.username)?.to_string();
        let email = normalize_email(require_field(&request.email)?);
        let password = require_secret(&request.password)?;
        validate_email(&email)?;

        let password_hash = hash_password_blocking(password.to_string()).await?;

        // The unique index on email decides races between concurrent sign-ups.
        let user = self
            .users
            .create(&NewUser {
                username,
                email,
                password_hash,
            })
            .await?;

        info!(user_id = %user.public_id, "user registered");
        summarize(&self.users, user).await
    }

    /// Check credentials and issue a session token
    pub async fn login(&self, request: LoginRequest) -> UserResult<LoginOutcome> {
        let email = normalize_email(require_field(&request.email)?);
        let password = require_secret(&request.password)?.to_string();

        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!("login attempt for unknown email");
            return Err(UserError::Authentication);
        };

        if !verify_password_blocking(password, user.password_hash.clone()).await? {
            warn!(user_id = %user.public_id, "login attempt with wrong password");
            return Err(UserError::Authentication);
        }

        let token = self.sessions.issue(&user.public_id)?;
        info!(user_id = %user.public_id, "user logged in");

        Ok(LoginOutcome {
            token,
            expires_in_seconds: self.sessions.token_duration().as_secs(),
            user: summarize(&self.users, user).await?,
        })
    }

    /// Resolve a session token to the user's public id
    pub fn authenticate(&self, token: &str) -> UserResult<String> {
        self.sessions.validate(token).map(|claims| claims.sub)
    }
}
