//! Shared application state for the gateway

use circle_config::AuthConfig;
use circle_users::{AuthService, FollowService, ProfileService, SuggestionService, UserServices};
use sqlx::SqlitePool;

/// How the session token travels to and from browsers
#[derive(Debug, Clone)]
pub struct SessionCookieConfig {
    pub name: String,
    pub secure: bool,
    pub max_age_seconds: i64,
}

impl SessionCookieConfig {
    pub fn from_auth_config(config: &AuthConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            secure: config.cookie_secure,
            max_age_seconds: i64::try_from(config.session_ttl_seconds).unwrap_or(i64::MAX),
        }
    }
}

/// Shared application state containing all services
#[derive(Clone)]
pub struct GatewayState {
    /// Database connection pool
    pub pool: SqlitePool,
    pub services: UserServices,
    pub session_cookie: SessionCookieConfig,
    pub cors_allowed_origins: Vec<String>,
}

impl GatewayState {
    pub fn new(
        pool: SqlitePool,
        services: UserServices,
        session_cookie: SessionCookieConfig,
        cors_allowed_origins: Vec<String>,
    ) -> Self {
        Self {
            pool,
            services,
            session_cookie,
            cors_allowed_origins,
        }
    }

    pub fn auth_service(&self) -> &AuthService {
        &self.services.auth
    }

    pub fn profile_service(&self) -> &ProfileService {
        &self.services.profiles
    }

    pub fn suggestion_service(&self) -> &SuggestionService {
        &self.services.suggestions
    }

    pub fn follow_service(&self) -> &FollowService {
        &self.services.follows
    }
}
