//! Registration, login and logout endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use circle_users::{LoginRequest, RegisterRequest};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::users::UserResponse;
use crate::error::GatewayResult;
use crate::state::{GatewayState, SessionCookieConfig};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterBody {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl From<RegisterBody> for RegisterRequest {
    fn from(body: RegisterBody) -> Self {
        Self {
            username: body.username,
            email: body.email,
            password: body.password,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

impl From<LoginBody> for LoginRequest {
    fn from(body: LoginBody) -> Self {
        Self {
            email: body.email,
            password: body.password,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountResponse {
    pub success: bool,
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}

fn session_cookie(config: &SessionCookieConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.name.clone(), token))
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/")
        .secure(config.secure)
        .max_age(time::Duration::seconds(config.max_age_seconds))
        .build()
}

#[utoipa::path(
    post,
    path = "/api/v1/user/register",
    tag = "auth",
    request_body = RegisterBody,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Missing or malformed fields", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<Arc<GatewayState>>,
    payload: Result<Json<RegisterBody>, JsonRejection>,
) -> GatewayResult<(StatusCode, Json<AccountResponse>)> {
    let Json(body) = payload?;

    let user = state.auth_service().register(body.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(AccountResponse {
            success: true,
            message: "User created successfully".to_string(),
            user: user.into(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/user/login",
    tag = "auth",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = AccountResponse),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<GatewayState>>,
    jar: CookieJar,
    payload: Result<Json<LoginBody>, JsonRejection>,
) -> GatewayResult<(CookieJar, Json<AccountResponse>)> {
    let Json(body) = payload?;

    let outcome = state.auth_service().login(body.into()).await?;
    let jar = jar.add(session_cookie(&state.session_cookie, outcome.token));

    Ok((
        jar,
        Json(AccountResponse {
            success: true,
            message: format!("Welcome back {}", outcome.user.username),
            user: outcome.user.into(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/user/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse)
    )
)]
pub async fn logout(
    State(state): State<Arc<GatewayState>>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    // Added rather than removed so the expiry is sent even when the request
    // carried no cookie.
    let mut removal = Cookie::build((state.session_cookie.name.clone(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build();
    removal.make_removal();

    (
        jar.add(removal),
        Json(MessageResponse {
            success: true,
            message: "Logged out successfully".to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_locked_down() {
        let config = SessionCookieConfig {
            name: "token".into(),
            secure: false,
            max_age_seconds: 86_400,
        };

        let rendered = session_cookie(&config, "abc".into()).to_string();

        assert!(rendered.starts_with("token=abc"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("SameSite=Strict"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("Max-Age=86400"));
        assert!(!rendered.contains("Secure"));
    }
}
