//! REST API endpoints for the gateway

pub mod auth;
pub mod health;
pub mod users;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};

use crate::middleware::auth_middleware;
use crate::state::GatewayState;

/// Routes mounted under `/api/v1/user`
pub fn create_user_routes(state: Arc<GatewayState>) -> Router<Arc<GatewayState>> {
    let protected = Router::new()
        .route(
            "/profile/edit",
            post(users::edit_profile)
                .layer(DefaultBodyLimit::max(users::MAX_PROFILE_PHOTO_BYTES + 64 * 1024)),
        )
        .route("/suggested", get(users::suggested_users))
        .route("/followorunfollow/:id", post(users::follow_or_unfollow))
        .route_layer(axum_middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/:id/profile", get(users::get_profile))
        .merge(protected)
}
