//! # Circle Gateway Crate
//!
//! HTTP surface for Circle: routes requests to the user services, turns
//! session cookies into an authenticated actor, and renders every failure as
//! a JSON error body.
//!
//! ## Architecture
//!
//! - **REST**: HTTP API endpoints with OpenAPI documentation
//! - **State**: Shared services and cookie settings
//! - **Middleware**: Authentication, CORS and request logging
//!
//! ## Usage
//!
//! ```rust,ignore
//! use circle_gateway::{create_router, GatewayState};
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod error;
pub mod middleware;
pub mod rest;
pub mod state;

pub use error::{GatewayError, GatewayResult};
pub use middleware::{auth_middleware, ActorId};
pub use state::{GatewayState, SessionCookieConfig};

use std::sync::Arc;

use axum::{middleware as axum_middleware, routing::get, Router};

/// Create the main application router with all routes
pub fn create_router(state: GatewayState) -> Router {
    let state = Arc::new(state);
    let cors = middleware::create_cors_middleware(&state.cors_allowed_origins);

    #[allow(unused_mut)]
    let mut router = Router::new()
        .route("/health", get(rest::health::health_check))
        .nest("/api/v1/user", rest::create_user_routes(state.clone()))
        .with_state(state);

    // Add Swagger UI if in debug mode
    #[cfg(debug_assertions)]
    {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        router = router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    router
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(middleware::create_trace_middleware())
}

#[derive(utoipa::OpenApi)]
#[openapi(
    paths(
        rest::health::health_check,
        rest::auth::register,
        rest::auth::login,
        rest::auth::logout,
        rest::users::get_profile,
        rest::users::edit_profile,
        rest::users::suggested_users,
        rest::users::follow_or_unfollow,
    ),
    components(
        schemas(
            rest::health::HealthResponse,
            rest::auth::RegisterBody,
            rest::auth::LoginBody,
            rest::auth::AccountResponse,
            rest::auth::MessageResponse,
            rest::auth::ErrorResponse,
            rest::users::UserResponse,
            rest::users::ProfileResponse,
            rest::users::ProfileUpdatedResponse,
            rest::users::SuggestedUsersResponse,
            rest::users::FollowResponse,
            rest::users::EditProfileForm,
        )
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "auth", description = "Registration and sessions"),
        (name = "users", description = "Profiles, suggestions and follows"),
    )
)]
pub struct ApiDoc;
