//! Business logic for accounts, profiles and the follow graph.

pub mod auth_service;
pub mod follow_service;
pub mod profile_service;
pub mod suggestion_service;

pub use auth_service::AuthService;
pub use follow_service::FollowService;
pub use profile_service::ProfileService;
pub use suggestion_service::SuggestionService;

use circle_database::{User, UserRepository};

use crate::types::{UserResult, UserSummary};

/// Attach follower, following and post ids to a user row
pub(crate) async fn summarize(users: &UserRepository, user: User) -> UserResult<UserSummary> {
    let relations = users.relations(user.id).await?;
    Ok(UserSummary::new(user, relations))
}
