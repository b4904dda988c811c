//! Follow and unfollow between users.

use circle_database::{FollowRepository, UserRepository};
use tracing::info;

use crate::types::{FollowOutcome, UserError, UserResult};

#[derive(Clone)]
pub struct FollowService {
    users: UserRepository,
    follows: FollowRepository,
}

impl FollowService {
    pub fn new(users: UserRepository, follows: FollowRepository) -> Self {
        Self { users, follows }
    }

    /// Follow `target` if `actor` does not follow them yet, otherwise unfollow.
    /// Both ids are public ids.
    pub async fn toggle_follow(&self, actor: &str, target: &str) -> UserResult<FollowOutcome> {
        if actor == target {
            return Err(UserError::SelfAction);
        }

        let actor_user = self.users.find_by_public_id(actor).await?;
        let target_user = self.users.find_by_public_id(target).await?;
        let (Some(actor_user), Some(target_user)) = (actor_user, target_user) else {
            return Err(UserError::user_not_found());
        };

        let action = self.follows.toggle(actor_user.id, target_user.id).await?;
        info!(actor = %actor, target = %target, %action, "follow toggled");

        Ok(FollowOutcome { action })
    }
}
