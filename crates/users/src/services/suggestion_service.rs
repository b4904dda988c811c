//! Suggested users for the "who to follow" panel.

use circle_database::UserRepository;

use super::summarize;
use crate::types::{UserError, UserResult, UserSummary};

#[derive(Clone)]
pub struct SuggestionService {
    users: UserRepository,
    limit: u32,
}

impl SuggestionService {
    pub fn new(users: UserRepository, limit: u32) -> Self {
        Self { users, limit }
    }

    /// Up to `limit` other users, oldest accounts first
    pub async fn suggested_users(&self, actor: &str) -> UserResult<Vec<UserSummary>> {
        let caller = self
            .users
            .find_by_public_id(actor)
            .await?
            .ok_or_else(UserError::user_not_found)?;

        let mut summaries = Vec::new();
        for user in self.users.list_excluding(caller.id, self.limit).await? {
            summaries.push(summarize(&self.users, user).await?);
        }
        Ok(summaries)
    }
}
