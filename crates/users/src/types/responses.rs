//! Response types for the user services.

use circle_database::{FollowAction, Gender, User, UserRelations};
use serde::Serialize;

/// Client-facing view of a user. Carries no credential material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub email: String,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    pub gender: Option<Gender>,
    pub followers: Vec<String>,
    pub following: Vec<String>,
    pub posts: Vec<String>,
    pub created_at: String,
}

impl UserSummary {
    pub fn new(user: User, relations: UserRelations) -> Self {
        Self {
            id: user.public_id,
            username: user.username,
            email: user.email,
            profile_picture: user.profile_picture,
            bio: user.bio,
            gender: user.gender,
            followers: relations.followers,
            following: relations.following,
            posts: relations.posts,
            created_at: user.created_at,
        }
    }
}

/// Successful login: the signed token plus the user it belongs to
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub expires_in_seconds: u64,
    pub user: UserSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowOutcome {
    pub action: FollowAction,
}

impl FollowOutcome {
    pub fn message(&self) -> &'static str {
        match self.action {
            FollowAction::Followed => "User followed successfully",
            FollowAction::Unfollowed => "User unfollowed successfully",
        }
    }
}
