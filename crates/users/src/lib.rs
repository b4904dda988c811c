//! # Circle Users Crate
//!
//! Accounts, sessions, profiles and the follow graph.
//!
//! - **Services**: registration and login, profile reads and edits,
//!   suggestions, follow toggling
//! - **Blob**: where profile images go
//! - **Types**: request/response shapes and the [`UserError`] taxonomy
//! - **Utils**: password hashing, session tokens, input validation

pub mod blob;
pub mod services;
pub mod types;
pub mod utils;

use std::sync::Arc;

use circle_database::{FollowRepository, SqlitePool, UserRepository};

pub use blob::{BlobStore, BlobStoreError, CloudinaryBlobStore, MemoryBlobStore};
pub use circle_database::{FollowAction, Gender};
pub use services::{AuthService, FollowService, ProfileService, SuggestionService};
pub use types::{
    FollowOutcome, ImageUpload, LoginOutcome, LoginRequest, ProfileEdit, RegisterRequest,
    UserError, UserResult, UserSummary,
};
pub use utils::{Claims, SessionIssuer};

/// Every user-facing service wired to one pool
#[derive(Clone)]
pub struct UserServices {
    pub auth: AuthService,
    pub profiles: ProfileService,
    pub suggestions: SuggestionService,
    pub follows: FollowService,
}

impl UserServices {
    pub fn new(
        pool: SqlitePool,
        sessions: SessionIssuer,
        blob_store: Option<Arc<dyn BlobStore>>,
        suggestion_limit: u32,
    ) -> Self {
        let users = UserRepository::new(pool.clone());
        let follows = FollowRepository::new(pool);

        Self {
            auth: AuthService::new(users.clone(), sessions),
            profiles: ProfileService::new(users.clone(), blob_store),
            suggestions: SuggestionService::new(users.clone(), suggestion_limit),
            follows: FollowService::new(users, follows),
        }
    }
}
