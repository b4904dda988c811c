//! Profile reads and edits.

use std::sync::Arc;

use circle_database::{Gender, ProfileChanges, UserRepository};
use tracing::info;

use super::summarize;
use crate::blob::BlobStore;
use crate::types::{ProfileEdit, UserError, UserResult, UserSummary};
use crate::utils::validation::{non_blank, validate_bio};

#[derive(Clone)]
pub struct ProfileService {
    users: UserRepository,
    blob_store: Option<Arc<dyn BlobStore>>,
}

impl ProfileService {
    /// `blob_store` is `None` when image uploads are disabled.
    pub fn new(users: UserRepository, blob_store: Option<Arc<dyn BlobStore>>) -> Self {
        Self { users, blob_store }
    }

    pub async fn get_profile(&self, public_id: &str) -> UserResult<UserSummary> {
        let user = self
            .users
            .find_by_public_id(public_id)
            .await?
            .ok_or_else(UserError::user_not_found)?;

        summarize(&self.users, user).await
    }

    /// Apply an edit to the actor's own profile. Blank fields are left as they are.
    /// An image is uploaded before anything is written.
    pub async fn edit_profile(&self, actor: &str, edit: ProfileEdit) -> UserResult<UserSummary> {
        let bio = non_blank(edit.bio.as_deref()).map(str::to_string);
        if let Some(bio) = &bio {
            validate_bio(bio)?;
        }

        let gender = non_blank(edit.gender.as_deref())
            .map(|value| value.parse::<Gender>())
            .transpose()
            .map_err(|_| UserError::validation("Gender must be 'male' or 'female'"))?;

        let user = self
            .users
            .find_by_public_id(actor)
            .await?
            .ok_or_else(UserError::user_not_found)?;

        let profile_picture = match edit.image {
            Some(image) if !image.bytes.is_empty() => {
                let store = self
                    .blob_store
                    .as_ref()
                    .ok_or(UserError::BlobStoreUnavailable)?;
                Some(store.upload(image).await?)
            }
            _ => None,
        };

        let changes = ProfileChanges {
            bio,
            gender,
            profile_picture,
        };

        let updated = self.users.update_profile(user.id, &changes).await?;
        info!(user_id = %updated.public_id, fields = ?changed_fields(&changes), "profile updated");

        summarize(&self.users, updated).await
    }
}

fn changed_fields(changes: &ProfileChanges) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if changes.bio.is_some() {
        fields.push("bio");
    }
    if changes.gender.is_some() {
        fields.push("gender");
    }
    if changes.profile_picture.is_some() {
        fields.push("profile_picture");
    }
    fields
}
