//! Profile, suggestion and follow endpoints

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    Extension, Json,
};
use circle_users::{ImageUpload, ProfileEdit, UserSummary};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use super::auth::ErrorResponse;
use crate::error::{GatewayError, GatewayResult};
use crate::middleware::ActorId;
use crate::state::GatewayState;

/// Largest accepted profile photo
pub const MAX_PROFILE_PHOTO_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    pub gender: Option<String>,
    pub followers: Vec<String>,
    pub following: Vec<String>,
    pub posts: Vec<String>,
    pub created_at: String,
}

impl From<UserSummary> for UserResponse {
    fn from(user: UserSummary) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            profile_picture: user.profile_picture,
            bio: user.bio,
            gender: user.gender.map(|gender| gender.to_string()),
            followers: user.followers,
            following: user.following,
            posts: user.posts,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileUpdatedResponse {
    pub success: bool,
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuggestedUsersResponse {
    pub success: bool,
    pub users: Vec<UserResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FollowResponse {
    pub success: bool,
    /// `followed` or `unfollowed`
    pub action: String,
    pub message: String,
}

/// Multipart form accepted by the profile edit endpoint
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditProfileForm {
    pub bio: Option<String>,
    /// `male` or `female`
    pub gender: Option<String>,
    #[schema(format = Binary)]
    pub profile_photo: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/user/{id}/profile",
    tag = "users",
    params(("id" = String, Path, description = "Public id of the user")),
    responses(
        (status = 200, description = "User profile", body = ProfileResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_profile(
    State(state): State<Arc<GatewayState>>,
    Path(id): Path<String>,
) -> GatewayResult<Json<ProfileResponse>> {
    let user = state.profile_service().get_profile(&id).await?;

    Ok(Json(ProfileResponse {
        success: true,
        user: user.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/user/profile/edit",
    tag = "users",
    request_body(content = EditProfileForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Profile updated", body = ProfileUpdatedResponse),
        (status = 400, description = "Invalid form data", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 413, description = "Form exceeds the upload limit", body = ErrorResponse),
        (status = 502, description = "Image store rejected the upload", body = ErrorResponse),
        (status = 503, description = "Image uploads are not configured", body = ErrorResponse)
    )
)]
pub async fn edit_profile(
    State(state): State<Arc<GatewayState>>,
    Extension(ActorId(actor)): Extension<ActorId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> GatewayResult<Json<ProfileUpdatedResponse>> {
    let edit = read_profile_form(multipart?).await?;

    let user = state.profile_service().edit_profile(&actor, edit).await?;

    Ok(Json(ProfileUpdatedResponse {
        success: true,
        message: "Profile updated successfully".to_string(),
        user: user.into(),
    }))
}

async fn read_profile_form(mut multipart: Multipart) -> GatewayResult<ProfileEdit> {
    let mut edit = ProfileEdit::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "bio" => {
                edit.bio = Some(field.text().await?);
            }
            "gender" => {
                edit.gender = Some(field.text().await?);
            }
            "profilePhoto" => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                if !content_type.starts_with("image/") {
                    return Err(GatewayError::InvalidRequest(format!(
                        "profilePhoto must be an image, got {content_type}"
                    )));
                }
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                if bytes.len() > MAX_PROFILE_PHOTO_BYTES {
                    return Err(GatewayError::PayloadTooLarge(format!(
                        "profilePhoto must be at most {MAX_PROFILE_PHOTO_BYTES} bytes"
                    )));
                }

                let mut upload = ImageUpload::new(bytes, content_type);
                if let Some(file_name) = file_name {
                    upload = upload.with_file_name(file_name);
                }
                edit.image = Some(upload);
            }
            other => debug!(field = other, "ignoring unknown profile form field"),
        }
    }

    Ok(edit)
}

#[utoipa::path(
    get,
    path = "/api/v1/user/suggested",
    tag = "users",
    responses(
        (status = 200, description = "Users the caller might follow", body = SuggestedUsersResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
pub async fn suggested_users(
    State(state): State<Arc<GatewayState>>,
    Extension(ActorId(actor)): Extension<ActorId>,
) -> GatewayResult<Json<SuggestedUsersResponse>> {
    let users = state.suggestion_service().suggested_users(&actor).await?;

    Ok(Json(SuggestedUsersResponse {
        success: true,
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/user/followorunfollow/{id}",
    tag = "users",
    params(("id" = String, Path, description = "Public id of the user to follow or unfollow")),
    responses(
        (status = 200, description = "Follow state flipped", body = FollowResponse),
        (status = 400, description = "Tried to follow yourself", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn follow_or_unfollow(
    State(state): State<Arc<GatewayState>>,
    Extension(ActorId(actor)): Extension<ActorId>,
    Path(target): Path<String>,
) -> GatewayResult<Json<FollowResponse>> {
    let outcome = state.follow_service().toggle_follow(&actor, &target).await?;

    Ok(Json(FollowResponse {
        success: true,
        action: outcome.action.to_string(),
        message: outcome.message().to_string(),
    }))
}
