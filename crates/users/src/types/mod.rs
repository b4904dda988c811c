//! Shared types for the user services.

pub mod errors;
pub mod requests;
pub mod responses;

pub use errors::UserError;
pub use requests::{ImageUpload, LoginRequest, ProfileEdit, RegisterRequest};
pub use responses::{FollowOutcome, LoginOutcome, UserSummary};

pub type UserResult<T> = Result<T, UserError>;
