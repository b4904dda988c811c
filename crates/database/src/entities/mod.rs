//! Database entity definitions

pub mod follow;
pub mod user;

pub use follow::FollowAction;
pub use user::{Gender, NewUser, ProfileChanges, User, UserRelations};
