//! Repository implementations for database operations

pub mod follow_repository;
pub mod user_repository;

pub use follow_repository::FollowRepository;
pub use user_repository::UserRepository;
