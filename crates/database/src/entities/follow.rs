//! Follow edge definitions

use serde::{Deserialize, Serialize};

/// Outcome of toggling a follow edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowAction {
    Followed,
    Unfollowed,
}

impl FollowAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FollowAction::Followed => "followed",
            FollowAction::Unfollowed => "unfollowed",
        }
    }
}

impl std::fmt::Display for FollowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
