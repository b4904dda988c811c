//! Internal utilities for credential handling and input checks.

pub mod jwt;
pub mod password;
pub mod validation;

pub use jwt::{Claims, SessionIssuer};
pub use password::{hash_password, verify_password};
