//! Setting types used by the governance configuration.

pub mod branch_protection;

// Re-export all types for convenient access
pub use branch_protection::{
    ProtectionPolicy, PullRequestReviewPolicy, PushRestrictions, StatusCheck, StatusCheckPolicy,
};
