//! Core domain models for Gravimeter.
//!
//! This module contains all shared data structures that cross the boundary
//! between the core and the presentation layer.

mod family;
mod process;
mod quota;
mod snapshot;

// Re-export all models
pub use family::ModelFamily;
pub use process::ProcessInfo;
pub use quota::{ModelQuota, QuotaPool};
pub use snapshot::{PromptCredits, QuotaSnapshot, WatchState};
