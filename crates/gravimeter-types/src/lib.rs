//! # Gravimeter Types
//!
//! Core types and models for Gravimeter, the Antigravity quota indicator.
//!
//! This crate provides the foundational type system consumed by the core and
//! any presentation layer:
//!
//! - **`models`** - Domain models (ModelQuota, QuotaPool, QuotaSnapshot, ProcessInfo)
//! - **`format`** - Human-readable countdown and clock formatting
//!
//! ## Architecture Role
//!
//! `gravimeter-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!            gravimeter-types (this crate)
//!                     │
//!                     ▼
//!             gravimeter-core
//!                     │
//!                     ▼
//!             gravimeter-cli / host UI
//! ```
//!
//! All models are designed to be:
//! - **Serializable** via serde for presentation-layer consumption
//! - **Clone** for cheap sharing across async boundaries
//! - **PartialEq** for testing and comparison

pub mod format;
pub mod models;

// Re-export core model types
pub use format::{format_clock, format_countdown, ClockMode};
pub use models::{
    ModelFamily, ModelQuota, ProcessInfo, PromptCredits, QuotaPool, QuotaSnapshot, WatchState,
};
