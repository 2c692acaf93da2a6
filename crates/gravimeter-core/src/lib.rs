//! # Gravimeter Core
//!
//! Business logic for Gravimeter: find the locally running Antigravity
//! language server, query its private loopback status API, and classify
//! per-model quota into display-ready pools.
//!
//! ```text
//! gravimeter-core/src/
//! ├── modules/
//! │   ├── locator/      # process table → cmdline → ports → probe
//! │   │   ├── index.rs      # candidate enumeration (sysinfo)
//! │   │   ├── cmdline.rs    # csrf token / port hint / workspace id
//! │   │   ├── ports.rs      # lsof / ss / netstat, parsed per platform
//! │   │   └── probe.rs      # port verification RPC
//! │   ├── classifier/   # wire schema → ModelQuota → pool grouping
//! │   ├── watcher.rs    # poll loop owning all mutable state
//! │   └── config.rs     # polling / display configuration
//! ├── utils/http.rs     # loopback clients, transport scheme fallback
//! └── error.rs          # CoreError / CoreResult
//! ```
//!
//! Discovery and fetch failures never escape as panics: the locator returns
//! `None` for every failure mode and the watcher publishes the uniform
//! [`WatchState::Unavailable`](gravimeter_types::WatchState).

#![allow(
    clippy::float_cmp,
    reason = "Exhaustion is defined as the raw fraction being exactly zero"
)]
// Test-only lints: allow panic!, unwrap, etc. in test code
#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used))]

pub mod error;
pub mod modules;
pub mod utils;

// Re-export commonly used types
pub use error::{CoreError, CoreResult};
pub use modules::classifier::QuotaClassifier;
pub use modules::config::WatcherConfig;
pub use modules::locator::ProcessLocator;
pub use modules::watcher::QuotaWatcher;
