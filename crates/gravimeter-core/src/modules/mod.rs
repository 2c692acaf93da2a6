//! Server discovery, quota classification, and poll orchestration modules.

pub mod classifier;
pub mod config;
pub mod locator;
pub mod watcher;
