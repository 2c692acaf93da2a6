//! Utility functions for loopback HTTP handling.

pub mod http;
