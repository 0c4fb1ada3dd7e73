//! Shared helpers for staging and bundling.

pub mod fs;
