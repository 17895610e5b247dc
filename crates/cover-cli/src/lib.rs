//! CLI library components for the `cover` binary.

#![deny(unsafe_code)]

pub mod logging;
pub mod summary;
