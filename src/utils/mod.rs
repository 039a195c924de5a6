//! Shared helpers.

pub mod compression;
