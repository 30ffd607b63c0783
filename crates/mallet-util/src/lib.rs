//! Shared utilities for the Mallet build tool.
//!
//! This crate provides the cross-cutting error type and result alias used by
//! all other Mallet crates.

pub mod errors;
