//! Scope engine for the Mallet build tool.
//!
//! This crate models build phases as a matrix of named build scopes
//! (project paths × build paths), derives an effective scope per dependency
//! edge during top-down graph expansion, selects a single winning scope per
//! artifact after conflict resolution, and filters which edges a collector
//! traverses at all (by depth, optionality, or scope).
//!
//! Catalogues are assembled once per [`config::ScopeProfile`] and are
//! immutable afterwards, so they can be shared read-only across any number
//! of concurrent collection sessions.
//!
//! This crate is intentionally free of I/O; everything here is synchronous
//! and CPU-only.

pub mod config;
pub mod dependency;
pub mod derive;
pub mod matrix;
pub mod path;
pub mod query;
pub mod scope;
pub mod select;
pub mod selectors;
