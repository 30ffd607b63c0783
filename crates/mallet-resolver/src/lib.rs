//! Offline dependency collection for the Mallet build tool.
//!
//! Expands a dependency graph from an in-memory descriptor registry,
//! consulting the scope engine for every edge: selectors decide which edges
//! are traversed at all, the deriver computes effective scopes top-down,
//! nearest-wins picks winning versions, and the scope selector reconciles
//! the per-path scopes of each resolved artifact.
//!
//! Network and repository concerns live elsewhere; this crate never does I/O.

pub mod collector;
pub mod conflict;
pub mod graph;
pub mod version;
