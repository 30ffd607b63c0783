use std::fmt;

use serde::{Deserialize, Serialize};

/// A project phase axis (e.g. `main`, `test`).
///
/// Ordering is advisory and exists only to make matrix enumeration
/// deterministic. `reverse_order` supports build paths that enumerate
/// project paths in the opposite direction (runtime classpath ordering).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectPath {
    pub id: String,
    pub order: u32,
    pub reverse_order: u32,
}

impl ProjectPath {
    pub fn new(id: impl Into<String>, order: u32, reverse_order: u32) -> Self {
        Self {
            id: id.into(),
            order,
            reverse_order,
        }
    }
}

impl fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// A build step axis (e.g. `compile`, `runtime`).
///
/// `reverse` selects which [`ProjectPath`] ordering the matrix generator
/// uses when enumerating this build path's row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildPath {
    pub id: String,
    pub order: u32,
    pub reverse: bool,
}

impl BuildPath {
    pub fn new(id: impl Into<String>, order: u32, reverse: bool) -> Self {
        Self {
            id: id.into(),
            order,
            reverse,
        }
    }
}

impl fmt::Display for BuildPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
