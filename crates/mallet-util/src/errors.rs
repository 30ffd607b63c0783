use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all Mallet operations.
#[derive(Debug, Error, Diagnostic)]
pub enum MalletError {
    /// Invalid scope configuration (empty path universes, bad profile data).
    #[error("Scope configuration error: {message}")]
    #[diagnostic(help("Check the scope profile handed to ScopeManager::new"))]
    ScopeConfig { message: String },

    /// A SINGLETON build-scope query named a pair that does not exist.
    #[error("No such build scope: {id}")]
    NoSuchBuildScope { id: String },

    /// Invalid dependency-selector parameters (e.g. a zero level bound).
    #[error("Selector error: {message}")]
    Selector { message: String },

    /// Dependency collection failed (missing descriptors, bad request).
    #[error("Dependency resolution failed: {message}")]
    Resolution { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type MalletResult<T> = miette::Result<T>;
