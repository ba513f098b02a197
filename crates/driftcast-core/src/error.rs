//! Error taxonomy for the simulation and orchestration pipeline.
//!
//! Three failure classes, all surfaced to the caller — nothing is
//! logged-and-swallowed, and there is no retry (runs are deterministic per
//! seed, so a retry would reproduce the same failure).

use thiserror::Error;

/// Boxed error type used at the collaborator seam so analysis failures
/// propagate without being re-interpreted.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    /// A parameter was rejected before any simulation or analysis ran.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The EWS collaborator failed for one (realization, variable) pair.
    /// Aborts the whole orchestration — a partial aggregate would corrupt
    /// downstream trend statistics.
    #[error("EWS analysis failed for realization {realization}, variable {variable}")]
    Collaborator {
        realization: u32,
        variable: String,
        #[source]
        source: BoxError,
    },

    /// Duplicate composite index entries surfaced during assembly.
    #[error("index integrity violation: duplicate entry {0}")]
    IndexIntegrity(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for configuration rejections.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
