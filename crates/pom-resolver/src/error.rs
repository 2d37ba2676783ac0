//! Errors raised while reading POM files and initializing projects.
//!
//! Everything here is fatal: a project that trips one of these is not
//! registered. Resolution-time problems (unresolved properties, missing
//! BOMs, missing versions) are warnings on the [`Log`](crate::Log) sink
//! instead, and the computation carries on with a partial answer.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PomError {
    #[error("Failed to parse pom.xml: {message}")]
    ParseError { message: String },

    #[error("Cannot read POM file {path}: {source}")]
    UnreadablePom {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Project in {path} has no groupId and no parent to inherit one from")]
    MissingGroupId { path: PathBuf },

    #[error("Project in {path} has no version and no parent to inherit one from")]
    MissingVersion { path: PathBuf },

    #[error("Non resolved project GAV '{gav}' in {path}")]
    UnresolvedGav { gav: String, path: PathBuf },

    #[error("Non resolved parent GAV '{gav}' in {path}")]
    UnresolvedParentGav { gav: String, path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PomError>;
