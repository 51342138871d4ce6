use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Unified error type for the boot pipeline
///
/// Every variant is fatal to the boot in progress; none are transient and
/// none are retried. They stem from misconfiguration or a missing or
/// incompatible install, not flaky I/O.
#[derive(Debug, Error)]
pub enum ProviderError {
    // Configuration errors
    #[error("Game archive does not exist: {0}")]
    GameArchiveMissing(PathBuf),

    #[error("Outer loader scope is absent; a resolver without one could be shadowed by local archives")]
    OuterScopeMissing,

    #[error("Could not detect game version: {0}")]
    VersionNotFound(String),

    // Discovery errors
    #[error("Cannot locate game: no candidate archive contains any of {candidates:?}")]
    EntrypointNotFound { candidates: Vec<String> },

    #[error("Failed to open archive {path}: {source}")]
    ArchiveCorrupt {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Archive is closed: {0}")]
    ArchiveClosed(PathBuf),

    #[error("Entry not found in archive {archive}: {entry}")]
    EntryNotFound { archive: PathBuf, entry: String },

    // Entrypoint patch errors
    #[error("Could not load class {0} for patching")]
    ClassNotFound(String),

    #[error("No static initializer <clinit>()V in entry class {class}; game build is unexpected or incompatible")]
    MissingInitializer { class: String },

    // Launch errors
    #[error("{game} has crashed!")]
    GameCrashed {
        game: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to start {game}: {reason}")]
    LaunchFailed { game: String, reason: String },

    // Settings errors
    #[error("Invalid settings file {path}: {source}")]
    InvalidSettings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
