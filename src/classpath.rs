//! Classpath assembly
//!
//! Walks the launch directory and the library subdirectory, classifies
//! every file found under a precedence-ordered rule set, and produces the
//! ordered list of jars the host runtime will expose to the game.
//!
//! Operators are expected to drop stable third-party dependencies in the
//! library directory and leave the launch directory for the game's own
//! shipped files plus ad hoc extras, so library-directory entries come
//! first in the produced order, then launch-directory survivors.
//!
//! Within each directory, entries keep the order the OS reports them in.
//! Directory iteration order is not guaranteed stable by every filesystem;
//! the original launcher behaved this way and no replacement ordering was
//! ever specified, so the nondeterminism is documented here rather than
//! silently papered over.

use crate::config::{
    ProviderConfig, DEV_ARTIFACT_MARKER, FRAMEWORK_DIR_SEGMENT, FRAMEWORK_PREFIX, GAME_ARCHIVE_NAME,
    PROVIDER_PREFIX,
};
use crate::error::{ProviderError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Archive suffix accepted as a classpath candidate
pub const ARCHIVE_SUFFIX: &str = ".jar";

/// Why a scanned file did or did not make the classpath
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The shipped game jar; tracked separately, always first
    GameArchive,
    /// Supplied by the hosting runtime already; skipped
    FrameworkArchive,
    /// This provider's own packaging; skipped (self-reference guard)
    ProviderArchive,
    /// Locally built artifact of the same product; must not shadow the
    /// shipped jar
    DevOnlyExclusion,
    /// A jar to append to the classpath
    OrdinaryLibrary,
    /// Not an archive; silently omitted
    Rejected,
}

/// One scanned file plus its classification; immutable once produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryCandidate {
    pub path: PathBuf,
    pub classification: Classification,
}

impl LibraryCandidate {
    fn new(path: PathBuf, classification: Classification) -> Self {
        Self {
            path,
            classification,
        }
    }
}

/// Result of one assembly pass over the launch and library directories
#[derive(Debug, Clone)]
pub struct ClasspathPlan {
    /// The resolved game archive; exactly one, always first
    pub game_archive: PathBuf,
    /// Every scanned file with its classification, in scan order
    pub candidates: Vec<LibraryCandidate>,
}

impl ClasspathPlan {
    /// Ordered classpath: game archive, then every ordinary library
    pub fn classpath(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.game_archive.clone()];
        paths.extend(self.libraries().cloned());
        paths
    }

    /// Ordinary libraries in scan order, game archive excluded
    pub fn libraries(&self) -> impl Iterator<Item = &PathBuf> {
        self.candidates
            .iter()
            .filter(|c| c.classification == Classification::OrdinaryLibrary)
            .map(|c| &c.path)
    }
}

/// Classify one launch-directory file; first matching rule wins
fn classify_launch_entry(path: &Path) -> Classification {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if file_name == GAME_ARCHIVE_NAME {
        Classification::GameArchive
    } else if file_name.contains(DEV_ARTIFACT_MARKER) {
        Classification::DevOnlyExclusion
    } else if path
        .to_string_lossy()
        .contains(&format!("{}/", FRAMEWORK_DIR_SEGMENT))
        || file_name.starts_with(FRAMEWORK_PREFIX)
    {
        Classification::FrameworkArchive
    } else if file_name.starts_with(PROVIDER_PREFIX) {
        Classification::ProviderArchive
    } else if file_name.ends_with(ARCHIVE_SUFFIX) {
        Classification::OrdinaryLibrary
    } else {
        Classification::Rejected
    }
}

/// List a directory's files in the order the OS reports them
fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    Ok(files)
}

/// Scan both directories and produce the classpath plan
///
/// The library directory is created empty when absent (idempotent
/// bootstrap). A missing game archive is a fatal configuration error;
/// there is nothing to launch without it.
pub fn assemble(config: &ProviderConfig) -> Result<ClasspathPlan> {
    let game_archive = config.game_archive_path();
    if !game_archive.exists() {
        return Err(ProviderError::GameArchiveMissing(game_archive));
    }

    if !config.lib_dir.exists() {
        info!(dir = %config.lib_dir.display(), "creating library directory");
        fs::create_dir_all(&config.lib_dir)?;
    }

    let mut candidates = Vec::new();

    // Pass 1: library directory, jars only
    for path in list_files(&config.lib_dir)? {
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        if name.as_deref().is_some_and(|n| n.ends_with(ARCHIVE_SUFFIX)) {
            debug!(dep = %path.display(), "adding library dependency");
            candidates.push(LibraryCandidate::new(path, Classification::OrdinaryLibrary));
        } else {
            debug!(dep = %path.display(), "skipping non-jar dependency");
            candidates.push(LibraryCandidate::new(path, Classification::Rejected));
        }
    }

    // Pass 2: launch directory, precedence rules
    for path in list_files(&config.launch_dir)? {
        let classification = classify_launch_entry(&path);
        match classification {
            Classification::GameArchive => {
                debug!(dep = %path.display(), "skipping game archive, tracked separately");
            }
            Classification::DevOnlyExclusion => {
                debug!(dep = %path.display(), "skipping development build artifact");
            }
            Classification::FrameworkArchive => {
                debug!(dep = %path.display(), "skipping framework dependency");
            }
            Classification::ProviderArchive => {
                debug!(dep = %path.display(), "skipping game provider packaging");
            }
            Classification::OrdinaryLibrary => {
                debug!(dep = %path.display(), "adding launch-directory dependency");
            }
            Classification::Rejected => {
                debug!(dep = %path.display(), "skipping non-jar file");
            }
        }
        candidates.push(LibraryCandidate::new(path, classification));
    }

    Ok(ClasspathPlan {
        game_archive,
        candidates,
    })
}
