//! Jar index with scoped open/close semantics
//!
//! Discovery only ever needs two questions answered about a jar: "does it
//! contain this entry" and, during the patch phase, "give me that entry's
//! bytes". Entry names are indexed once at open so membership tests never
//! touch the OS again, and every handle opened for a discovery pass is
//! closed when the pass ends, on every exit path.

use crate::error::{ProviderError, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// An open handle to one jar file
///
/// Holds the OS file handle between `open` and `close`. The entry-name
/// index survives `close`, so membership answers stay available after the
/// handle is released; reading entry bytes does not.
pub struct ArchiveHandle {
    path: PathBuf,
    entries: HashSet<String>,
    zip: Option<ZipArchive<File>>,
}

impl ArchiveHandle {
    /// Open a jar and index its entry names
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let zip = ZipArchive::new(file).map_err(|source| ProviderError::ArchiveCorrupt {
            path: path.clone(),
            source,
        })?;

        let entries = zip.file_names().map(str::to_owned).collect();

        Ok(Self {
            path,
            entries,
            zip: Some(zip),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Test entry membership without extracting anything
    pub fn contains(&self, entry_name: &str) -> bool {
        self.entries.contains(entry_name)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Read one entry's bytes; fails if the handle has been closed
    pub fn read_entry(&mut self, entry_name: &str) -> Result<Vec<u8>> {
        let zip = self
            .zip
            .as_mut()
            .ok_or_else(|| ProviderError::ArchiveClosed(self.path.clone()))?;

        let mut entry = match zip.by_name(entry_name) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(ProviderError::EntryNotFound {
                    archive: self.path.clone(),
                    entry: entry_name.to_string(),
                })
            }
            Err(source) => {
                return Err(ProviderError::ArchiveCorrupt {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Release the OS file handle; idempotent
    pub fn close(&mut self) {
        self.zip = None;
    }

    pub fn is_open(&self) -> bool {
        self.zip.is_some()
    }
}

/// Scoped batch of handles for one discovery pass
///
/// Dropping the set closes every handle, so a pass that bails out midway
/// through classification still ends with zero open archives.
#[derive(Default)]
pub struct ArchiveSet {
    handles: Vec<ArchiveHandle>,
}

impl ArchiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a jar and add it to the batch
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut ArchiveHandle> {
        let handle = ArchiveHandle::open(path)?;
        self.handles.push(handle);
        Ok(self.handles.last_mut().expect("just pushed"))
    }

    pub fn handles(&self) -> &[ArchiveHandle] {
        &self.handles
    }

    pub fn handles_mut(&mut self) -> &mut [ArchiveHandle] {
        &mut self.handles
    }

    /// Number of handles still holding an OS file handle
    pub fn open_count(&self) -> usize {
        self.handles.iter().filter(|h| h.is_open()).count()
    }

    /// Close every handle in the batch; idempotent
    pub fn close_all(&mut self) {
        for handle in &mut self.handles {
            handle.close();
        }
    }
}

impl Drop for ArchiveSet {
    fn drop(&mut self) {
        self.close_all();
    }
}
