//! Entrypoint discovery across candidate jars
//!
//! Scans an ordered sequence of archives for the first one containing any of
//! a set of fully qualified class names. First match wins; scanning stops at
//! the first archive that matches, not the best.

use crate::archive::ArchiveHandle;
use std::path::PathBuf;
use tracing::debug;

/// The resolved location of the game's startup class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrypointDescriptor {
    /// Archive the entry class lives in
    pub archive: PathBuf,
    /// Fully qualified name of the class that matched
    pub class_name: String,
}

/// Derive a jar entry name from a fully qualified class name
///
/// `com.worldwalkergames.legacy.LegacyDesktop` becomes
/// `com/worldwalkergames/legacy/LegacyDesktop.class`.
pub fn class_entry_name(class_name: &str) -> String {
    let mut entry = class_name.replace('.', "/");
    entry.push_str(".class");
    entry
}

/// Find the first archive containing one of the candidate classes
///
/// Archives are tested in the order given; within an archive, candidate
/// names are tested in the order given. Returns `None` when nothing
/// matches, which callers must treat as a hard failure.
pub fn locate(
    archives: &[ArchiveHandle],
    candidate_names: &[String],
) -> Option<EntrypointDescriptor> {
    for handle in archives {
        for class_name in candidate_names {
            let entry = class_entry_name(class_name);
            if handle.contains(&entry) {
                debug!(
                    archive = %handle.path().display(),
                    class = %class_name,
                    "located entrypoint"
                );
                return Some(EntrypointDescriptor {
                    archive: handle.path().to_path_buf(),
                    class_name: class_name.clone(),
                });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_jar(dir: &Path, name: &str, entries: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        let mut writer = ZipWriter::new(file);
        for entry_name in entries {
            writer
                .start_file(*entry_name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"\xca\xfe\xba\xbe").unwrap();
        }
        writer.finish().unwrap();
        path
    }

    #[test]
    fn test_class_entry_name() {
        assert_eq!(
            class_entry_name("com.worldwalkergames.legacy.LegacyDesktop"),
            "com/worldwalkergames/legacy/LegacyDesktop.class"
        );
        assert_eq!(class_entry_name("Main"), "Main.class");
    }

    #[test]
    fn test_first_match_wins_across_archives() {
        let dir = tempfile::tempdir().unwrap();
        let without = write_jar(dir.path(), "lib.jar", &["other/Thing.class"]);
        let with_a = write_jar(dir.path(), "a.jar", &["pkg/Main.class"]);
        let with_b = write_jar(dir.path(), "b.jar", &["pkg/Main.class"]);

        let archives = vec![
            ArchiveHandle::open(&without).unwrap(),
            ArchiveHandle::open(&with_a).unwrap(),
            ArchiveHandle::open(&with_b).unwrap(),
        ];

        let found = locate(&archives, &["pkg.Main".to_string()]).unwrap();
        assert_eq!(found.archive, with_a);
        assert_eq!(found.class_name, "pkg.Main");
    }

    #[test]
    fn test_candidate_order_within_archive() {
        let dir = tempfile::tempdir().unwrap();
        let jar = write_jar(dir.path(), "game.jar", &["pkg/A.class", "pkg/B.class"]);
        let archives = vec![ArchiveHandle::open(&jar).unwrap()];

        let found = locate(&archives, &["pkg.B".to_string(), "pkg.A".to_string()]).unwrap();
        assert_eq!(found.class_name, "pkg.B");
    }

    #[test]
    fn test_no_match() {
        let dir = tempfile::tempdir().unwrap();
        let jar = write_jar(dir.path(), "game.jar", &["pkg/Main.class"]);
        let archives = vec![ArchiveHandle::open(&jar).unwrap()];

        assert!(locate(&archives, &["missing.Class".to_string()]).is_none());
    }
}
