// ── Development-tree strategy ─────────────────────────────────────────────────
//
// Looks for a loose artifact at `{ancestor}/lib/native/{os}-{arch}/{file}`
// above each search root.  The first existing candidate is loaded and the
// search stops there, whether or not that load succeeds.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{descriptor::LibraryDescriptor, DynamicLoader};

/// First existing `{ancestor}/{relative}` over `roots`, visiting at most
/// `max_depth` directories per root (the root itself counts as one).
pub fn find_candidate(roots: &[PathBuf], relative: &str, max_depth: usize) -> Option<PathBuf> {
    roots
        .iter()
        .flat_map(|root| root.ancestors().take(max_depth))
        .map(|dir| dir.join(relative))
        .find(|candidate| candidate.is_file())
}

/// Load the first development-tree artifact found above `roots`.
pub(crate) fn try_load_from_filesystem<L: DynamicLoader>(
    loader: &L,
    descriptor: &LibraryDescriptor,
    roots: &[PathBuf],
    max_depth: usize,
) -> Option<L::Module> {
    if roots.is_empty() {
        debug!("no search root for a development-tree native library");
        return None;
    }

    let Some(candidate) = find_candidate(roots, &descriptor.filesystem_relative_path, max_depth)
    else {
        debug!(
            relative = %descriptor.filesystem_relative_path,
            roots = ?roots,
            "no development-tree native library"
        );
        return None;
    };

    load_candidate(loader, &candidate)
}

fn load_candidate<L: DynamicLoader>(loader: &L, candidate: &Path) -> Option<L::Module> {
    match loader.load(candidate) {
        Ok(module) => {
            debug!(path = %candidate.display(), "loaded development-tree native library");
            Some(module)
        }
        Err(e) => {
            // TODO: product owner to confirm whether ancestors past a broken
            // candidate should be tried; until then the search ends here.
            debug!(
                path = %candidate.display(),
                error = %e,
                "development-tree native library failed to load"
            );
            None
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::{fs, sync::Mutex};

    use super::*;
    use crate::{
        error::{LoadError, Result},
        loader::PlatformTag,
    };

    const REL: &str = "lib/native/linux-x86_64/libvectorcanvas.so";

    #[derive(Default)]
    struct RecordingLoader {
        attempts: Mutex<Vec<PathBuf>>,
    }

    impl DynamicLoader for RecordingLoader {
        type Module = PathBuf;

        fn load(&self, path: &Path) -> Result<PathBuf> {
            self.attempts.lock().unwrap().push(path.to_path_buf());
            if fs::read(path)? == b"ok" {
                Ok(path.to_path_buf())
            } else {
                Err(LoadError::Open {
                    path: path.to_path_buf(),
                    reason: "wrong architecture".into(),
                })
            }
        }
    }

    fn plant(dir: &Path, contents: &[u8]) -> PathBuf {
        let file = dir.join(REL);
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, contents).unwrap();
        file
    }

    /// `base/d1/d2/…/d{levels}`; returns the deepest directory.
    fn nest(base: &Path, levels: usize) -> PathBuf {
        let mut dir = base.to_path_buf();
        for i in 1..=levels {
            dir.push(format!("d{i}"));
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn descriptor() -> LibraryDescriptor {
        LibraryDescriptor::describe(PlatformTag::from_raw("linux", "x86_64"), "vectorcanvas")
    }

    #[test]
    fn finds_candidate_in_root_itself() {
        let tmp = tempfile::tempdir().unwrap();
        let file = plant(tmp.path(), b"ok");
        assert_eq!(find_candidate(&[tmp.path().to_path_buf()], REL, 6), Some(file));
    }

    #[test]
    fn depth_is_inclusive_of_root() {
        let tmp = tempfile::tempdir().unwrap();
        plant(tmp.path(), b"ok");

        // tmp is 5 levels above root: the 6th directory visited.
        let root = nest(tmp.path(), 5);
        assert!(find_candidate(&[root.clone()], REL, 6).is_some());
        assert!(find_candidate(&[root], REL, 5).is_none());

        // 6 levels above root: out of reach.
        let deeper = nest(tmp.path(), 6);
        assert!(find_candidate(&[deeper], REL, 6).is_none());
    }

    #[test]
    fn directories_are_not_candidates() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join(REL)).unwrap();
        assert!(find_candidate(&[tmp.path().to_path_buf()], REL, 6).is_none());
    }

    #[test]
    fn roots_are_searched_in_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        plant(second.path(), b"ok");
        let expected = plant(first.path(), b"ok");

        let roots = [first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(find_candidate(&roots, REL, 6), Some(expected));
    }

    #[test]
    fn no_roots_means_no_attempt() {
        let loader = RecordingLoader::default();
        assert!(try_load_from_filesystem(&loader, &descriptor(), &[], 6).is_none());
        assert!(loader.attempts.lock().unwrap().is_empty());
    }

    #[test]
    fn loads_nearest_candidate() {
        let tmp = tempfile::tempdir().unwrap();
        let root = nest(tmp.path(), 3);
        let near = plant(root.parent().unwrap(), b"ok");
        plant(tmp.path(), b"ok");

        let loader = RecordingLoader::default();
        let loaded = try_load_from_filesystem(&loader, &descriptor(), &[root], 6);
        assert_eq!(loaded, Some(near));
    }

    #[test]
    fn stops_at_first_match_even_if_it_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let root = nest(tmp.path(), 4);
        // Level 2 holds a broken artifact, level 4 a good one.
        let broken = plant(&tmp.path().join("d1").join("d2"), b"garbage");
        plant(tmp.path(), b"ok");

        let loader = RecordingLoader::default();
        assert!(try_load_from_filesystem(&loader, &descriptor(), &[root], 6).is_none());
        assert_eq!(*loader.attempts.lock().unwrap(), vec![broken]);
    }
}
