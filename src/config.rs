// ── Loader configuration ──────────────────────────────────────────────────────
//
// Optional JSON file named by `VECTORCANVAS_LOADER_CONFIG`.  Every field has
// a default, so partial files are accepted.
// No `unsafe`: pure safe Rust + serde_json.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::platform;

/// Environment variable naming a JSON `LoaderConfig` file.
pub const CONFIG_ENV: &str = "VECTORCANVAS_LOADER_CONFIG";

/// Library name without platform prefix or extension.
pub const DEFAULT_BASE_NAME: &str = "vectorcanvas";

/// Ancestor levels examined per search root, the root itself included.
pub const DEFAULT_MAX_ANCESTOR_DEPTH: usize = 6;

/// Settings for native-library resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Artifact base name; `vectorcanvas` resolves to `libvectorcanvas.so`,
    /// `libvectorcanvas.dylib` or `vectorcanvas.dll`.
    pub base_name: String,
    /// Directories whose ancestors are searched for a development-tree
    /// artifact.  Empty means "the directory of the running executable".
    pub search_roots: Vec<PathBuf>,
    pub max_ancestor_depth: usize,
    /// Where extracted artifacts are written.  `None` = system temp dir.
    pub temp_dir: Option<PathBuf>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_name: DEFAULT_BASE_NAME.to_owned(),
            search_roots: Vec::new(),
            max_ancestor_depth: DEFAULT_MAX_ANCESTOR_DEPTH,
            temp_dir: None,
        }
    }
}

impl LoaderConfig {
    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> io::Result<Self> {
        let data = fs::read(path)?;
        serde_json::from_slice(&data).map_err(io::Error::other)
    }

    /// Configuration named by `VECTORCANVAS_LOADER_CONFIG`, or the defaults.
    ///
    /// A missing or unparsable file is reported with a warning and the
    /// defaults are used; a broken config file must not stop the loader
    /// from trying the embedded library.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        let path = PathBuf::from(path);
        Self::load(&path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "ignoring loader config");
            Self::default()
        })
    }

    pub fn with_search_roots(mut self, roots: impl IntoIterator<Item = PathBuf>) -> Self {
        self.search_roots = roots.into_iter().collect();
        self
    }

    /// Search `roots` in addition to the current list.  An empty list stands
    /// for the executable's directory, so that default is kept in front.
    pub fn add_search_roots(&mut self, roots: impl IntoIterator<Item = PathBuf>) {
        let mut roots = roots.into_iter().peekable();
        if roots.peek().is_none() {
            return;
        }
        if self.search_roots.is_empty() {
            self.search_roots.extend(platform::executable_dir());
        }
        self.search_roots.extend(roots);
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Directory extracted artifacts are written to.
    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = LoaderConfig::default();
        assert_eq!(cfg.base_name, "vectorcanvas");
        assert!(cfg.search_roots.is_empty());
        assert_eq!(cfg.max_ancestor_depth, 6);
        assert_eq!(cfg.temp_dir(), std::env::temp_dir());
    }

    /// Files written by hand usually carry only the fields they change.
    #[test]
    fn partial_file_fills_defaults() {
        let cfg: LoaderConfig =
            serde_json::from_str(r#"{"search_roots":["/opt/app/bin"]}"#).expect("deserialize");
        assert_eq!(cfg.search_roots, vec![PathBuf::from("/opt/app/bin")]);
        assert_eq!(cfg.base_name, DEFAULT_BASE_NAME);
        assert_eq!(cfg.max_ancestor_depth, DEFAULT_MAX_ANCESTOR_DEPTH);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("loader.json");
        fs::write(&path, r#"{"base_name":"rast","max_ancestor_depth":2}"#).expect("write");
        let cfg = LoaderConfig::load(&path).expect("load");
        assert_eq!(cfg.base_name, "rast");
        assert_eq!(cfg.max_ancestor_depth, 2);
    }

    #[test]
    fn load_rejects_bad_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("loader.json");
        fs::write(&path, "{ not json").expect("write");
        let err = LoaderConfig::load(&path).expect_err("bad json");
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }

    #[test]
    fn added_roots_keep_executable_dir_first() {
        let mut cfg = LoaderConfig::default();
        cfg.add_search_roots([PathBuf::from("build/out")]);

        let mut expected: Vec<PathBuf> = platform::executable_dir().into_iter().collect();
        expected.push(PathBuf::from("build/out"));
        assert_eq!(cfg.search_roots, expected);
    }

    #[test]
    fn added_roots_follow_configured_roots() {
        let mut cfg = LoaderConfig::default().with_search_roots([PathBuf::from("a")]);
        cfg.add_search_roots([PathBuf::from("b")]);
        assert_eq!(cfg.search_roots, vec![PathBuf::from("a"), PathBuf::from("b")]);
    }

    #[test]
    fn adding_nothing_keeps_the_default() {
        let mut cfg = LoaderConfig::default();
        cfg.add_search_roots(Vec::new());
        assert!(cfg.search_roots.is_empty());
    }

    #[test]
    fn builders() {
        let cfg = LoaderConfig::default()
            .with_search_roots([PathBuf::from("a"), PathBuf::from("b")])
            .with_temp_dir("t");
        assert_eq!(cfg.search_roots.len(), 2);
        assert_eq!(cfg.temp_dir(), PathBuf::from("t"));
    }
}
