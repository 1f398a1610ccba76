// ── Unix platform implementation ──────────────────────────────────────────────
//
// `dlopen`/`dlsym` through `libloading`, plus the `atexit` hook used for
// temporary-artifact cleanup.  `unsafe` is permitted here per crate policy;
// every block carries a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::path::{Path, PathBuf};

use crate::error::{LoadError, Result};

/// RAII handle to a shared object mapped with `dlopen`.
#[derive(Debug)]
pub struct Library(libloading::Library);

impl Library {
    /// Map the shared object at `path` (absolute) into the process.
    pub fn open(path: &Path) -> Result<Self> {
        // SAFETY: loading runs the object's initialisers.  Only artifacts
        // named by the loader descriptor are opened, and those are the
        // crate's own rasterizer builds.
        let lib = unsafe { libloading::Library::new(path) }.map_err(|e| LoadError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self(lib))
    }

    /// Look up an exported function.  `name` must be NUL-terminated.
    ///
    /// # Safety
    ///
    /// `T` must be a function-pointer type matching the export's real
    /// signature, and it must not be called after `self` is dropped.
    pub unsafe fn symbol<T: Copy>(&self, name: &[u8]) -> Option<T> {
        debug_assert_eq!(name.last(), Some(&0), "symbol name must be NUL-terminated");
        self.0.get::<T>(name).ok().map(|sym| *sym)
    }
}

/// Directory containing the running executable.
pub fn executable_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(Path::to_path_buf)
}

/// Run `hook` when the process exits normally.  Returns `false` if the C
/// runtime refused the registration.
pub fn register_exit_hook(hook: extern "C" fn()) -> bool {
    // SAFETY: `hook` is a plain `extern "C" fn()` with no captured state; the
    // C runtime calls it at most once, on the exiting thread.
    unsafe { libc::atexit(hook) == 0 }
}
