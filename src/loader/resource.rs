// ── Embedded-resource strategy ────────────────────────────────────────────────
//
// Copies the embedded artifact for this platform into a fresh temporary file
// and hands that file to the dynamic loader.  Every failure degrades to
// `None` ("try the next strategy"); nothing here is an error to the caller.

use std::{
    collections::HashMap,
    io::{self, Read, Write},
    path::Path,
};

use tempfile::TempPath;
use tracing::debug;

use super::{cleanup, descriptor::LibraryDescriptor, DynamicLoader};

// Generated by build.rs from `resources/native/{os}-{arch}/*`.
mod generated {
    include!(concat!(env!("OUT_DIR"), "/embedded_natives.rs"));
}

/// Source of embedded native artifacts, keyed by resource path
/// (`/native/{os}-{arch}/{filename}`).
pub trait ResourceStore: Send + Sync {
    /// Open the resource at `path`, or `None` if it is not bundled.
    fn open(&self, path: &str) -> Option<Box<dyn Read + '_>>;
}

/// Artifacts compiled into this crate by the build script.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedResources {
    entries: &'static [(&'static str, &'static [u8])],
}

impl EmbeddedResources {
    pub fn new() -> Self {
        Self {
            entries: generated::EMBEDDED,
        }
    }

    /// Resource paths of every bundled artifact.
    pub fn paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(path, _)| *path)
    }
}

impl Default for EmbeddedResources {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceStore for EmbeddedResources {
    fn open(&self, path: &str) -> Option<Box<dyn Read + '_>> {
        self.entries
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(_, bytes)| Box::new(*bytes) as Box<dyn Read>)
    }
}

/// In-memory store, for hosts that ship artifacts some other way.
impl ResourceStore for HashMap<String, Vec<u8>> {
    fn open(&self, path: &str) -> Option<Box<dyn Read + '_>> {
        self.get(path)
            .map(|bytes| Box::new(bytes.as_slice()) as Box<dyn Read + '_>)
    }
}

/// Extract the descriptor's embedded artifact into `temp_dir` and load it.
pub(crate) fn try_load_from_resource<L: DynamicLoader>(
    store: &dyn ResourceStore,
    loader: &L,
    descriptor: &LibraryDescriptor,
    temp_dir: &Path,
) -> Option<L::Module> {
    let Some(mut stream) = store.open(&descriptor.resource_path) else {
        debug!(resource = %descriptor.resource_path, "no embedded native library");
        return None;
    };

    let artifact = match extract(&mut stream, descriptor, temp_dir) {
        Ok(artifact) => artifact,
        Err(e) => {
            debug!(
                resource = %descriptor.resource_path,
                error = %e,
                "extracting native library failed"
            );
            return None;
        }
    };

    match loader.load(&artifact) {
        Ok(module) => {
            debug!(path = %artifact.display(), "loaded extracted native library");
            cleanup::remove_at_exit(artifact);
            Some(module)
        }
        Err(e) => {
            // `artifact` drops here, deleting the unusable copy.
            debug!(
                path = %artifact.display(),
                error = %e,
                "extracted native library failed to load"
            );
            None
        }
    }
}

/// Copy `stream` into a new temporary file named `{stem}XXXXXX{ext}`.
///
/// The extension is kept because some loaders decide how to map a file from
/// its suffix.  The returned path is absolute and the file handle is closed.
fn extract(
    stream: &mut dyn Read,
    descriptor: &LibraryDescriptor,
    temp_dir: &Path,
) -> io::Result<TempPath> {
    let (stem, ext) = descriptor.split_filename();
    let temp_dir = std::path::absolute(temp_dir)?;
    let mut file = tempfile::Builder::new()
        .prefix(stem)
        .suffix(ext)
        .tempfile_in(temp_dir)?;
    io::copy(stream, file.as_file_mut())?;
    file.as_file_mut().flush()?;
    Ok(file.into_temp_path())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
