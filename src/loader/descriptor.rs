// ── Library descriptor ────────────────────────────────────────────────────────
//
// Filename and candidate locations of the native artifact for one platform.
// Prefix and extension follow each OS's dynamic-loader conventions.

use super::platform_tag::{Os, PlatformTag};

/// Where to look for the native artifact of one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryDescriptor {
    pub tag: PlatformTag,
    /// e.g. `libvectorcanvas.so`.
    pub filename: String,
    /// Embedded resource key: `/native/{os}-{arch}/{filename}`.
    pub resource_path: String,
    /// Development-tree path, relative to a search ancestor:
    /// `lib/native/{os}-{arch}/{filename}`.
    pub filesystem_relative_path: String,
}

impl LibraryDescriptor {
    /// Describe the artifact named `base` (without prefix or extension) for `tag`.
    pub fn describe(tag: PlatformTag, base: &str) -> Self {
        let filename = match tag.os {
            Os::Windows => format!("{base}.dll"),
            Os::MacOs => format!("lib{base}.dylib"),
            Os::Linux => format!("lib{base}.so"),
        };
        Self {
            resource_path: format!("/native/{tag}/{filename}"),
            filesystem_relative_path: format!("lib/native/{tag}/{filename}"),
            filename,
            tag,
        }
    }

    /// `(stem, extension)` of the filename; the extension keeps its leading
    /// dot and is empty when the name has none.
    pub fn split_filename(&self) -> (&str, &str) {
        match self.filename.rfind('.') {
            Some(dot) => self.filename.split_at(dot),
            None => (self.filename.as_str(), ""),
        }
    }
}
