// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except:
//   • `platform`    – dynamic loading FFI (Win32 / dlopen)
//   • `render::ffi` – calls into the native rasterizer
// Each unsafe block in those modules MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

//! A vector canvas whose rasterization is done by a pre-built native library.
//!
//! The library for the running platform is found and loaded at most once per
//! process by [`ensure_loaded`]: first from the artifact embedded at build
//! time, then from a development tree (`lib/native/{os}-{arch}/`) above the
//! executable's directory.

pub mod canvas;
pub mod config;
pub mod error;
pub mod loader;
pub mod platform;
pub mod render;

pub use canvas::Canvas;
pub use config::LoaderConfig;
pub use error::{LoadError, RenderError};
pub use loader::{
    ensure_loaded, DynamicLoader, LoadCoordinator, PlatformTag, ResourceStore,
};
pub use render::{Bitmap, NativeRasterizer, Rasterize};
