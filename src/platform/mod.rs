// ── Platform abstraction layer ────────────────────────────────────────────────
//
// The rest of the codebase reaches the OS dynamic loader only through this
// module.  No `unsafe` lives here; FFI is confined to the per-OS sub-modules
// and never leaks outward except through `Library::symbol`.

#[cfg(windows)]
pub mod win32;
#[cfg(windows)]
pub use win32::{executable_dir, register_exit_hook, Library};

#[cfg(unix)]
pub mod unix;
#[cfg(unix)]
pub use unix::{executable_dir, register_exit_hook, Library};
