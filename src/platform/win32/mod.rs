// ── Win32 platform implementation ─────────────────────────────────────────────
//
// One of the two places in the codebase where `unsafe` code is permitted (the
// other is `render::ffi`).  Every `unsafe` block MUST carry a `// SAFETY:`
// comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.

#![allow(unsafe_code)]

mod library;

pub use library::{executable_dir, register_exit_hook, Library};
