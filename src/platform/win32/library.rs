// ── Win32 dynamic loading ─────────────────────────────────────────────────────
//
// `Library` owns one `LoadLibraryW` handle.  `FreeLibrary` runs on `Drop`;
// the process-wide coordinator never drops its module, so the rasterizer
// stays mapped for the life of the process.

#![allow(unsafe_code)]

use std::{
    ffi::OsString,
    os::windows::ffi::{OsStrExt, OsStringExt},
    path::{Path, PathBuf},
};

use windows::{
    core::{PCSTR, PCWSTR},
    Win32::{
        Foundation::HMODULE,
        System::LibraryLoader::{FreeLibrary, GetModuleFileNameW, GetProcAddress, LoadLibraryW},
    },
};

use crate::error::{LoadError, Result};

/// Maximum path length in `WCHAR`s, including the null terminator.
/// `MAX_PATH` (260) is too short for modern Windows paths; use 32 768 which
/// is the documented maximum for `\\?\` extended paths.
const PATH_BUF_LEN: usize = 32_768;

/// RAII handle to a DLL mapped with `LoadLibraryW`.
#[derive(Debug)]
pub struct Library(HMODULE);

// SAFETY: an HMODULE is a process-wide value, not tied to the loading thread.
// GetProcAddress and FreeLibrary may be called from any thread.
unsafe impl Send for Library {}
unsafe impl Sync for Library {}

impl Library {
    /// Map the DLL at `path` (absolute) into the process.
    pub fn open(path: &Path) -> Result<Self> {
        let wide: Vec<u16> = path
            .as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();
        // SAFETY: wide is a valid null-terminated UTF-16 path that outlives
        // the call.  Running the DLL's initialisers is the point of the call.
        let module = unsafe { LoadLibraryW(PCWSTR(wide.as_ptr())) }.map_err(|e| {
            LoadError::Win32 {
                function: "LoadLibraryW",
                code: e.code().0 as u32,
            }
        })?;
        Ok(Self(module))
    }

    /// Look up an exported function.  `name` must be NUL-terminated.
    ///
    /// # Safety
    ///
    /// `T` must be a function-pointer type matching the export's real
    /// signature, and it must not be called after `self` is dropped.
    pub unsafe fn symbol<T: Copy>(&self, name: &[u8]) -> Option<T> {
        debug_assert_eq!(name.last(), Some(&0), "symbol name must be NUL-terminated");
        debug_assert_eq!(std::mem::size_of::<T>(), std::mem::size_of::<usize>());
        let proc = GetProcAddress(self.0, PCSTR(name.as_ptr()))?;
        Some(std::mem::transmute_copy::<_, T>(&proc))
    }
}

impl Drop for Library {
    fn drop(&mut self) {
        // SAFETY: self.0 was returned by a successful LoadLibraryW and has not
        // been freed since.  Symbols borrowed from it cannot outlive `self`.
        unsafe {
            let _ = FreeLibrary(self.0);
        }
    }
}

/// Directory containing the running executable.
pub fn executable_dir() -> Option<PathBuf> {
    let mut buf = vec![0u16; PATH_BUF_LEN];
    // SAFETY: buf is a writable UTF-16 buffer; the null HMODULE selects the
    // executable of the current process.
    let len = unsafe { GetModuleFileNameW(HMODULE::default(), &mut buf) } as usize;
    // 0 = failure, len == buf.len() = truncated.
    if len == 0 || len >= buf.len() {
        return None;
    }
    buf.truncate(len);
    let exe = PathBuf::from(OsString::from_wide(&buf));
    exe.parent().map(Path::to_path_buf)
}

/// No exit hook on Windows: a loaded DLL cannot be deleted while mapped, and
/// the coordinator keeps it mapped until the process ends.  Temporary copies
/// are left to the system's temp-directory cleanup.
pub fn register_exit_hook(_hook: extern "C" fn()) -> bool {
    false
}
