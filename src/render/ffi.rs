// ── Native rasterizer ABI ─────────────────────────────────────────────────────
//
//   int  vectorcanvas_render(const char *svg, VcBitmap *out);
//   void vectorcanvas_free_bitmap(VcBitmap *bitmap);
//
// `render` returns 0 and fills `out` with a `width * height` ARGB buffer owned
// by the native module, or a nonzero status when the document cannot be
// parsed.  Every filled bitmap is handed back to `free_bitmap` exactly once.
//
// Besides `platform`, this is the only module where `unsafe` is permitted.

#![allow(unsafe_code)]

use std::{
    ffi::{c_char, c_int, CStr},
    ptr,
};

use super::Bitmap;
use crate::{
    error::{LoadError, RenderError},
    platform::Library,
};

const RENDER_SYMBOL: &[u8] = b"vectorcanvas_render\0";
const FREE_SYMBOL: &[u8] = b"vectorcanvas_free_bitmap\0";

#[repr(C)]
struct VcBitmap {
    width: u32,
    height: u32,
    pixels: *mut u32,
}

type RenderFn = unsafe extern "C" fn(*const c_char, *mut VcBitmap) -> c_int;
type FreeFn = unsafe extern "C" fn(*mut VcBitmap);

/// Resolved entry points.  Valid only while the `Library` they came from is
/// alive; `NativeRasterizer` keeps the two together.
#[derive(Clone, Copy)]
pub(super) struct EntryPoints {
    render: RenderFn,
    free: FreeFn,
}

impl EntryPoints {
    pub(super) fn resolve(library: &Library) -> Result<Self, LoadError> {
        // SAFETY: both type aliases match the C prototypes above, which are
        // the native module's published ABI.
        let render = unsafe { library.symbol::<RenderFn>(RENDER_SYMBOL) }
            .ok_or(LoadError::MissingSymbol("vectorcanvas_render"))?;
        // SAFETY: as above.
        let free = unsafe { library.symbol::<FreeFn>(FREE_SYMBOL) }
            .ok_or(LoadError::MissingSymbol("vectorcanvas_free_bitmap"))?;
        Ok(Self { render, free })
    }

    pub(super) fn render(&self, document: &CStr) -> Result<Bitmap, RenderError> {
        let mut raw = VcBitmap {
            width: 0,
            height: 0,
            pixels: ptr::null_mut(),
        };
        // SAFETY: document is NUL-terminated and outlives the call; raw is a
        // valid, exclusively borrowed out-parameter.
        let status = unsafe { (self.render)(document.as_ptr(), &mut raw) };
        if status != 0 {
            return Err(RenderError::Rejected(status));
        }

        let bitmap = copy_pixels(&raw);
        // SAFETY: raw was filled by a successful render call and is released
        // exactly once; nothing reads it afterwards.
        unsafe { (self.free)(&mut raw) };
        bitmap
    }
}

fn copy_pixels(raw: &VcBitmap) -> Result<Bitmap, RenderError> {
    let malformed = RenderError::Malformed {
        width: raw.width,
        height: raw.height,
    };
    let len = match (raw.width as usize).checked_mul(raw.height as usize) {
        Some(len) if len > 0 && !raw.pixels.is_null() => len,
        _ => return Err(malformed),
    };
    // SAFETY: per the ABI, a successful render leaves `pixels` pointing at
    // `width * height` initialised u32 values owned by the native module
    // until `free_bitmap`.
    let pixels = unsafe { std::slice::from_raw_parts(raw.pixels, len) }.to_vec();
    Bitmap::new(raw.width, raw.height, pixels).ok_or(malformed)
}
