// ── Rendering ─────────────────────────────────────────────────────────────────
//
// Safe surface over the native rasterizer.  `Rasterize` is the seam the
// canvas renders through; `NativeRasterizer` is the production
// implementation backed by the loaded library.

mod ffi;

use std::{ffi::CString, sync::Arc};

use crate::{
    error::{LoadError, RenderError},
    loader,
    platform::Library,
};

// ── Bitmap ────────────────────────────────────────────────────────────────────

/// A decoded image: row-major, one `0xAARRGGBB` value per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Bitmap {
    /// `None` unless `pixels.len() == width * height` and neither side is zero.
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Option<Self> {
        let expected = (width as usize).checked_mul(height as usize)?;
        if expected == 0 || pixels.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// ARGB value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

// ── Rasterize ─────────────────────────────────────────────────────────────────

/// Turns a vector document into a bitmap.
pub trait Rasterize {
    fn render(&self, document: &str) -> Result<Bitmap, RenderError>;
}

/// Renders through the loaded native library.
pub struct NativeRasterizer {
    entry: ffi::EntryPoints,
    // Keeps `entry` valid; declared after it so it drops last.
    _library: Arc<Library>,
}

impl NativeRasterizer {
    /// Bind to the process-wide library, loading it on first use.
    pub fn new() -> Result<Self, LoadError> {
        Self::from_library(loader::ensure_loaded()?)
    }

    /// Bind to an already loaded library.
    pub fn from_library(library: Arc<Library>) -> Result<Self, LoadError> {
        let entry = ffi::EntryPoints::resolve(&library)?;
        Ok(Self {
            entry,
            _library: library,
        })
    }
}

impl Rasterize for NativeRasterizer {
    fn render(&self, document: &str) -> Result<Bitmap, RenderError> {
        let document =
            CString::new(document).map_err(|e| RenderError::InteriorNul(e.nul_position()))?;
        self.entry.render(&document)
    }
}

impl<T: Rasterize + ?Sized> Rasterize for &T {
    fn render(&self, document: &str) -> Result<Bitmap, RenderError> {
        (**self).render(document)
    }
}
