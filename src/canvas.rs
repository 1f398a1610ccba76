// ── Canvas ────────────────────────────────────────────────────────────────────
//
// Display-surface state: the source document and the bitmap last rendered
// from it.  A host toolkit paints `image()` and sizes the widget from
// `preferred_size()`; `revision()` changes whenever it must do both again.
// No `unsafe`; rendering goes through `Rasterize`.

use std::{fs, io, path::Path};

use tracing::debug;

use crate::render::{Bitmap, Rasterize};

/// A document and its cached rendering.
pub struct Canvas<R: Rasterize> {
    rasterizer: R,
    document: Option<String>,
    image: Option<Bitmap>,
    revision: u64,
}

impl<R: Rasterize> Canvas<R> {
    /// Create a canvas and render `document` immediately.
    pub fn new(rasterizer: R, document: impl Into<String>) -> Self {
        let mut canvas = Self {
            rasterizer,
            document: Some(document.into()),
            image: None,
            revision: 0,
        };
        canvas.update();
        canvas
    }

    /// Create a canvas from a document on disk.
    pub fn from_path(rasterizer: R, path: &Path) -> io::Result<Self> {
        let document = fs::read_to_string(path)?;
        Ok(Self::new(rasterizer, document))
    }

    /// Replace the document and re-render.
    pub fn set_document(&mut self, document: impl Into<String>) {
        self.document = Some(document.into());
        self.update();
    }

    /// Drop the document and the image.
    pub fn clear(&mut self) {
        self.document = None;
        self.update();
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// The last successful rendering of the current document.
    pub fn image(&self) -> Option<&Bitmap> {
        self.image.as_ref()
    }

    /// Bitmap dimensions, or `None` when there is nothing to show.
    pub fn preferred_size(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|img| (img.width(), img.height()))
    }

    /// Bumped on every document change; hosts compare it to decide when to
    /// relayout and repaint.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn update(&mut self) {
        self.revision += 1;
        self.image = match self.document.as_deref() {
            None => None,
            Some(doc) if doc.trim().is_empty() => None,
            Some(doc) => match self.rasterizer.render(doc) {
                Ok(bitmap) => Some(bitmap),
                Err(e) => {
                    debug!(error = %e, "render failed; canvas left empty");
                    None
                }
            },
        };
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::RenderError;

    const SQUARE: &str = r#"<svg width="4" height="3"><rect width="4" height="3"/></svg>"#;

    /// Produces a `len x 3` bitmap for any document containing `<svg`,
    /// where `len` is the document length capped at 8.
    #[derive(Default)]
    struct FakeRasterizer {
        calls: Cell<usize>,
    }

    impl Rasterize for FakeRasterizer {
        fn render(&self, document: &str) -> Result<Bitmap, RenderError> {
            self.calls.set(self.calls.get() + 1);
            if !document.contains("<svg") {
                return Err(RenderError::Rejected(1));
            }
            let width = document.len().min(8) as u32;
            Ok(Bitmap::new(width, 3, vec![0; width as usize * 3]).unwrap())
        }
    }

    #[test]
    fn renders_on_creation() {
        let canvas = Canvas::new(FakeRasterizer::default(), SQUARE);
        assert_eq!(canvas.document(), Some(SQUARE));
        assert_eq!(canvas.preferred_size(), Some((8, 3)));
        assert_eq!(canvas.rasterizer.calls.get(), 1);
    }

    #[test]
    fn blank_documents_are_not_rendered() {
        let mut canvas = Canvas::new(FakeRasterizer::default(), SQUARE);
        for blank in ["", "   ", "\n\t"] {
            canvas.set_document(blank);
            assert_eq!(canvas.document(), Some(blank));
            assert!(canvas.image().is_none());
        }
        assert_eq!(canvas.rasterizer.calls.get(), 1);
    }

    #[test]
    fn render_failure_keeps_document_and_drops_image() {
        let mut canvas = Canvas::new(FakeRasterizer::default(), SQUARE);
        canvas.set_document("<rect>");
        assert_eq!(canvas.document(), Some("<rect>"));
        assert!(canvas.image().is_none());
        assert_eq!(canvas.preferred_size(), None);
    }

    #[test]
    fn clear_drops_everything() {
        let mut canvas = Canvas::new(FakeRasterizer::default(), SQUARE);
        canvas.clear();
        assert_eq!(canvas.document(), None);
        assert!(canvas.image().is_none());
    }

    #[test]
    fn every_change_bumps_revision() {
        let mut canvas = Canvas::new(FakeRasterizer::default(), SQUARE);
        let first = canvas.revision();
        canvas.set_document("<svg/>");
        canvas.set_document("");
        canvas.clear();
        assert_eq!(canvas.revision(), first + 3);
    }

    #[test]
    fn size_follows_document() {
        let mut canvas = Canvas::new(FakeRasterizer::default(), "<svg/>");
        assert_eq!(canvas.preferred_size(), Some((6, 3)));
        canvas.set_document(SQUARE);
        assert_eq!(canvas.preferred_size(), Some((8, 3)));
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("square.svg");
        fs::write(&path, SQUARE).unwrap();

        let canvas = Canvas::from_path(FakeRasterizer::default(), &path).unwrap();
        assert_eq!(canvas.document(), Some(SQUARE));
        assert!(canvas.image().is_some());
    }

    #[test]
    fn from_path_missing_file_errors() {
        let err = Canvas::from_path(FakeRasterizer::default(), Path::new("does_not_exist.svg"))
            .err()
            .expect("missing file");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
