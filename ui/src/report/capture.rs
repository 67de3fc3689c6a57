//! Chart capture for the report: re-render a chart widget as SVG in the print
//! theme and rasterize it.
//!
//! Text needs a font database. The web build has no system fonts to load,
//! so DejaVu Sans ships in the binary and backs the generic `sans-serif`
//! family on every platform.

use crate::charts::ChartTheme;
use crate::dashboard::widgets::ChartWidget;

use super::ExportError;

/// Logical chart size; captures are rasterized at `scale` times this.
pub const CAPTURE_WIDTH: u32 = 640;
pub const CAPTURE_HEIGHT: u32 = 320;

/// Opaque 8-bit RGB pixels, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

pub trait ChartCapture {
    fn capture(&mut self, svg: &str, width: u32, height: u32) -> Result<RasterImage, ExportError>;
}

const EMBEDDED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const EMBEDDED_FAMILY: &str = "DejaVu Sans";

/// Rasterizer backed by resvg.
pub struct ResvgCapture {
    options: usvg::Options<'static>,
    scale: u32,
}

impl ResvgCapture {
    /// Embedded font plus whatever the host has installed.
    pub fn new(scale: u32) -> Self {
        #[allow(unused_mut)]
        let mut capture = Self::embedded_only(scale);
        #[cfg(not(target_arch = "wasm32"))]
        capture.options.fontdb_mut().load_system_fonts();
        capture
    }

    /// Only the embedded font; what the web build gets.
    pub fn embedded_only(scale: u32) -> Self {
        let mut options = usvg::Options::default();
        let fonts = options.fontdb_mut();
        fonts.load_font_data(EMBEDDED_FONT.to_vec());
        fonts.set_sans_serif_family(EMBEDDED_FAMILY);
        Self {
            options,
            scale: scale.max(1),
        }
    }

    pub fn font_faces(&self) -> usize {
        self.options.fontdb.len()
    }
}

impl Default for ResvgCapture {
    fn default() -> Self {
        Self::new(2)
    }
}

impl ChartCapture for ResvgCapture {
    fn capture(&mut self, svg: &str, width: u32, height: u32) -> Result<RasterImage, ExportError> {
        let tree = usvg::Tree::from_str(svg, &self.options)
            .map_err(|err| ExportError::Capture(err.to_string()))?;

        let (pw, ph) = (width * self.scale, height * self.scale);
        let mut pixmap = tiny_skia::Pixmap::new(pw, ph)
            .ok_or_else(|| ExportError::Capture(format!("invalid canvas size {pw}x{ph}")))?;

        let size = tree.size();
        let transform = tiny_skia::Transform::from_scale(
            pw as f32 / size.width(),
            ph as f32 / size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        // Charts paint an opaque background, so premultiplied == straight RGB.
        let rgb = pixmap
            .data()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();

        Ok(RasterImage {
            width: pw,
            height: ph,
            rgb,
        })
    }
}

/// Applies a theme to a chart for the guard's lifetime and restores the
/// original on drop, whether or not the capture succeeded.
pub struct ThemeSwap<'a> {
    widget: &'a mut ChartWidget,
    original: ChartTheme,
}

impl<'a> ThemeSwap<'a> {
    pub fn apply(widget: &'a mut ChartWidget, theme: ChartTheme) -> Self {
        let original = widget.theme;
        widget.theme = theme;
        Self { widget, original }
    }

    pub fn widget(&self) -> &ChartWidget {
        self.widget
    }
}

impl Drop for ThemeSwap<'_> {
    fn drop(&mut self) {
        self.widget.theme = self.original;
    }
}

pub fn capture_chart(
    widget: &mut ChartWidget,
    capture: &mut dyn ChartCapture,
) -> Result<RasterImage, ExportError> {
    let swap = ThemeSwap::apply(widget, ChartTheme::Print);
    let svg = swap.widget().svg(CAPTURE_WIDTH, CAPTURE_HEIGHT);
    capture.capture(&svg, CAPTURE_WIDTH, CAPTURE_HEIGHT)
}
