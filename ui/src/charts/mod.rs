//! Chart models and their SVG rendering.

pub mod palette;
pub mod series;
pub mod svg;

pub use palette::ChartTheme;
pub use series::{build_model, is_drawable, AxisTitles, ChartKind, ChartModel, SeriesModel};
pub use svg::{render_svg, DEFAULT_HEIGHT, DEFAULT_WIDTH};
