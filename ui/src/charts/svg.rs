//! SVG rendering for [`ChartModel`]s.
//!
//! The same markup is inlined into the dashboard and rasterized for the PDF
//! report, so on-screen charts and report captures cannot drift apart.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt::Write;

use super::palette::{ChartTheme, ThemeColors};
use super::series::{ChartKind, ChartModel};

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 320;

const FONT: &str = "Inter, Helvetica, Arial, sans-serif";
const PAD: f64 = 16.0;
const LEGEND_W: f64 = 150.0;
const AXIS_LABEL_W: f64 = 96.0;
const AXIS_LABEL_H: f64 = 28.0;
const AXIS_TITLE: f64 = 18.0;

struct Frame {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

pub fn render_svg(model: &ChartModel, theme: ChartTheme, width: u32, height: u32) -> String {
    let colors = theme.colors();
    let (w, h) = (width as f64, height as f64);
    let mut out = String::new();
    let _ = write!(
        out,
        "<svg xmlns='http://www.w3.org/2000/svg' width='{width}' height='{height}' viewBox='0 0 {width} {height}'>"
    );
    let _ = write!(
        out,
        "<rect width='{width}' height='{height}' fill='{}'/>",
        colors.background
    );

    let legend = model.show_legend();
    let mut frame = Frame {
        x: PAD,
        y: PAD,
        w: w - PAD * 2.0 - if legend { LEGEND_W } else { 0.0 },
        h: h - PAD * 2.0,
    };
    if !matches!(model.kind, ChartKind::Pie | ChartKind::Doughnut) {
        axis_titles(&mut out, model, &colors, &mut frame);
    }

    match model.kind {
        ChartKind::Bar | ChartKind::GroupedBar => vertical_bars(&mut out, model, &colors, &frame),
        ChartKind::HorizontalBar { .. } => {
            horizontal_bars(&mut out, model, &colors, &frame, false)
        }
        ChartKind::Tornado => horizontal_bars(&mut out, model, &colors, &frame, true),
        ChartKind::Line => lines(&mut out, model, &colors, &frame),
        ChartKind::Pie => slices(&mut out, model, &colors, &frame, 0.0),
        ChartKind::Doughnut => slices(&mut out, model, &colors, &frame, 0.55),
    }

    if legend {
        render_legend(&mut out, model, &colors, w - LEGEND_W - PAD / 2.0, PAD);
    }

    out.push_str("</svg>");
    out
}

/// Draw the axis captions and shrink `frame` to the space left for the plot.
fn axis_titles(out: &mut String, model: &ChartModel, colors: &ThemeColors, frame: &mut Frame) {
    if let Some(title) = model.axes.y {
        let (x, y) = (frame.x + 8.0, frame.y + frame.h / 2.0);
        let _ = write!(
            out,
            "<text x='{x:.1}' y='{y:.1}' transform='rotate(-90 {x:.1} {y:.1})' text-anchor='middle' fill='{}' font-family='{FONT}' font-size='11'>{}</text>",
            colors.muted,
            escape_xml(title)
        );
        frame.x += AXIS_TITLE;
        frame.w -= AXIS_TITLE;
    }
    if let Some(title) = model.axes.x {
        frame.h -= AXIS_TITLE;
        text(
            out,
            frame.x + frame.w / 2.0,
            frame.y + frame.h + AXIS_TITLE - 2.0,
            "middle",
            colors.muted,
            11.0,
            title,
        );
    }
}

fn value_range(model: &ChartModel) -> (f64, f64) {
    let mut lo = 0.0_f64;
    let mut hi = 0.0_f64;
    for value in model.series.iter().flat_map(|s| s.values.iter()) {
        lo = lo.min(*value);
        hi = hi.max(*value);
    }
    if (hi - lo).abs() < f64::EPSILON {
        hi = lo + 1.0;
    }
    (lo, hi)
}

fn vertical_bars(out: &mut String, model: &ChartModel, colors: &ThemeColors, f: &Frame) {
    let plot = Frame {
        x: f.x + 48.0,
        y: f.y,
        w: f.w - 48.0,
        h: f.h - AXIS_LABEL_H,
    };
    let (lo, hi) = value_range(model);
    let scale = |v: f64| plot.y + plot.h - (v - lo) / (hi - lo) * plot.h;
    value_grid_horizontal(out, colors, &plot, lo, hi);

    let n = model.categories.len().max(1);
    let k = model.series.len().max(1);
    let group = plot.w / n as f64;
    let bar = group * 0.7 / k as f64;
    let zero = scale(0.0);

    for (ci, category) in model.categories.iter().enumerate() {
        let gx = plot.x + group * ci as f64 + group * 0.15;
        for (si, series) in model.series.iter().enumerate() {
            let Some(value) = series.values.get(ci) else {
                continue;
            };
            let top = scale(value.max(0.0));
            let bottom = scale(value.min(0.0));
            let _ = write!(
                out,
                "<rect x='{:.1}' y='{:.1}' width='{:.1}' height='{:.1}' fill='{}' rx='2'/>",
                gx + bar * si as f64,
                top,
                bar.max(1.0),
                (bottom - top).max(0.5),
                series.colors.get(ci).copied().unwrap_or(colors.muted)
            );
        }
        text(
            out,
            gx + group * 0.35,
            plot.y + plot.h + 16.0,
            "middle",
            colors.muted,
            11.0,
            &truncate(category, 12),
        );
    }
    axis_line(out, colors, plot.x, zero, plot.x + plot.w, zero);
}

fn horizontal_bars(
    out: &mut String,
    model: &ChartModel,
    colors: &ThemeColors,
    f: &Frame,
    overlay: bool,
) {
    let plot = Frame {
        x: f.x + AXIS_LABEL_W,
        y: f.y,
        w: f.w - AXIS_LABEL_W,
        h: f.h - 18.0,
    };
    let (lo, hi) = value_range(model);
    let scale = |v: f64| plot.x + (v - lo) / (hi - lo) * plot.w;
    value_grid_vertical(out, colors, &plot, lo, hi);

    let n = model.categories.len().max(1);
    let lanes = if overlay { 1 } else { model.series.len().max(1) };
    let row = plot.h / n as f64;
    let bar = row * 0.7 / lanes as f64;
    let zero = scale(0.0);

    for (ci, category) in model.categories.iter().enumerate() {
        let ry = plot.y + row * ci as f64 + row * 0.15;
        for (si, series) in model.series.iter().enumerate() {
            let Some(value) = series.values.get(ci) else {
                continue;
            };
            let lane = if overlay { 0 } else { si };
            let left = scale(value.min(0.0));
            let right = scale(value.max(0.0));
            let _ = write!(
                out,
                "<rect x='{:.1}' y='{:.1}' width='{:.1}' height='{:.1}' fill='{}' rx='2'/>",
                left,
                ry + bar * lane as f64,
                (right - left).max(0.5),
                bar.max(1.0),
                series.colors.get(ci).copied().unwrap_or(colors.muted)
            );
        }
        text(
            out,
            plot.x - 6.0,
            ry + row * 0.35 + 4.0,
            "end",
            colors.muted,
            11.0,
            &truncate(category, 14),
        );
    }
    axis_line(out, colors, zero, plot.y, zero, plot.y + plot.h);
}

fn lines(out: &mut String, model: &ChartModel, colors: &ThemeColors, f: &Frame) {
    let plot = Frame {
        x: f.x + 48.0,
        y: f.y,
        w: f.w - 48.0,
        h: f.h - AXIS_LABEL_H,
    };
    let (lo, hi) = value_range(model);
    let scale_y = |v: f64| plot.y + plot.h - (v - lo) / (hi - lo) * plot.h;
    let n = model.categories.len();
    let step = if n > 1 {
        plot.w / (n - 1) as f64
    } else {
        0.0
    };
    let scale_x = |i: usize| {
        if n > 1 {
            plot.x + step * i as f64
        } else {
            plot.x + plot.w / 2.0
        }
    };
    value_grid_horizontal(out, colors, &plot, lo, hi);

    for series in &model.series {
        let color = series.colors.first().copied().unwrap_or(colors.text);
        let points = series
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{:.1},{:.1}", scale_x(i), scale_y(*v)))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = write!(
            out,
            "<polyline points='{points}' fill='none' stroke='{color}' stroke-width='2'/>"
        );
        for (i, v) in series.values.iter().enumerate() {
            let _ = write!(
                out,
                "<circle cx='{:.1}' cy='{:.1}' r='2.5' fill='{color}'/>",
                scale_x(i),
                scale_y(*v)
            );
        }
    }

    // Thin out x labels on long time series.
    let every = (n / 8).max(1);
    for (i, category) in model.categories.iter().enumerate() {
        if i % every == 0 {
            text(
                out,
                scale_x(i),
                plot.y + plot.h + 16.0,
                "middle",
                colors.muted,
                11.0,
                &truncate(category, 10),
            );
        }
    }
}

fn slices(out: &mut String, model: &ChartModel, colors: &ThemeColors, f: &Frame, hole: f64) {
    let Some(series) = model.series.first() else {
        return;
    };
    let total: f64 = series.values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 {
        return;
    }
    let cx = f.x + f.w / 2.0;
    let cy = f.y + f.h / 2.0;
    let r = f.w.min(f.h) / 2.0 - 4.0;
    let inner = r * hole;
    let mut angle = -FRAC_PI_2;

    for (i, value) in series.values.iter().enumerate() {
        if *value <= 0.0 {
            continue;
        }
        let color = series.colors.get(i).copied().unwrap_or(colors.muted);
        let sweep = value / total * TAU;
        if sweep >= TAU - 1e-9 {
            // A single full slice cannot be expressed as one arc.
            let _ = write!(
                out,
                "<circle cx='{cx:.1}' cy='{cy:.1}' r='{r:.1}' fill='{color}'/>"
            );
            if inner > 0.0 {
                let _ = write!(
                    out,
                    "<circle cx='{cx:.1}' cy='{cy:.1}' r='{inner:.1}' fill='{}'/>",
                    colors.background
                );
            }
            break;
        }
        let end = angle + sweep;
        let large = if sweep > std::f64::consts::PI { 1 } else { 0 };
        let (x0, y0) = (cx + r * angle.cos(), cy + r * angle.sin());
        let (x1, y1) = (cx + r * end.cos(), cy + r * end.sin());
        let mut d = String::new();
        if inner > 0.0 {
            let (ix1, iy1) = (cx + inner * end.cos(), cy + inner * end.sin());
            let (ix0, iy0) = (cx + inner * angle.cos(), cy + inner * angle.sin());
            let _ = write!(
                d,
                "M{x0:.2},{y0:.2} A{r:.2},{r:.2} 0 {large} 1 {x1:.2},{y1:.2} L{ix1:.2},{iy1:.2} A{inner:.2},{inner:.2} 0 {large} 0 {ix0:.2},{iy0:.2} Z"
            );
        } else {
            let _ = write!(
                d,
                "M{cx:.2},{cy:.2} L{x0:.2},{y0:.2} A{r:.2},{r:.2} 0 {large} 1 {x1:.2},{y1:.2} Z"
            );
        }
        let _ = write!(
            out,
            "<path d='{d}' fill='{color}' stroke='{}' stroke-width='1'/>",
            colors.background
        );
        angle = end;
    }
}

fn render_legend(out: &mut String, model: &ChartModel, colors: &ThemeColors, x: f64, y: f64) {
    let entries: Vec<(&str, &str)> = match model.kind {
        ChartKind::Pie | ChartKind::Doughnut => model
            .series
            .first()
            .map(|series| {
                model
                    .categories
                    .iter()
                    .zip(series.colors.iter())
                    .map(|(label, color)| (label.as_str(), *color))
                    .collect()
            })
            .unwrap_or_default(),
        _ => model
            .series
            .iter()
            .map(|series| {
                (
                    series.name.as_str(),
                    series.colors.first().copied().unwrap_or(colors.muted),
                )
            })
            .collect(),
    };

    for (i, (label, color)) in entries.iter().take(12).enumerate() {
        let ly = y + i as f64 * 18.0;
        let _ = write!(
            out,
            "<rect x='{x:.1}' y='{ly:.1}' width='10' height='10' rx='2' fill='{color}'/>"
        );
        text(
            out,
            x + 16.0,
            ly + 9.0,
            "start",
            colors.text,
            11.0,
            &truncate(label, 18),
        );
    }
}

fn value_grid_horizontal(out: &mut String, colors: &ThemeColors, plot: &Frame, lo: f64, hi: f64) {
    for step in 0..=4 {
        let v = lo + (hi - lo) * step as f64 / 4.0;
        let y = plot.y + plot.h - plot.h * step as f64 / 4.0;
        axis_line_colored(out, colors.grid, plot.x, y, plot.x + plot.w, y);
        text(out, plot.x - 6.0, y + 4.0, "end", colors.muted, 10.0, &short_value(v));
    }
}

fn value_grid_vertical(out: &mut String, colors: &ThemeColors, plot: &Frame, lo: f64, hi: f64) {
    for step in 0..=4 {
        let v = lo + (hi - lo) * step as f64 / 4.0;
        let x = plot.x + plot.w * step as f64 / 4.0;
        axis_line_colored(out, colors.grid, x, plot.y, x, plot.y + plot.h);
        text(
            out,
            x,
            plot.y + plot.h + 14.0,
            "middle",
            colors.muted,
            10.0,
            &short_value(v),
        );
    }
}

fn axis_line(out: &mut String, colors: &ThemeColors, x1: f64, y1: f64, x2: f64, y2: f64) {
    axis_line_colored(out, colors.muted, x1, y1, x2, y2);
}

fn axis_line_colored(out: &mut String, color: &str, x1: f64, y1: f64, x2: f64, y2: f64) {
    let _ = write!(
        out,
        "<line x1='{x1:.1}' y1='{y1:.1}' x2='{x2:.1}' y2='{y2:.1}' stroke='{color}' stroke-width='1'/>"
    );
}

fn text(out: &mut String, x: f64, y: f64, anchor: &str, color: &str, size: f64, content: &str) {
    let _ = write!(
        out,
        "<text x='{x:.1}' y='{y:.1}' text-anchor='{anchor}' fill='{color}' font-family='{FONT}' font-size='{size}'>{}</text>",
        escape_xml(content)
    );
}

/// Compact axis label: `1.2K`, `-350`, `0.75`.
fn short_value(v: f64) -> String {
    let a = v.abs();
    if a >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if a >= 1_000.0 {
        format!("{:.1}K", v / 1_000.0)
    } else if a >= 10.0 || a == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

fn truncate(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        label.to_string()
    } else {
        let mut cut: String = label.chars().take(max.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

pub fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::series::{build_model, AxisTitles};
    use api::{ChartData, Dataset};

    fn chart(kind: ChartKind) -> ChartModel {
        let data = ChartData::Series {
            labels: vec!["Tom & Jerry".into(), "B".into()],
            datasets: vec![Dataset {
                name: "ROI".into(),
                data: vec![Some(10.0), Some(-5.0)],
            }],
        };
        build_model(kind, &data)
    }

    #[test]
    fn bar_chart_draws_one_rect_per_point() {
        let svg = render_svg(
            &chart(ChartKind::Bar),
            ChartTheme::Screen,
            DEFAULT_WIDTH,
            DEFAULT_HEIGHT,
        );
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        // background + two bars
        assert_eq!(svg.matches("<rect").count(), 3);
        assert!(svg.contains("Tom &amp; Jerry"));
    }

    #[test]
    fn print_theme_uses_light_background() {
        let svg = render_svg(&chart(ChartKind::Line), ChartTheme::Print, 320, 160);
        assert!(svg.contains(ChartTheme::Print.colors().background));
        assert!(!svg.contains(ChartTheme::Screen.colors().background));
    }

    #[test]
    fn pie_skips_non_positive_slices() {
        let svg = render_svg(&chart(ChartKind::Pie), ChartTheme::Screen, 320, 160);
        // the -5 slice is dropped; 10 is a full circle
        assert!(svg.contains("<circle"));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn axis_titles_are_drawn_for_cartesian_charts() {
        let model = chart(ChartKind::Bar).with_axes(AxisTitles::xy("Field Size", "Win Rate (%)"));
        let svg = render_svg(&model, ChartTheme::Screen, DEFAULT_WIDTH, DEFAULT_HEIGHT);
        assert!(svg.contains(">Field Size</text>"));
        assert!(svg.contains(">Win Rate (%)</text>"));
        assert!(svg.contains("rotate(-90"));

        let pie = chart(ChartKind::Pie).with_axes(AxisTitles::y("ROI (%)"));
        let svg = render_svg(&pie, ChartTheme::Screen, DEFAULT_WIDTH, DEFAULT_HEIGHT);
        assert!(!svg.contains("ROI (%)"));
    }

    #[test]
    fn short_values() {
        assert_eq!(short_value(1500.0), "1.5K");
        assert_eq!(short_value(-350.0), "-350");
        assert_eq!(short_value(0.75), "0.75");
    }
}
