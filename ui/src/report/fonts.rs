//! Text measurement for report layout.
//!
//! The report is set in the PDF base-14 Helvetica faces, which every viewer
//! ships, so nothing is embedded. Widths use per-class advance estimates taken
//! from the Helvetica AFM tables; that is close enough to fit table cells and
//! centre footers without carrying the full metrics file.

/// Lightweight weight indicator so callers avoid stringly-typed lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

impl FontWeight {
    /// Resource name used in page content streams.
    pub fn resource_name(self) -> &'static [u8] {
        match self {
            FontWeight::Regular => b"F1",
            FontWeight::Bold => b"F2",
        }
    }

    pub fn base_font(self) -> &'static [u8] {
        match self {
            FontWeight::Regular => b"Helvetica",
            FontWeight::Bold => b"Helvetica-Bold",
        }
    }
}

/// Vertical metrics used by the layout cursor.
#[derive(Clone, Copy, Debug)]
pub struct TextMetrics {
    /// Chosen vertical line height for layout rhythm.
    pub line_h: f32,
    /// Ascender distance above baseline.
    pub asc: f32,
    /// Descender distance below baseline (positive number).
    pub desc: f32,
}

pub fn metrics(size_pt: f32) -> TextMetrics {
    // Helvetica: ascender 718/1000, descender 207/1000.
    let asc = size_pt * 0.718;
    let desc = size_pt * 0.207;
    let line_h = (size_pt * 1.25).ceil();
    TextMetrics { line_h, asc, desc }
}

fn advance(ch: char, weight: FontWeight) -> f32 {
    let regular = match ch {
        'i' | 'j' | 'l' | '\'' | '|' | '.' | ',' | ':' | ';' | '!' => 0.24,
        'f' | 't' | 'r' | ' ' | 'I' | '(' | ')' | '[' | ']' | '/' | '-' => 0.31,
        'm' | 'M' | 'W' | 'w' | '@' | '%' => 0.85,
        'A'..='Z' => 0.68,
        '0'..='9' | '£' | '$' | '€' => 0.556,
        _ => 0.52,
    };
    match weight {
        FontWeight::Regular => regular,
        FontWeight::Bold => regular * 1.06,
    }
}

/// Estimated rendered width of `text` in points.
pub fn text_width(text: &str, weight: FontWeight, size_pt: f32) -> f32 {
    text.chars().map(|ch| advance(ch, weight)).sum::<f32>() * size_pt
}

/// Shorten `text` with an ellipsis until it fits `max_width`.
pub fn fit(text: &str, weight: FontWeight, size_pt: f32, max_width: f32) -> String {
    if text_width(text, weight, size_pt) <= max_width {
        return text.to_string();
    }
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate: String = chars.iter().collect::<String>() + "…";
        if text_width(&candidate, weight, size_pt) <= max_width {
            return candidate;
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_increase_with_size() {
        let small = metrics(10.0);
        let large = metrics(20.0);
        assert!(large.line_h > small.line_h);
        assert!(large.asc > small.asc);
    }

    #[test]
    fn bold_is_wider() {
        let text = "Steamers vs Drifters";
        assert!(
            text_width(text, FontWeight::Bold, 12.0) > text_width(text, FontWeight::Regular, 12.0)
        );
    }

    #[test]
    fn fit_truncates_long_cells() {
        let long = "A very long tipster name that will not fit";
        let fitted = fit(long, FontWeight::Regular, 9.0, 60.0);
        assert!(fitted.ends_with('…'));
        assert!(text_width(&fitted, FontWeight::Regular, 9.0) <= 60.0);
        assert_eq!(fit("Ayr", FontWeight::Regular, 9.0, 60.0), "Ayr");
    }
}
