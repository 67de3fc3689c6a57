//! Fixed colour assignments for charts.

/// Categorical palette, cycled by series or slice index.
pub const PALETTE: [&str; 8] = [
    "#4f8ef7", "#f5a524", "#36c28a", "#e4572e", "#9b6dff", "#2ec4d6", "#f06fa4", "#a3b23a",
];

pub const GAIN: &str = "#36c28a";
pub const LOSS: &str = "#e4572e";

pub fn categorical(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Gains and losses are the only data-dependent colouring.
pub fn signed(value: f64) -> &'static str {
    if value < 0.0 {
        LOSS
    } else {
        GAIN
    }
}

/// Visual theme a chart is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartTheme {
    #[default]
    Screen,
    Print,
}

#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    pub background: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub grid: &'static str,
}

impl ChartTheme {
    pub fn colors(self) -> ThemeColors {
        match self {
            ChartTheme::Screen => ThemeColors {
                background: "#151923",
                text: "#f5f7fb",
                muted: "#9aa3b5",
                grid: "#2a3040",
            },
            ChartTheme::Print => ThemeColors {
                background: "#ffffff",
                text: "#1b1f29",
                muted: "#5b6477",
                grid: "#dde1ea",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_cycles() {
        assert_eq!(categorical(0), categorical(PALETTE.len()));
        assert_ne!(categorical(0), categorical(1));
    }

    #[test]
    fn sign_branching() {
        assert_eq!(signed(10.0), GAIN);
        assert_eq!(signed(0.0), GAIN);
        assert_eq!(signed(-0.5), LOSS);
    }
}
