//! Page layout for the exported report.
//!
//! Coordinates are PDF points measured from the top-left corner of an A4
//! portrait page; the writer flips them into PDF user space.

use crate::dashboard::kpi::Tone;
use crate::dashboard::table::TableModel;

use super::capture::RasterImage;
use super::fonts::{fit, metrics, text_width, FontWeight};

pub const PAGE_W: f32 = 595.0;
pub const PAGE_H: f32 = 842.0;
pub const MARGIN: f32 = 40.0;
pub const CONTENT_W: f32 = PAGE_W - 2.0 * MARGIN;

const TITLE_SIZE: f32 = 20.0;
const HEADING_SIZE: f32 = 15.0;
const SUBHEADING_SIZE: f32 = 11.5;
const BODY_SIZE: f32 = 9.5;
const CELL_SIZE: f32 = 8.5;
const FOOTER_SIZE: f32 = 8.0;
const ROW_H: f32 = 16.0;
const CELL_PAD: f32 = 4.0;
const GAP: f32 = 12.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

pub const INK: Rgb = Rgb(0.11, 0.12, 0.15);
pub const MUTED: Rgb = Rgb(0.42, 0.45, 0.5);
const RULE: Rgb = Rgb(0.82, 0.84, 0.87);
const HEADER_FILL: Rgb = Rgb(0.91, 0.93, 0.96);
const ZEBRA_FILL: Rgb = Rgb(0.97, 0.97, 0.98);
const GAIN_INK: Rgb = Rgb(0.13, 0.55, 0.38);
const LOSS_INK: Rgb = Rgb(0.78, 0.27, 0.16);

#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Text {
        x: f32,
        baseline: f32,
        size: f32,
        weight: FontWeight,
        color: Rgb,
        text: String,
    },
    Fill {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgb,
    },
    Image {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        image: usize,
    },
}

impl Block {
    /// Lowest point the block reaches on the page.
    pub fn bottom(&self) -> f32 {
        match self {
            Block::Text { baseline, size, .. } => baseline + metrics(*size).desc,
            Block::Fill { y, h, .. } | Block::Image { y, h, .. } => y + h,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub blocks: Vec<Block>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct KpiLine {
    pub label: String,
    pub value: String,
    pub tone: Tone,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ReportItem {
    Chart { title: String, image: RasterImage },
    Table { title: String, model: TableModel },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReportSection {
    pub title: String,
    pub items: Vec<ReportItem>,
}

/// Everything that goes into the document, already captured.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportContent {
    pub title: String,
    pub generated: String,
    pub kpis: Vec<KpiLine>,
    pub sections: Vec<ReportSection>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReportLayout {
    pub title: String,
    pub pages: Vec<Page>,
    pub images: Vec<RasterImage>,
}

struct Cursor {
    pages: Vec<Page>,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            y: MARGIN,
        }
    }

    /// Break the page when `needed` points no longer fit. A block taller than
    /// a whole page is placed at the top of a fresh page rather than looping.
    fn ensure(&mut self, needed: f32) -> bool {
        if self.y + needed > PAGE_H - MARGIN && self.y > MARGIN {
            self.pages.push(Page::default());
            self.y = MARGIN;
            return true;
        }
        false
    }

    fn push(&mut self, block: Block) {
        if let Some(page) = self.pages.last_mut() {
            page.blocks.push(block);
        }
    }

    fn line(&mut self, text: impl Into<String>, size: f32, weight: FontWeight, color: Rgb) {
        let m = metrics(size);
        self.ensure(m.line_h);
        self.push(Block::Text {
            x: MARGIN,
            baseline: self.y + m.asc,
            size,
            weight,
            color,
            text: text.into(),
        });
        self.y += m.line_h;
    }

    fn rule(&mut self) {
        self.push(Block::Fill {
            x: MARGIN,
            y: self.y,
            w: CONTENT_W,
            h: 0.8,
            color: RULE,
        });
        self.y += 6.0;
    }
}

fn tone_ink(tone: Tone) -> Rgb {
    match tone {
        Tone::Neutral => INK,
        Tone::Positive => GAIN_INK,
        Tone::Negative => LOSS_INK,
    }
}

fn kpi_table(cursor: &mut Cursor, kpis: &[KpiLine]) {
    if kpis.is_empty() {
        return;
    }
    cursor.ensure(metrics(HEADING_SIZE).line_h + ROW_H * 2.0);
    cursor.line("Key Metrics", HEADING_SIZE, FontWeight::Bold, INK);
    cursor.rule();

    let label_w = CONTENT_W * 0.6;
    for (idx, kpi) in kpis.iter().enumerate() {
        cursor.ensure(ROW_H);
        if idx % 2 == 1 {
            cursor.push(Block::Fill {
                x: MARGIN,
                y: cursor.y,
                w: CONTENT_W,
                h: ROW_H,
                color: ZEBRA_FILL,
            });
        }
        let baseline = cursor.y + ROW_H - 5.0;
        cursor.push(Block::Text {
            x: MARGIN + CELL_PAD,
            baseline,
            size: BODY_SIZE,
            weight: FontWeight::Regular,
            color: INK,
            text: fit(&kpi.label, FontWeight::Regular, BODY_SIZE, label_w - CELL_PAD),
        });
        let value_w = text_width(&kpi.value, FontWeight::Bold, BODY_SIZE);
        cursor.push(Block::Text {
            x: MARGIN + CONTENT_W - CELL_PAD - value_w,
            baseline,
            size: BODY_SIZE,
            weight: FontWeight::Bold,
            color: tone_ink(kpi.tone),
            text: kpi.value.clone(),
        });
        cursor.y += ROW_H;
    }
    cursor.y += GAP;
}

fn cell(
    cursor: &mut Cursor,
    text: &str,
    col: usize,
    col_w: f32,
    numeric: bool,
    weight: FontWeight,
) {
    let fitted = fit(text, weight, CELL_SIZE, col_w - 2.0 * CELL_PAD);
    let left = MARGIN + col as f32 * col_w;
    let x = if numeric {
        left + col_w - CELL_PAD - text_width(&fitted, weight, CELL_SIZE)
    } else {
        left + CELL_PAD
    };
    cursor.push(Block::Text {
        x,
        baseline: cursor.y + ROW_H - 5.0,
        size: CELL_SIZE,
        weight,
        color: INK,
        text: fitted,
    });
}

fn table_header(cursor: &mut Cursor, model: &TableModel, col_w: f32) {
    cursor.push(Block::Fill {
        x: MARGIN,
        y: cursor.y,
        w: CONTENT_W,
        h: ROW_H,
        color: HEADER_FILL,
    });
    for (col, header) in model.headers.iter().enumerate() {
        let numeric = model.numeric.get(col).copied().unwrap_or(false);
        cell(cursor, header, col, col_w, numeric, FontWeight::Bold);
    }
    cursor.y += ROW_H;
}

fn table(cursor: &mut Cursor, title: &str, model: &TableModel) {
    let col_w = CONTENT_W / model.headers.len().max(1) as f32;
    // title, header and at least one row stay together
    cursor.ensure(metrics(SUBHEADING_SIZE).line_h + ROW_H * 2.0);
    cursor.line(title, SUBHEADING_SIZE, FontWeight::Bold, INK);
    table_header(cursor, model, col_w);

    for (idx, row) in model.rows.iter().enumerate() {
        if cursor.ensure(ROW_H) {
            table_header(cursor, model, col_w);
        }
        if idx % 2 == 1 {
            cursor.push(Block::Fill {
                x: MARGIN,
                y: cursor.y,
                w: CONTENT_W,
                h: ROW_H,
                color: ZEBRA_FILL,
            });
        }
        for (col, text) in row.iter().enumerate() {
            let numeric = model.numeric.get(col).copied().unwrap_or(false);
            cell(cursor, text, col, col_w, numeric, FontWeight::Regular);
        }
        cursor.y += ROW_H;
    }
    cursor.y += GAP;
}

fn chart(cursor: &mut Cursor, title: &str, image: &RasterImage, images: &mut Vec<RasterImage>) {
    let aspect = image.height as f32 / image.width.max(1) as f32;
    let h = CONTENT_W * aspect;
    let title_h = metrics(SUBHEADING_SIZE).line_h;
    cursor.ensure(title_h + h + GAP);
    cursor.line(title, SUBHEADING_SIZE, FontWeight::Bold, INK);
    images.push(image.clone());
    cursor.push(Block::Image {
        x: MARGIN,
        y: cursor.y,
        w: CONTENT_W,
        h,
        image: images.len() - 1,
    });
    cursor.y += h + GAP;
}

fn footers(pages: &mut [Page]) {
    let total = pages.len();
    for (idx, page) in pages.iter_mut().enumerate() {
        let text = format!("Page {} of {}", idx + 1, total);
        let w = text_width(&text, FontWeight::Regular, FOOTER_SIZE);
        page.blocks.push(Block::Text {
            x: (PAGE_W - w) / 2.0,
            baseline: PAGE_H - MARGIN / 2.0,
            size: FOOTER_SIZE,
            weight: FontWeight::Regular,
            color: MUTED,
            text,
        });
    }
}

pub fn layout(content: &ReportContent) -> ReportLayout {
    let mut cursor = Cursor::new();
    let mut images = Vec::new();

    cursor.line(&content.title, TITLE_SIZE, FontWeight::Bold, INK);
    cursor.line(&content.generated, BODY_SIZE, FontWeight::Regular, MUTED);
    cursor.y += GAP;

    kpi_table(&mut cursor, &content.kpis);

    if content.sections.is_empty() {
        cursor.line(
            "No charts or tables had data for this analysis.",
            BODY_SIZE,
            FontWeight::Regular,
            MUTED,
        );
    }

    for section in &content.sections {
        cursor.ensure(metrics(HEADING_SIZE).line_h + 60.0);
        cursor.line(&section.title, HEADING_SIZE, FontWeight::Bold, INK);
        cursor.rule();
        for item in &section.items {
            match item {
                ReportItem::Chart { title, image } => chart(&mut cursor, title, image, &mut images),
                ReportItem::Table { title, model } => table(&mut cursor, title, model),
            }
        }
    }

    let mut pages = cursor.pages;
    footers(&mut pages);

    ReportLayout {
        title: content.title.clone(),
        pages,
        images,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(sections: Vec<ReportSection>) -> ReportContent {
        ReportContent {
            title: "Paddock Racing Report".into(),
            generated: "Generated 2024-03-09 14:05".into(),
            kpis: vec![KpiLine {
                label: "Total Tips".into(),
                value: "42".into(),
                tone: Tone::Neutral,
            }],
            sections,
        }
    }

    fn long_table(rows: usize) -> TableModel {
        TableModel {
            headers: vec!["Tipster".into(), "Tips".into(), "ROI".into()],
            numeric: vec![false, true, true],
            rows: (0..rows)
                .map(|idx| vec![format!("Tipster {idx}"), idx.to_string(), "4.2%".into()])
                .collect(),
        }
    }

    fn image() -> RasterImage {
        RasterImage {
            width: 4,
            height: 2,
            rgb: vec![255; 4 * 2 * 3],
        }
    }

    #[test]
    fn short_report_fits_one_page_with_footer() {
        let report = layout(&content(Vec::new()));
        assert_eq!(report.pages.len(), 1);
        let texts: Vec<_> = report.pages[0].blocks.iter().filter_map(Block::text).collect();
        assert!(texts.contains(&"Total Tips"));
        assert!(texts.contains(&"42"));
        assert!(texts.contains(&"Page 1 of 1"));
    }

    #[test]
    fn long_tables_repeat_header_on_each_page() {
        let report = layout(&content(vec![ReportSection {
            title: "Tables".into(),
            items: vec![ReportItem::Table {
                title: "Tipster Summary".into(),
                model: long_table(120),
            }],
        }]));
        assert!(report.pages.len() > 1);
        for page in &report.pages {
            let headers = page
                .blocks
                .iter()
                .filter(|block| block.text() == Some("Tipster"))
                .count();
            assert_eq!(headers, 1);
        }
        let total = report.pages.len();
        let last = report.pages.last().unwrap();
        let footer = format!("Page {total} of {total}");
        assert!(last.blocks.iter().any(|block| block.text() == Some(footer.as_str())));
    }

    #[test]
    fn no_body_block_crosses_bottom_margin() {
        let items = (0..6)
            .map(|idx| ReportItem::Chart {
                title: format!("Chart {idx}"),
                image: image(),
            })
            .chain(std::iter::once(ReportItem::Table {
                title: "Course Summary".into(),
                model: long_table(80),
            }))
            .collect();
        let report = layout(&content(vec![ReportSection {
            title: "Everything".into(),
            items,
        }]));
        for page in &report.pages {
            for block in &page.blocks {
                if block.text().is_some_and(|text| text.starts_with("Page ")) {
                    continue;
                }
                assert!(block.bottom() <= PAGE_H - MARGIN + 0.01, "{block:?}");
            }
        }
        assert_eq!(report.images.len(), 6);
    }

    #[test]
    fn charts_scale_to_content_width() {
        let report = layout(&content(vec![ReportSection {
            title: "Performance".into(),
            items: vec![ReportItem::Chart {
                title: "ROI by Tipster".into(),
                image: image(),
            }],
        }]));
        let placed = report.pages[0]
            .blocks
            .iter()
            .find_map(|block| match block {
                Block::Image { w, h, .. } => Some((*w, *h)),
                _ => None,
            })
            .unwrap();
        assert_eq!(placed, (CONTENT_W, CONTENT_W / 2.0));
    }
}
