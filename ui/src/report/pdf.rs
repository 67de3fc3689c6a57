//! PDF serialization of a laid-out report.

use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use super::fonts::FontWeight;
use super::layout::{Block, Page, ReportLayout, PAGE_H, PAGE_W};

struct Refs {
    next: i32,
}

impl Refs {
    fn alloc(&mut self) -> Ref {
        self.next += 1;
        Ref::new(self.next)
    }
}

/// Encode text for the WinAnsi base fonts. Characters outside the code page
/// become `?`.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            ' '..='~' => ch as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '\u{a0}'..='\u{ff}' => ch as u32 as u8,
            _ => b'?',
        })
        .collect()
}

fn image_name(idx: usize) -> String {
    format!("Im{idx}")
}

fn page_content(page: &Page, image_names: &[String]) -> Vec<u8> {
    let mut content = Content::new();
    for block in &page.blocks {
        match block {
            Block::Fill { x, y, w, h, color } => {
                content.set_fill_rgb(color.0, color.1, color.2);
                content.rect(*x, PAGE_H - y - h, *w, *h);
                content.fill_nonzero();
            }
            Block::Text {
                x,
                baseline,
                size,
                weight,
                color,
                text,
            } => {
                content.begin_text();
                content.set_fill_rgb(color.0, color.1, color.2);
                content.set_font(Name(weight.resource_name()), *size);
                content.next_line(*x, PAGE_H - baseline);
                content.show(Str(&win_ansi(text)));
                content.end_text();
            }
            Block::Image { x, y, w, h, image } => {
                if let Some(name) = image_names.get(*image) {
                    content.save_state();
                    content.transform([*w, 0.0, 0.0, *h, *x, PAGE_H - y - h]);
                    content.x_object(Name(name.as_bytes()));
                    content.restore_state();
                }
            }
        }
    }
    content.finish()
}

fn uses_image(page: &Page, idx: usize) -> bool {
    page.blocks
        .iter()
        .any(|block| matches!(block, Block::Image { image, .. } if *image == idx))
}

pub fn write_pdf(report: &ReportLayout) -> Vec<u8> {
    let mut refs = Refs { next: 0 };
    let catalog_id = refs.alloc();
    let tree_id = refs.alloc();
    let info_id = refs.alloc();
    let regular_id = refs.alloc();
    let bold_id = refs.alloc();
    let image_ids: Vec<Ref> = report.images.iter().map(|_| refs.alloc()).collect();
    let page_ids: Vec<(Ref, Ref)> = report
        .pages
        .iter()
        .map(|_| (refs.alloc(), refs.alloc()))
        .collect();
    let image_names: Vec<String> = (0..report.images.len()).map(image_name).collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids(page_ids.iter().map(|(page, _)| *page))
        .count(page_ids.len() as i32);
    pdf.document_info(info_id)
        .title(TextStr(&report.title))
        .creator(TextStr("Paddock"));

    for (id, weight) in [(regular_id, FontWeight::Regular), (bold_id, FontWeight::Bold)] {
        pdf.type1_font(id)
            .base_font(Name(weight.base_font()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    for (image, id) in report.images.iter().zip(&image_ids) {
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&image.rgb, 6);
        let mut xobject = pdf.image_xobject(*id, &compressed);
        xobject.filter(Filter::FlateDecode);
        xobject.width(image.width as i32);
        xobject.height(image.height as i32);
        xobject.color_space().device_rgb();
        xobject.bits_per_component(8);
        xobject.finish();
    }

    for (page, (page_id, content_id)) in report.pages.iter().zip(&page_ids) {
        let mut writer = pdf.page(*page_id);
        writer.media_box(Rect::new(0.0, 0.0, PAGE_W, PAGE_H));
        writer.parent(tree_id);
        writer.contents(*content_id);

        let mut resources = writer.resources();
        let mut fonts = resources.fonts();
        fonts.pair(Name(FontWeight::Regular.resource_name()), regular_id);
        fonts.pair(Name(FontWeight::Bold.resource_name()), bold_id);
        fonts.finish();

        let mut xobjects = resources.x_objects();
        for (idx, id) in image_ids.iter().enumerate() {
            if uses_image(page, idx) {
                xobjects.pair(Name(image_names[idx].as_bytes()), *id);
            }
        }
        xobjects.finish();
        resources.finish();
        writer.finish();

        pdf.stream(*content_id, &page_content(page, &image_names));
    }

    pdf.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::capture::RasterImage;
    use crate::report::layout::{Rgb, INK};

    fn text(s: &str) -> Block {
        Block::Text {
            x: 40.0,
            baseline: 60.0,
            size: 10.0,
            weight: FontWeight::Regular,
            color: INK,
            text: s.into(),
        }
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|window| window == needle)
    }

    #[test]
    fn pound_sign_maps_to_win_ansi() {
        assert_eq!(win_ansi("£1.2K"), vec![0xA3, b'1', b'.', b'2', b'K']);
        assert_eq!(win_ansi("→"), vec![b'?']);
    }

    #[test]
    fn writes_one_page_object_per_layout_page() {
        let report = ReportLayout {
            title: "Paddock Racing Report".into(),
            pages: vec![
                Page {
                    blocks: vec![text("Page 1 of 2")],
                },
                Page {
                    blocks: vec![
                        Block::Fill {
                            x: 40.0,
                            y: 40.0,
                            w: 100.0,
                            h: 16.0,
                            color: Rgb(0.9, 0.9, 0.9),
                        },
                        Block::Image {
                            x: 40.0,
                            y: 70.0,
                            w: 200.0,
                            h: 100.0,
                            image: 0,
                        },
                        text("Page 2 of 2"),
                    ],
                },
            ],
            images: vec![RasterImage {
                width: 2,
                height: 1,
                rgb: vec![255, 0, 0, 0, 0, 255],
            }],
        };
        let bytes = write_pdf(&report);
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(contains(&bytes, b"/Count 2"));
        assert!(contains(&bytes, b"/Helvetica-Bold"));
        assert!(contains(&bytes, b"/FlateDecode"));
        assert!(contains(&bytes, b"/Im0"));
    }
}
