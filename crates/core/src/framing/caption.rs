use std::{fmt, sync::Arc};

use image::{Pixel, Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use usvg::fontdb;

use super::FrameLayout;

const INK: &str = "#2b2b2b";

/// Draws captions into the bottom band of a print.
///
/// Text is laid out by `usvg` as a one-line SVG document the size of the
/// band, rasterized by `resvg` and blended onto the canvas. Captions wider
/// than the photo window are squeezed horizontally until they fit. Nothing in
/// here is allowed to fail the frame: layout problems are logged and the
/// caption is left out.
#[derive(Clone)]
pub struct CaptionRenderer {
    fontdb: Arc<fontdb::Database>,
    families: Vec<String>,
}

impl CaptionRenderer {
    pub fn new(fontdb: Arc<fontdb::Database>, families: Vec<String>) -> Self {
        Self { fontdb, families }
    }

    pub fn with_system_fonts(families: Vec<String>) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded caption fonts");
        Self::new(Arc::new(db), families)
    }

    /// A renderer with an empty font database; captions render as nothing.
    pub fn without_fonts() -> Self {
        Self::new(Arc::new(fontdb::Database::new()), Vec::new())
    }

    pub fn has_fonts(&self) -> bool {
        !self.fontdb.is_empty()
    }

    pub fn draw(&self, canvas: &mut RgbaImage, caption: &str, layout: &FrameLayout) {
        let text = caption.trim();
        if text.is_empty() || layout.band_height() == 0 || !self.has_fonts() {
            return;
        }

        let (width, band_height) = (layout.width, layout.band_height());
        let svg = self.svg_document(text, width, band_height, layout.caption_font_size());

        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            font_resolver: caption_font_resolver(),
            ..Default::default()
        };
        let tree = match usvg::Tree::from_str(&svg, &opts) {
            Ok(tree) => tree,
            Err(err) => {
                tracing::warn!(%err, "caption layout failed; leaving caption out");
                return;
            }
        };
        if !tree.root().has_children() {
            tracing::warn!(caption = text, "no font could render caption");
            return;
        }

        let text_width = tree.root().abs_bounding_box().width();
        let max_width = layout.caption_max_width();
        let transform = if text_width > max_width {
            let sx = max_width / text_width;
            let cx = width as f32 / 2.0;
            Transform::from_row(sx, 0.0, 0.0, 1.0, cx * (1.0 - sx), 0.0)
        } else {
            Transform::identity()
        };

        let Some(mut pixmap) = Pixmap::new(width, band_height) else {
            tracing::warn!(width, band_height, "could not allocate caption surface");
            return;
        };
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        let top = layout.band_top();
        for (index, px) in pixmap.pixels().iter().enumerate() {
            let color = px.demultiply();
            if color.alpha() == 0 {
                continue;
            }
            let x = index as u32 % width;
            let y = top + index as u32 / width;
            canvas.get_pixel_mut(x, y).blend(&Rgba([
                color.red(),
                color.green(),
                color.blue(),
                color.alpha(),
            ]));
        }
    }

    fn svg_document(&self, text: &str, width: u32, height: u32, font_size: f32) -> String {
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
                r#"<text x="{cx}" y="{cy}" font-family="{family}" font-size="{size}" fill="{ink}" "#,
                r#"text-anchor="middle" dominant-baseline="central">{text}</text></svg>"#
            ),
            w = width,
            h = height,
            cx = width as f32 / 2.0,
            cy = height as f32 / 2.0,
            family = self.font_family_list(),
            size = font_size,
            ink = INK,
            text = escape_xml(text),
        )
    }

    fn font_family_list(&self) -> String {
        let mut families: Vec<String> = self
            .families
            .iter()
            .map(|family| {
                if family.contains(' ') {
                    format!("'{}'", escape_xml(family))
                } else {
                    escape_xml(family)
                }
            })
            .collect();
        families.push("sans-serif".to_string());
        families.push("serif".to_string());
        families.join(", ")
    }
}

impl fmt::Debug for CaptionRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptionRenderer")
            .field("faces", &self.fontdb.len())
            .field("families", &self.families)
            .finish()
    }
}

/// Resolves the caption's family list against the loaded faces. Generic
/// families are tried after the named ones, and any loaded face is better
/// than dropping the caption.
fn caption_font_resolver() -> usvg::FontResolver<'static> {
    usvg::FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families: Vec<fontdb::Family<'_>> = font
                .families()
                .iter()
                .map(|family| match family {
                    usvg::FontFamily::Serif => fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => fontdb::Family::Monospace,
                    usvg::FontFamily::Named(name) => fontdb::Family::Name(name),
                })
                .collect();
            families.push(fontdb::Family::SansSerif);
            families.push(fontdb::Family::Serif);

            let style = match font.style() {
                usvg::FontStyle::Normal => fontdb::Style::Normal,
                usvg::FontStyle::Italic => fontdb::Style::Italic,
                usvg::FontStyle::Oblique => fontdb::Style::Oblique,
            };
            let query = fontdb::Query {
                families: &families,
                weight: fontdb::Weight(font.weight()),
                stretch: fontdb::Stretch::Normal,
                style,
            };

            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|face| face.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_in_captions() {
        assert_eq!(
            escape_xml(r#"<b>"Tom & Jerry's"</b>"#),
            "&lt;b&gt;&quot;Tom &amp; Jerry&apos;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn quotes_multi_word_families_and_appends_fallbacks() {
        let renderer = CaptionRenderer::new(
            Arc::new(fontdb::Database::new()),
            vec!["Permanent Marker".to_string(), "cursive".to_string()],
        );
        assert_eq!(
            renderer.font_family_list(),
            "'Permanent Marker', cursive, sans-serif, serif"
        );
    }

    #[test]
    fn caption_document_is_valid_svg() {
        let renderer = CaptionRenderer::without_fonts();
        let svg = renderer.svg_document("A & B", 100, 33, 10.0);
        let tree = usvg::Tree::from_str(&svg, &usvg::Options::default()).unwrap();
        assert_eq!(tree.size().width(), 100.0);
        assert_eq!(tree.size().height(), 33.0);
    }

    #[test]
    fn fontless_renderer_leaves_canvas_untouched() {
        let layout = FrameLayout::for_width(100).unwrap();
        let mut canvas = RgbaImage::from_pixel(100, 125, Rgba([255, 255, 255, 255]));
        let before = canvas.clone();
        CaptionRenderer::without_fonts().draw(&mut canvas, "hello", &layout);
        assert_eq!(canvas, before);
    }

    #[test]
    fn unknown_families_fall_back_to_a_loaded_face() {
        let renderer = CaptionRenderer::with_system_fonts(vec!["No Such Family".to_string()]);
        if !renderer.has_fonts() {
            return;
        }
        let layout = FrameLayout::for_width(200).unwrap();
        let mut canvas = RgbaImage::from_pixel(200, 250, Rgba([255, 255, 255, 255]));
        renderer.draw(&mut canvas, "hello", &layout);

        let inked = canvas
            .enumerate_pixels()
            .filter(|(_, _, px)| px.0 != [255, 255, 255, 255])
            .collect::<Vec<_>>();
        assert!(!inked.is_empty());
        assert!(inked.iter().all(|(_, y, _)| *y >= layout.band_top()));
    }
}
