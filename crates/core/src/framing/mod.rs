//! Turns an arbitrary source image into a fixed-ratio instant print.
//!
//! Every print is `width` wide and `round(width * 1.25)` tall. The photo sits
//! in a square window inset by 8% of the width, filled with a centered square
//! crop of the source. The band below the window carries the caption.

mod caption;

use std::{io::Cursor, sync::Arc};

use image::{imageops, imageops::FilterType, DynamicImage, ImageFormat, Pixel, Rgba, RgbaImage};
use serde::Serialize;

use crate::{config::FramingConfig, BoothError, PhotoId, Result, SourceImage};

pub use caption::CaptionRenderer;

const HEIGHT_RATIO: f64 = 1.25;
const PADDING_RATIO: f64 = 0.08;
const FONT_RATIO: f32 = 0.1;
/// Largest edge we are willing to allocate a canvas for.
const MAX_DIM: u32 = 16_384;

const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);
const WINDOW_SHADE: Rgba<u8> = Rgba([240, 240, 240, 255]);
const BORDER: Rgba<u8> = Rgba([0, 0, 0, 38]);

/// Pixel geometry of a print of a given width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub width: u32,
    pub height: u32,
    pub padding: u32,
    pub photo_side: u32,
}

impl FrameLayout {
    pub fn for_width(width: u32) -> Result<Self> {
        if width == 0 {
            return Err(BoothError::surface("target width must be positive"));
        }
        let height = (f64::from(width) * HEIGHT_RATIO).round() as u32;
        if width > MAX_DIM || height > MAX_DIM {
            return Err(BoothError::surface(format!(
                "frame size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
            )));
        }
        let padding = (f64::from(width) * PADDING_RATIO).round() as u32;
        Ok(Self {
            width,
            height,
            padding,
            photo_side: width - 2 * padding,
        })
    }

    /// First row below the photo window.
    pub fn band_top(&self) -> u32 {
        self.padding + self.photo_side
    }

    pub fn band_height(&self) -> u32 {
        self.height - self.band_top()
    }

    pub fn caption_font_size(&self) -> f32 {
        self.width as f32 * FONT_RATIO
    }

    pub fn caption_max_width(&self) -> f32 {
        self.photo_side as f32
    }
}

/// Square region of the source that ends up in the photo window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub x: u32,
    pub y: u32,
    pub side: u32,
}

impl CropBox {
    pub fn for_source(width: u32, height: u32) -> Self {
        if width > height {
            Self {
                x: (width - height) / 2,
                y: 0,
                side: height,
            }
        } else {
            Self {
                x: 0,
                y: (height - width) / 2,
                side: width,
            }
        }
    }
}

/// Encoded print as returned by a [`Framer`].
#[derive(Debug, Clone)]
pub struct FramedBitmap {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

/// A finished print waiting in the release queue or lying on the surface.
#[derive(Debug, Clone, Serialize)]
pub struct FramedArtifact {
    pub id: PhotoId,
    pub width: u32,
    pub height: u32,
    #[serde(skip)]
    png: Arc<[u8]>,
}

impl FramedArtifact {
    pub fn new(id: PhotoId, bitmap: FramedBitmap) -> Self {
        Self {
            id,
            width: bitmap.width,
            height: bitmap.height,
            png: bitmap.png.into(),
        }
    }

    /// PNG encoding of the print.
    pub fn png(&self) -> &[u8] {
        &self.png
    }
}

/// Anything that can turn a source into a print. The booth only talks to this
/// trait so tests can swap in slow or failing framers.
pub trait Framer: Send + Sync {
    fn frame(&self, source: &SourceImage, caption: &str, target_width: u32)
        -> Result<FramedBitmap>;
}

/// The stock instant-print look: white paper, shaded window, thin border and
/// a caption in the bottom band.
#[derive(Debug, Clone)]
pub struct PolaroidFramer {
    captions: CaptionRenderer,
}

impl PolaroidFramer {
    /// Builds a framer that renders captions with the system fonts.
    pub fn new(config: &FramingConfig) -> Self {
        Self {
            captions: CaptionRenderer::with_system_fonts(config.caption_fonts.clone()),
        }
    }

    pub fn with_captions(captions: CaptionRenderer) -> Self {
        Self { captions }
    }

    /// Composes the print and returns the raw canvas.
    pub fn compose(
        &self,
        image: &DynamicImage,
        caption: &str,
        layout: &FrameLayout,
    ) -> RgbaImage {
        let mut canvas = RgbaImage::from_pixel(layout.width, layout.height, PAPER);
        let (pad, side) = (layout.padding, layout.photo_side);

        fill_rect(&mut canvas, pad, pad, side, side, WINDOW_SHADE);

        let crop = CropBox::for_source(image.width(), image.height());
        let photo = image
            .crop_imm(crop.x, crop.y, crop.side, crop.side)
            .resize_exact(side, side, FilterType::Triangle)
            .to_rgba8();
        imageops::overlay(&mut canvas, &photo, i64::from(pad), i64::from(pad));

        stroke_rect(&mut canvas, pad, pad, side, side, BORDER);

        self.captions.draw(&mut canvas, caption, layout);
        canvas
    }
}

impl Default for PolaroidFramer {
    fn default() -> Self {
        Self::new(&FramingConfig::default())
    }
}

impl Framer for PolaroidFramer {
    fn frame(
        &self,
        source: &SourceImage,
        caption: &str,
        target_width: u32,
    ) -> Result<FramedBitmap> {
        let layout = FrameLayout::for_width(target_width)?;
        let image = source.decode()?;
        let canvas = self.compose(&image, caption, &layout);

        let mut png = Vec::new();
        DynamicImage::ImageRgba8(canvas)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|err| BoothError::surface(format!("encode frame: {err}")))?;

        Ok(FramedBitmap {
            width: layout.width,
            height: layout.height,
            png,
        })
    }
}

fn fill_rect(canvas: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    for py in y..(y + h).min(canvas.height()) {
        for px in x..(x + w).min(canvas.width()) {
            canvas.put_pixel(px, py, color);
        }
    }
}

fn stroke_rect(canvas: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    if w == 0 || h == 0 {
        return;
    }
    let (right, bottom) = (x + w - 1, y + h - 1);
    for px in x..=right {
        canvas.get_pixel_mut(px, y).blend(&color);
        if bottom != y {
            canvas.get_pixel_mut(px, bottom).blend(&color);
        }
    }
    for py in (y + 1)..bottom {
        canvas.get_pixel_mut(x, py).blend(&color);
        if right != x {
            canvas.get_pixel_mut(right, py).blend(&color);
        }
    }
}
