//! Rasterization: text layers onto glyphs, image layers onto pixels.
//!
//! Layers composite in planned order; later layers paint over earlier ones.
//! Everything except the template itself degrades: a fetch or decode failure
//! drops that layer with a warning and the card ships without it.

use image::{DynamicImage, GenericImageView, ImageBuffer, ImageEncoder, Rgba};
use rusttype::{point, Font, Scale};
use thiserror::Error;
use tracing::warn;

use crate::assets::AssetLoader;
use crate::fonts::FontStore;
use crate::layout::{ImageKind, ImageLayer, Layer, TextFlow, TextLayer};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("image: {0}")]
    Image(String),
    #[error("invalid color: {0}")]
    InvalidColor(String),
}

pub type Canvas = ImageBuffer<Rgba<u8>, Vec<u8>>;

pub fn hex_color(s: &str) -> Result<Rgba<u8>, RenderError> {
    let stripped = s.trim().trim_start_matches('#');
    if stripped.len() != 6 {
        return Err(RenderError::InvalidColor(s.to_string()));
    }
    let b = hex::decode(stripped).map_err(|_| RenderError::InvalidColor(s.to_string()))?;
    Ok(Rgba([b[0], b[1], b[2], 255]))
}

/// Composite the planned layers onto the template and encode a PNG.
pub async fn render(
    assets: &AssetLoader,
    fonts: &FontStore,
    template_png: &[u8],
    layers: &[Layer],
) -> Result<Vec<u8>, RenderError> {
    let mut canvas = image::load_from_memory(template_png)
        .map_err(|e| RenderError::Image(e.to_string()))?
        .to_rgba8();

    for layer in layers {
        match layer {
            Layer::Image(image_layer) => place_image(assets, &mut canvas, image_layer).await,
            Layer::Text(text_layer) => place_text(fonts, &mut canvas, text_layer),
        }
    }

    encode_png(&canvas)
}

pub fn encode_png(canvas: &Canvas) -> Result<Vec<u8>, RenderError> {
    let mut buf = Vec::new();
    let enc = image::codecs::png::PngEncoder::new(&mut buf);
    enc.write_image(
        canvas,
        canvas.width(),
        canvas.height(),
        image::ExtendedColorType::Rgba8,
    )
    .map_err(|e| RenderError::Image(e.to_string()))?;
    Ok(buf)
}

async fn place_image(assets: &AssetLoader, canvas: &mut Canvas, layer: &ImageLayer) {
    let bytes = match assets.fetch(&layer.source).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(source = %layer.source, error = %e, "image layer fetch failed, skipping");
            return;
        }
    };
    let decoded = match image::load_from_memory(&bytes) {
        Ok(img) => img,
        Err(e) => {
            warn!(source = %layer.source, error = %e, "image layer decode failed, skipping");
            return;
        }
    };

    match layer.kind {
        ImageKind::Photo => {
            let photo = cover_crop(decoded, layer.width, layer.height);
            overlay_alpha(canvas, &photo, layer.left, layer.top);
        }
        ImageKind::Logo => {
            let logo = decoded.resize(
                layer.width,
                layer.height,
                image::imageops::FilterType::Lanczos3,
            );
            // Center inside the slot.
            let dx = (layer.width.saturating_sub(logo.width()) / 2) as i32;
            let dy = (layer.height.saturating_sub(logo.height()) / 2) as i32;
            overlay_alpha(canvas, &logo.to_rgba8(), layer.left + dx, layer.top + dy);
        }
    }
}

fn place_text(fonts: &FontStore, canvas: &mut Canvas, layer: &TextLayer) {
    let font = match fonts.get(layer.weight) {
        Ok(font) => font,
        Err(e) => {
            warn!(error = %e, "font unavailable, skipping text layer");
            return;
        }
    };
    let color = match hex_color(layer.color) {
        Ok(color) => color,
        Err(e) => {
            warn!(error = %e, "bad layer color, skipping text layer");
            return;
        }
    };

    for (index, line) in layer.lines.iter().enumerate() {
        let x = match layer.flow {
            TextFlow::TwoColumn { continuation_left } if index > 0 => continuation_left,
            _ => layer.left,
        };
        let y = layer.top + index as i32 * layer.line_height as i32;
        draw_text(canvas, &font, layer.font_size as f32, x, y, color, line);
    }
}

/// Rasterize one line, alpha-blending glyph coverage over the canvas.
fn draw_text(
    img: &mut Canvas,
    font: &Font<'static>,
    px: f32,
    x: i32,
    y: i32,
    color: Rgba<u8>,
    text: &str,
) {
    let scale = Scale::uniform(px);
    let v_metrics = font.v_metrics(scale);
    let mut caret_x = x as f32;
    let baseline_y = y as f32 + v_metrics.ascent;

    for ch in text.chars() {
        let glyph = font.glyph(ch).scaled(scale).positioned(point(caret_x, baseline_y));
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 {
                    return;
                }
                let (px, py) = (px as u32, py as u32);
                if px >= img.width() || py >= img.height() {
                    return;
                }
                let a = (v * 255.0) as u8;
                if a == 0 {
                    return;
                }
                let dst = img.get_pixel_mut(px, py);
                let sa = a as f32 / 255.0;
                let inv = 1.0 - sa;
                dst.0[0] = (color.0[0] as f32 * sa + dst.0[0] as f32 * inv) as u8;
                dst.0[1] = (color.0[1] as f32 * sa + dst.0[1] as f32 * inv) as u8;
                dst.0[2] = (color.0[2] as f32 * sa + dst.0[2] as f32 * inv) as u8;
                dst.0[3] = 255;
            });
        }
        caret_x += glyph.unpositioned().h_metrics().advance_width;
    }
}

pub fn overlay_alpha(base: &mut Canvas, over: &Canvas, x: i32, y: i32) {
    for oy in 0..over.height() {
        for ox in 0..over.width() {
            let p = over.get_pixel(ox, oy);
            let a = p.0[3] as f32 / 255.0;
            if a <= 0.0 {
                continue;
            }
            let bx = x + ox as i32;
            let by = y + oy as i32;
            if bx < 0 || by < 0 {
                continue;
            }
            let (bx, by) = (bx as u32, by as u32);
            if bx >= base.width() || by >= base.height() {
                continue;
            }
            let dst = base.get_pixel_mut(bx, by);
            let inv = 1.0 - a;
            dst.0[0] = (p.0[0] as f32 * a + dst.0[0] as f32 * inv) as u8;
            dst.0[1] = (p.0[1] as f32 * a + dst.0[1] as f32 * inv) as u8;
            dst.0[2] = (p.0[2] as f32 * a + dst.0[2] as f32 * inv) as u8;
            dst.0[3] = 255;
        }
    }
}

/// Scale-and-crop a photo to fill the slot exactly, flattening any
/// transparency onto white first.
fn cover_crop(img: DynamicImage, width: u32, height: u32) -> Canvas {
    let mut img = img.to_rgba8();

    for p in img.pixels_mut() {
        if p.0[3] < 255 {
            let a = p.0[3] as f32 / 255.0;
            let inv = 1.0 - a;
            p.0[0] = (p.0[0] as f32 * a + 255.0 * inv) as u8;
            p.0[1] = (p.0[1] as f32 * a + 255.0 * inv) as u8;
            p.0[2] = (p.0[2] as f32 * a + 255.0 * inv) as u8;
            p.0[3] = 255;
        }
    }

    let (src_w, src_h) = img.dimensions();
    // Widest crop of the source matching the slot aspect.
    let crop_w = src_w.min(src_h * width / height).max(1);
    let crop_h = src_h.min(src_w * height / width).max(1);
    let left = (src_w - crop_w) / 2;
    let top = (src_h - crop_h) / 2;
    let cropped = image::imageops::crop(&mut img, left, top, crop_w, crop_h).to_image();
    image::imageops::resize(&cropped, width, height, image::imageops::FilterType::Lanczos3)
}
