//! Bar chart rasterizer
//!
//! Renders a `type_distribution` as a 600x400 vertical bar chart: one bar per
//! distinct type, integer count annotated above each bar, type names along
//! the x axis and a "Count" label on the y axis. Text is drawn with an
//! embedded 5x7 bitmap font so no font files are loaded (lowercase letters
//! reuse the uppercase forms).
//!
//! Empty-distribution policy: a centered "No Data Available" placeholder is
//! rendered. Rendering never fails on empty data; the only failure mode is
//! PNG encoding.

use super::ReportError;
use crate::models::TypeDistribution;
use image::{ImageEncoder, Rgb, RgbImage};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const GRID: Rgb<u8> = Rgb([220, 220, 220]);
// The product's chart blue (#4F81BD).
const BAR: Rgb<u8> = Rgb([79, 129, 189]);

// Plot geometry in pixels.
const PLOT_LEFT: u32 = 60;
const PLOT_RIGHT: u32 = 580;
const PLOT_TOP: u32 = 60;
const BASELINE: u32 = 340;
const MAX_BAR_HEIGHT: u32 = 260;

/// Renderer producing the distribution bar chart raster.
pub struct ChartRenderer;

impl ChartRenderer {
    pub const WIDTH: u32 = 600;
    pub const HEIGHT: u32 = 400;

    pub fn new() -> Self {
        Self
    }

    /// Render the chart as PNG bytes.
    pub fn render_png(&self, distribution: &TypeDistribution) -> Result<Vec<u8>, ReportError> {
        let img = self.rasterize(distribution);
        let mut buffer = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buffer);
        encoder
            .write_image(
                &img.into_raw(),
                Self::WIDTH,
                Self::HEIGHT,
                image::ColorType::Rgb8,
            )
            .map_err(|e| ReportError::ImageEncoding(e.to_string()))?;
        Ok(buffer)
    }

    /// Render the chart as a raw RGB raster. Deterministic for an identical
    /// distribution; the composer embeds this directly into the PDF.
    pub(crate) fn rasterize(&self, distribution: &TypeDistribution) -> RgbImage {
        let mut img = RgbImage::from_pixel(Self::WIDTH, Self::HEIGHT, WHITE);

        let title = "Equipment Type Distribution";
        let title_x = (Self::WIDTH.saturating_sub(text_width(title, 2))) / 2;
        draw_text(&mut img, title, title_x, 14, 2, BLACK);

        if distribution.is_empty() {
            let notice = "No Data Available";
            let x = (Self::WIDTH.saturating_sub(text_width(notice, 2))) / 2;
            draw_text(&mut img, notice, x, Self::HEIGHT / 2 - 7, 2, BLACK);
            return img;
        }

        // Horizontal grid lines under everything else.
        for step in 1..=4u32 {
            let y = BASELINE - MAX_BAR_HEIGHT * step / 4;
            hline(&mut img, PLOT_LEFT, PLOT_RIGHT, y, GRID);
        }

        // Axes and labels.
        vline(&mut img, PLOT_LEFT, PLOT_TOP, BASELINE, BLACK);
        hline(&mut img, PLOT_LEFT, PLOT_RIGHT, BASELINE, BLACK);
        draw_text(&mut img, "Count", 6, 46, 1, BLACK);

        let max_count = distribution.values().copied().max().unwrap_or(1).max(1);
        let max_label = max_count.to_string();
        draw_text(
            &mut img,
            "0",
            PLOT_LEFT - 4 - text_width("0", 1),
            BASELINE - 3,
            1,
            BLACK,
        );
        draw_text(
            &mut img,
            &max_label,
            PLOT_LEFT.saturating_sub(4 + text_width(&max_label, 1)),
            BASELINE - MAX_BAR_HEIGHT - 3,
            1,
            BLACK,
        );

        let n = distribution.len() as u32;
        let plot_width = PLOT_RIGHT - PLOT_LEFT;
        let slot = (plot_width / n).max(1);
        let bar_width = (slot * 3 / 5).max(1);

        for (i, (name, &count)) in distribution.iter().enumerate() {
            let slot_x = PLOT_LEFT + i as u32 * slot;
            let bar_x = slot_x + (slot - bar_width) / 2;
            let bar_height = ((count as u64 * MAX_BAR_HEIGHT as u64) / max_count) as u32;

            if bar_height > 0 {
                fill_rect(
                    &mut img,
                    bar_x,
                    BASELINE - bar_height,
                    bar_width,
                    bar_height,
                    BAR,
                );
            }

            // Integer count centered above the bar.
            let label = count.to_string();
            let label_x = slot_x + (slot.saturating_sub(text_width(&label, 1))) / 2;
            let label_y = (BASELINE - bar_height).saturating_sub(12).max(PLOT_TOP - 14);
            draw_text(&mut img, &label, label_x, label_y, 1, BLACK);

            // Type name under the axis, truncated to its slot.
            let max_chars = ((slot / 6).saturating_sub(1)) as usize;
            let shown: String = name.chars().take(max_chars.max(1)).collect();
            let name_x = slot_x + (slot.saturating_sub(text_width(&shown, 1))) / 2;
            draw_text(&mut img, &shown, name_x, BASELINE + 8, 1, BLACK);
        }

        img
    }
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    for px in x..(x + w).min(img.width()) {
        for py in y..(y + h).min(img.height()) {
            img.put_pixel(px, py, color);
        }
    }
}

fn hline(img: &mut RgbImage, x0: u32, x1: u32, y: u32, color: Rgb<u8>) {
    if y < img.height() {
        for x in x0..=x1.min(img.width() - 1) {
            img.put_pixel(x, y, color);
        }
    }
}

fn vline(img: &mut RgbImage, x: u32, y0: u32, y1: u32, color: Rgb<u8>) {
    if x < img.width() {
        for y in y0..=y1.min(img.height() - 1) {
            img.put_pixel(x, y, color);
        }
    }
}

/// Pixel width of a string at the given scale (6 columns per glyph cell).
fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * 6 * scale
}

fn draw_text(img: &mut RgbImage, text: &str, x: u32, y: u32, scale: u32, color: Rgb<u8>) {
    let mut cursor = x;
    for ch in text.chars() {
        if let Some(columns) = glyph(ch) {
            for (cx, column) in columns.iter().enumerate() {
                for cy in 0..7u32 {
                    if column & (1 << cy) != 0 {
                        fill_rect(
                            img,
                            cursor + cx as u32 * scale,
                            y + cy * scale,
                            scale,
                            scale,
                            color,
                        );
                    }
                }
            }
        }
        cursor += 6 * scale;
    }
}

/// 5x7 bitmap glyphs, column-major, least significant bit at the top row.
/// Unknown characters render as blanks.
fn glyph(ch: char) -> Option<[u8; 5]> {
    let ch = if ch.is_ascii_lowercase() {
        ch.to_ascii_uppercase()
    } else {
        ch
    };
    let columns = match ch {
        ' ' => [0x00, 0x00, 0x00, 0x00, 0x00],
        '#' => [0x14, 0x7F, 0x14, 0x7F, 0x14],
        '%' => [0x23, 0x13, 0x08, 0x64, 0x62],
        '-' => [0x08, 0x08, 0x08, 0x08, 0x08],
        '.' => [0x00, 0x60, 0x60, 0x00, 0x00],
        '/' => [0x20, 0x10, 0x08, 0x04, 0x02],
        ':' => [0x00, 0x36, 0x36, 0x00, 0x00],
        '_' => [0x40, 0x40, 0x40, 0x40, 0x40],
        '0' => [0x3E, 0x51, 0x49, 0x45, 0x3E],
        '1' => [0x00, 0x42, 0x7F, 0x40, 0x00],
        '2' => [0x42, 0x61, 0x51, 0x49, 0x46],
        '3' => [0x21, 0x41, 0x45, 0x4B, 0x31],
        '4' => [0x18, 0x14, 0x12, 0x7F, 0x10],
        '5' => [0x27, 0x45, 0x45, 0x45, 0x39],
        '6' => [0x3C, 0x4A, 0x49, 0x49, 0x30],
        '7' => [0x01, 0x71, 0x09, 0x05, 0x03],
        '8' => [0x36, 0x49, 0x49, 0x49, 0x36],
        '9' => [0x06, 0x49, 0x49, 0x29, 0x1E],
        'A' => [0x7E, 0x11, 0x11, 0x11, 0x7E],
        'B' => [0x7F, 0x49, 0x49, 0x49, 0x36],
        'C' => [0x3E, 0x41, 0x41, 0x41, 0x22],
        'D' => [0x7F, 0x41, 0x41, 0x22, 0x1C],
        'E' => [0x7F, 0x49, 0x49, 0x49, 0x41],
        'F' => [0x7F, 0x09, 0x09, 0x09, 0x01],
        'G' => [0x3E, 0x41, 0x49, 0x49, 0x7A],
        'H' => [0x7F, 0x08, 0x08, 0x08, 0x7F],
        'I' => [0x00, 0x41, 0x7F, 0x41, 0x00],
        'J' => [0x20, 0x40, 0x41, 0x3F, 0x01],
        'K' => [0x7F, 0x08, 0x14, 0x22, 0x41],
        'L' => [0x7F, 0x40, 0x40, 0x40, 0x40],
        'M' => [0x7F, 0x02, 0x0C, 0x02, 0x7F],
        'N' => [0x7F, 0x04, 0x08, 0x10, 0x7F],
        'O' => [0x3E, 0x41, 0x41, 0x41, 0x3E],
        'P' => [0x7F, 0x09, 0x09, 0x09, 0x06],
        'Q' => [0x3E, 0x41, 0x51, 0x21, 0x5E],
        'R' => [0x7F, 0x09, 0x19, 0x29, 0x46],
        'S' => [0x46, 0x49, 0x49, 0x49, 0x31],
        'T' => [0x01, 0x01, 0x7F, 0x01, 0x01],
        'U' => [0x3F, 0x40, 0x40, 0x40, 0x3F],
        'V' => [0x1F, 0x20, 0x40, 0x20, 0x1F],
        'W' => [0x3F, 0x40, 0x38, 0x40, 0x3F],
        'X' => [0x63, 0x14, 0x08, 0x14, 0x63],
        'Y' => [0x07, 0x08, 0x70, 0x08, 0x07],
        'Z' => [0x61, 0x51, 0x49, 0x45, 0x43],
        _ => return None,
    };
    Some(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TypeDistribution;

    fn dist(entries: &[(&str, u64)]) -> TypeDistribution {
        entries
            .iter()
            .map(|(name, count)| (name.to_string(), *count))
            .collect()
    }

    #[test]
    fn test_png_output_has_signature_and_size() {
        let png = ChartRenderer::new()
            .render_png(&dist(&[("Pump", 3), ("Valve", 1)]))
            .unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let renderer = ChartRenderer::new();
        let d = dist(&[("Pump", 3), ("Valve", 1), ("Compressor", 2)]);
        assert_eq!(renderer.render_png(&d).unwrap(), renderer.render_png(&d).unwrap());
    }

    #[test]
    fn test_empty_distribution_renders_placeholder() {
        // Unified policy: never an error, a placeholder raster instead.
        let renderer = ChartRenderer::new();
        let empty = renderer.rasterize(&TypeDistribution::new());
        assert_eq!(empty.dimensions(), (ChartRenderer::WIDTH, ChartRenderer::HEIGHT));

        // The placeholder draws some dark pixels on the white canvas.
        let dark = empty.pixels().filter(|p| p.0 == [0, 0, 0]).count();
        assert!(dark > 0);
    }

    #[test]
    fn test_bars_scale_with_counts() {
        let renderer = ChartRenderer::new();
        let img = renderer.rasterize(&dist(&[("Pump", 4), ("Valve", 1)]));
        let bar_pixels = img.pixels().filter(|p| p.0 == [79, 129, 189]).count();

        let img_single = renderer.rasterize(&dist(&[("Pump", 4)]));
        let single_pixels = img_single.pixels().filter(|p| p.0 == [79, 129, 189]).count();

        assert!(bar_pixels > 0);
        assert!(single_pixels > 0);
    }
}
