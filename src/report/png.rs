//! Raster export of the combined figure.
//!
//! The figure is drawn straight into an [`RgbaImage`]: a title, then two stacked panels
//! (level distribution bars above, per-level lines below), each with its own axis titles.

use super::{
    ChartData, BAR_TITLE, BAR_X_TITLE, BAR_Y_TITLE, LINE_TITLE, LINE_Y_TITLE,
};
use crate::config::ChartConfig;
use crate::error::ReportError;
use ::image::{Rgba, RgbaImage};
use font8x8::{UnicodeFonts, BASIC_FONTS};
use std::path::Path;
use tracing::info;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const PLOT_AREA: Rgba<u8> = Rgba([229, 236, 246, 255]);
const AXIS: Rgba<u8> = Rgba([68, 68, 68, 255]);
const TEXT: Rgba<u8> = Rgba([42, 63, 95, 255]);

const MARGIN_LEFT: i64 = 90;
const MARGIN_RIGHT: i64 = 200;
const MARGIN_TOP: i64 = 60;
const MARGIN_BOTTOM: i64 = 10;
const PANEL_HEADER: i64 = 30;
const PANEL_FOOTER: i64 = 60;

/// Glyph cell of the bitmap font, in unscaled pixels. The font leaves its own spacing.
const GLYPH_SIZE: i64 = 8;

/// Render `chart` and write it to `path`. The image format follows the file extension.
pub fn write_png(chart: &ChartData, config: &ChartConfig, path: &Path) -> Result<(), ReportError> {
    let image = render(chart, config);
    image.save(path).map_err(|source| ReportError::Image {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), width = config.width, height = config.height, "Wrote chart image");
    Ok(())
}

/// Render the combined figure into an in-memory image.
pub fn render(chart: &ChartData, config: &ChartConfig) -> RgbaImage {
    let mut canvas = Canvas::new(config.width, config.height);

    let width = i64::from(config.width);
    let height = i64::from(config.height);
    canvas.text_centered(&config.title, width / 2, 18, 3, TEXT);

    let slot = (height - MARGIN_TOP - MARGIN_BOTTOM) / 2;
    let upper = Panel::in_slot(MARGIN_TOP, slot, width);
    let lower = Panel::in_slot(MARGIN_TOP + slot, slot, width);

    draw_bars(&mut canvas, chart, &upper);
    draw_lines(&mut canvas, chart, &lower);

    canvas.image
}

/// Plot rectangle of one panel, in pixels.
struct Panel {
    top: i64,
    bottom: i64,
    left: i64,
    right: i64,
}

impl Panel {
    fn in_slot(slot_top: i64, slot_height: i64, width: i64) -> Self {
        Self {
            top: slot_top + PANEL_HEADER,
            bottom: slot_top + slot_height - PANEL_FOOTER,
            left: MARGIN_LEFT,
            right: width - MARGIN_RIGHT,
        }
    }

    fn width(&self) -> i64 {
        (self.right - self.left).max(1)
    }

    fn height(&self) -> i64 {
        (self.bottom - self.top).max(1)
    }

    fn center_x(&self) -> i64 {
        (self.left + self.right) / 2
    }

    fn frame(&self, canvas: &mut Canvas, title: &str, x_title: &str, y_title: &str) {
        canvas.fill_rect(self.left, self.top, self.right, self.bottom, PLOT_AREA);
        canvas.line(self.left, self.bottom, self.right, self.bottom, AXIS);
        canvas.line(self.left, self.top, self.left, self.bottom, AXIS);

        canvas.text_centered(title, self.center_x(), self.top - 22, 2, TEXT);
        canvas.text_centered(x_title, self.center_x(), self.bottom + 36, 2, TEXT);
        canvas.text_vertical(y_title, 14, (self.top + self.bottom) / 2, 2, TEXT);
    }
}

fn draw_bars(canvas: &mut Canvas, chart: &ChartData, panel: &Panel) {
    panel.frame(canvas, BAR_TITLE, BAR_X_TITLE, BAR_Y_TITLE);

    let max_count = chart.max_count().max(1) as i64;
    canvas.text_right("0", panel.left - 6, panel.bottom - 7, 2, TEXT);
    canvas.text_right(&max_count.to_string(), panel.left - 6, panel.top, 2, TEXT);

    if chart.bars.is_empty() {
        return;
    }

    let band = panel.width() / chart.bars.len() as i64;
    let bar_width = (band * 3 / 5).max(1);

    for (index, bar) in chart.bars.iter().enumerate() {
        let center = panel.left + band * index as i64 + band / 2;
        let bar_height = panel.height() * bar.count as i64 / max_count;
        let top = panel.bottom - bar_height;
        canvas.fill_rect(
            center - bar_width / 2,
            top,
            center + bar_width / 2,
            panel.bottom,
            color(bar.level.rgb()),
        );
        canvas.text_centered(&bar.count.to_string(), center, top - 18, 2, TEXT);
        canvas.text_centered(bar.level.as_str(), center, panel.bottom + 8, 2, TEXT);
    }
}

fn draw_lines(canvas: &mut Canvas, chart: &ChartData, panel: &Panel) {
    panel.frame(canvas, LINE_TITLE, chart.axis.title(), LINE_Y_TITLE);

    let (x_min, x_max) = chart.x_range();
    let (y_min, y_max) = chart.y_range();
    canvas.text_right(&y_min.to_string(), panel.left - 6, panel.bottom - 7, 2, TEXT);
    canvas.text_right(&y_max.to_string(), panel.left - 6, panel.top, 2, TEXT);
    if let Some((first, last)) = chart.x_labels() {
        canvas.text(first, panel.left, panel.bottom + 8, 2, TEXT);
        canvas.text_right(last, panel.right, panel.bottom + 8, 2, TEXT);
    }

    let project = |x: i64, y: i64| -> (i64, i64) {
        let px = scale(x, x_min, x_max, panel.left, panel.right);
        let py = scale(y, y_min, y_max, panel.bottom, panel.top);
        (px, py)
    };

    for (index, series) in chart.lines.iter().enumerate() {
        let pixel = color(series.level.rgb());
        let mut previous: Option<(i64, i64)> = None;

        for point in &series.points {
            let (x, y) = project(point.x, point.value);
            if let Some((px, py)) = previous {
                canvas.line(px, py, x, y, pixel);
                canvas.line(px, py + 1, x, y + 1, pixel);
            }
            canvas.fill_rect(x - 2, y - 2, x + 2, y + 2, pixel);
            previous = Some((x, y));
        }

        // Legend
        let legend_x = panel.right + 16;
        let legend_y = panel.top + 8 + index as i64 * 24;
        canvas.fill_rect(legend_x, legend_y + 5, legend_x + 24, legend_y + 8, pixel);
        canvas.text(series.level.as_str(), legend_x + 32, legend_y, 2, TEXT);
    }
}

/// Map `value` from `[lo, hi]` onto the pixel range `[from, to]`; a flat range maps to the middle.
fn scale(value: i64, lo: i64, hi: i64, from: i64, to: i64) -> i64 {
    if hi == lo {
        return (from + to) / 2;
    }
    // Values may span the whole i64 range, so the differences are taken in f64.
    let ratio = (value as f64 - lo as f64) / (hi as f64 - lo as f64);
    from + (ratio * (to - from) as f64).round() as i64
}

fn color(rgb: [u8; 3]) -> Rgba<u8> {
    Rgba([rgb[0], rgb[1], rgb[2], 255])
}

/// Rows of the 8x8 glyph for `c`, top to bottom, bit 0 leftmost. Characters outside the
/// basic Latin block render as `?`.
fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn text_width(text: &str, scale: u32) -> i64 {
    text.chars().count() as i64 * GLYPH_SIZE * i64::from(scale)
}

/// Thin drawing layer over [`RgbaImage`] that clips everything to the image bounds.
struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, BACKGROUND),
        }
    }

    fn put(&mut self, x: i64, y: i64, pixel: Rgba<u8>) {
        let (width, height) = self.image.dimensions();
        if x >= 0 && y >= 0 && x < i64::from(width) && y < i64::from(height) {
            self.image.put_pixel(x as u32, y as u32, pixel);
        }
    }

    fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, pixel: Rgba<u8>) {
        for y in y0.min(y1)..=y0.max(y1) {
            for x in x0.min(x1)..=x0.max(x1) {
                self.put(x, y, pixel);
            }
        }
    }

    /// Bresenham line between two points
    fn line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, pixel: Rgba<u8>) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.put(x, y, pixel);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn glyph(&mut self, c: char, x: i64, y: i64, scale: u32, pixel: Rgba<u8>) {
        let s = i64::from(scale);
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                if bits & (1 << col) != 0 {
                    let gx = x + col * s;
                    let gy = y + row as i64 * s;
                    self.fill_rect(gx, gy, gx + s - 1, gy + s - 1, pixel);
                }
            }
        }
    }

    fn text(&mut self, text: &str, x: i64, y: i64, scale: u32, pixel: Rgba<u8>) {
        let advance = GLYPH_SIZE * i64::from(scale);
        for (index, c) in text.chars().enumerate() {
            self.glyph(c, x + index as i64 * advance, y, scale, pixel);
        }
    }

    fn text_centered(&mut self, text: &str, center: i64, y: i64, scale: u32, pixel: Rgba<u8>) {
        let width = text_width(text, scale);
        self.text(text, center - width / 2, y, scale, pixel);
    }

    fn text_right(&mut self, text: &str, right: i64, y: i64, scale: u32, pixel: Rgba<u8>) {
        let width = text_width(text, scale);
        self.text(text, right - width, y, scale, pixel);
    }

    /// Glyphs stacked top to bottom, centred on `center_y`
    fn text_vertical(&mut self, text: &str, x: i64, center_y: i64, scale: u32, pixel: Rgba<u8>) {
        let advance = (GLYPH_SIZE + 2) * i64::from(scale);
        let total = advance * text.chars().count() as i64;
        let top = center_y - total / 2;
        for (index, c) in text.chars().enumerate() {
            self.glyph(c, x, top + index as i64 * advance, scale, pixel);
        }
    }
}
