//! Display rendering: grayscale slice with the tile overlay burned in

use crate::analysis::overlay::{Annotation, Colour, Overlay, Point};
use crate::io::error::{AnalysisError, Result};
use crate::spatial::image::IntensityImage;
use image::{Rgba, RgbaImage};
use std::collections::HashSet;
use std::path::Path;

/// Arrow head wing length relative to the head size
const HEAD_LENGTH_FACTOR: f64 = 2.5;
/// Half-angle between an arrow shaft and each head wing
const HEAD_HALF_ANGLE: f64 = std::f64::consts::FRAC_PI_6;
/// Pixels per glyph cell of the label font
const GLYPH_SCALE: i64 = 2;

// 3x5 bitmap digits, one row per entry, most significant bit on the left
const DIGIT_GLYPHS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// Map an image linearly from its min..max onto opaque gray levels
///
/// A flat image renders mid-gray.
pub fn grayscale_display(image: &IntensityImage) -> RgbaImage {
    let pixels = image.pixels();
    let (min, max) = pixels
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;

    let mut canvas = RgbaImage::new(image.width() as u32, image.height() as u32);
    for ((row, col), &value) in pixels.indexed_iter() {
        let level = if range > 0.0 && range.is_finite() {
            (((value - min) / range) * 255.0).round().clamp(0.0, 255.0) as u8
        } else {
            128
        };
        canvas.put_pixel(col as u32, row as u32, Rgba([level, level, level, 255]));
    }
    canvas
}

fn blend(canvas: &mut RgbaImage, x: i64, y: i64, colour: [u8; 4]) {
    if x < 0 || y < 0 {
        return;
    }
    let Some(pixel) = canvas.get_pixel_mut_checked(x as u32, y as u32) else {
        return;
    };
    let alpha = f32::from(colour[3]) / 255.0;
    for (dst, &src) in pixel.0.iter_mut().zip(colour.iter()).take(3) {
        *dst = (f32::from(src) * alpha + f32::from(*dst) * (1.0 - alpha)).round() as u8;
    }
    pixel.0[3] = 255;
}

fn paint(canvas: &mut RgbaImage, pixels: &HashSet<(i64, i64)>, colour: Colour) {
    let rgba = colour.to_rgba8();
    for &(x, y) in pixels {
        blend(canvas, x, y, rgba);
    }
}

// Pixels covered by a segment of the given width
fn stroke_pixels(from: Point, to: Point, width: f64, pixels: &mut HashSet<(i64, i64)>) {
    let length = (to.x - from.x).hypot(to.y - from.y);
    let samples = (length * 2.0).ceil().max(1.0) as usize;
    let radius = (width / 2.0).max(0.5);
    let reach = radius.ceil() as i64;

    for i in 0..=samples {
        let t = i as f64 / samples as f64;
        let cx = (to.x - from.x).mul_add(t, from.x);
        let cy = (to.y - from.y).mul_add(t, from.y);
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let px = cx.round() as i64 + dx;
                let py = cy.round() as i64 + dy;
                if (px as f64 - cx).hypot(py as f64 - cy) <= radius {
                    pixels.insert((px, py));
                }
            }
        }
    }
}

fn head_pixels(
    tip: Point,
    tail: Point,
    head_size: f64,
    width: f64,
    pixels: &mut HashSet<(i64, i64)>,
) {
    let length = (tip.x - tail.x).hypot(tip.y - tail.y);
    if length == 0.0 {
        return;
    }
    let back = ((tail.x - tip.x) / length, (tail.y - tip.y) / length);
    let wing = head_size * HEAD_LENGTH_FACTOR;

    for angle in [HEAD_HALF_ANGLE, -HEAD_HALF_ANGLE] {
        let (sin, cos) = angle.sin_cos();
        let end = Point::new(
            tip.x + wing * back.0.mul_add(cos, -back.1 * sin),
            tip.y + wing * back.0.mul_add(sin, back.1 * cos),
        );
        stroke_pixels(tip, end, width, pixels);
    }
}

fn label_pixels(text: &str, position: Point, pixels: &mut HashSet<(i64, i64)>) {
    let origin_x = position.x.round() as i64;
    let origin_y = position.y.round() as i64;

    for (slot, digit) in text.chars().filter_map(|c| c.to_digit(10)).enumerate() {
        let Some(glyph) = DIGIT_GLYPHS.get(digit as usize) else {
            continue;
        };
        let glyph_x = origin_x + slot as i64 * 4 * GLYPH_SCALE;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..3 {
                if bits & (0b100 >> col) == 0 {
                    continue;
                }
                for sy in 0..GLYPH_SCALE {
                    for sx in 0..GLYPH_SCALE {
                        pixels.insert((
                            glyph_x + col * GLYPH_SCALE + sx,
                            origin_y + row as i64 * GLYPH_SCALE + sy,
                        ));
                    }
                }
            }
        }
    }
}

/// Draw every annotation of `overlay` onto `canvas`
///
/// Regions are drawn as translucent outlines, arrows with open heads, and
/// labels in a small bitmap digit font.
pub fn draw_overlay(canvas: &mut RgbaImage, overlay: &Overlay) {
    for annotation in overlay.annotations() {
        let mut pixels = HashSet::new();
        let colour = match annotation {
            Annotation::Region {
                x,
                y,
                width,
                height,
                colour,
            } => {
                let corners = [
                    Point::new(*x, *y),
                    Point::new(x + width - 1.0, *y),
                    Point::new(x + width - 1.0, y + height - 1.0),
                    Point::new(*x, y + height - 1.0),
                ];
                for (i, &corner) in corners.iter().enumerate() {
                    let next = corners.get((i + 1) % corners.len()).copied().unwrap_or(corner);
                    stroke_pixels(corner, next, 1.0, &mut pixels);
                }
                *colour
            }
            Annotation::Arrow {
                start,
                end,
                double_headed,
                stroke_width,
                head_size,
                colour,
                ..
            } => {
                stroke_pixels(*start, *end, *stroke_width, &mut pixels);
                head_pixels(*end, *start, *head_size, *stroke_width, &mut pixels);
                if *double_headed {
                    head_pixels(*start, *end, *head_size, *stroke_width, &mut pixels);
                }
                *colour
            }
            Annotation::Label {
                text,
                position,
                colour,
            } => {
                label_pixels(text, *position, &mut pixels);
                *colour
            }
        };
        paint(canvas, &pixels, colour);
    }
}

/// Render `image` in grayscale with `overlay` on top and save it as PNG
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_display_png(
    image: &IntensityImage,
    overlay: &Overlay,
    output_path: &Path,
) -> Result<()> {
    let mut canvas = grayscale_display(image);
    draw_overlay(&mut canvas, overlay);

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AnalysisError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    canvas
        .save(output_path)
        .map_err(|e| AnalysisError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
