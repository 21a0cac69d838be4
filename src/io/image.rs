//! Image file import into calibrated stacks
//!
//! Grayscale files give one channel and colour files three (alpha dropped).
//! Animated GIF frames become Z slices. Integer samples keep their stored
//! values so fibre intensities stay in the acquisition's units.

use crate::io::configuration::SUPPORTED_EXTENSIONS;
use crate::io::error::{AnalysisError, Result, WithContext, invalid_source};
use crate::spatial::image::{Calibration, ImageStack};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ColorType, DynamicImage, RgbaImage};
use ndarray::{Array3, Array4, Axis, stack};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Whether `path` has an importable image extension
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(ext))
        })
}

fn is_gif(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gif"))
}

/// Load an image file as a stack titled by its file name
///
/// # Errors
///
/// Returns an error if:
/// - The extension is not supported
/// - The file cannot be opened or decoded
/// - A multi-frame file has frames of differing sizes
pub fn load_stack(path: &Path, calibration: &Calibration) -> Result<ImageStack> {
    if !is_supported(path) {
        return Err(AnalysisError::UnsupportedFile {
            path: path.to_path_buf(),
        });
    }

    let title = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let planes = if is_gif(path) {
        load_gif_frames(path)?
    } else {
        let img = image::open(path).map_err(|e| AnalysisError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?;
        let channels = channel_planes(&img);
        channels.insert_axis(Axis(0))
    };

    ImageStack::new(title, planes, calibration.clone())
}

fn load_gif_frames(path: &Path) -> Result<Array4<f64>> {
    let file = File::open(path).with_operation(path, "open")?;
    let decoder = GifDecoder::new(BufReader::new(file)).with_path(path)?;
    let frames = decoder.into_frames().collect_frames().with_path(path)?;

    let slices: Vec<Array3<f64>> = frames
        .into_iter()
        .map(|frame| rgba_planes(frame.buffer()))
        .collect();
    let views: Vec<_> = slices.iter().map(|slice| slice.view()).collect();

    stack(Axis(0), &views).map_err(|e| invalid_source(&format!("{}: {e}", path.display())))
}

fn rgba_planes(buffer: &RgbaImage) -> Array3<f64> {
    let (width, height) = (buffer.width() as usize, buffer.height() as usize);
    Array3::from_shape_fn((3, height, width), |(c, row, col)| {
        buffer
            .get_pixel_checked(col as u32, row as u32)
            .and_then(|pixel| pixel.0.get(c).copied())
            .map_or(0.0, f64::from)
    })
}

/// Split a decoded image into (channel, row, col) planes
pub fn channel_planes(img: &DynamicImage) -> Array3<f64> {
    let (width, height) = (img.width() as usize, img.height() as usize);

    match img.color() {
        ColorType::L8 | ColorType::La8 => {
            let luma = img.to_luma8();
            Array3::from_shape_fn((1, height, width), |(_, row, col)| {
                f64::from(luma.get_pixel(col as u32, row as u32).0[0])
            })
        }
        ColorType::L16 | ColorType::La16 => {
            let luma = img.to_luma16();
            Array3::from_shape_fn((1, height, width), |(_, row, col)| {
                f64::from(luma.get_pixel(col as u32, row as u32).0[0])
            })
        }
        ColorType::Rgb16 | ColorType::Rgba16 => {
            let rgb = img.to_rgb16();
            Array3::from_shape_fn((3, height, width), |(c, row, col)| {
                rgb.get_pixel_checked(col as u32, row as u32)
                    .and_then(|pixel| pixel.0.get(c).copied())
                    .map_or(0.0, f64::from)
            })
        }
        ColorType::Rgb32F | ColorType::Rgba32F => {
            let rgb = img.to_rgb32f();
            Array3::from_shape_fn((3, height, width), |(c, row, col)| {
                rgb.get_pixel_checked(col as u32, row as u32)
                    .and_then(|pixel| pixel.0.get(c).copied())
                    .map_or(0.0, f64::from)
            })
        }
        _ => {
            let rgb = img.to_rgb8();
            Array3::from_shape_fn((3, height, width), |(c, row, col)| {
                rgb.get_pixel_checked(col as u32, row as u32)
                    .and_then(|pixel| pixel.0.get(c).copied())
                    .map_or(0.0, f64::from)
            })
        }
    }
}
