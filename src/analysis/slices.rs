//! Representative slice selection for multi-slice stacks

use crate::io::configuration::SLICE_TITLE_INFIX;
use crate::io::error::{Result, invalid_parameter};
use crate::spatial::image::{ImageStack, IntensityImage};

/// The slice chosen to represent a stack
#[derive(Debug, Clone)]
pub struct SliceSelection {
    /// Z index of the chosen slice
    pub index: usize,
    /// Reference-channel plane of that slice, titled `{stack}-Z{index}`
    pub image: IntensityImage,
}

/// Pick the slice whose reference-channel plane has the highest mean intensity
///
/// The first slice wins ties.
///
/// # Errors
///
/// Returns an error if `channel` is not a channel of `stack`
pub fn select_brightest_slice(stack: &ImageStack, channel: usize) -> Result<SliceSelection> {
    if channel >= stack.channels() {
        return Err(invalid_parameter(
            "channel",
            &channel,
            &format!("stack has {} channel(s)", stack.channels()),
        ));
    }

    let mut best: Option<(usize, f64)> = None;
    for z in 0..stack.slices() {
        let mean = stack
            .plane(z, channel)
            .and_then(|plane| plane.mean())
            .unwrap_or(f64::NEG_INFINITY);
        if best.is_none_or(|(_, best_mean)| mean > best_mean) {
            best = Some((z, mean));
        }
    }

    let index = best.map_or(0, |(z, _)| z);
    let pixels = stack
        .plane(index, channel)
        .map(|plane| plane.to_owned())
        .ok_or_else(|| invalid_parameter("slice", &index, &"stack has no slices"))?;

    let title = format!("{}{SLICE_TITLE_INFIX}{index}", stack.title());
    Ok(SliceSelection {
        index,
        image: IntensityImage::new(title, pixels, stack.calibration().clone()),
    })
}
