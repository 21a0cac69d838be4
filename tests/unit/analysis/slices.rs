//! Tests for brightest-slice selection

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use fibrescore::AnalysisError;
    use fibrescore::analysis::slices::select_brightest_slice;
    use fibrescore::spatial::image::{Calibration, ImageStack};
    use ndarray::Array4;

    fn stack_with_means(means: &[[f64; 2]]) -> ImageStack {
        let planes = Array4::from_shape_fn((means.len(), 2, 4, 4), |(z, c, _, _)| means[z][c]);
        ImageStack::new("cells.tif", planes, Calibration::default()).unwrap()
    }

    // Tests the slice with the brightest reference channel is chosen
    // Verified by selecting on channel 0 regardless of the argument
    #[test]
    fn test_selects_brightest_in_reference_channel() {
        let stack = stack_with_means(&[[9.0, 1.0], [0.0, 3.0], [5.0, 2.0]]);

        let selection = select_brightest_slice(&stack, 1).unwrap();
        assert_eq!(selection.index, 1);
        assert_eq!(selection.image.title(), "cells.tif-Z1");
        assert_relative_eq!(selection.image.mean(), 3.0);

        let other = select_brightest_slice(&stack, 0).unwrap();
        assert_eq!(other.index, 0);
        assert_eq!(other.image.title(), "cells.tif-Z0");
    }

    // Tests the earliest slice wins ties
    #[test]
    fn test_tie_keeps_first() {
        let stack = stack_with_means(&[[0.0, 2.0], [0.0, 4.0], [0.0, 4.0]]);
        assert_eq!(select_brightest_slice(&stack, 1).unwrap().index, 1);
    }

    // Tests the selected plane keeps the stack calibration
    #[test]
    fn test_keeps_calibration() {
        let calibration = Calibration {
            pixel_width: 0.1,
            pixel_height: 0.1,
            unit: "micron".to_string(),
        };
        let stack = ImageStack::new("c", Array4::ones((1, 1, 3, 3)), calibration.clone()).unwrap();
        let selection = select_brightest_slice(&stack, 0).unwrap();
        assert_eq!(selection.image.calibration(), &calibration);
    }

    // Tests a missing channel is rejected
    #[test]
    fn test_missing_channel() {
        let stack = stack_with_means(&[[1.0, 1.0]]);
        assert!(matches!(
            select_brightest_slice(&stack, 2),
            Err(AnalysisError::InvalidParameter {
                parameter: "channel",
                ..
            })
        ));
    }
}
