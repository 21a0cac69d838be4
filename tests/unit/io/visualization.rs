//! Tests for display rendering and overlay drawing

#[cfg(test)]
mod tests {
    use fibrescore::analysis::overlay::{Annotation, ArrowStyle, Colour, Overlay, Point};
    use fibrescore::io::visualization::{draw_overlay, export_display_png, grayscale_display};
    use fibrescore::spatial::image::{Calibration, IntensityImage};
    use image::Rgba;
    use ndarray::{Array2, array};
    use tempfile::TempDir;

    fn black(size: usize) -> IntensityImage {
        IntensityImage::new("black", Array2::zeros((size, size)), Calibration::default())
    }

    // Tests intensities map linearly from min..max onto 0..255
    // Verified by mapping from 0..max instead of min..max
    #[test]
    fn test_grayscale_display_range() {
        let image = IntensityImage::new(
            "ramp",
            array![[100.0, 150.0], [200.0, 300.0]],
            Calibration::default(),
        );
        let canvas = grayscale_display(&image);

        assert_eq!(canvas.dimensions(), (2, 2));
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(1, 0), Rgba([64, 64, 64, 255]));
        assert_eq!(*canvas.get_pixel(1, 1), Rgba([255, 255, 255, 255]));
    }

    // Tests flat images render mid-gray
    #[test]
    fn test_grayscale_display_flat() {
        let canvas = grayscale_display(&black(3));
        assert!(canvas.pixels().all(|p| *p == Rgba([128, 128, 128, 255])));
    }

    // Tests opaque arrows colour the pixels along their shaft
    #[test]
    fn test_draw_arrow() {
        let mut canvas = grayscale_display(&black(40));
        let mut overlay = Overlay::new();
        overlay.add(Annotation::Arrow {
            start: Point::new(5.0, 20.0),
            end: Point::new(35.0, 20.0),
            style: ArrowStyle::Open,
            double_headed: true,
            stroke_width: 4.0,
            head_size: 4.0,
            colour: Colour::for_score(1.0),
        });

        draw_overlay(&mut canvas, &overlay);

        assert_eq!(*canvas.get_pixel(20, 20), Rgba([0, 255, 128, 255]));
        assert_eq!(*canvas.get_pixel(20, 5), Rgba([128, 128, 128, 255]));
    }

    // Tests translucent regions blend with the image beneath
    #[test]
    fn test_draw_region_blends() {
        let mut canvas = grayscale_display(&black(30));
        let mut overlay = Overlay::new();
        overlay.add(Annotation::Region {
            x: 2.0,
            y: 2.0,
            width: 20.0,
            height: 20.0,
            colour: Colour::new(1.0, 1.0, 0.0, 0.25),
        });

        draw_overlay(&mut canvas, &overlay);

        let edge = canvas.get_pixel(10, 2);
        assert!(edge.0[0] > 128 && edge.0[2] < 128);
        assert_eq!(*canvas.get_pixel(10, 10), Rgba([128, 128, 128, 255]));
    }

    // Tests digit labels set pixels near their anchor and leave others alone
    #[test]
    fn test_draw_label() {
        let mut canvas = grayscale_display(&black(30));
        let mut overlay = Overlay::new();
        overlay.add(Annotation::Label {
            text: "17".to_string(),
            position: Point::new(4.0, 4.0),
            colour: Colour::new(0.0, 1.0, 1.0, 1.0),
        });

        draw_overlay(&mut canvas, &overlay);

        let cyan = Rgba([0, 255, 255, 255]);
        assert_eq!(*canvas.get_pixel(6, 4), cyan);
        assert!(canvas.pixels().filter(|p| **p == cyan).count() > 10);
        assert_eq!(*canvas.get_pixel(25, 25), Rgba([128, 128, 128, 255]));
    }

    // Tests annotations outside the canvas are clipped silently
    #[test]
    fn test_draw_outside_canvas() {
        let mut canvas = grayscale_display(&black(10));
        let mut overlay = Overlay::new();
        overlay.add(Annotation::Arrow {
            start: Point::new(-30.0, -30.0),
            end: Point::new(-5.0, -5.0),
            style: ArrowStyle::Open,
            double_headed: false,
            stroke_width: 4.0,
            head_size: 4.0,
            colour: Colour::for_score(0.0),
        });

        draw_overlay(&mut canvas, &overlay);
        assert!(canvas.pixels().all(|p| *p == Rgba([128, 128, 128, 255])));
    }

    // Tests PNG export into a directory that does not exist yet
    #[test]
    fn test_export_display_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("display").join("black-Z0.png");

        export_display_png(&black(16), &Overlay::new(), &path).unwrap();

        let saved = image::open(&path).unwrap();
        assert_eq!((saved.width(), saved.height()), (16, 16));
    }
}
