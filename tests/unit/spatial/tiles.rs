//! Tests for the overlapping tile layout

#[cfg(test)]
mod tests {
    use fibrescore::AnalysisError;
    use fibrescore::spatial::tiles::TileGrid;

    // Tests the reference 480x480 layout with 24 rows
    // Verified by changing the overlap divisor
    #[test]
    fn test_grid_480_geometry() {
        let grid = TileGrid::new(480, 480, 24).unwrap();

        assert_eq!(grid.step(), 20);
        assert_eq!(grid.overlap(), 4);
        assert_eq!(grid.len(), 576);

        let first = grid.tiles()[0];
        assert_eq!((first.x, first.y), (4, 4));
        assert_eq!((first.left, first.top), (0, 0));
        assert_eq!((first.centre_x, first.centre_y), (14, 14));
        assert_eq!(first.size, 28);

        let last = grid.tiles()[575];
        assert_eq!((last.centre_x, last.centre_y), (474, 474));
    }

    // Tests tiles whose centre would leave the image are dropped
    // Verified by clipping centres instead of dropping tiles
    #[test]
    fn test_grid_490_drops_boundary_tiles() {
        let grid = TileGrid::new(490, 490, 24).unwrap();

        assert_eq!(grid.step(), 20);
        assert_eq!(grid.len(), 576);
        assert!(
            grid.tiles()
                .iter()
                .all(|t| t.centre_x <= 489 && t.centre_y <= 489)
        );
    }

    // Tests raster order: rows outer, columns inner, indices sequential
    #[test]
    fn test_grid_raster_order() {
        let grid = TileGrid::new(100, 100, 4).unwrap();

        for (i, tile) in grid.tiles().iter().enumerate() {
            assert_eq!(tile.index, i);
        }
        for pair in grid.tiles().windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(b.y > a.y || (b.y == a.y && b.x > a.x));
        }
    }

    // Tests every tile spans step plus both overlaps around its anchor
    #[test]
    fn test_tile_bounds() {
        let grid = TileGrid::new(96, 96, 4).unwrap();
        for tile in grid.tiles() {
            assert_eq!(tile.size, grid.step() + 2 * grid.overlap());
            assert_eq!(tile.left + grid.overlap(), tile.x);
            assert_eq!(tile.top + grid.overlap(), tile.y);
            assert_eq!(tile.centre_x, tile.x + grid.step() / 2);
        }
    }

    // Tests the layout is deterministic
    #[test]
    fn test_grid_deterministic() {
        let a = TileGrid::new(240, 240, 12).unwrap();
        let b = TileGrid::new(240, 240, 12).unwrap();
        assert_eq!(a.tiles(), b.tiles());
    }

    // Tests non-square dimensions are rejected
    #[test]
    fn test_grid_rejects_non_square() {
        let result = TileGrid::new(480, 360, 24);
        assert!(matches!(
            result,
            Err(AnalysisError::NonSquareImage {
                width: 480,
                height: 360,
                ..
            })
        ));
    }

    // Tests invalid row counts are rejected
    #[test]
    fn test_grid_rejects_bad_rows() {
        assert!(matches!(
            TileGrid::new(64, 64, 0),
            Err(AnalysisError::InvalidParameter { parameter: "rows", .. })
        ));
        assert!(matches!(
            TileGrid::new(8, 8, 9),
            Err(AnalysisError::InvalidParameter { parameter: "rows", .. })
        ));
    }

    // Tests a single row covers the image with one tile
    #[test]
    fn test_grid_single_row() {
        let grid = TileGrid::new(50, 50, 1).unwrap();
        assert_eq!(grid.step(), 50);
        assert_eq!(grid.overlap(), 10);
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.tiles()[0].centre_x, 35);
    }
}
