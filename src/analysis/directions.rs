//! Kirsch compass estimator of directional gradient strength
//!
//! Each of the eight compass kernels weights three contiguous neighbours on
//! one flank by +5 and the remaining five by -3. The strength in a direction
//! is the mean absolute kernel response over the tile.

use crate::math::convolution::{Kernel3, correlate_3x3};
use ndarray::Array2;
use std::f64::consts::TAU;

/// Compass orientation of a Kirsch kernel
///
/// Angles run counter-clockwise from east with north at the top row of the
/// image, in steps of 45°.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// 0°, heavy right column
    East,
    /// 45°
    NorthEast,
    /// 90°, heavy top row
    North,
    /// 135°
    NorthWest,
    /// 180°, heavy left column
    West,
    /// 225°
    SouthWest,
    /// 270°, heavy bottom row
    South,
    /// 315°
    SouthEast,
}

impl Direction {
    /// All directions in ascending angle order
    pub const ALL: [Self; 8] = [
        Self::East,
        Self::NorthEast,
        Self::North,
        Self::NorthWest,
        Self::West,
        Self::SouthWest,
        Self::South,
        Self::SouthEast,
    ];

    /// Position in [`Direction::ALL`]
    pub const fn index(self) -> usize {
        match self {
            Self::East => 0,
            Self::NorthEast => 1,
            Self::North => 2,
            Self::NorthWest => 3,
            Self::West => 4,
            Self::SouthWest => 5,
            Self::South => 6,
            Self::SouthEast => 7,
        }
    }

    /// Orientation in degrees
    pub const fn degrees(self) -> u16 {
        self.index() as u16 * 45
    }

    /// Orientation in radians
    pub fn radians(self) -> f64 {
        self.index() as f64 * (TAU / Self::ALL.len() as f64)
    }

    /// Kirsch weights, row 0 applied to the row above the centre
    pub const fn kernel(self) -> Kernel3 {
        match self {
            Self::East => [[-3.0, -3.0, 5.0], [-3.0, 0.0, 5.0], [-3.0, -3.0, 5.0]],
            Self::NorthEast => [[-3.0, 5.0, 5.0], [-3.0, 0.0, 5.0], [-3.0, -3.0, -3.0]],
            Self::North => [[5.0, 5.0, 5.0], [-3.0, 0.0, -3.0], [-3.0, -3.0, -3.0]],
            Self::NorthWest => [[5.0, 5.0, -3.0], [5.0, 0.0, -3.0], [-3.0, -3.0, -3.0]],
            Self::West => [[5.0, -3.0, -3.0], [5.0, 0.0, -3.0], [5.0, -3.0, -3.0]],
            Self::SouthWest => [[-3.0, -3.0, -3.0], [5.0, 0.0, -3.0], [5.0, 5.0, -3.0]],
            Self::South => [[-3.0, -3.0, -3.0], [-3.0, 0.0, -3.0], [5.0, 5.0, 5.0]],
            Self::SouthEast => [[-3.0, -3.0, -3.0], [-3.0, 0.0, 5.0], [-3.0, 5.0, 5.0]],
        }
    }
}

/// Gradient strength in each of the eight compass directions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalResponse([f64; 8]);

impl DirectionalResponse {
    /// Wrap eight values ordered as [`Direction::ALL`]
    pub const fn new(values: [f64; 8]) -> Self {
        Self(values)
    }

    /// Values ordered as [`Direction::ALL`]
    pub const fn values(&self) -> &[f64; 8] {
        &self.0
    }

    /// Strength in one direction
    pub fn get(&self, direction: Direction) -> f64 {
        self.0.get(direction.index()).copied().unwrap_or(0.0)
    }

    /// Sum over all directions
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Largest strength
    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Smallest strength
    pub fn min(&self) -> f64 {
        self.0.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Direction of the largest strength, the earliest one on ties
    pub fn dominant(&self) -> Direction {
        let mut best = Direction::East;
        let mut best_value = f64::NEG_INFINITY;
        for (direction, &value) in Direction::ALL.iter().zip(&self.0) {
            if value > best_value {
                best = *direction;
                best_value = value;
            }
        }
        best
    }
}

/// Mean absolute Kirsch response of `tile` in every direction
pub fn estimate_directions(tile: &Array2<f64>) -> DirectionalResponse {
    let mut values = [0.0; 8];
    for (slot, direction) in values.iter_mut().zip(Direction::ALL) {
        let response = correlate_3x3(tile, &direction.kernel());
        *slot = response.mapv(f64::abs).mean().unwrap_or(0.0);
    }
    DirectionalResponse(values)
}
