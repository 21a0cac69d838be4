//! Anisotropy score and principal direction of one tile
//!
//! The score is the share of directional energy above the weakest direction
//! that the strongest direction carries, scaled by the number of directions.
//! Near 1 and above means one orientation dominates (a fibre); near 0 means
//! isotropic texture.

use crate::analysis::directions::{Direction, DirectionalResponse};
use crate::math::angle::fold_half_turn;
use ndarray::Array2;
use std::f64::consts::FRAC_PI_2;

/// Scores derived for one tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileScore {
    /// Mean of the unfiltered tile pixels
    pub fibre_intensity: f64,
    /// Dominant orientation in `[0, π)`
    pub principal_direction: f64,
    /// Anisotropy score, not clamped
    pub score: f64,
}

/// `((max - min) / (sum - min)) * 8`, or `None` when the responses are degenerate
///
/// Degenerate means all responses equal, a zero denominator or a non-finite
/// result.
pub fn anisotropy_score(response: &DirectionalResponse) -> Option<f64> {
    let edge_sum = response.sum();
    let edge_max = response.max();
    let edge_min = response.min();
    let directions = Direction::ALL.len() as f64;

    let denominator = edge_sum - edge_min;
    if edge_max == edge_min || denominator == 0.0 {
        return None;
    }
    let score = ((edge_max - edge_min) / denominator) * directions;
    score.is_finite().then_some(score)
}

/// Orientation perpendicular to the kernel of `dominant`, folded into `[0, π)`
pub fn principal_direction(dominant: Direction) -> f64 {
    fold_half_turn(dominant.radians() + FRAC_PI_2)
}

/// Score a tile from its directional response and raw pixels
///
/// Degenerate responses (a flat tile) score 0 with direction 0.
pub fn score_tile(response: &DirectionalResponse, raw_tile: &Array2<f64>) -> TileScore {
    let fibre_intensity = raw_tile.mean().unwrap_or(0.0);

    match anisotropy_score(response) {
        Some(score) => TileScore {
            fibre_intensity,
            principal_direction: principal_direction(response.dominant()),
            score,
        },
        None => TileScore {
            fibre_intensity,
            principal_direction: 0.0,
            score: 0.0,
        },
    }
}
