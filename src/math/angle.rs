//! Orientation folding for axial (undirected) angles

use num_traits::{Float, FloatConst};

/// Fold an angle in radians into the half-turn `[0, π)`
///
/// Directions half a turn apart describe the same fibre axis. Rounding that
/// would land exactly on π maps to 0.
pub fn fold_half_turn<T: Float + FloatConst>(theta: T) -> T {
    let pi = T::PI();
    let mut folded = theta % pi;
    if folded < T::zero() {
        folded = folded + pi;
    }
    if folded >= pi { T::zero() } else { folded }
}

/// Smallest separation between two axial angles, in `[0, π/2]`
pub fn axial_distance<T: Float + FloatConst>(a: T, b: T) -> T {
    let difference = fold_half_turn(a - b);
    difference.min(T::PI() - difference)
}
