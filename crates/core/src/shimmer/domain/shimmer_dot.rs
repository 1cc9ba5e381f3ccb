use std::f64::consts::TAU;
use std::ops::RangeInclusive;

use rand::Rng;

/// A square of near-white light whose brightness oscillates over the clip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShimmerDot {
    pub x: u32,
    pub y: u32,
    /// Phase offset in `[0, 2π)`.
    pub phase: f64,
    /// Shared R=G=B intensity.
    pub gray: u8,
}

/// Number of dots for a `width x height` base at `density`, floored.
///
/// Negative or non-finite densities yield zero.
pub fn dot_count(width: u32, height: u32, density: f64) -> usize {
    let count = width as f64 * height as f64 * density;
    if count.is_finite() && count > 0.0 {
        count.floor() as usize
    } else {
        0
    }
}

/// Scatters `count` dots uniformly over a `width x height` grid.
///
/// Phases are uniform in `[0, 2π)`, grays uniform over `gray_range`.
pub fn generate_dots<R: Rng + ?Sized>(
    rng: &mut R,
    width: u32,
    height: u32,
    count: usize,
    gray_range: RangeInclusive<u8>,
) -> Vec<ShimmerDot> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    (0..count)
        .map(|_| ShimmerDot {
            x: rng.gen_range(0..width),
            y: rng.gen_range(0..height),
            phase: rng.gen::<f64>() * TAU,
            gray: rng.gen_range(gray_range.clone()),
        })
        .collect()
}
