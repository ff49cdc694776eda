//! Random vectors, polarities and rotation helpers
//!
//! Distributions only; callers own the RNG.

use glam::{Mat2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Arena edge an entity enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerimeterSide {
    Top,
    Left,
    Bottom,
    Right,
}

impl PerimeterSide {
    pub const ALL: [PerimeterSide; 4] = [
        PerimeterSide::Top,
        PerimeterSide::Left,
        PerimeterSide::Bottom,
        PerimeterSide::Right,
    ];

    /// Uniform choice among the four edges
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// -1 or +1 with equal probability
pub fn random_polarity<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if rng.random_range(0..2) == 0 { -1.0 } else { 1.0 }
}

/// Each axis drawn from [0, 1); an axis may be negated only if its flag is set
pub fn random_vector<R: Rng + ?Sized>(
    rng: &mut R,
    random_x_polarity: bool,
    random_y_polarity: bool,
) -> Vec2 {
    let x_polarity = if random_x_polarity { random_polarity(rng) } else { 1.0 };
    let y_polarity = if random_y_polarity { random_polarity(rng) } else { 1.0 };
    Vec2::new(
        rng.random::<f32>() * x_polarity,
        rng.random::<f32>() * y_polarity,
    )
}

/// Vector heading into the arena from `side`.
///
/// The axis perpendicular to the edge points inward (y grows downward); the
/// parallel axis has random polarity.
pub fn random_vector_from<R: Rng + ?Sized>(rng: &mut R, side: PerimeterSide) -> Vec2 {
    match side {
        PerimeterSide::Left => {
            let x = rng.random::<f32>();
            Vec2::new(x, rng.random::<f32>() * random_polarity(rng))
        }
        PerimeterSide::Right => {
            let x = -rng.random::<f32>();
            Vec2::new(x, rng.random::<f32>() * random_polarity(rng))
        }
        PerimeterSide::Top => {
            let x = rng.random::<f32>() * random_polarity(rng);
            Vec2::new(x, rng.random::<f32>())
        }
        PerimeterSide::Bottom => {
            let x = rng.random::<f32>() * random_polarity(rng);
            Vec2::new(x, -rng.random::<f32>())
        }
    }
}

/// Degrees per tick, magnitude uniform in [min, max), random sign
pub fn random_rotation_rate<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    rng.random_range(min..max) * random_polarity(rng)
}

/// Standard counter-clockwise rotation
#[inline]
pub fn rotation_matrix(angle_radians: f32) -> Mat2 {
    Mat2::from_angle(angle_radians)
}
