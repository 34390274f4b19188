//! Coordinate precision models.
//!
//! A precision model decides whether computed coordinates keep full double
//! precision or are snapped to a regular grid. Buffer attempts at reduced
//! precision run with a [`PrecisionModel::Fixed`] model so that every
//! generated vertex and every computed intersection lands on the grid.

use crate::primitives::Point2;

/// How coordinates are rounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrecisionModel {
    /// Full double precision; coordinates are never rounded.
    #[default]
    Floating,
    /// Coordinates are rounded to a grid of cell size `1 / scale`.
    Fixed {
        /// Number of grid cells per unit.
        scale: f64,
    },
}

impl PrecisionModel {
    /// Creates a fixed model with the given scale.
    #[inline]
    pub fn fixed(scale: f64) -> Self {
        PrecisionModel::Fixed { scale }
    }

    /// Returns `true` for the floating model.
    #[inline]
    pub fn is_floating(self) -> bool {
        matches!(self, PrecisionModel::Floating)
    }

    /// Returns the grid scale of a fixed model.
    #[inline]
    pub fn scale(self) -> Option<f64> {
        match self {
            PrecisionModel::Floating => None,
            PrecisionModel::Fixed { scale } => Some(scale),
        }
    }

    /// Rounds a single ordinate to this model.
    ///
    /// Rounding is half-up on the grid. Scales below one are applied through
    /// the grid size to avoid amplifying representation error.
    pub fn make_precise_value(self, value: f64) -> f64 {
        let scale = match self {
            PrecisionModel::Floating => return value,
            PrecisionModel::Fixed { scale } => scale,
        };
        if value.is_nan() {
            return value;
        }
        if scale < 1.0 {
            let grid_size = 1.0 / scale;
            return (value / grid_size + 0.5).floor() * grid_size;
        }
        (value * scale + 0.5).floor() / scale
    }

    /// Rounds both ordinates of a point to this model.
    #[inline]
    pub fn make_precise(self, p: Point2<f64>) -> Point2<f64> {
        Point2::new(self.make_precise_value(p.x), self.make_precise_value(p.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_floating_is_identity() {
        let pm = PrecisionModel::Floating;
        let p = Point2::new(1.234_567_890_123, -9.876_543_21);
        assert_eq!(pm.make_precise(p), p);
        assert!(pm.is_floating());
        assert_eq!(pm.scale(), None);
    }

    #[test]
    fn test_fixed_rounds_half_up() {
        let pm = PrecisionModel::fixed(10.0);
        assert_relative_eq!(pm.make_precise_value(1.24), 1.2, epsilon = 1e-12);
        assert_relative_eq!(pm.make_precise_value(1.25), 1.3, epsilon = 1e-12);
        assert_relative_eq!(pm.make_precise_value(-1.25), -1.2, epsilon = 1e-12);
        assert_eq!(pm.scale(), Some(10.0));
    }

    #[test]
    fn test_fixed_coarse_scale() {
        let pm = PrecisionModel::fixed(0.01);
        assert_relative_eq!(pm.make_precise_value(1234.0), 1200.0, epsilon = 1e-9);
        assert_relative_eq!(pm.make_precise_value(1250.0), 1300.0, epsilon = 1e-9);
    }

    #[test]
    fn test_nan_passes_through() {
        assert!(PrecisionModel::fixed(100.0).make_precise_value(f64::NAN).is_nan());
    }
}
