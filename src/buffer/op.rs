//! Buffering with automatic precision reduction.
//!
//! Floating-point noding can leave offset curves in a state the graph
//! cannot label consistently. When that happens the buffer is recomputed
//! with every coordinate snapped to a progressively coarser grid until an
//! attempt succeeds or the ladder runs out.

use super::builder::{check_distance, BufferBuilder};
use super::parameters::BufferParameters;
use crate::bounds::Aabb2;
use crate::error::{BufferError, Result};
use crate::geometry::envelope;
use crate::noding::Noder;
use crate::precision::PrecisionModel;
use geo_types::Geometry;
use tracing::{debug, warn};

/// Number of significant decimal digits kept by the first reduced-precision
/// attempt. Each further attempt keeps one fewer, down to zero.
pub const MAX_PRECISION_DIGITS: i32 = 12;

/// Which rung of the ladder an attempt belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStage {
    /// The caller's precision model with the fast noder.
    Native,
    /// Snap rounding at the scale of a fixed native precision model.
    NativeSnapRounding,
    /// Snap rounding at a grid keeping `digits` significant digits.
    Reduced { digits: i32 },
}

/// The precision model and noder for one buffer attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttemptPlan {
    pub stage: AttemptStage,
    pub precision: PrecisionModel,
    pub noder: Noder,
}

/// Computes the grid scale that keeps `max_digits` significant digits over
/// the extent of the buffer result.
///
/// The extent is estimated from the largest absolute ordinate of the input
/// envelope, grown by twice a positive distance.
///
/// # Example
///
/// ```
/// use bufferum::bounds::Aabb2;
/// use bufferum::buffer::precision_scale_factor;
/// use bufferum::Point2;
///
/// let env = Aabb2::from_corners(Point2::new(0.0, 0.0), Point2::new(100.0, 50.0));
/// // The result spans up to 120 units: three integer digits, nine fractional.
/// assert_eq!(precision_scale_factor(Some(env), 10.0, 12), 1e9);
/// ```
pub fn precision_scale_factor(envelope: Option<Aabb2<f64>>, distance: f64, max_digits: i32) -> f64 {
    let env_max = envelope.map_or(0.0, |e| e.max_abs_ordinate());
    let expand_by = if distance > 0.0 { distance } else { 0.0 };
    let buf_env_max = env_max + 2.0 * expand_by;
    let env_digits = if buf_env_max > 0.0 && buf_env_max.is_finite() {
        (buf_env_max.log10() + 1.0) as i32
    } else {
        0
    };
    10f64.powi(max_digits - env_digits)
}

/// Lists the attempts to make, in order.
///
/// The first attempt always uses `native` with the fast noder. A fixed
/// native model gets a single snap-rounding retry at its own scale. A
/// floating one gets a snap-rounding retry for every digit count from
/// [`MAX_PRECISION_DIGITS`] down to zero.
pub fn attempt_plans(
    native: PrecisionModel,
    envelope: Option<Aabb2<f64>>,
    distance: f64,
) -> Vec<AttemptPlan> {
    let mut plans = vec![AttemptPlan {
        stage: AttemptStage::Native,
        precision: native,
        noder: Noder::Fast { precision: native },
    }];
    match native {
        PrecisionModel::Fixed { scale } => plans.push(AttemptPlan {
            stage: AttemptStage::NativeSnapRounding,
            precision: native,
            noder: Noder::SnapRounding { scale },
        }),
        PrecisionModel::Floating => {
            for digits in (0..=MAX_PRECISION_DIGITS).rev() {
                let scale = precision_scale_factor(envelope, distance, digits);
                plans.push(AttemptPlan {
                    stage: AttemptStage::Reduced { digits },
                    precision: PrecisionModel::fixed(scale),
                    noder: Noder::SnapRounding { scale },
                });
            }
        }
    }
    plans
}

/// Runs `attempt` for each plan until one succeeds.
///
/// Only topology errors move on to the next plan; any other error is
/// returned immediately. When every plan fails, the error from the last
/// attempt is returned.
pub fn run_attempts<T, F>(plans: &[AttemptPlan], mut attempt: F) -> Result<T>
where
    F: FnMut(&AttemptPlan) -> Result<T>,
{
    let mut saved = None;
    for (index, plan) in plans.iter().enumerate() {
        debug!(
            attempt = index,
            stage = ?plan.stage,
            precision = ?plan.precision,
            "buffer attempt"
        );
        match attempt(plan) {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() => {
                debug!(attempt = index, error = %err, "buffer attempt failed");
                saved = Some(err);
            }
            Err(err) => return Err(err),
        }
    }
    warn!(attempts = plans.len(), "buffer failed at every precision");
    Err(saved.unwrap_or_else(|| BufferError::Invariant("no buffer attempts were planned".into())))
}

/// Computes buffers of a geometry, retrying at reduced precision on
/// topology failures.
///
/// # Example
///
/// ```
/// use bufferum::{BufferOp, BufferParameters, EndCapStyle};
/// use geo_types::{line_string, Geometry};
///
/// let line: Geometry<f64> = line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)].into();
/// let params = BufferParameters::default().with_end_cap_style(EndCapStyle::Flat);
/// let result = BufferOp::new(&line).with_parameters(params).buffer(1.0).unwrap();
/// assert!(matches!(result, Geometry::Polygon(_)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BufferOp<'a> {
    geometry: &'a Geometry<f64>,
    params: BufferParameters,
    precision: PrecisionModel,
}

impl<'a> BufferOp<'a> {
    pub fn new(geometry: &'a Geometry<f64>) -> Self {
        Self {
            geometry,
            params: BufferParameters::default(),
            precision: PrecisionModel::Floating,
        }
    }

    pub fn with_parameters(mut self, params: BufferParameters) -> Self {
        self.params = params;
        self
    }

    /// Sets the precision model of the input, used for the first attempt.
    pub fn with_precision_model(mut self, precision: PrecisionModel) -> Self {
        self.precision = precision;
        self
    }

    /// Computes the buffer at `distance`. Negative distances erode polygons.
    pub fn buffer(&self, distance: f64) -> Result<Geometry<f64>> {
        check_distance(distance)?;
        self.params.validate()?;

        let plans = attempt_plans(self.precision, envelope(self.geometry), distance);
        run_attempts(&plans, |plan| {
            BufferBuilder::new(self.params)
                .with_precision_model(plan.precision)
                .with_noder(plan.noder)
                .buffer(self.geometry, distance)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Point2;
    use approx::assert_relative_eq;

    fn env(max: f64) -> Option<Aabb2<f64>> {
        Some(Aabb2::from_corners(Point2::new(-max, 0.0), Point2::new(1.0, 1.0)))
    }

    #[test]
    fn test_scale_factor() {
        // 100 + 2 * 10 = 120 needs three integer digits.
        assert_relative_eq!(precision_scale_factor(env(100.0), 10.0, 12), 1e9);
        // Negative distances do not grow the extent.
        assert_relative_eq!(precision_scale_factor(env(100.0), -10.0, 12), 1e9);
        assert_relative_eq!(precision_scale_factor(env(5.0), -1.0, 12), 1e11);
        assert_relative_eq!(precision_scale_factor(env(5.0), -1.0, 0), 0.1);
    }

    #[test]
    fn test_scale_factor_without_extent() {
        assert_relative_eq!(precision_scale_factor(None, 0.0, 12), 1e12);
    }

    #[test]
    fn test_floating_plans() {
        let plans = attempt_plans(PrecisionModel::Floating, env(100.0), 10.0);
        assert_eq!(plans.len(), 14);
        assert_eq!(plans[0].stage, AttemptStage::Native);
        assert_eq!(
            plans[0].noder,
            Noder::Fast {
                precision: PrecisionModel::Floating
            }
        );
        assert_eq!(plans[1].stage, AttemptStage::Reduced { digits: 12 });
        assert_eq!(plans[1].precision, PrecisionModel::fixed(1e9));
        assert_eq!(plans[1].noder, Noder::SnapRounding { scale: 1e9 });
        assert_eq!(plans[13].stage, AttemptStage::Reduced { digits: 0 });
    }

    #[test]
    fn test_fixed_plans() {
        let native = PrecisionModel::fixed(100.0);
        let plans = attempt_plans(native, env(100.0), 10.0);
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].noder, Noder::Fast { precision: native });
        assert_eq!(plans[1].stage, AttemptStage::NativeSnapRounding);
        assert_eq!(plans[1].noder, Noder::SnapRounding { scale: 100.0 });
    }

    #[test]
    fn test_retries_until_success() {
        let plans = attempt_plans(PrecisionModel::Floating, env(1.0), 1.0);
        let mut calls = 0;
        let result = run_attempts(&plans, |plan| {
            calls += 1;
            match plan.stage {
                AttemptStage::Reduced { digits: 10 } => Ok(digits_of(plan)),
                _ => Err(BufferError::topology("side location conflict")),
            }
        });
        assert_eq!(result, Ok(10));
        assert_eq!(calls, 4);
    }

    fn digits_of(plan: &AttemptPlan) -> i32 {
        match plan.stage {
            AttemptStage::Reduced { digits } => digits,
            _ => -1,
        }
    }

    #[test]
    fn test_non_topology_error_is_not_retried() {
        let plans = attempt_plans(PrecisionModel::Floating, env(1.0), 1.0);
        let mut calls = 0;
        let result: Result<()> = run_attempts(&plans, |_| {
            calls += 1;
            Err(BufferError::Invariant("found two shells in minimal edge ring list".into()))
        });
        assert!(matches!(result, Err(BufferError::Invariant(_))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_exhausted_ladder_returns_last_error() {
        let plans = attempt_plans(PrecisionModel::Floating, env(1.0), 1.0);
        let result: Result<()> = run_attempts(&plans, |plan| {
            Err(BufferError::topology(format!("failed at {:?}", plan.stage)))
        });
        assert_eq!(
            result,
            Err(BufferError::topology("failed at Reduced { digits: 0 }"))
        );
    }

    #[test]
    fn test_fixed_native_gets_one_retry() {
        let plans = attempt_plans(PrecisionModel::fixed(10.0), env(1.0), 1.0);
        let mut calls = 0;
        let result: Result<()> = run_attempts(&plans, |_| {
            calls += 1;
            Err(BufferError::topology("unable to assign hole to a shell"))
        });
        assert!(result.is_err());
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_reduced_precision_attempt_builds_polygon() {
        use geo::Area;
        use geo_types::polygon;

        let g = Geometry::from(polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 10.0),
        ]);
        // The result reaches 12 units, so three digits is a 0.1 grid.
        let plans = attempt_plans(PrecisionModel::Floating, envelope(&g), 1.0);
        let mut stages = Vec::new();
        let result = run_attempts(&plans, |plan| {
            stages.push(plan.stage);
            match plan.stage {
                AttemptStage::Reduced { digits } if digits <= 3 => {
                    BufferBuilder::new(BufferParameters::default())
                        .with_precision_model(plan.precision)
                        .with_noder(plan.noder)
                        .buffer(&g, 1.0)
                }
                _ => Err(BufferError::topology("side location conflict")),
            }
        })
        .unwrap();

        assert_eq!(stages.first(), Some(&AttemptStage::Native));
        assert_eq!(stages.last(), Some(&AttemptStage::Reduced { digits: 3 }));
        assert_eq!(stages.len(), 11);

        let polygon = match result {
            Geometry::Polygon(p) => p,
            other => panic!("expected a polygon, got {other:?}"),
        };
        let expected = 100.0 + 40.0 + 16.0 * (std::f64::consts::PI / 16.0).sin();
        assert!((polygon.unsigned_area() - expected).abs() < 1.0);
        for c in polygon.exterior().0.iter() {
            assert_relative_eq!(c.x * 10.0, (c.x * 10.0).round(), epsilon = 1e-9);
            assert_relative_eq!(c.y * 10.0, (c.y * 10.0).round(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_invalid_arguments() {
        let g = Geometry::from(geo_types::point!(x: 0.0, y: 0.0));
        assert!(matches!(
            BufferOp::new(&g).buffer(f64::INFINITY),
            Err(BufferError::InvalidInput(_))
        ));
        let params = BufferParameters::default().with_mitre_limit(f64::NAN);
        assert!(matches!(
            BufferOp::new(&g).with_parameters(params).buffer(1.0),
            Err(BufferError::InvalidInput(_))
        ));
    }
}
