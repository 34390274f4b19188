//! Buffer configuration.

use crate::error::{BufferError, Result};

/// Shape of the buffer around line ends and isolated points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EndCapStyle {
    /// A half circle around the end point.
    #[default]
    Round,
    /// The buffer ends flush with the end point. Points produce nothing.
    Flat,
    /// A half square extending the line by the buffer distance.
    Square,
}

/// Shape of the buffer at convex corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JoinStyle {
    /// A circular fillet around the corner.
    #[default]
    Round,
    /// The offset lines are extended until they meet, up to the mitre limit.
    Mitre,
    /// The offset segment ends are joined directly.
    Bevel,
}

/// Parameters controlling the shape and accuracy of a buffer.
///
/// # Example
///
/// ```
/// use bufferum::{BufferParameters, EndCapStyle, JoinStyle};
///
/// let params = BufferParameters::default()
///     .with_quadrant_segments(16)
///     .with_end_cap_style(EndCapStyle::Flat)
///     .with_join_style(JoinStyle::Mitre);
/// assert_eq!(params.quadrant_segments, 16);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BufferParameters {
    /// Number of segments used to approximate a quarter circle.
    /// Values below 1 behave as 1.
    /// Default: 8
    pub quadrant_segments: i32,

    /// Default: [`EndCapStyle::Round`]
    pub end_cap_style: EndCapStyle,

    /// Default: [`JoinStyle::Round`]
    pub join_style: JoinStyle,

    /// Maximum ratio of mitre length to buffer distance before a mitre join
    /// is bevelled.
    /// Default: 5.0
    pub mitre_limit: f64,

    /// Fraction of the buffer distance within which shallow input
    /// concavities are removed before offsetting.
    /// Default: 0.01
    pub simplify_factor: f64,
}

impl BufferParameters {
    pub const DEFAULT_QUADRANT_SEGMENTS: i32 = 8;
    pub const DEFAULT_MITRE_LIMIT: f64 = 5.0;
    pub const DEFAULT_SIMPLIFY_FACTOR: f64 = 0.01;

    pub fn with_quadrant_segments(mut self, quadrant_segments: i32) -> Self {
        self.quadrant_segments = quadrant_segments;
        self
    }

    pub fn with_end_cap_style(mut self, style: EndCapStyle) -> Self {
        self.end_cap_style = style;
        self
    }

    pub fn with_join_style(mut self, style: JoinStyle) -> Self {
        self.join_style = style;
        self
    }

    pub fn with_mitre_limit(mut self, mitre_limit: f64) -> Self {
        self.mitre_limit = mitre_limit;
        self
    }

    pub fn with_simplify_factor(mut self, simplify_factor: f64) -> Self {
        self.simplify_factor = simplify_factor;
        self
    }

    /// Quadrant segments clamped to at least one.
    #[inline]
    pub fn effective_quadrant_segments(&self) -> i32 {
        self.quadrant_segments.max(1)
    }

    /// Checks that the numeric parameters are usable.
    pub fn validate(&self) -> Result<()> {
        if !self.mitre_limit.is_finite() || self.mitre_limit < 0.0 {
            return Err(BufferError::InvalidInput(format!(
                "mitre limit must be finite and non-negative, got {}",
                self.mitre_limit
            )));
        }
        if !self.simplify_factor.is_finite() || self.simplify_factor < 0.0 {
            return Err(BufferError::InvalidInput(format!(
                "simplify factor must be finite and non-negative, got {}",
                self.simplify_factor
            )));
        }
        Ok(())
    }
}

impl Default for BufferParameters {
    fn default() -> Self {
        Self {
            quadrant_segments: Self::DEFAULT_QUADRANT_SEGMENTS,
            end_cap_style: EndCapStyle::Round,
            join_style: JoinStyle::Round,
            mitre_limit: Self::DEFAULT_MITRE_LIMIT,
            simplify_factor: Self::DEFAULT_SIMPLIFY_FACTOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = BufferParameters::default();
        assert_eq!(p.quadrant_segments, 8);
        assert_eq!(p.end_cap_style, EndCapStyle::Round);
        assert_eq!(p.join_style, JoinStyle::Round);
        assert_eq!(p.mitre_limit, 5.0);
        assert_eq!(p.simplify_factor, 0.01);
    }

    #[test]
    fn test_quadrant_segments_clamped() {
        let p = BufferParameters::default().with_quadrant_segments(-3);
        assert_eq!(p.effective_quadrant_segments(), 1);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_mitre = BufferParameters::default().with_mitre_limit(f64::NAN);
        assert!(matches!(
            bad_mitre.validate(),
            Err(BufferError::InvalidInput(_))
        ));
        let bad_simplify = BufferParameters::default().with_simplify_factor(-1.0);
        assert!(bad_simplify.validate().is_err());
        assert!(BufferParameters::default().validate().is_ok());
    }
}
