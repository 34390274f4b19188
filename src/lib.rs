//! bufferum - Robust buffering of planar geometries
//!
//! Computes the region within a given distance of a point, line or polygon
//! geometry. Offset curves are generated around every component, noded into
//! a planar graph, labelled with depths and assembled back into polygons.
//! When floating-point noding produces an inconsistent topology the whole
//! computation is retried with coordinates snapped to coarser grids.
//!
//! # Example
//!
//! ```
//! use bufferum::buffer;
//! use geo_types::{polygon, Geometry};
//!
//! let square: Geometry<f64> = polygon![
//!     (x: 0.0, y: 0.0),
//!     (x: 1.0, y: 0.0),
//!     (x: 1.0, y: 1.0),
//!     (x: 0.0, y: 1.0),
//! ]
//! .into();
//! let grown = buffer(&square, 0.5).unwrap();
//! assert!(matches!(grown, Geometry::Polygon(_)));
//! ```

pub mod bounds;
pub mod buffer;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod noding;
pub mod polygon;
pub mod precision;
pub mod primitives;
pub mod simplify;
pub mod tolerance;

pub use bounds::Aabb2;
pub use buffer::{BufferBuilder, BufferOp, BufferParameters, EndCapStyle, JoinStyle};
pub use error::{BufferError, Result};
pub use noding::Noder;
pub use precision::PrecisionModel;
pub use primitives::{Point2, Segment2, Vec2};

use geo_types::Geometry;

/// Buffers `geometry` by `distance` with default parameters.
pub fn buffer(geometry: &Geometry<f64>, distance: f64) -> Result<Geometry<f64>> {
    BufferOp::new(geometry).buffer(distance)
}

/// Buffers `geometry` by `distance` with the given parameters.
pub fn buffer_with_params(
    geometry: &Geometry<f64>,
    distance: f64,
    params: &BufferParameters,
) -> Result<Geometry<f64>> {
    BufferOp::new(geometry).with_parameters(*params).buffer(distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::is_empty_polygonal;
    use approx::assert_relative_eq;
    use geo::Area;
    use geo_types::{line_string, point, polygon, Coord, MultiPoint, Polygon, Rect};
    use proptest::prelude::*;
    use std::f64::consts::PI;

    /// Area of a 32-gon inscribed in a circle of radius `r`.
    fn polygonal_circle_area(r: f64) -> f64 {
        16.0 * (PI / 16.0).sin() * r * r
    }

    fn square(x0: f64, y0: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size),
        ]
    }

    fn ring_area(ring: &geo_types::LineString<f64>) -> f64 {
        Polygon::new(ring.clone(), Vec::new()).unsigned_area()
    }

    fn all_coords(g: &Geometry<f64>) -> Vec<Coord<f64>> {
        let polygons = match g {
            Geometry::Polygon(p) => vec![p.clone()],
            Geometry::MultiPolygon(mp) => mp.0.clone(),
            _ => Vec::new(),
        };
        polygons
            .iter()
            .flat_map(|p| {
                p.exterior()
                    .0
                    .iter()
                    .chain(p.interiors().iter().flat_map(|r| r.0.iter()))
                    .copied()
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    #[test]
    fn test_point_buffer_is_polygonal_circle() {
        let g = Geometry::from(point!(x: 3.0, y: -2.0));
        let result = buffer(&g, 2.0).unwrap();
        assert_relative_eq!(result.unsigned_area(), polygonal_circle_area(2.0), epsilon = 1e-9);
    }

    #[test]
    fn test_point_area_converges_with_quadrant_segments() {
        let g = Geometry::from(point!(x: 0.0, y: 0.0));
        let mut last_error = f64::INFINITY;
        for qs in [2, 4, 8, 16, 32] {
            let params = BufferParameters::default().with_quadrant_segments(qs);
            let area = buffer_with_params(&g, 1.0, &params).unwrap().unsigned_area();
            let error = PI - area;
            assert!(error > 0.0);
            assert!(error < last_error);
            last_error = error;
        }
        assert!(last_error < 2e-3);
    }

    #[test]
    fn test_larger_distance_contains_smaller() {
        use geo::Contains;

        let line = Geometry::from(line_string![
            (x: 0.0, y: 0.0),
            (x: 4.0, y: 1.0),
            (x: 5.0, y: 5.0),
        ]);
        let inner = buffer(&line, 0.5).unwrap();
        let outer = match buffer(&line, 1.0).unwrap() {
            Geometry::Polygon(p) => p,
            other => panic!("expected a polygon, got {other:?}"),
        };
        let coords = all_coords(&inner);
        assert!(!coords.is_empty());
        for c in coords {
            assert!(outer.contains(&c));
        }
    }

    #[test]
    fn test_square_grows_with_round_corners() {
        let g = Geometry::from(square(0.0, 0.0, 1.0));
        let area = buffer(&g, 1.0).unwrap().unsigned_area();
        assert!((area - (PI + 5.0)).abs() < 0.05);
    }

    #[test]
    fn test_square_far_from_origin_grows() {
        for offset in [1e4, 1e8, 1e9] {
            let g = Geometry::from(square(offset, offset, 1.0));
            let area = buffer(&g, 1.0).unwrap().unsigned_area();
            assert!((area - (PI + 5.0)).abs() < 0.05, "offset {offset}: area {area}");
        }
    }

    #[test]
    fn test_square_erodes_with_square_corners() {
        let g = Geometry::from(square(0.0, 0.0, 10.0));
        let result = buffer(&g, -1.0).unwrap();
        assert_relative_eq!(result.unsigned_area(), 64.0, epsilon = 1e-9);
    }

    #[test]
    fn test_full_erosion_is_empty() {
        let g = Geometry::from(square(0.0, 0.0, 2.0));
        let result = buffer(&g, -1.5).unwrap();
        assert!(is_empty_polygonal(&result));
    }

    #[test]
    fn test_zero_distance() {
        let poly = Geometry::from(square(0.0, 0.0, 3.0));
        assert_relative_eq!(buffer(&poly, 0.0).unwrap().unsigned_area(), 9.0, epsilon = 1e-12);

        let line = Geometry::from(line_string![(x: 0.0, y: 0.0), (x: 3.0, y: 0.0)]);
        assert!(is_empty_polygonal(&buffer(&line, 0.0).unwrap()));
        assert!(is_empty_polygonal(&buffer(&line, -1.0).unwrap()));
    }

    #[test]
    fn test_line_end_caps() {
        let line = Geometry::from(line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)]);

        let flat = BufferParameters::default().with_end_cap_style(EndCapStyle::Flat);
        let area = buffer_with_params(&line, 1.0, &flat).unwrap().unsigned_area();
        assert_relative_eq!(area, 20.0, epsilon = 1e-9);

        let square_cap = BufferParameters::default().with_end_cap_style(EndCapStyle::Square);
        let area = buffer_with_params(&line, 1.0, &square_cap).unwrap().unsigned_area();
        assert_relative_eq!(area, 24.0, epsilon = 1e-9);

        let round = buffer(&line, 1.0).unwrap().unsigned_area();
        assert_relative_eq!(round, 20.0 + polygonal_circle_area(1.0), epsilon = 1e-9);
    }

    #[test]
    fn test_disjoint_components_give_multipolygon() {
        let points = Geometry::from(MultiPoint::from(vec![(0.0, 0.0), (10.0, 0.0)]));
        match buffer(&points, 1.0).unwrap() {
            Geometry::MultiPolygon(mp) => assert_eq!(mp.0.len(), 2),
            other => panic!("expected a multipolygon, got {other:?}"),
        }
    }

    #[test]
    fn test_overlapping_components_merge() {
        let points = Geometry::from(MultiPoint::from(vec![(0.0, 0.0), (1.0, 0.0)]));
        let result = buffer(&points, 1.0).unwrap();
        assert!(matches!(result, Geometry::Polygon(_)));
        let area = result.unsigned_area();
        assert!(area > polygonal_circle_area(1.0));
        assert!(area < 2.0 * polygonal_circle_area(1.0));
    }

    #[test]
    fn test_hole_shrinks() {
        let hole = square(3.0, 3.0, 4.0).exterior().clone();
        let outer = square(0.0, 0.0, 10.0).exterior().clone();
        let g = Geometry::from(Polygon::new(outer, vec![hole]));
        match buffer(&g, 1.0).unwrap() {
            Geometry::Polygon(p) => {
                assert_eq!(p.interiors().len(), 1);
                assert_relative_eq!(ring_area(&p.interiors()[0]), 4.0, epsilon = 1e-9);
            }
            other => panic!("expected a polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_hole_closes() {
        let hole = square(4.0, 4.0, 2.0).exterior().clone();
        let outer = square(0.0, 0.0, 10.0).exterior().clone();
        let g = Geometry::from(Polygon::new(outer, vec![hole]));
        match buffer(&g, 1.5).unwrap() {
            Geometry::Polygon(p) => assert!(p.interiors().is_empty()),
            other => panic!("expected a polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_fixed_precision_output_is_on_grid() {
        let g = Geometry::from(point!(x: 0.123, y: 4.567));
        let result = BufferOp::new(&g)
            .with_precision_model(PrecisionModel::fixed(10.0))
            .buffer(1.0)
            .unwrap();
        let coords = all_coords(&result);
        assert!(!coords.is_empty());
        for c in coords {
            assert_relative_eq!(c.x * 10.0, (c.x * 10.0).round(), epsilon = 1e-9);
            assert_relative_eq!(c.y * 10.0, (c.y * 10.0).round(), epsilon = 1e-9);
        }
    }

    proptest! {
        #[test]
        fn prop_rect_buffer_area(
            x in -100.0..100.0f64,
            y in -100.0..100.0f64,
            w in 0.1..50.0f64,
            h in 0.1..50.0f64,
            d in 0.05..10.0f64,
        ) {
            let rect = Rect::new(Coord { x, y }, Coord { x: x + w, y: y + h });
            let g = Geometry::from(rect);
            let area = buffer(&g, d).unwrap().unsigned_area();
            let expected = w * h + 2.0 * d * (w + h) + polygonal_circle_area(d);
            prop_assert!((area - expected).abs() <= 0.01 * PI * d * d + 1e-6 * expected);
        }

        #[test]
        fn prop_buffer_is_deterministic(
            coords in prop::collection::vec((-10.0..10.0f64, -10.0..10.0f64), 2..8),
            d in -2.0..2.0f64,
        ) {
            let line = Geometry::from(geo_types::LineString::from(coords));
            let first = buffer(&line, d);
            let second = buffer(&line, d);
            prop_assert_eq!(first, second);
        }
    }
}
