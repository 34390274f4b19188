//! Conversions between `geo-types` geometries and the crate's primitives.
//!
//! Input geometries are read component by component as [`Point2`] lists;
//! results are returned as `geo-types` polygons. Output is always a
//! [`Geometry::Polygon`] (possibly empty) or a [`Geometry::MultiPolygon`].

use crate::bounds::Aabb2;
use crate::primitives::Point2;
use geo_types::{Coord, Geometry, LineString, MultiPolygon, Polygon};

/// The empty polygon returned when a buffer has no area.
pub fn empty_polygon() -> Geometry<f64> {
    Geometry::Polygon(Polygon::new(LineString::new(Vec::new()), Vec::new()))
}

/// Wraps assembled polygons into the narrowest geometry type.
pub fn build_geometry(mut polygons: Vec<Polygon<f64>>) -> Geometry<f64> {
    match polygons.len() {
        0 => empty_polygon(),
        1 => match polygons.pop() {
            Some(p) => Geometry::Polygon(p),
            None => empty_polygon(),
        },
        _ => Geometry::MultiPolygon(MultiPolygon::new(polygons)),
    }
}

/// Returns `true` if the geometry is an empty polygon or has no polygons.
pub fn is_empty_polygonal(geometry: &Geometry<f64>) -> bool {
    match geometry {
        Geometry::Polygon(p) => p.exterior().0.is_empty(),
        Geometry::MultiPolygon(mp) => mp.0.is_empty(),
        _ => false,
    }
}

/// Converts coordinates, dropping non-finite points and consecutive repeats.
pub fn clean_coords(coords: &[Coord<f64>]) -> Vec<Point2<f64>> {
    let mut out: Vec<Point2<f64>> = Vec::with_capacity(coords.len());
    for &c in coords {
        let p = Point2::from(c);
        if !p.is_finite() {
            continue;
        }
        if out.last() == Some(&p) {
            continue;
        }
        out.push(p);
    }
    out
}

/// Converts a closed list of points into a `geo-types` ring.
pub fn to_line_string(pts: &[Point2<f64>]) -> LineString<f64> {
    LineString::new(pts.iter().map(|&p| p.into()).collect())
}

/// Bounding box of every finite coordinate of the geometry.
pub fn envelope(geometry: &Geometry<f64>) -> Option<Aabb2<f64>> {
    let mut env: Option<Aabb2<f64>> = None;
    for_each_coord(geometry, &mut |c| {
        let p = Point2::from(c);
        if !p.is_finite() {
            return;
        }
        env = Some(match env {
            Some(e) => e.expand_to_include(p),
            None => Aabb2::from_point(p),
        });
    });
    env
}

fn for_each_coord<V: FnMut(Coord<f64>)>(geometry: &Geometry<f64>, visit: &mut V) {
    let line = |ls: &LineString<f64>, visit: &mut V| ls.0.iter().for_each(|&c| visit(c));
    match geometry {
        Geometry::Point(p) => visit(p.0),
        Geometry::Line(l) => {
            visit(l.start);
            visit(l.end);
        }
        Geometry::LineString(ls) => line(ls, visit),
        Geometry::Polygon(p) => {
            line(p.exterior(), visit);
            p.interiors().iter().for_each(|r| line(r, visit));
        }
        Geometry::MultiPoint(mp) => mp.0.iter().for_each(|p| visit(p.0)),
        Geometry::MultiLineString(mls) => mls.0.iter().for_each(|ls| line(ls, visit)),
        Geometry::MultiPolygon(mp) => {
            for p in &mp.0 {
                line(p.exterior(), visit);
                p.interiors().iter().for_each(|r| line(r, visit));
            }
        }
        Geometry::GeometryCollection(gc) => gc.0.iter().for_each(|g| for_each_coord(g, visit)),
        Geometry::Rect(r) => {
            visit(r.min());
            visit(r.max());
        }
        Geometry::Triangle(t) => {
            visit(t.v1());
            visit(t.v2());
            visit(t.v3());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{coord, line_string, point, polygon, GeometryCollection, Triangle};

    #[test]
    fn test_build_geometry() {
        assert!(is_empty_polygonal(&build_geometry(Vec::new())));

        let p = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 0.0, y: 1.0)];
        assert!(matches!(build_geometry(vec![p.clone()]), Geometry::Polygon(_)));
        match build_geometry(vec![p.clone(), p]) {
            Geometry::MultiPolygon(mp) => assert_eq!(mp.0.len(), 2),
            other => panic!("expected a multipolygon, got {other:?}"),
        }
    }

    #[test]
    fn test_clean_coords() {
        let coords = [
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 0.0, y: 0.0 },
            coord! { x: f64::NAN, y: 1.0 },
            coord! { x: 1.0, y: 0.0 },
            coord! { x: f64::INFINITY, y: 0.0 },
            coord! { x: 1.0, y: 0.0 },
        ];
        assert_eq!(
            clean_coords(&coords),
            vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]
        );
    }

    #[test]
    fn test_envelope_of_collection() {
        let gc = Geometry::GeometryCollection(GeometryCollection::new_from(vec![
            point!(x: -2.0, y: 1.0).into(),
            line_string![(x: 0.0, y: 0.0), (x: 3.0, y: 5.0)].into(),
        ]));
        let env = envelope(&gc).unwrap();
        assert_eq!(env.min, Point2::new(-2.0, 0.0));
        assert_eq!(env.max, Point2::new(3.0, 5.0));

        assert!(envelope(&empty_polygon()).is_none());

        let tri = Geometry::Triangle(Triangle::new(
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 4.0, y: -1.0 },
            coord! { x: 1.0, y: 3.0 },
        ));
        let env = envelope(&tri).unwrap();
        assert_eq!(env.min, Point2::new(0.0, -1.0));
        assert_eq!(env.max, Point2::new(4.0, 3.0));
    }
}
