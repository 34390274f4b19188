//! Floating-precision noder.
//!
//! Segments are sorted by their minimum X and swept left to right; every pair
//! with overlapping envelopes is intersected. Intersections are rounded to
//! the working precision model but no snapping is performed, so nearly
//! coincident geometry may still produce an inconsistent topology. That is
//! what the precision ladder recovers from.

use super::segment_string::{NodedSegmentString, SegmentString};
use crate::bounds::Aabb2;
use crate::precision::PrecisionModel;
use crate::primitives::Point2;
use crate::tolerance::LineIntersector;
use tracing::trace;

/// A segment of one of the strings being noded.
#[derive(Debug, Clone, Copy)]
pub(super) struct SegmentRef {
    pub string: usize,
    pub index: usize,
    pub env: Aabb2<f64>,
}

/// Collects every segment of `strings`, with envelopes expanded by
/// `tolerance`.
pub(super) fn collect_segments(strings: &[NodedSegmentString], tolerance: f64) -> Vec<SegmentRef> {
    let mut segs = Vec::new();
    for (si, ss) in strings.iter().enumerate() {
        for (i, w) in ss.coords().windows(2).enumerate() {
            let mut env = Aabb2::from_corners(w[0], w[1]);
            if tolerance > 0.0 {
                env = Aabb2::new(
                    Point2::new(env.min.x - tolerance, env.min.y - tolerance),
                    Point2::new(env.max.x + tolerance, env.max.y + tolerance),
                );
            }
            segs.push(SegmentRef {
                string: si,
                index: i,
                env,
            });
        }
    }
    segs
}

/// Calls `visit` once for every pair of segments whose envelopes overlap.
pub(super) fn for_each_overlapping_pair<V>(mut segs: Vec<SegmentRef>, mut visit: V)
where
    V: FnMut(SegmentRef, SegmentRef),
{
    segs.sort_by(|a, b| a.env.min.x.total_cmp(&b.env.min.x));
    for i in 0..segs.len() {
        let a = segs[i];
        for b in segs[i + 1..].iter() {
            if b.env.min.x > a.env.max.x {
                break;
            }
            if a.env.intersects(b.env) {
                visit(a, *b);
            }
        }
    }
}

/// Nodes `strings` by splitting them at all mutual intersections.
pub(super) fn node(strings: Vec<SegmentString>, precision: PrecisionModel) -> Vec<SegmentString> {
    let mut noded: Vec<NodedSegmentString> = strings.into_iter().map(Into::into).collect();
    let li = LineIntersector::new(precision);
    let mut found = 0usize;

    let segs = collect_segments(&noded, 0.0);
    for_each_overlapping_pair(segs, |a, b| {
        if a.string == b.string && a.index == b.index {
            return;
        }
        let (p0, p1) = segment(&noded[a.string], a.index);
        let (q0, q1) = segment(&noded[b.string], b.index);
        let result = li.intersect(p0, p1, q0, q1);
        if !result.has_intersection() {
            return;
        }
        if is_trivial(&noded[a.string], a, b, result.count()) {
            return;
        }
        found += 1;
        noded[a.string].add_intersections(&result, a.index);
        noded[b.string].add_intersections(&result, b.index);
    });

    trace!(
        strings = noded.len(),
        intersections = found,
        "fast noding complete"
    );

    noded
        .into_iter()
        .flat_map(NodedSegmentString::into_substrings)
        .collect()
}

#[inline]
fn segment(ss: &NodedSegmentString, index: usize) -> (Point2<f64>, Point2<f64>) {
    let pts = ss.coords();
    (pts[index], pts[index + 1])
}

/// A single intersection between neighbouring segments of the same string is
/// just their shared vertex.
fn is_trivial(ss: &NodedSegmentString, a: SegmentRef, b: SegmentRef, count: usize) -> bool {
    if a.string != b.string || count != 1 {
        return false;
    }
    if a.index.abs_diff(b.index) == 1 {
        return true;
    }
    if ss.is_closed() {
        let last = ss.coords().len() - 2;
        if (a.index == 0 && b.index == last) || (b.index == 0 && a.index == last) {
            return true;
        }
    }
    false
}
