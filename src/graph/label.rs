//! Topological labels.
//!
//! A label records, for up to two input geometries, where an edge lies
//! relative to each geometry: on the edge itself and on its left and right
//! sides.

use std::fmt;

/// Location of a point relative to a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Location::Interior => 'i',
            Location::Boundary => 'b',
            Location::Exterior => 'e',
        };
        write!(f, "{c}")
    }
}

/// Side of a directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    On = 0,
    Left = 1,
    Right = 2,
}

impl Position {
    /// Swaps `Left` and `Right`; `On` is its own opposite.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Position::On => Position::On,
            Position::Left => Position::Right,
            Position::Right => Position::Left,
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Locations of one geometry on and beside an edge.
///
/// Line-like entries only carry the `On` location; area entries carry all
/// three. Unknown locations are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TopologyLocation {
    locs: [Option<Location>; 3],
    area: bool,
}

impl TopologyLocation {
    /// An area entry with the given on/left/right locations.
    pub fn area(on: Option<Location>, left: Option<Location>, right: Option<Location>) -> Self {
        Self {
            locs: [on, left, right],
            area: true,
        }
    }

    /// A line entry with only an `On` location.
    pub fn line(on: Option<Location>) -> Self {
        Self {
            locs: [on, None, None],
            area: false,
        }
    }

    #[inline]
    pub fn is_area(&self) -> bool {
        self.area
    }

    #[inline]
    pub fn get(&self, pos: Position) -> Option<Location> {
        self.locs[pos.index()]
    }

    #[inline]
    pub fn set(&mut self, pos: Position, loc: Option<Location>) {
        self.locs[pos.index()] = loc;
    }

    /// Swaps the side locations of an area entry.
    pub fn flip(&mut self) {
        if self.area {
            self.locs.swap(Position::Left.index(), Position::Right.index());
        }
    }

    /// Fills unknown locations from `other`, promoting a line entry to an
    /// area entry if `other` is one.
    pub fn merge(&mut self, other: &TopologyLocation) {
        if other.area && !self.area {
            self.area = true;
        }
        for (mine, theirs) in self.locs.iter_mut().zip(other.locs.iter()) {
            if mine.is_none() {
                *mine = *theirs;
            }
        }
    }
}

/// Topological label of an edge for two geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Label {
    elts: [TopologyLocation; 2],
}

impl Label {
    /// An area label for geometry `geom`; the other geometry gets an empty
    /// area entry.
    pub fn new_area(geom: usize, on: Location, left: Location, right: Location) -> Self {
        let mut elts = [TopologyLocation::area(None, None, None); 2];
        elts[geom] = TopologyLocation::area(Some(on), Some(left), Some(right));
        Self { elts }
    }

    /// Location of geometry `geom` at `pos`.
    #[inline]
    pub fn location(&self, geom: usize, pos: Position) -> Option<Location> {
        self.elts[geom].get(pos)
    }

    #[inline]
    pub fn set_location(&mut self, geom: usize, pos: Position, loc: Location) {
        self.elts[geom].set(pos, Some(loc));
    }

    /// Returns `true` if either geometry has an area entry.
    pub fn is_area(&self) -> bool {
        self.elts[0].is_area() || self.elts[1].is_area()
    }

    #[inline]
    pub fn is_area_of(&self, geom: usize) -> bool {
        self.elts[geom].is_area()
    }

    /// Swaps left and right for both geometries.
    pub fn flip(&mut self) {
        self.elts[0].flip();
        self.elts[1].flip();
    }

    /// Returns a copy with left and right swapped.
    pub fn flipped(mut self) -> Self {
        self.flip();
        self
    }

    /// Fills unknown locations of this label from `other`.
    pub fn merge(&mut self, other: &Label) {
        for (mine, theirs) in self.elts.iter_mut().zip(other.elts.iter()) {
            mine.merge(theirs);
        }
    }

    /// Depth change crossing the edge from right to left for geometry 0.
    ///
    /// `+1` when the left side is interior and the right exterior, `-1` for
    /// the reverse, otherwise `0`.
    pub fn depth_delta(&self) -> i32 {
        let left = self.location(0, Position::Left);
        let right = self.location(0, Position::Right);
        match (left, right) {
            (Some(Location::Interior), Some(Location::Exterior)) => 1,
            (Some(Location::Exterior), Some(Location::Interior)) => -1,
            _ => 0,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, elt) in self.elts.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "A{}:", i)?;
            for loc in elt.locs.iter().take(if elt.area { 3 } else { 1 }) {
                match loc {
                    Some(l) => write!(f, "{l}")?,
                    None => write!(f, "-")?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_delta() {
        let shell = Label::new_area(0, Location::Boundary, Location::Exterior, Location::Interior);
        assert_eq!(shell.depth_delta(), -1);
        assert_eq!(shell.flipped().depth_delta(), 1);

        let neutral = Label::new_area(
            0,
            Location::Boundary,
            Location::Interior,
            Location::Interior,
        );
        assert_eq!(neutral.depth_delta(), 0);
    }

    #[test]
    fn test_flip_swaps_sides() {
        let mut label = Label::new_area(
            0,
            Location::Boundary,
            Location::Exterior,
            Location::Interior,
        );
        label.flip();
        assert_eq!(label.location(0, Position::Left), Some(Location::Interior));
        assert_eq!(label.location(0, Position::Right), Some(Location::Exterior));
        assert_eq!(label.location(0, Position::On), Some(Location::Boundary));
    }

    #[test]
    fn test_merge_fills_unknown_only() {
        let mut a = Label::new_area(0, Location::Boundary, Location::Exterior, Location::Interior);
        let mut b = Label::new_area(1, Location::Boundary, Location::Interior, Location::Exterior);
        b.set_location(0, Position::Left, Location::Interior);

        a.merge(&b);
        // Known locations of `a` win.
        assert_eq!(a.location(0, Position::Left), Some(Location::Exterior));
        // Unknown locations are taken from `b`.
        assert_eq!(a.location(1, Position::Left), Some(Location::Interior));
        assert_eq!(a.location(1, Position::Right), Some(Location::Exterior));
    }

    #[test]
    fn test_line_entry_promoted_by_merge() {
        let mut line = TopologyLocation::line(Some(Location::Interior));
        assert!(!line.is_area());
        line.merge(&TopologyLocation::area(
            Some(Location::Boundary),
            Some(Location::Exterior),
            None,
        ));
        assert!(line.is_area());
        assert_eq!(line.get(Position::On), Some(Location::Interior));
        assert_eq!(line.get(Position::Left), Some(Location::Exterior));
    }

    #[test]
    fn test_position_opposite() {
        assert_eq!(Position::Left.opposite(), Position::Right);
        assert_eq!(Position::Right.opposite(), Position::Left);
        assert_eq!(Position::On.opposite(), Position::On);
    }

    #[test]
    fn test_display() {
        let label = Label::new_area(0, Location::Boundary, Location::Exterior, Location::Interior);
        assert_eq!(label.to_string(), "A0:bei A1:---");
    }
}
