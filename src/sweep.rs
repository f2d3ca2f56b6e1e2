// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Sweep events. A site event inserts an arc; a circle event removes the
// middle arc of a converging triplet and fixes a Voronoi vertex. Both wait in
// one priority queue keyed by the height at which the sweep line reaches
// them. All logic is driven through the Voronoi driver in voronoi.rs.

use crate::beachline::{BeachLine, NodeIdx, Triplet};
use crate::dcel::SiteIdx;
use crate::geom::{circumcircle, is_clockwise, Point, Real};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    Site(SiteIdx),
    Circle(CircleEvent),
}

/// The lowest point of the circle through three consecutive sites. When the
/// sweep line reaches it the middle arc has shrunk to nothing at `center`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleEvent {
    /// Arc that disappears.
    pub arc: NodeIdx,
    pub center: Point,
    pub radius: Real,
}

impl CircleEvent {
    /// Sweep height at which the event fires.
    #[inline]
    pub fn y(&self) -> Real {
        self.center.y - self.radius
    }
}

/// Circle through `l`, `m`, `r` if the arcs of those sites (in that order
/// along the beach line) are converging: all three distinct and turning
/// clockwise. Collinear and counter-clockwise triples never converge.
pub fn converging_circle(l: Point, m: Point, r: Point) -> Option<(Point, Real)> {
    if l == m || m == r || l == r {
        return None;
    }
    if !is_clockwise(l, m, r) {
        return None;
    }
    circumcircle(l, m, r)
}

impl Triplet {
    /// The event that would remove the middle arc, if its neighbours are
    /// closing in on it.
    pub fn compute_circle_event(&self, beach: &BeachLine, sites: &[Point]) -> Option<CircleEvent> {
        let l = sites[beach.site(self.left) as usize];
        let m = sites[beach.site(self.middle) as usize];
        let r = sites[beach.site(self.right) as usize];
        let (center, radius) = converging_circle(l, m, r)?;
        Some(CircleEvent {
            arc: self.middle,
            center,
            radius,
        })
    }
}
