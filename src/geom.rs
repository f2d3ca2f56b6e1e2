// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Pure geometric functions used by the sweep: orientation, perpendicular
// bisectors, parabola breakpoints and the bisector/rectangle formulas used
// when an edge is clipped.
//
// The sweep line moves from +y towards -y. A site's arc is the parabola of
// points equidistant from the site and the horizontal directrix at the
// current sweep height.

use serde::{Deserialize, Serialize};

pub type Real = f64;

/// A point in the plane (y grows upwards).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: Real,
    pub y: Real,
}

impl Point {
    #[inline]
    pub const fn new(x: Real, y: Real) -> Self {
        Point { x, y }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn dist2(&self, other: Point) -> Real {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn dist(&self, other: Point) -> Real {
        self.dist2(other).sqrt()
    }

    #[inline]
    pub fn midpoint(&self, other: Point) -> Point {
        Point::new(self.x / 2.0 + other.x / 2.0, self.y / 2.0 + other.y / 2.0)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Twice the signed area of (u, v, w): positive for a counter-clockwise turn,
/// negative for a clockwise turn, zero when collinear.
#[inline]
pub fn orient(u: Point, v: Point, w: Point) -> Real {
    u.x * (v.y - w.y) + v.x * (w.y - u.y) + w.x * (u.y - v.y)
}

/// Strict clockwise turn u -> v -> w. Collinear triples are rejected.
#[inline]
pub fn is_clockwise(u: Point, v: Point, w: Point) -> bool {
    orient(u, v, w) < 0.0
}

/// Rotate a direction by -90 degrees.
#[inline]
pub fn perp_cw(v: Point) -> Point {
    Point::new(v.y, -v.x)
}

/// X coordinate of the breakpoint between the arc of `left` and the arc of
/// `right` for a sweep line at height `directrix`.
///
/// Two parabolas with distinct foci meet in up to two points; the one that is
/// a breakpoint with `left` on its left side is the larger root when `left`
/// is the lower site and the smaller root otherwise. A focus lying exactly on
/// the directrix degenerates to a vertical ray through the focus.
pub fn breakpoint_x(left: Point, right: Point, directrix: Real) -> Real {
    if left.y == right.y {
        return left.x / 2.0 + right.x / 2.0;
    }
    if left.y <= directrix {
        return left.x;
    }
    if right.y <= directrix {
        return right.x;
    }

    // Multiply both parabola equations through by their focal distances so the
    // coefficients stay finite as a focus approaches the directrix:
    //   dr (x - lx)^2 - dl (x - rx)^2 + dl dr (ly - ry) / 2 = 0
    // Solved for x - lx so far-off coordinates do not cancel.
    let dl = 2.0 * (left.y - directrix);
    let dr = 2.0 * (right.y - directrix);
    let rx = right.x - left.x;
    let a = dr - dl;
    let b = 2.0 * dl * rx;
    let c = -dl * rx * rx + dl * dr * (left.y - right.y) / 2.0;

    let disc = (b * b - 4.0 * a * c).max(0.0);
    let sq = disc.sqrt();
    let q = -0.5 * (b + sq.copysign(b));
    let (x1, x2) = if q == 0.0 {
        let x = -b / (2.0 * a);
        (x, x)
    } else {
        (q / a, c / q)
    };

    let x = if left.y < right.y { x1.max(x2) } else { x1.min(x2) };
    left.x + x
}

/// X coordinate of the point on the perpendicular bisector of `a` and `b`
/// at height `y`. `None` for a horizontal bisector (`a.x == b.x`).
pub fn bisector_x_at(a: Point, b: Point, y: Real) -> Option<Real> {
    let dx = b.x - a.x;
    if dx == 0.0 {
        return None;
    }
    let m = a.midpoint(b);
    Some(m.x - (y - m.y) * (b.y - a.y) / dx)
}

/// Y coordinate of the point on the perpendicular bisector of `a` and `b`
/// at abscissa `x`. `None` for a vertical bisector (`a.y == b.y`).
pub fn bisector_y_at(a: Point, b: Point, x: Real) -> Option<Real> {
    let dy = b.y - a.y;
    if dy == 0.0 {
        return None;
    }
    let m = a.midpoint(b);
    Some(m.y - (x - m.x) * (b.x - a.x) / dy)
}

/// Perpendicular bisector of two points in general form `nx*x + ny*y = k`,
/// with the axis-parallel cases kept apart so no slope is ever formed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bisector {
    /// `y = level` (the two points share an x coordinate).
    Horizontal { level: Real },
    /// `x = level` (the two points share a y coordinate).
    Vertical { level: Real },
    General { nx: Real, ny: Real, k: Real },
}

impl Bisector {
    /// Bisector of `a` and `b`; `None` if the points coincide.
    pub fn new(a: Point, b: Point) -> Option<Self> {
        if a == b {
            return None;
        }
        if a.x == b.x {
            return Some(Bisector::Horizontal { level: a.y / 2.0 + b.y / 2.0 });
        }
        if a.y == b.y {
            return Some(Bisector::Vertical { level: a.x / 2.0 + b.x / 2.0 });
        }
        let nx = b.x - a.x;
        let ny = b.y - a.y;
        let k = (b.x * b.x - a.x * a.x + b.y * b.y - a.y * a.y) / 2.0;
        Some(Bisector::General { nx, ny, k })
    }

    /// Intersection of two bisectors; `None` for parallel lines.
    pub fn intersect(&self, other: &Bisector) -> Option<Point> {
        use Bisector::*;
        match (*self, *other) {
            (Horizontal { .. }, Horizontal { .. }) | (Vertical { .. }, Vertical { .. }) => None,
            (Horizontal { level: y }, Vertical { level: x })
            | (Vertical { level: x }, Horizontal { level: y }) => Some(Point::new(x, y)),
            (Horizontal { level: y }, General { nx, ny, k })
            | (General { nx, ny, k }, Horizontal { level: y }) => {
                // nx != 0 for a general bisector
                Some(Point::new((k - ny * y) / nx, y))
            }
            (Vertical { level: x }, General { nx, ny, k })
            | (General { nx, ny, k }, Vertical { level: x }) => {
                Some(Point::new(x, (k - nx * x) / ny))
            }
            (General { nx: a1, ny: b1, k: k1 }, General { nx: a2, ny: b2, k: k2 }) => {
                let det = a1 * b2 - b1 * a2;
                if det == 0.0 {
                    return None;
                }
                Some(Point::new((k1 * b2 - k2 * b1) / det, (a1 * k2 - a2 * k1) / det))
            }
        }
    }
}

/// Circle through three points, from the intersection of the bisectors of
/// (left, middle) and (right, middle). Coordinates are taken relative to
/// `middle` to keep the magnitudes small. Returns `(center, radius)`, or
/// `None` for coincident or collinear input.
pub fn circumcircle(left: Point, middle: Point, right: Point) -> Option<(Point, Real)> {
    let origin = Point::new(0.0, 0.0);
    let l = left - middle;
    let r = right - middle;
    let b1 = Bisector::new(l, origin)?;
    let b2 = Bisector::new(r, origin)?;
    let c = b1.intersect(&b2)?;
    if !c.is_finite() {
        return None;
    }
    let radius = c.dist(l);
    Some((c + middle, radius))
}
