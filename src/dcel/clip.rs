// Copyright 2025 Lars Brubaker
// Boundary clipping and face closing for the finished sweep.
//
// Every Voronoi edge lies on the perpendicular bisector of its two sites, so
// a pair is clipped as a parameter interval on that line. Ends that were
// traced from infinity or that converged outside the rectangle are moved
// onto the rectangle; the open chains of each face are then joined with
// pseudo edges running counter-clockwise along the perimeter.

use log::{trace, warn};

use super::{Bounds, Dcel, EdgeIdx, FaceIdx, HalfEdge, VertIdx, INVALID};
use crate::geom::{bisector_x_at, bisector_y_at, perp_cw, Point, Real};

/// Position of a point relative to the clipping rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    Inside,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Region {
    /// Classify `p`. Points within `tol` of a side count as lying beyond it,
    /// so `Inside` is reserved for points comfortably inside.
    pub fn classify(p: Point, bounds: &Bounds, tol: Real) -> Region {
        let horizontal = if p.x <= bounds.lx + tol {
            Some(Region::Left)
        } else if p.x >= bounds.ux - tol {
            Some(Region::Right)
        } else {
            None
        };
        let vertical = if p.y >= bounds.uy - tol {
            Some(Region::Top)
        } else if p.y <= bounds.ly + tol {
            Some(Region::Bottom)
        } else {
            None
        };
        Region::combine(vertical, horizontal)
    }

    /// Side (or corner) of the rectangle nearest to a point that lies on its
    /// boundary up to round-off. Never `Inside`.
    pub fn on_boundary(p: Point, bounds: &Bounds, tol: Real) -> Region {
        let dl = (p.x - bounds.lx).abs();
        let dr = (p.x - bounds.ux).abs();
        let db = (p.y - bounds.ly).abs();
        let dt = (p.y - bounds.uy).abs();

        let horizontal = if dl <= tol {
            Some(Region::Left)
        } else if dr <= tol {
            Some(Region::Right)
        } else {
            None
        };
        let vertical = if dt <= tol {
            Some(Region::Top)
        } else if db <= tol {
            Some(Region::Bottom)
        } else {
            None
        };
        match Region::combine(vertical, horizontal) {
            Region::Inside => {
                let m = dl.min(dr).min(db).min(dt);
                if m == dt {
                    Region::Top
                } else if m == db {
                    Region::Bottom
                } else if m == dl {
                    Region::Left
                } else {
                    Region::Right
                }
            }
            r => r,
        }
    }

    fn combine(vertical: Option<Region>, horizontal: Option<Region>) -> Region {
        match (vertical, horizontal) {
            (Some(Region::Top), Some(Region::Left)) => Region::TopLeft,
            (Some(Region::Top), Some(Region::Right)) => Region::TopRight,
            (Some(Region::Bottom), Some(Region::Left)) => Region::BottomLeft,
            (Some(Region::Bottom), Some(Region::Right)) => Region::BottomRight,
            (Some(v), None) => v,
            (None, Some(h)) => h,
            _ => Region::Inside,
        }
    }

    /// Exact point where the bisector of `a` and `b` meets this side of the
    /// rectangle. Corners are returned directly. `approx` stands in when the
    /// bisector runs parallel to the side.
    pub fn boundary_point(self, a: Point, b: Point, approx: Point, bounds: &Bounds) -> Point {
        let clamp_x = |x: Real| x.max(bounds.lx).min(bounds.ux);
        let clamp_y = |y: Real| y.max(bounds.ly).min(bounds.uy);
        match self {
            Region::Top => {
                let x = bisector_x_at(a, b, bounds.uy).unwrap_or(approx.x);
                Point::new(clamp_x(x), bounds.uy)
            }
            Region::Bottom => {
                let x = bisector_x_at(a, b, bounds.ly).unwrap_or(approx.x);
                Point::new(clamp_x(x), bounds.ly)
            }
            Region::Left => {
                let y = bisector_y_at(a, b, bounds.lx).unwrap_or(approx.y);
                Point::new(bounds.lx, clamp_y(y))
            }
            Region::Right => {
                let y = bisector_y_at(a, b, bounds.ux).unwrap_or(approx.y);
                Point::new(bounds.ux, clamp_y(y))
            }
            Region::TopLeft => Point::new(bounds.lx, bounds.uy),
            Region::TopRight => Point::new(bounds.ux, bounds.uy),
            Region::BottomLeft => Point::new(bounds.lx, bounds.ly),
            Region::BottomRight => Point::new(bounds.ux, bounds.ly),
            Region::Inside => approx,
        }
    }

    /// Counter-clockwise distance along the perimeter from (lx, ly) to a
    /// boundary point in this region.
    pub fn perimeter_coord(self, p: Point, bounds: &Bounds) -> Real {
        let w = bounds.width();
        let h = bounds.height();
        match self {
            Region::BottomLeft | Region::Inside => 0.0,
            Region::Bottom => p.x - bounds.lx,
            Region::BottomRight => w,
            Region::Right => w + (p.y - bounds.ly),
            Region::TopRight => w + h,
            Region::Top => w + h + (bounds.ux - p.x),
            Region::TopLeft => 2.0 * w + h,
            Region::Left => 2.0 * w + h + (bounds.uy - p.y),
        }
    }
}

/// Parameter interval of the line `m + t*u` inside `bounds`, or `None` if the
/// line misses the rectangle.
fn clip_line(m: Point, u: Point, bounds: &Bounds) -> Option<(Real, Real)> {
    let mut t_min = Real::NEG_INFINITY;
    let mut t_max = Real::INFINITY;
    for &(mc, uc, lo, hi) in &[(m.x, u.x, bounds.lx, bounds.ux), (m.y, u.y, bounds.ly, bounds.uy)] {
        if uc == 0.0 {
            if mc < lo || mc > hi {
                return None;
            }
            continue;
        }
        let mut a = (lo - mc) / uc;
        let mut b = (hi - mc) / uc;
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        t_min = t_min.max(a);
        t_max = t_max.min(b);
    }
    if t_min > t_max {
        None
    } else {
        Some((t_min, t_max))
    }
}

impl Dcel {
    /// Clip every Voronoi edge pair to the rectangle. Returns a mask of the
    /// half-edges that vanished (pairs wholly outside, or reduced to a point
    /// at a clipped end).
    pub(crate) fn clip_edges(&mut self, tol: Real) -> Vec<bool> {
        let bounds = self.bounds;
        let mut dead = vec![false; self.edges.len()];

        for e in 0..self.edges.len() as EdgeIdx {
            let t = self.edges[e as usize].twin;
            if t == INVALID || t < e {
                continue;
            }
            let a = self.sites[self.edges[e as usize].face as usize].point;
            let b = self.sites[self.edges[t as usize].face as usize].point;
            let m = a.midpoint(b);
            let dir = perp_cw(a - b);
            let len = (dir.x * dir.x + dir.y * dir.y).sqrt();
            let u = Point::new(dir.x / len, dir.y / len);
            let param = |p: Point| (p.x - m.x) * u.x + (p.y - m.y) * u.y;

            let o0 = self.edges[e as usize].origin;
            let o1 = self.edges[t as usize].origin;
            let keep0 = o0 != INVALID && !self.vertices[o0 as usize].exterior;
            let keep1 = o1 != INVALID && !self.vertices[o1 as usize].exterior;
            let t0 = if o0 != INVALID { param(self.vertices[o0 as usize].point) } else { Real::NEG_INFINITY };
            let t1 = if o1 != INVALID { param(self.vertices[o1 as usize].point) } else { Real::INFINITY };

            let (ta, tb) = match clip_line(m, u, &bounds) {
                Some(range) => range,
                None => {
                    trace!("edge pair {}/{} misses the bounds", e, t);
                    dead[e as usize] = true;
                    dead[t as usize] = true;
                    continue;
                }
            };
            let c0 = if keep0 { t0 } else { t0.max(ta) };
            let c1 = if keep1 { t1 } else { t1.min(tb) };
            if c1 - c0 <= tol && !(keep0 && keep1) {
                trace!("edge pair {}/{} lies outside the bounds", e, t);
                dead[e as usize] = true;
                dead[t as usize] = true;
                continue;
            }

            if !keep0 {
                let v = self.add_clip_vertex(a, b, Point::new(m.x + c0 * u.x, m.y + c0 * u.y), tol);
                self.edges[e as usize].origin = v;
            }
            if !keep1 {
                let v = self.add_clip_vertex(a, b, Point::new(m.x + c1 * u.x, m.y + c1 * u.y), tol);
                self.edges[t as usize].origin = v;
            }
        }
        dead
    }

    fn add_clip_vertex(&mut self, a: Point, b: Point, approx: Point, tol: Real) -> VertIdx {
        let region = Region::on_boundary(approx, &self.bounds, tol);
        let p = region.boundary_point(a, b, approx, &self.bounds);
        self.add_vertex(p, true, false)
    }

    /// Fold away interior pairs of zero length, which appear when more than
    /// three sites are cocircular and two circle events share a center. The
    /// pair is unlinked from both faces and its far vertex merged into its
    /// near one.
    pub(crate) fn collapse_degenerate_edges(&mut self, dead: &mut [bool], tol: Real) -> usize {
        let mut collapsed = 0;
        for e in 0..self.edges.len() as EdgeIdx {
            let t = self.edges[e as usize].twin;
            if t == INVALID || t < e || dead[e as usize] {
                continue;
            }
            let v0 = self.edges[e as usize].origin;
            let v1 = self.edges[t as usize].origin;
            if v0 == INVALID || v1 == INVALID {
                continue;
            }
            let (a, b) = (self.vertices[v0 as usize], self.vertices[v1 as usize]);
            if a.exterior || b.exterior || a.on_boundary || b.on_boundary || a.point.dist(b.point) > tol {
                continue;
            }
            let linked = [e, t].iter().all(|&h| {
                let he = &self.edges[h as usize];
                he.prev != INVALID && he.next != INVALID
            });
            if !linked {
                warn!("zero-length edge {} is not linked into its faces", e);
                continue;
            }
            for h in [e, t] {
                let HalfEdge { prev, next, .. } = self.edges[h as usize];
                self.link(prev, next);
            }
            for (i, he) in self.edges.iter_mut().enumerate() {
                if he.origin == v1 && !dead[i] {
                    he.origin = v0;
                }
            }
            dead[e as usize] = true;
            dead[t as usize] = true;
            collapsed += 1;
        }
        if collapsed > 0 {
            trace!("collapsed {} zero-length edges", collapsed);
        }
        collapsed
    }

    /// Drop dead half-edges and every vertex no live half-edge starts at,
    /// renumbering what is left.
    pub(crate) fn compact(&mut self, dead: &[bool]) {
        let mut edge_map = vec![INVALID; self.edges.len()];
        let mut kept: Vec<HalfEdge> = Vec::with_capacity(self.edges.len());
        for (i, e) in self.edges.iter().enumerate() {
            if dead.get(i).copied().unwrap_or(false) {
                continue;
            }
            edge_map[i] = kept.len() as EdgeIdx;
            kept.push(*e);
        }

        let mut used = vec![false; self.vertices.len()];
        for e in &kept {
            if e.origin != INVALID {
                used[e.origin as usize] = true;
            }
        }
        let mut vert_map = vec![INVALID; self.vertices.len()];
        let mut verts = Vec::with_capacity(self.vertices.len());
        for (i, v) in self.vertices.iter().enumerate() {
            if used[i] && !v.exterior {
                vert_map[i] = verts.len() as VertIdx;
                verts.push(*v);
            }
        }

        let remap = |map: &[u32], idx: u32| if idx == INVALID { INVALID } else { map[idx as usize] };
        for e in kept.iter_mut() {
            e.origin = remap(&vert_map, e.origin);
            e.twin = remap(&edge_map, e.twin);
            e.next = remap(&edge_map, e.next);
            e.prev = remap(&edge_map, e.prev);
        }
        for f in self.faces.iter_mut() {
            f.edge = remap(&edge_map, f.edge);
        }
        trace!(
            "compacted to {} vertices, {} half-edges",
            verts.len(),
            kept.len()
        );
        self.edges = kept;
        self.vertices = verts;
    }

    /// Join the open chains of every face along the rectangle boundary.
    /// A face without Voronoi edges becomes the whole rectangle.
    pub(crate) fn close_faces(&mut self, tol: Real) {
        let bounds = self.bounds;
        let perimeter = 2.0 * (bounds.width() + bounds.height());
        let corner_regions = [
            Region::BottomLeft,
            Region::BottomRight,
            Region::TopRight,
            Region::TopLeft,
        ];
        let corner_points = bounds.corners();
        let corner_coords: Vec<Real> = corner_regions
            .iter()
            .zip(corner_points.iter())
            .map(|(r, &p)| r.perimeter_coord(p, &bounds))
            .collect();
        let mut corner_verts = [INVALID; 4];

        let mut by_face: Vec<Vec<EdgeIdx>> = vec![Vec::new(); self.faces.len()];
        for (i, e) in self.edges.iter().enumerate() {
            by_face[e.face as usize].push(i as EdgeIdx);
        }

        for f in 0..self.faces.len() {
            let face = f as FaceIdx;
            let edges = &by_face[f];
            if edges.is_empty() {
                let ring: Vec<EdgeIdx> = (0..4)
                    .map(|c| {
                        let v = self.corner_vertex(&mut corner_verts, c, corner_points[c]);
                        self.add_pseudo_edge(v, face)
                    })
                    .collect();
                for i in 0..4 {
                    self.link(ring[i], ring[(i + 1) % 4]);
                }
                self.faces[f].edge = ring[0];
                continue;
            }
            self.faces[f].edge = edges[0];

            let tails: Vec<EdgeIdx> = edges
                .iter()
                .copied()
                .filter(|&e| self.edges[e as usize].next == INVALID)
                .collect();
            let heads: Vec<(Real, EdgeIdx)> = edges
                .iter()
                .copied()
                .filter(|&e| self.edges[e as usize].prev == INVALID)
                .map(|e| {
                    let p = self.vertices[self.edges[e as usize].origin as usize].point;
                    (Region::on_boundary(p, &bounds, tol).perimeter_coord(p, &bounds), e)
                })
                .collect();
            if tails.len() != heads.len() {
                warn!(
                    "face {} has {} open ends but {} open starts",
                    f,
                    tails.len(),
                    heads.len()
                );
            }

            for tail in tails {
                let twin = self.edges[tail as usize].twin;
                if twin == INVALID {
                    continue;
                }
                let dv = self.edges[twin as usize].origin;
                let dp = self.vertices[dv as usize].point;
                let s_tail = Region::on_boundary(dp, &bounds, tol).perimeter_coord(dp, &bounds);

                // First open start at or after the tail, walking counter-clockwise.
                let ahead = |s: Real| (s - s_tail).rem_euclid(perimeter);
                let best = heads
                    .iter()
                    .map(|&(s, h)| (ahead(s), h))
                    .min_by(|a, b| a.0.total_cmp(&b.0));
                let (gap, head) = match best {
                    Some(found) => found,
                    None => {
                        warn!("face {} has an open end with nowhere to go", f);
                        continue;
                    }
                };

                let mut between: Vec<(Real, usize)> = corner_coords
                    .iter()
                    .enumerate()
                    .map(|(c, &s)| (ahead(s), c))
                    .filter(|&(d, _)| d > 0.0 && d < gap)
                    .collect();
                between.sort_by(|a, b| a.0.total_cmp(&b.0));

                let hp = self.vertices[self.edges[head as usize].origin as usize].point;
                if between.is_empty() && (gap == 0.0 || hp == dp) {
                    self.link(tail, head);
                    continue;
                }

                let mut prev = tail;
                let first = self.add_pseudo_edge(dv, face);
                self.link(prev, first);
                prev = first;
                for &(_, c) in &between {
                    let v = self.corner_vertex(&mut corner_verts, c, corner_points[c]);
                    let pe = self.add_pseudo_edge(v, face);
                    self.link(prev, pe);
                    prev = pe;
                }
                self.link(prev, head);
                trace!("face {} closed through {} corners", f, between.len());
            }
        }
    }

    fn corner_vertex(&mut self, cache: &mut [VertIdx; 4], corner: usize, p: Point) -> VertIdx {
        if cache[corner] == INVALID {
            cache[corner] = self.add_vertex(p, true, false);
        }
        cache[corner]
    }
}
