// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Doubly-connected edge list for a bounded Voronoi diagram.
//
// Everything lives in Vec arenas addressed by u32 indices:
//   - INVALID: u32::MAX  (null pointer equivalent)
//   - Voronoi half-edges are allocated in pairs, and each stores its twin.
//     Pseudo edges along the clipping rectangle have no twin.
//   - Every half-edge has its face on its left; faces are walked
//     counter-clockwise (y up) through `next`.
//   - Face i belongs to site i.
//
// While the sweep runs, origins may still be INVALID (the edge is traced
// from infinity) and convergence points outside the rectangle are kept as
// exterior vertices. The finishing pass in `clip` removes both.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VoronoiError};
use crate::geom::{Point, Real};

mod clip;

pub use clip::Region;

pub const INVALID: u32 = u32::MAX;

/// Index into Dcel::vertices
pub type VertIdx = u32;
/// Index into Dcel::edges
pub type EdgeIdx = u32;
/// Index into Dcel::faces
pub type FaceIdx = u32;
/// Index into Dcel::sites (same numbering as faces)
pub type SiteIdx = u32;

/// Axis-aligned clipping rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lx: Real,
    pub ly: Real,
    pub ux: Real,
    pub uy: Real,
}

impl Bounds {
    pub const fn new(lx: Real, ly: Real, ux: Real, uy: Real) -> Self {
        Bounds { lx, ly, ux, uy }
    }

    /// Rejects non-finite or empty rectangles.
    pub fn validate(&self) -> Result<()> {
        let finite = self.lx.is_finite() && self.ly.is_finite() && self.ux.is_finite() && self.uy.is_finite();
        if !finite || !(self.lx < self.ux) || !(self.ly < self.uy) {
            return Err(VoronoiError::InvalidBounds {
                lx: self.lx,
                ly: self.ly,
                ux: self.ux,
                uy: self.uy,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> Real {
        self.ux - self.lx
    }

    #[inline]
    pub fn height(&self) -> Real {
        self.uy - self.ly
    }

    /// Closed containment test.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.lx && p.x <= self.ux && p.y >= self.ly && p.y <= self.uy
    }

    /// Length used to turn a relative epsilon into a distance: the longer
    /// side, floored at a thousandth of the largest coordinate magnitude.
    pub fn scale(&self) -> Real {
        let magnitude = self
            .lx
            .abs()
            .max(self.ly.abs())
            .max(self.ux.abs())
            .max(self.uy.abs());
        self.width().max(self.height()).max(magnitude * 1e-3)
    }

    /// Corners in counter-clockwise order starting at (lx, ly).
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.lx, self.ly),
            Point::new(self.ux, self.ly),
            Point::new(self.ux, self.uy),
            Point::new(self.lx, self.uy),
        ]
    }
}

/// An input site and the face it owns.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Site {
    pub point: Point,
    pub face: FaceIdx,
    /// Position of the site in the caller's input.
    pub input: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Vertex {
    pub point: Point,
    /// Lies on the clipping rectangle (clip point or corner).
    pub on_boundary: bool,
    /// Convergence point outside the rectangle; never delivered.
    #[serde(skip)]
    pub(crate) exterior: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HalfEdge {
    pub origin: VertIdx,
    /// INVALID for a pseudo edge on the rectangle boundary.
    pub twin: EdgeIdx,
    pub next: EdgeIdx,
    pub prev: EdgeIdx,
    pub face: FaceIdx,
}

impl Default for HalfEdge {
    fn default() -> Self {
        Self {
            origin: INVALID,
            twin: INVALID,
            next: INVALID,
            prev: INVALID,
            face: INVALID,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Face {
    pub site: SiteIdx,
    /// Any half-edge on the boundary, INVALID until the face is closed.
    pub edge: EdgeIdx,
}

#[derive(Clone, Debug, Serialize)]
pub struct Dcel {
    bounds: Bounds,
    sites: Vec<Site>,
    vertices: Vec<Vertex>,
    edges: Vec<HalfEdge>,
    faces: Vec<Face>,
}

impl Dcel {
    /// One site and one face per point; `inputs[i]` is the caller's index
    /// of `points[i]`.
    pub(crate) fn new(bounds: Bounds, points: &[Point], inputs: &[usize]) -> Self {
        let sites = points
            .iter()
            .zip(inputs)
            .enumerate()
            .map(|(i, (&point, &input))| Site {
                point,
                face: i as FaceIdx,
                input,
            })
            .collect();
        let faces = (0..points.len())
            .map(|i| Face {
                site: i as SiteIdx,
                edge: INVALID,
            })
            .collect();
        Dcel {
            bounds,
            sites,
            vertices: Vec::new(),
            edges: Vec::with_capacity(points.len() * 6),
            faces,
        }
    }

    // ──── Construction ────────────────────────────────────────────────────

    pub(crate) fn add_vertex(&mut self, point: Point, on_boundary: bool, exterior: bool) -> VertIdx {
        self.vertices.push(Vertex {
            point,
            on_boundary,
            exterior,
        });
        (self.vertices.len() - 1) as VertIdx
    }

    /// Allocate twin half-edges bounding `face` and `twin_face`. Both origins
    /// start dangling. Returns (edge on `face`, edge on `twin_face`).
    pub(crate) fn add_edge_pair(&mut self, face: FaceIdx, twin_face: FaceIdx) -> (EdgeIdx, EdgeIdx) {
        let e = self.edges.len() as EdgeIdx;
        self.edges.push(HalfEdge {
            twin: e + 1,
            face,
            ..HalfEdge::default()
        });
        self.edges.push(HalfEdge {
            twin: e,
            face: twin_face,
            ..HalfEdge::default()
        });
        (e, e + 1)
    }

    pub(crate) fn add_pseudo_edge(&mut self, origin: VertIdx, face: FaceIdx) -> EdgeIdx {
        self.edges.push(HalfEdge {
            origin,
            face,
            ..HalfEdge::default()
        });
        (self.edges.len() - 1) as EdgeIdx
    }

    #[inline]
    pub(crate) fn set_origin(&mut self, e: EdgeIdx, v: VertIdx) {
        self.edges[e as usize].origin = v;
    }

    /// Make `b` follow `a` around their face.
    #[inline]
    pub(crate) fn link(&mut self, a: EdgeIdx, b: EdgeIdx) {
        self.edges[a as usize].next = b;
        self.edges[b as usize].prev = a;
    }

    // ──── Accessors ───────────────────────────────────────────────────────

    pub fn bounds(&self) -> Bounds { self.bounds }
    pub fn sites(&self) -> &[Site] { &self.sites }
    pub fn vertices(&self) -> &[Vertex] { &self.vertices }
    pub fn edges(&self) -> &[HalfEdge] { &self.edges }
    pub fn faces(&self) -> &[Face] { &self.faces }
    pub fn num_vertices(&self) -> usize { self.vertices.len() }
    pub fn num_edges(&self) -> usize { self.edges.len() }
    pub fn num_faces(&self) -> usize { self.faces.len() }

    #[inline]
    pub fn site(&self, s: SiteIdx) -> &Site {
        &self.sites[s as usize]
    }

    #[inline]
    pub fn vertex(&self, v: VertIdx) -> &Vertex {
        &self.vertices[v as usize]
    }

    #[inline]
    pub fn edge(&self, e: EdgeIdx) -> &HalfEdge {
        &self.edges[e as usize]
    }

    #[inline]
    pub fn face(&self, f: FaceIdx) -> &Face {
        &self.faces[f as usize]
    }

    #[inline]
    pub fn twin(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[e as usize].twin
    }

    #[inline]
    pub fn is_pseudo(&self, e: EdgeIdx) -> bool {
        self.edges[e as usize].twin == INVALID
    }

    /// Destination vertex: the origin of the following edge, or of the twin
    /// while the face is still open.
    pub fn dst(&self, e: EdgeIdx) -> VertIdx {
        let edge = &self.edges[e as usize];
        if edge.next != INVALID {
            return self.edges[edge.next as usize].origin;
        }
        if edge.twin != INVALID {
            return self.edges[edge.twin as usize].origin;
        }
        INVALID
    }

    pub fn origin_point(&self, e: EdgeIdx) -> Option<Point> {
        let v = self.edges[e as usize].origin;
        self.vertices.get(v as usize).map(|vx| vx.point)
    }

    /// Site on the far side of `e`, if it is a Voronoi edge.
    pub fn neighbor(&self, e: EdgeIdx) -> Option<SiteIdx> {
        let twin = self.edges[e as usize].twin;
        if twin == INVALID {
            return None;
        }
        Some(self.faces[self.edges[twin as usize].face as usize].site)
    }

    /// Walk the boundary of `f` once, starting at its anchor edge.
    pub fn face_boundary(&self, f: FaceIdx) -> FaceEdges<'_> {
        let start = self.faces[f as usize].edge;
        FaceEdges {
            dcel: self,
            start,
            curr: start,
            remaining: self.edges.len(),
        }
    }

    /// Corners of the cell of `f` in counter-clockwise order.
    pub fn face_polygon(&self, f: FaceIdx) -> Vec<Point> {
        self.face_boundary(f)
            .filter_map(|e| self.origin_point(e))
            .collect()
    }

    /// Signed area of the cell of `f` (positive for counter-clockwise).
    pub fn face_area(&self, f: FaceIdx) -> Real {
        let poly = self.face_polygon(f);
        let Some(&o) = poly.first() else {
            return 0.0;
        };
        // Shoelace about the first corner.
        let mut area = 0.0;
        for w in poly.windows(2) {
            let (a, b) = (w[0] - o, w[1] - o);
            area += a.x * b.y - b.x * a.y;
        }
        area * 0.5
    }

    /// Structural self-check of a finished diagram.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let n_edges = self.edges.len();
        let n_verts = self.vertices.len();
        let tol = 1e-9 * self.bounds.scale();

        for (i, e) in self.edges.iter().enumerate() {
            let i = i as EdgeIdx;
            if e.origin as usize >= n_verts {
                return Err(format!("edge {} has no origin", i));
            }
            if e.face as usize >= self.faces.len() {
                return Err(format!("edge {} has no face", i));
            }
            if e.twin != INVALID {
                let t = self.edges.get(e.twin as usize).ok_or_else(|| format!("edge {} has a dangling twin", i))?;
                if t.twin != i {
                    return Err(format!("twin of twin of edge {} is {}", i, t.twin));
                }
                if t.face == e.face {
                    return Err(format!("edge {} and its twin share face {}", i, e.face));
                }
            }
            let next = self.edges.get(e.next as usize).ok_or_else(|| format!("edge {} has no next", i))?;
            if next.prev != i {
                return Err(format!("next of edge {} does not point back", i));
            }
            if next.face != e.face {
                return Err(format!("edge {} and its next lie on different faces", i));
            }
            if e.twin != INVALID {
                let d = self.vertices[self.edges[e.twin as usize].origin as usize].point;
                let n = self.vertices[next.origin as usize].point;
                if d.dist(n) > tol {
                    return Err(format!("edge {} ends at {:?} but its next starts at {:?}", i, d, n));
                }
            }
        }

        for (i, v) in self.vertices.iter().enumerate() {
            let b = self.bounds;
            let p = v.point;
            if v.exterior || !p.is_finite() {
                return Err(format!("vertex {} is not deliverable", i));
            }
            if p.x < b.lx - tol || p.x > b.ux + tol || p.y < b.ly - tol || p.y > b.uy + tol {
                return Err(format!("vertex {} at {:?} lies outside the bounds", i, p));
            }
        }

        let mut seen = vec![false; n_edges];
        for (f, face) in self.faces.iter().enumerate() {
            if face.edge as usize >= n_edges {
                return Err(format!("face {} has no boundary", f));
            }
            let mut count = 0;
            for e in self.face_boundary(f as FaceIdx) {
                if seen[e as usize] {
                    return Err(format!("edge {} visited twice", e));
                }
                seen[e as usize] = true;
                count += 1;
            }
            if count < 3 {
                return Err(format!("face {} has only {} edges", f, count));
            }
            let e_last = self.edges[face.edge as usize].prev;
            if !seen[e_last as usize] {
                return Err(format!("boundary of face {} does not close", f));
            }
        }
        if let Some(e) = seen.iter().position(|s| !s) {
            return Err(format!("edge {} is on no face cycle", e));
        }
        Ok(())
    }
}

/// Iterator over the half-edges of one face, following `next`.
pub struct FaceEdges<'a> {
    dcel: &'a Dcel,
    start: EdgeIdx,
    curr: EdgeIdx,
    remaining: usize,
}

impl Iterator for FaceEdges<'_> {
    type Item = EdgeIdx;

    fn next(&mut self) -> Option<EdgeIdx> {
        if self.curr == INVALID || self.remaining == 0 {
            return None;
        }
        let e = self.curr;
        self.remaining -= 1;
        let next = self.dcel.edges[e as usize].next;
        self.curr = if next == self.start { INVALID } else { next };
        Some(e)
    }
}
