// fortune-dcel: bounded Voronoi diagrams by Fortune's sweepline, as a DCEL
// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

pub mod beachline;
pub mod bucketalloc;
pub mod dcel;
pub mod error;
pub mod geom;
pub mod priorityq;
pub mod sweep;
pub mod voronoi;

pub use dcel::{Bounds, Dcel, EdgeIdx, Face, FaceIdx, HalfEdge, Region, Site, SiteIdx, VertIdx, Vertex, INVALID};
pub use error::{Result, VoronoiError};
pub use geom::{Point, Real};
pub use voronoi::{compute, DuplicatePolicy, Options, Voronoi};
