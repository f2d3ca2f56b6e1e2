// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Input errors. They are all raised before the sweep starts; the sweep
// itself filters degenerate geometry instead of failing.

use crate::geom::Real;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VoronoiError {
    #[error("no sites to build a diagram from")]
    NoSites,
    #[error("invalid epsilon {epsilon}: need a finite value >= 0")]
    InvalidEpsilon { epsilon: Real },
    #[error("invalid bounds ({lx}, {ly}) - ({ux}, {uy}): need finite lx < ux and ly < uy")]
    InvalidBounds { lx: Real, ly: Real, ux: Real, uy: Real },
    #[error("site {index} has a non-finite coordinate")]
    NonFiniteSite { index: usize },
    #[error("site {index} at ({x}, {y}) lies outside the bounds")]
    SiteOutOfBounds { index: usize, x: Real, y: Real },
    #[error("site {index} repeats site {first}")]
    DuplicateSite { index: usize, first: usize },
}

pub type Result<T> = std::result::Result<T, VoronoiError>;
