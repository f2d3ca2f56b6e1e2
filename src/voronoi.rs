// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Fortune's sweep over a set of sites, producing a DCEL clipped to a
// rectangle.
//
// The sweep line moves from +y to -y. Sites are queued up front in
// (y descending, x ascending, input order); circle events are queued and
// cancelled as the beach line changes. Once the queue drains, `finish`
// clips the traced edges and closes every face along the rectangle.

use std::collections::HashMap;

use log::{debug, trace, warn};

use crate::beachline::{BeachLine, NodeIdx, Side, Triplet};
use crate::dcel::{Bounds, Dcel, Region, SiteIdx, INVALID};
use crate::error::{Result, VoronoiError};
use crate::geom::{Point, Real};
use crate::priorityq::PriorityQ;
use crate::sweep::{CircleEvent, Event};

mod finish;

// ─────────────────────────────── Public types ──────────────────────────────────

/// What to do with a site that repeats an earlier one exactly.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Keep the first occurrence and drop the rest.
    #[default]
    Merge,
    /// Fail with `VoronoiError::DuplicateSite`.
    Reject,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Options {
    pub duplicates: DuplicatePolicy,
    /// Relative tolerance, scaled by the size of the bounds, for event
    /// acceptance and for snapping points onto the rectangle.
    pub epsilon: Real,
}

impl Options {
    pub fn validate(&self) -> Result<()> {
        if self.epsilon.is_finite() && self.epsilon >= 0.0 {
            Ok(())
        } else {
            Err(VoronoiError::InvalidEpsilon { epsilon: self.epsilon })
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Options {
            duplicates: DuplicatePolicy::Merge,
            epsilon: 1e-9,
        }
    }
}

// ─────────────────────────── Voronoi ──────────────────────────────────────────

/// Collects sites and computes their bounded diagram.
#[derive(Clone, Debug)]
pub struct Voronoi {
    bounds: Bounds,
    options: Options,
    sites: Vec<Point>,
}

impl Voronoi {
    pub fn new(bounds: Bounds) -> Self {
        Voronoi {
            bounds,
            options: Options::default(),
            sites: Vec::new(),
        }
    }

    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    pub fn options(&self) -> &Options { &self.options }
    pub fn bounds(&self) -> Bounds { self.bounds }
    pub fn sites(&self) -> &[Point] { &self.sites }

    pub fn add_site(&mut self, x: Real, y: Real) {
        self.sites.push(Point::new(x, y));
    }

    /// Add sites from a flat `[x0, y0, x1, y1, ...]` slice. A trailing odd
    /// coordinate is ignored.
    pub fn add_sites(&mut self, coords: &[Real]) {
        self.sites
            .extend(coords.chunks_exact(2).map(|c| Point::new(c[0], c[1])));
    }

    /// Validate the input and run the sweep.
    pub fn compute(&self) -> Result<Dcel> {
        self.bounds.validate()?;
        self.options.validate()?;
        if self.sites.is_empty() {
            return Err(VoronoiError::NoSites);
        }
        for (index, p) in self.sites.iter().enumerate() {
            if !p.is_finite() {
                return Err(VoronoiError::NonFiniteSite { index });
            }
            if !self.bounds.contains(*p) {
                return Err(VoronoiError::SiteOutOfBounds { index, x: p.x, y: p.y });
            }
        }
        let (points, inputs) = self.distinct_sites()?;

        let sweep = Sweep::new(self.bounds, &self.options, points, &inputs);
        Ok(sweep.run())
    }

    /// Sites with exact repeats removed, plus the input index of each.
    fn distinct_sites(&self) -> Result<(Vec<Point>, Vec<usize>)> {
        let mut first_seen: HashMap<(u64, u64), usize> = HashMap::with_capacity(self.sites.len());
        let mut points = Vec::with_capacity(self.sites.len());
        let mut inputs = Vec::with_capacity(self.sites.len());
        for (index, p) in self.sites.iter().enumerate() {
            // + 0.0 folds -0.0 into 0.0
            let key = ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits());
            if let Some(&first) = first_seen.get(&key) {
                match self.options.duplicates {
                    DuplicatePolicy::Reject => {
                        return Err(VoronoiError::DuplicateSite { index, first });
                    }
                    DuplicatePolicy::Merge => {
                        warn!("site {} repeats site {}; dropped", index, first);
                        continue;
                    }
                }
            }
            first_seen.insert(key, index);
            points.push(*p);
            inputs.push(index);
        }
        Ok((points, inputs))
    }
}

/// Diagram of `sites` clipped to `bounds`, with default options.
pub fn compute(sites: &[Point], bounds: Bounds) -> Result<Dcel> {
    let mut v = Voronoi::new(bounds);
    v.sites.extend_from_slice(sites);
    v.compute()
}

// ─────────────────────────── Sweep state ──────────────────────────────────────

/// Which circle events a handler may still queue.
#[derive(Copy, Clone, Debug)]
enum Horizon {
    /// Anything at or below the sweep line.
    Site,
    /// Strictly below the sweep line, or the same convergence point again
    /// (more than three cocircular sites).
    Circle(Point),
}

struct Sweep {
    bounds: Bounds,
    tol: Real,
    points: Vec<Point>,
    queue: PriorityQ<Event>,
    beach: BeachLine,
    dcel: Dcel,
    sweep_y: Real,
    site_events: usize,
    circle_events: usize,
}

impl Sweep {
    fn new(bounds: Bounds, options: &Options, points: Vec<Point>, inputs: &[usize]) -> Self {
        let dcel = Dcel::new(bounds, &points, inputs);
        let mut order: Vec<usize> = (0..points.len()).collect();
        order.sort_by(|&a, &b| {
            points[b]
                .y
                .total_cmp(&points[a].y)
                .then(points[a].x.total_cmp(&points[b].x))
                .then(a.cmp(&b))
        });
        let mut queue = PriorityQ::with_capacity(points.len() * 2);
        for &s in &order {
            queue.push(points[s].y, Event::Site(s as SiteIdx));
        }
        Sweep {
            bounds,
            tol: options.epsilon * bounds.scale(),
            points,
            queue,
            beach: BeachLine::new(),
            dcel,
            sweep_y: Real::INFINITY,
            site_events: 0,
            circle_events: 0,
        }
    }

    fn run(mut self) -> Dcel {
        self.drain();
        self.finish()
    }

    /// Process events until the queue is empty.
    fn drain(&mut self) {
        while let Some((y, event)) = self.queue.pop() {
            self.sweep_y = y;
            match event {
                Event::Site(s) => self.site_event(s),
                Event::Circle(c) => self.circle_event(c),
            }
        }
    }

    // ──── Site events ─────────────────────────────────────────────────────

    fn site_event(&mut self, s: SiteIdx) {
        self.site_events += 1;
        let p = self.points[s as usize];
        debug!("site event {} at ({}, {})", s, p.x, p.y);

        let above = match self.beach.locate(p.x, p.y, &self.points) {
            Some(arc) => arc,
            None => {
                self.beach.insert_root(s);
                return;
            }
        };
        self.cancel_circle(above);

        let above_site = self.beach.site(above);
        let a = self.points[above_site as usize];
        let new_arc = if a.y == p.y {
            // Still on the first row: the arc above has no width yet.
            let side = if p.x > a.x { Side::Right } else { Side::Left };
            let (left, right) = match side {
                Side::Right => (above_site, s),
                Side::Left => (s, above_site),
            };
            let (e_left, _) = self.dcel.add_edge_pair(left, right);
            self.beach.insert_beside(above, s, side, e_left)
        } else {
            let (e_above, e_new) = self.dcel.add_edge_pair(above_site, s);
            self.beach.insert_and_split(above, s, e_above, e_new)
        };

        for side in [Side::Left, Side::Right] {
            if let Some(t) = self.beach.neighbor_triplet(new_arc, side) {
                self.add_circle_event(t, Horizon::Site);
            }
        }
    }

    // ──── Circle events ───────────────────────────────────────────────────

    fn circle_event(&mut self, ev: CircleEvent) {
        let arc = ev.arc;
        if !self.beach.is_arc(arc) || self.beach.set_circle(arc, None).is_none() {
            warn!("circle event for arc {} no longer matches the beach line", arc);
            return;
        }
        self.circle_events += 1;
        let center = ev.center;
        debug!(
            "circle event for site {} at ({}, {}), radius {}",
            self.beach.site(arc),
            center.x,
            center.y,
            ev.radius
        );

        let bl = self.beach.left_breakpoint(arc);
        let br = self.beach.right_breakpoint(arc);
        if bl == INVALID || br == INVALID {
            warn!("arc {} lost a neighbour before converging", arc);
            return;
        }
        let e_left = self.beach.edge(bl);
        let e_right = self.beach.edge(br);
        let removal = match self.beach.remove_arc(arc) {
            Some(r) => r,
            None => {
                warn!("arc {} could not be removed", arc);
                return;
            }
        };

        let region = Region::classify(center, &self.bounds, self.tol);
        let inside = region == Region::Inside;
        let v = self.dcel.add_vertex(center, false, !inside);
        self.dcel.set_origin(e_left, v);
        self.dcel.set_origin(e_right, v);

        // The converger starts tracing between the two neighbours from v.
        let l_site = self.beach.site(removal.left_arc);
        let r_site = self.beach.site(removal.right_arc);
        let (h_right, h_left) = self.dcel.add_edge_pair(r_site, l_site);
        self.dcel.set_origin(h_right, v);
        self.beach.set_edge(removal.converger, h_left);

        if inside {
            let t_left = self.dcel.twin(e_left);
            let t_right = self.dcel.twin(e_right);
            self.dcel.link(t_left, e_right);
            self.dcel.link(h_left, e_left);
            self.dcel.link(t_right, h_right);
        } else {
            trace!("vertex {} lies {:?} of the bounds", v, region);
        }

        // Both neighbours now sit in new triplets.
        self.cancel_circle(removal.left_arc);
        self.cancel_circle(removal.right_arc);
        for middle in [removal.left_arc, removal.right_arc] {
            if let Some(t) = self.triplet_around(middle) {
                self.add_circle_event(t, Horizon::Circle(center));
            }
        }
    }

    fn triplet_around(&self, middle: NodeIdx) -> Option<Triplet> {
        let left = self.beach.left_arc(middle);
        let right = self.beach.right_arc(middle);
        if left == INVALID || right == INVALID {
            return None;
        }
        Some(Triplet { left, middle, right })
    }

    fn accepts(&self, ev: &CircleEvent, horizon: Horizon) -> bool {
        let y = ev.y();
        match horizon {
            Horizon::Site => y <= self.sweep_y + self.tol,
            Horizon::Circle(vertex) => {
                y < self.sweep_y
                    || ((y - self.sweep_y).abs() <= self.tol && ev.center.dist(vertex) <= self.tol)
            }
        }
    }

    /// Queue the event of `t` if its arcs converge within `horizon`,
    /// replacing any event already registered on the middle arc.
    fn add_circle_event(&mut self, t: Triplet, horizon: Horizon) {
        let ev = match t.compute_circle_event(&self.beach, &self.points) {
            Some(ev) => ev,
            None => return,
        };
        if !self.accepts(&ev, horizon) {
            trace!("circle event at y = {} is behind the sweep line", ev.y());
            return;
        }
        let handle = self.queue.push(ev.y(), Event::Circle(ev));
        trace!("queued circle event for arc {} at y = {}", t.middle, ev.y());
        if let Some(old) = self.beach.set_circle(t.middle, Some(handle)) {
            self.queue.delete(old);
        }
    }

    fn cancel_circle(&mut self, arc: NodeIdx) {
        if let Some(h) = self.beach.set_circle(arc, None) {
            if self.queue.delete(h) {
                trace!("cancelled circle event of arc {}", arc);
            }
        }
    }
}
