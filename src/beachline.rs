// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// The beach line: a binary tree whose leaves are parabolic arcs (in
// left-to-right order along the sweep line) and whose internal nodes are the
// breakpoints between neighbouring arcs.
//
// Nodes live in a BucketAlloc and refer to each other by index; every node
// except the root has exactly one parent. INVALID = u32::MAX is the null
// link. A breakpoint stores the half-edge of its left site's face whose
// origin will be the point where the breakpoint stops moving.

use log::trace;

use crate::bucketalloc::BucketAlloc;
use crate::dcel::{EdgeIdx, SiteIdx, INVALID};
use crate::geom::{breakpoint_x, Point, Real};
use crate::priorityq::PqHandle;

/// Index into BeachLine::nodes
pub type NodeIdx = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeKind {
    Arc {
        site: SiteIdx,
        /// Pending circle event that would remove this arc.
        circle: Option<PqHandle>,
    },
    Breakpoint {
        left_site: SiteIdx,
        right_site: SiteIdx,
        edge: EdgeIdx,
        left: NodeIdx,
        right: NodeIdx,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub parent: NodeIdx,
    pub kind: NodeKind,
}

/// Three consecutive arcs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triplet {
    pub left: NodeIdx,
    pub middle: NodeIdx,
    pub right: NodeIdx,
}

/// What `remove_arc` leaves behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Removal {
    /// Breakpoint now separating the removed arc's two neighbours.
    pub converger: NodeIdx,
    pub left_arc: NodeIdx,
    pub right_arc: NodeIdx,
}

pub struct BeachLine {
    nodes: BucketAlloc<Node>,
    root: NodeIdx,
}

impl Default for BeachLine {
    fn default() -> Self {
        Self::new()
    }
}

impl BeachLine {
    pub fn new() -> Self {
        BeachLine {
            nodes: BucketAlloc::new(),
            root: INVALID,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root == INVALID
    }

    /// Number of live nodes (arcs and breakpoints).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_arc(&self, n: NodeIdx) -> bool {
        matches!(self.nodes.get(n), Some(Node { kind: NodeKind::Arc { .. }, .. }))
    }

    /// Site of an arc. INVALID for breakpoints.
    pub fn site(&self, arc: NodeIdx) -> SiteIdx {
        match self.nodes[arc].kind {
            NodeKind::Arc { site, .. } => site,
            NodeKind::Breakpoint { .. } => INVALID,
        }
    }

    pub fn circle(&self, arc: NodeIdx) -> Option<PqHandle> {
        match self.nodes[arc].kind {
            NodeKind::Arc { circle, .. } => circle,
            NodeKind::Breakpoint { .. } => None,
        }
    }

    /// Replace the pending circle event of an arc, handing back the old one.
    pub fn set_circle(&mut self, arc: NodeIdx, handle: Option<PqHandle>) -> Option<PqHandle> {
        match &mut self.nodes[arc].kind {
            NodeKind::Arc { circle, .. } => std::mem::replace(circle, handle),
            NodeKind::Breakpoint { .. } => None,
        }
    }

    /// Traced half-edge of a breakpoint. INVALID for arcs.
    pub fn edge(&self, bp: NodeIdx) -> EdgeIdx {
        match self.nodes[bp].kind {
            NodeKind::Breakpoint { edge, .. } => edge,
            NodeKind::Arc { .. } => INVALID,
        }
    }

    pub fn set_edge(&mut self, bp: NodeIdx, e: EdgeIdx) {
        if let NodeKind::Breakpoint { edge, .. } = &mut self.nodes[bp].kind {
            *edge = e;
        }
    }

    #[inline]
    fn children(&self, n: NodeIdx) -> Option<(NodeIdx, NodeIdx)> {
        match self.nodes[n].kind {
            NodeKind::Breakpoint { left, right, .. } => Some((left, right)),
            NodeKind::Arc { .. } => None,
        }
    }

    fn set_child(&mut self, parent: NodeIdx, side: Side, child: NodeIdx) {
        if let NodeKind::Breakpoint { left, right, .. } = &mut self.nodes[parent].kind {
            match side {
                Side::Left => *left = child,
                Side::Right => *right = child,
            }
        }
        self.nodes[child].parent = parent;
    }

    /// Put `new` where `old` hangs in the tree.
    fn replace_in_parent(&mut self, old: NodeIdx, new: NodeIdx) {
        let parent = self.nodes[old].parent;
        if parent == INVALID {
            self.root = new;
            self.nodes[new].parent = INVALID;
            return;
        }
        let side = match self.children(parent) {
            Some((l, _)) if l == old => Side::Left,
            _ => Side::Right,
        };
        self.set_child(parent, side, new);
    }

    fn alloc_arc(&mut self, site: SiteIdx) -> NodeIdx {
        self.nodes.alloc(Node {
            parent: INVALID,
            kind: NodeKind::Arc { site, circle: None },
        })
    }

    fn alloc_breakpoint(
        &mut self,
        left_site: SiteIdx,
        right_site: SiteIdx,
        edge: EdgeIdx,
        left: NodeIdx,
        right: NodeIdx,
    ) -> NodeIdx {
        let bp = self.nodes.alloc(Node {
            parent: INVALID,
            kind: NodeKind::Breakpoint {
                left_site,
                right_site,
                edge,
                left,
                right,
            },
        });
        self.nodes[left].parent = bp;
        self.nodes[right].parent = bp;
        bp
    }

    // ──── Point location ──────────────────────────────────────────────────

    /// Arc directly above `x` for a sweep line at `directrix`.
    pub fn locate(&self, x: Real, directrix: Real, sites: &[Point]) -> Option<NodeIdx> {
        if self.root == INVALID {
            return None;
        }
        let mut n = self.root;
        while let NodeKind::Breakpoint { left_site, right_site, left, right, .. } = self.nodes[n].kind {
            let bx = breakpoint_x(sites[left_site as usize], sites[right_site as usize], directrix);
            n = if x < bx { left } else { right };
        }
        Some(n)
    }

    // ──── Insertion ───────────────────────────────────────────────────────

    /// Install the first arc.
    pub fn insert_root(&mut self, site: SiteIdx) -> NodeIdx {
        let arc = self.alloc_arc(site);
        self.root = arc;
        arc
    }

    /// Split `above` around a new arc for `site`:
    ///
    /// ```text
    ///        above            (A,N)
    ///                ->      /     \
    ///                     above   (N,A)
    ///                             /   \
    ///                           new   copy
    /// ```
    ///
    /// `upper_edge` is traced by the (A,N) breakpoint and `lower_edge` by the
    /// (N,A) breakpoint. The old node keeps the left piece and loses its
    /// circle event. Returns the new arc.
    pub fn insert_and_split(
        &mut self,
        above: NodeIdx,
        site: SiteIdx,
        upper_edge: EdgeIdx,
        lower_edge: EdgeIdx,
    ) -> NodeIdx {
        let above_site = self.site(above);
        let new_arc = self.alloc_arc(site);
        let copy = self.alloc_arc(above_site);
        let lower = self.alloc_breakpoint(site, above_site, lower_edge, new_arc, copy);

        let parent = self.nodes[above].parent;
        let upper = self.nodes.alloc(Node {
            parent,
            kind: NodeKind::Breakpoint {
                left_site: above_site,
                right_site: site,
                edge: upper_edge,
                left: above,
                right: lower,
            },
        });
        self.replace_in_parent(above, upper);
        self.nodes[above].parent = upper;
        self.nodes[lower].parent = upper;
        self.set_circle(above, None);

        trace!("split arc {} (site {}) around site {}", above, above_site, site);
        new_arc
    }

    /// Place an arc for `site` next to `beside` under a single breakpoint.
    /// Only valid while `beside`'s site lies on the sweep line, where its
    /// arc has no width to split. `edge` is the half-edge on the face of the
    /// left one of the two sites. Returns the new arc.
    pub fn insert_beside(
        &mut self,
        beside: NodeIdx,
        site: SiteIdx,
        side: Side,
        edge: EdgeIdx,
    ) -> NodeIdx {
        let other = self.site(beside);
        let new_arc = self.alloc_arc(site);
        let parent = self.nodes[beside].parent;
        let (left_site, right_site, left, right) = match side {
            Side::Right => (other, site, beside, new_arc),
            Side::Left => (site, other, new_arc, beside),
        };
        let bp = self.nodes.alloc(Node {
            parent,
            kind: NodeKind::Breakpoint {
                left_site,
                right_site,
                edge,
                left,
                right,
            },
        });
        self.replace_in_parent(beside, bp);
        self.nodes[left].parent = bp;
        self.nodes[right].parent = bp;

        trace!("placed site {} {:?} of arc {}", site, side, beside);
        new_arc
    }

    // ──── Navigation ──────────────────────────────────────────────────────

    /// Breakpoint on the given side of `arc`, or INVALID at the ends.
    pub fn breakpoint(&self, arc: NodeIdx, side: Side) -> NodeIdx {
        let mut n = arc;
        loop {
            let parent = self.nodes[n].parent;
            if parent == INVALID {
                return INVALID;
            }
            match (self.children(parent), side) {
                (Some((_, r)), Side::Left) if r == n => return parent,
                (Some((l, _)), Side::Right) if l == n => return parent,
                _ => n = parent,
            }
        }
    }

    #[inline]
    pub fn left_breakpoint(&self, arc: NodeIdx) -> NodeIdx {
        self.breakpoint(arc, Side::Left)
    }

    #[inline]
    pub fn right_breakpoint(&self, arc: NodeIdx) -> NodeIdx {
        self.breakpoint(arc, Side::Right)
    }

    /// Arc on the given side of `arc`, or INVALID at the ends.
    pub fn neighbor(&self, arc: NodeIdx, side: Side) -> NodeIdx {
        let bp = self.breakpoint(arc, side);
        if bp == INVALID {
            return INVALID;
        }
        let (l, r) = match self.children(bp) {
            Some(c) => c,
            None => return INVALID,
        };
        // Descend the sibling subtree towards `arc`.
        let mut n = if side == Side::Left { l } else { r };
        while let Some((cl, cr)) = self.children(n) {
            n = if side == Side::Left { cr } else { cl };
        }
        n
    }

    #[inline]
    pub fn left_arc(&self, arc: NodeIdx) -> NodeIdx {
        self.neighbor(arc, Side::Left)
    }

    #[inline]
    pub fn right_arc(&self, arc: NodeIdx) -> NodeIdx {
        self.neighbor(arc, Side::Right)
    }

    /// The two arcs on `side` of `arc` together with `arc` itself, in
    /// left-to-right order. `None` when there are fewer than two.
    pub fn neighbor_triplet(&self, arc: NodeIdx, side: Side) -> Option<Triplet> {
        let near = self.neighbor(arc, side);
        if near == INVALID {
            return None;
        }
        let far = self.neighbor(near, side);
        if far == INVALID {
            return None;
        }
        Some(match side {
            Side::Left => Triplet { left: far, middle: near, right: arc },
            Side::Right => Triplet { left: arc, middle: near, right: far },
        })
    }

    // ──── Removal ─────────────────────────────────────────────────────────

    /// Remove a converging arc. Its parent breakpoint is freed and the
    /// sibling subtree takes the parent's place. The other breakpoint that
    /// bordered the arc, always an ancestor, now separates the two former
    /// neighbours and has its sites updated; it is returned as the
    /// converger. The caller owns the edges of both old breakpoints and must
    /// read them before calling this.
    pub fn remove_arc(&mut self, arc: NodeIdx) -> Option<Removal> {
        let left_arc = self.left_arc(arc);
        let right_arc = self.right_arc(arc);
        let bl = self.left_breakpoint(arc);
        let br = self.right_breakpoint(arc);
        if left_arc == INVALID || right_arc == INVALID || bl == INVALID || br == INVALID {
            return None;
        }

        let parent = self.nodes[arc].parent;
        let (pl, pr) = self.children(parent)?;
        let sibling = if pl == arc { pr } else { pl };
        let converger = if parent == bl { br } else { bl };

        self.replace_in_parent(parent, sibling);
        let new_left = self.site(left_arc);
        let new_right = self.site(right_arc);
        if let NodeKind::Breakpoint { left_site, right_site, .. } = &mut self.nodes[converger].kind {
            *left_site = new_left;
            *right_site = new_right;
        }
        self.nodes.free(parent);
        self.nodes.free(arc);

        trace!(
            "removed arc {}; breakpoint {} now between sites {} and {}",
            arc,
            converger,
            new_left,
            new_right
        );
        Some(Removal {
            converger,
            left_arc,
            right_arc,
        })
    }

    // ──── Inspection ──────────────────────────────────────────────────────

    /// Arcs from left to right.
    pub fn arcs(&self) -> Vec<NodeIdx> {
        let mut out = Vec::new();
        if self.root == INVALID {
            return out;
        }
        let mut stack = vec![self.root];
        while let Some(n) = stack.pop() {
            match self.children(n) {
                Some((l, r)) => {
                    stack.push(r);
                    stack.push(l);
                }
                None => out.push(n),
            }
        }
        out
    }

    /// Sites of the arcs from left to right.
    pub fn arc_sites(&self) -> Vec<SiteIdx> {
        self.arcs().into_iter().map(|a| self.site(a)).collect()
    }
}
