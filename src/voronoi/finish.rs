// Copyright 2025 Lars Brubaker
// Finalization once the event queue has drained.

use log::{debug, info, warn};

use super::Sweep;
use crate::dcel::Dcel;

impl Sweep {
    /// Clip the traced edges to the bounds, merge coincident vertices, then
    /// close every face along the rectangle.
    pub(super) fn finish(mut self) -> Dcel {
        debug!(
            "sweep done: {} beach line nodes, open arcs {:?}",
            self.beach.len(),
            self.beach.arc_sites()
        );
        let mut dead = self.dcel.clip_edges(self.tol);
        let dropped = dead.iter().filter(|&&d| d).count();
        let collapsed = self.dcel.collapse_degenerate_edges(&mut dead, self.tol);
        if collapsed > 0 {
            debug!("merged {} coincident vertices", collapsed);
        }
        self.dcel.compact(&dead);
        self.dcel.close_faces(self.tol);

        info!(
            "voronoi: {} sites, {} circle events, {} vertices, {} half-edges ({} clipped away)",
            self.site_events,
            self.circle_events,
            self.dcel.num_vertices(),
            self.dcel.num_edges(),
            dropped
        );
        if cfg!(debug_assertions) {
            if let Err(msg) = self.dcel.validate() {
                warn!("finished diagram is inconsistent: {}", msg);
            }
        }
        self.dcel
    }
}
