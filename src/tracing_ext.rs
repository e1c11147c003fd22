//! Structured logging helpers for boolean constructions.
//!
//! The crate only emits `tracing` events; installing a subscriber is up to the
//! application. Timing events use the `tricsg::timing` target, so
//! `RUST_LOG=tricsg::timing=info` shows phase durations alone.
//!
//! - **WARN**: dropped input triangles, the split growth guard, policy fallbacks
//! - **INFO**: phase timing
//! - **DEBUG**: per-phase summaries (faces split, faces ray traced, stitched edges)
//! - **TRACE**: individual face splits and rejected faces

use crate::mesh::Mesh;
use std::time::Instant;
use tracing::{debug, info, span::EnteredSpan};

/// Enters a `csg_phase` span for its lifetime and logs the phase duration
/// when dropped. Events emitted while the timer is alive nest under the span.
pub struct PhaseTimer {
    name: &'static str,
    start: Instant,
    _span: EnteredSpan,
}

impl PhaseTimer {
    /// Start timing `name`.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!("csg_phase", phase = name).entered();
        debug!(target: "tricsg::timing", phase = name, "Starting phase");
        Self {
            name,
            start: Instant::now(),
            _span: span,
        }
    }

    /// Start timing `name` with the sizes of both operands attached.
    pub fn with_operands(name: &'static str, first: &Mesh, second: &Mesh) -> Self {
        let span = tracing::info_span!(
            "csg_phase",
            phase = name,
            first_faces = first.face_count(),
            second_faces = second.face_count()
        )
        .entered();
        debug!(
            target: "tricsg::timing",
            phase = name,
            first_faces = first.face_count(),
            second_faces = second.face_count(),
            "Starting phase"
        );
        Self {
            name,
            start: Instant::now(),
            _span: span,
        }
    }

    /// Milliseconds since the timer started.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for PhaseTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        info!(
            target: "tricsg::timing",
            phase = self.name,
            elapsed_ms = format!("{:.2}", elapsed_ms),
            "Phase completed"
        );
    }
}

/// Log vertex/face counts and bounds of a mesh at debug level.
pub fn log_mesh_stats(mesh: &Mesh, context: &str) {
    let bb = mesh.bounding_box();
    debug!(
        context = context,
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        min = ?[bb.mins.x, bb.mins.y, bb.mins.z],
        max = ?[bb.maxs.x, bb.maxs.y, bb.maxs.z],
        "Mesh statistics"
    );
}
