//! Struct and functions for working with the pooled `Vertex`s that `Face`s reference.

use crate::float_types::{Real, VERTEX_TOLERANCE};
use nalgebra::Point3;

/// Index of a vertex in its mesh's vertex pool.
pub type VertexId = usize;

/// Position of a vertex relative to the other operand of a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VertexStatus {
    #[default]
    Unknown,
    Inside,
    Outside,
    /// Lies on the intersection curve or on the other operand's surface.
    Boundary,
}

impl VertexStatus {
    /// `Inside` or `Outside`.
    pub const fn is_resolved(self) -> bool {
        matches!(self, VertexStatus::Inside | VertexStatus::Outside)
    }
}

/// A mesh vertex: position, classification tag and the ids of the vertices
/// it shares an edge with.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub pos: Point3<Real>,
    pub status: VertexStatus,
    /// Filled by [`crate::mesh::Mesh::build_adjacency`]; empty otherwise.
    pub(crate) adjacent: Vec<VertexId>,
}

impl Vertex {
    /// Create a new [`Vertex`] with no adjacency.
    pub const fn new(pos: Point3<Real>, status: VertexStatus) -> Self {
        Vertex {
            pos,
            status,
            adjacent: Vec::new(),
        }
    }

    /// Whether `pos` is within [`VERTEX_TOLERANCE`] of this vertex on every axis.
    #[inline]
    pub fn almost_equals(&self, pos: &Point3<Real>) -> bool {
        almost_equal(&self.pos, pos)
    }

    /// Ids of the vertices sharing an edge with this one.
    pub fn adjacent(&self) -> &[VertexId] {
        &self.adjacent
    }

    pub(crate) fn add_adjacent(&mut self, id: VertexId) {
        if !self.adjacent.contains(&id) {
            self.adjacent.push(id);
        }
    }
}

/// Per-axis tolerance comparison used for vertex identity.
#[inline]
pub fn almost_equal(a: &Point3<Real>, b: &Point3<Real>) -> bool {
    (a.x - b.x).abs() < VERTEX_TOLERANCE
        && (a.y - b.y).abs() < VERTEX_TOLERANCE
        && (a.z - b.z).abs() < VERTEX_TOLERANCE
}
