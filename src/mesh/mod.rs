//! `Mesh` struct and implementations of the `CSGOps` trait for `Mesh`

use crate::aabb::AabbExt;
use crate::errors::{CsgError, CsgResult};
use crate::float_types::{Real, VERTEX_TOLERANCE, parry3d::bounding_volume::Aabb};
use crate::mesh::{
    face::{Face, FaceId},
    vertex::{Vertex, VertexId, VertexStatus},
};
use crate::traits::CSGOps;
use hashbrown::HashMap;
use nalgebra::{Matrix4, Point3};
use std::sync::OnceLock;
use tracing::{trace, warn};

pub mod face;
pub mod line;
pub mod manifold;
pub mod plane;
pub mod segment;
pub mod stitch;
pub mod vertex;

/// Edge length of the cells of the vertex deduplication grid.
const GRID_CELL: Real = VERTEX_TOLERANCE * 10.0;

type Cell = (i64, i64, i64);

/// Grid cell of `pos`. Coordinates beyond the `i64` range clamp to the edge cells.
#[inline]
fn cell_of(pos: &Point3<Real>) -> Cell {
    (
        (pos.x / GRID_CELL).floor() as i64,
        (pos.y / GRID_CELL).floor() as i64,
        (pos.z / GRID_CELL).floor() as i64,
    )
}

/// A triangle mesh: a deduplicating vertex pool and the faces indexing into it.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) faces: Vec<Face>,

    /// Lazily calculated AABB that spans the vertex pool.
    pub(crate) bounding_box: OnceLock<Aabb>,

    /// Spatial hash of the pool used to find near-duplicate vertices.
    grid: HashMap<Cell, Vec<VertexId>>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from a flat vertex array and consecutive index triples.
    ///
    /// Degenerate triangles are silently dropped. Triangles referencing a
    /// missing or non-finite vertex are dropped with a warning, and a trailing
    /// partial triple is ignored.
    pub fn from_arrays(vertices: &[[Real; 3]], indices: &[usize]) -> Self {
        match Self::build(vertices, indices, false) {
            Ok(mesh) => mesh,
            Err(err) => {
                // lenient construction reports problems through the log instead
                warn!(%err, "lenient mesh construction failed");
                Self::new()
            },
        }
    }

    /// Like [`Mesh::from_arrays`], but non-finite coordinates, out-of-range
    /// indices and a partial trailing triple are errors.
    pub fn try_from_arrays(vertices: &[[Real; 3]], indices: &[usize]) -> CsgResult<Self> {
        Self::build(vertices, indices, true)
    }

    fn build(vertices: &[[Real; 3]], indices: &[usize], strict: bool) -> CsgResult<Self> {
        if indices.len() % 3 != 0 {
            if strict {
                return Err(CsgError::IncompleteTriangle { len: indices.len() });
            }
            warn!(len = indices.len(), "ignoring trailing indices of an incomplete triangle");
        }

        let mut mesh = Mesh::new();
        let mut ids = Vec::with_capacity(vertices.len());
        for coords in vertices {
            let pos = Point3::from(*coords);
            if pos.iter().all(|c| c.is_finite()) {
                ids.push(Some(mesh.add_vertex(pos, VertexStatus::Unknown)));
            } else if strict {
                return Err(CsgError::InvalidCoordinate(pos));
            } else {
                ids.push(None);
            }
        }

        'triangles: for (t, tri) in indices.chunks_exact(3).enumerate() {
            let mut resolved = [0; 3];
            for (slot, &index) in resolved.iter_mut().zip(tri) {
                match ids.get(index) {
                    Some(Some(id)) => *slot = *id,
                    Some(None) => {
                        warn!(triangle = t, index, "dropping triangle with a non-finite vertex");
                        continue 'triangles;
                    },
                    None if strict => {
                        return Err(CsgError::IndexOutOfRange {
                            index,
                            vertex_count: vertices.len(),
                        });
                    },
                    None => {
                        warn!(triangle = t, index, "dropping triangle with an out-of-range index");
                        continue 'triangles;
                    },
                }
            }
            if mesh.add_face(resolved[0], resolved[1], resolved[2]).is_none() {
                trace!(triangle = t, "dropping degenerate triangle");
            }
        }
        Ok(mesh)
    }

    /// Flatten the faces into compact vertex and index arrays.
    ///
    /// Only vertices referenced by a face are emitted, in order of first use.
    pub fn to_arrays(&self) -> (Vec<[Real; 3]>, Vec<usize>) {
        let mut remap: Vec<Option<usize>> = vec![None; self.vertices.len()];
        let mut positions = Vec::new();
        let mut indices = Vec::with_capacity(self.faces.len() * 3);
        for face in &self.faces {
            for id in face.vertices {
                let index = *remap[id].get_or_insert_with(|| {
                    let p = self.vertices[id].pos;
                    positions.push([p.x, p.y, p.z]);
                    positions.len() - 1
                });
                indices.push(index);
            }
        }
        (positions, indices)
    }

    /// Insert a vertex, or return the existing one within [`VERTEX_TOLERANCE`].
    ///
    /// When an existing vertex is returned its status is overwritten unless
    /// `status` is `Unknown`.
    pub fn add_vertex(&mut self, pos: Point3<Real>, status: VertexStatus) -> VertexId {
        if let Some(id) = self.find_vertex(&pos) {
            if status != VertexStatus::Unknown {
                self.vertices[id].status = status;
            }
            return id;
        }
        let id = self.vertices.len();
        self.vertices.push(Vertex::new(pos, status));
        self.grid.entry(cell_of(&pos)).or_default().push(id);
        self.bounding_box.take();
        id
    }

    /// Lowest id of a pool vertex within tolerance of `pos`.
    pub fn find_vertex(&self, pos: &Point3<Real>) -> Option<VertexId> {
        let (cx, cy, cz) = cell_of(pos);
        let mut found: Option<VertexId> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = self.grid.get(&(
                        cx.saturating_add(dx),
                        cy.saturating_add(dy),
                        cz.saturating_add(dz),
                    )) else {
                        continue;
                    };
                    for &id in bucket {
                        if self.vertices[id].almost_equals(pos) && found.is_none_or(|f| id < f) {
                            found = Some(id);
                        }
                    }
                }
            }
        }
        found
    }

    /// Append a face over existing pool vertices.
    ///
    /// Returns `None` (and leaves the mesh untouched) for repeated vertices or
    /// an area below the tolerance.
    pub fn add_face(&mut self, a: VertexId, b: VertexId, c: VertexId) -> Option<FaceId> {
        let ids = [a, b, c];
        if ids.iter().any(|&id| id >= self.vertices.len()) {
            return None;
        }
        let face = Face::new(ids, ids.map(|id| self.vertices[id].pos))?;
        Some(self.push_face(face))
    }

    pub(crate) fn push_face(&mut self, face: Face) -> FaceId {
        self.faces.push(face);
        self.bounding_box.take();
        self.faces.len() - 1
    }

    /// Remove a face; the last face takes its slot.
    pub fn remove_face(&mut self, id: FaceId) -> Face {
        self.bounding_box.take();
        self.faces.swap_remove(id)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Bounding box of the vertex pool, computed once and cached.
    pub fn bounding_box(&self) -> Aabb {
        *self
            .bounding_box
            .get_or_init(|| Aabb::from_positions(self.vertices.iter().map(|v| &v.pos)))
    }

    pub fn invalidate_bounding_box(&mut self) {
        self.bounding_box.take();
    }

    /// Reverse every face's winding.
    pub fn invert_faces(&mut self) {
        self.faces.iter_mut().for_each(Face::invert);
    }

    /// Signed enclosed volume (positive for outward-facing closed meshes).
    pub fn volume(&self) -> Real {
        self.faces
            .iter()
            .map(|f| {
                let [a, b, c] = f.positions(&self.vertices);
                a.coords.dot(&b.coords.cross(&c.coords))
            })
            .sum::<Real>()
            / 6.0
    }

    pub fn surface_area(&self) -> Real {
        self.faces.iter().map(Face::area).sum()
    }

    /// Rebuild every vertex's adjacency set from the face list.
    pub(crate) fn build_adjacency(&mut self) {
        for v in &mut self.vertices {
            v.adjacent.clear();
        }
        for face in &self.faces {
            let [a, b, c] = face.vertices;
            for (from, to) in [(a, b), (b, c), (c, a)] {
                self.vertices[from].add_adjacent(to);
                self.vertices[to].add_adjacent(from);
            }
        }
    }

    fn rebuild_grid(&mut self) {
        self.grid.clear();
        for (id, v) in self.vertices.iter().enumerate() {
            self.grid.entry(cell_of(&v.pos)).or_default().push(id);
        }
    }
}

impl<'a> From<(&'a [[Real; 3]], &'a [usize])> for Mesh {
    /// Same as [`Mesh::from_arrays`].
    fn from((vertices, indices): (&'a [[Real; 3]], &'a [usize])) -> Self {
        Mesh::from_arrays(vertices, indices)
    }
}

impl CSGOps for Mesh {
    fn union(self, other: Self) -> Self {
        crate::boolean::BooleanOp::Union.apply(self, other)
    }

    fn difference(self, other: Self) -> Self {
        crate::boolean::BooleanOp::Difference.apply(self, other)
    }

    fn intersection(self, other: Self) -> Self {
        crate::boolean::BooleanOp::Intersection.apply(self, other)
    }

    /// Apply an affine transform in place. A mirroring transform also reverses
    /// every winding so normals keep pointing outward.
    fn transform(&mut self, matrix: &Matrix4<Real>) {
        for v in &mut self.vertices {
            v.pos = matrix.transform_point(&v.pos);
        }
        let mirrored = matrix.fixed_view::<3, 3>(0, 0).determinant() < 0.0;
        for face in &mut self.faces {
            if mirrored {
                face.vertices.swap(0, 1);
            }
            face.refresh(&self.vertices);
        }
        self.rebuild_grid();
        self.invalidate_bounding_box();
    }

    fn bounding_box(&self) -> Aabb {
        Mesh::bounding_box(self)
    }

    fn invalidate_bounding_box(&mut self) {
        Mesh::invalidate_bounding_box(self)
    }

    fn inverse(&mut self) {
        self.invert_faces()
    }
}
