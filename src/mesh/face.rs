//! Triangular faces referencing pooled vertices.

use crate::aabb::AabbExt;
use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::float_types::{AREA_TOLERANCE, Real};
use crate::mesh::plane::Plane;
use crate::mesh::vertex::{Vertex, VertexId, VertexStatus};
use nalgebra::{Point3, Vector3};

/// Index of a face in its mesh's face list.
pub type FaceId = usize;

/// Position of a face relative to the other operand of a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FaceStatus {
    #[default]
    Unknown,
    Inside,
    Outside,
    /// Coplanar with a face of the other operand, normals agreeing.
    Same,
    /// Coplanar with a face of the other operand, normals reversed.
    Opposite,
}

/// Where a point of the face's plane lies relative to the triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointLocation {
    Outside,
    Interior,
    /// On an edge or a vertex.
    Boundary,
}

/// A triangle with cached plane, area and bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub(crate) vertices: [VertexId; 3],
    pub(crate) plane: Plane,
    pub(crate) area: Real,
    pub(crate) bounding_box: Aabb,
    pub(crate) status: FaceStatus,
}

impl Face {
    /// Build a face over three pool vertices located at `positions`.
    ///
    /// Returns `None` when two ids are equal or the area is below [`AREA_TOLERANCE`].
    pub fn new(vertices: [VertexId; 3], positions: [Point3<Real>; 3]) -> Option<Self> {
        let [a, b, c] = vertices;
        if a == b || b == c || c == a {
            return None;
        }
        let area = triangle_area(&positions);
        if area < AREA_TOLERANCE {
            return None;
        }
        let plane = Plane::from_points(&positions[0], &positions[1], &positions[2])?;
        Some(Face {
            vertices,
            plane,
            area,
            bounding_box: Aabb::from_positions(&positions),
            status: FaceStatus::Unknown,
        })
    }

    pub const fn vertices(&self) -> [VertexId; 3] {
        self.vertices
    }

    pub const fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Unit normal following the winding.
    pub const fn normal(&self) -> Vector3<Real> {
        self.plane.normal
    }

    pub const fn area(&self) -> Real {
        self.area
    }

    pub const fn bounding_box(&self) -> &Aabb {
        &self.bounding_box
    }

    pub const fn status(&self) -> FaceStatus {
        self.status
    }

    pub fn positions(&self, pool: &[Vertex]) -> [Point3<Real>; 3] {
        self.vertices.map(|id| pool[id].pos)
    }

    pub fn centroid(&self, pool: &[Vertex]) -> Point3<Real> {
        let [a, b, c] = self.positions(pool);
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }

    /// Signed distance of a point to the face plane.
    #[inline]
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.plane.signed_distance(point)
    }

    /// Reverse the winding, and with it the normal.
    pub fn invert(&mut self) {
        self.vertices.swap(0, 1);
        self.plane.flip();
    }

    /// Recompute cached geometry after the pool positions changed.
    /// A face collapsed by the transform keeps its previous plane.
    pub(crate) fn refresh(&mut self, pool: &[Vertex]) {
        let positions = self.positions(pool);
        self.area = triangle_area(&positions);
        if let Some(plane) = Plane::from_points(&positions[0], &positions[1], &positions[2]) {
            self.plane = plane;
        }
        self.bounding_box = Aabb::from_positions(&positions);
    }

    /// Locate a point assumed to lie in the face plane.
    ///
    /// Works in the projection that drops the dominant normal axis; edge
    /// distances within `tol` count as on the edge.
    pub fn locate(&self, point: &Point3<Real>, pool: &[Vertex], tol: Real) -> PointLocation {
        let n = self.plane.normal.abs();
        let (u, v) = if n.x >= n.y && n.x >= n.z {
            (1, 2)
        } else if n.y >= n.z {
            (0, 2)
        } else {
            (0, 1)
        };
        let project = |p: &Point3<Real>| (p[u], p[v]);

        let [a, b, c] = self.positions(pool).map(|p| project(&p));
        let p = project(point);
        let orientation = cross2(a, b, c).signum();

        let mut on_edge = false;
        for (from, to) in [(a, b), (b, c), (c, a)] {
            let length = ((to.0 - from.0).powi(2) + (to.1 - from.1).powi(2)).sqrt();
            let distance = orientation * cross2(from, to, p) / length;
            if distance < -tol {
                return PointLocation::Outside;
            }
            if distance <= tol {
                on_edge = true;
            }
        }
        if on_edge {
            PointLocation::Boundary
        } else {
            PointLocation::Interior
        }
    }

    /// Inherit INSIDE/OUTSIDE from the vertices.
    ///
    /// Succeeds when at least one vertex is inside or outside and no two such
    /// vertices disagree; boundary and unknown vertices are ignored.
    pub fn simple_classify(&mut self, pool: &[Vertex]) -> bool {
        let mut found = None;
        for &id in &self.vertices {
            let status = match pool[id].status {
                VertexStatus::Inside => FaceStatus::Inside,
                VertexStatus::Outside => FaceStatus::Outside,
                VertexStatus::Boundary | VertexStatus::Unknown => continue,
            };
            match found {
                None => found = Some(status),
                Some(previous) if previous != status => return false,
                Some(_) => {},
            }
        }
        match found {
            Some(status) => {
                self.status = status;
                true
            },
            None => false,
        }
    }
}

fn triangle_area(positions: &[Point3<Real>; 3]) -> Real {
    (positions[1] - positions[0])
        .cross(&(positions[2] - positions[0]))
        .norm()
        * 0.5
}

#[inline]
fn cross2(a: (Real, Real), b: (Real, Real), p: (Real, Real)) -> Real {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}
