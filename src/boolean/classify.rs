//! Inside/outside classification of split faces against the other operand.
//!
//! Faces are classified in order. A face first tries to inherit a status from
//! its vertices; failing that a ray is cast from its centroid along its normal
//! through the other mesh. Whatever a face learns is then flooded over the
//! vertex adjacency graph, so most faces of a region are classified without
//! casting a ray.

use crate::aabb::AabbExt;
use crate::config::{BooleanConfig, RayStrategy, UnresolvedPolicy};
use crate::errors::{CsgError, CsgResult, Operand};
use crate::float_types::{
    Real,
    parry3d::{bounding_volume::BoundingVolume, query::Ray, query::RayCast},
};
use crate::mesh::Mesh;
use crate::mesh::face::{Face, FaceId, FaceStatus, PointLocation};
use crate::mesh::line::{Line, PlaneIntersection};
use crate::mesh::vertex::{Vertex, VertexStatus};
use rand::RngCore;
use std::collections::VecDeque;
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Counters reported by [`classify_faces`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifyStats {
    /// Faces that inherited their status from their vertices.
    pub inherited: usize,
    /// Faces classified by casting a ray.
    pub ray_traced: usize,
    /// Perturbed re-casts.
    pub retries: usize,
    /// Faces that fell through to the unresolved policy.
    pub unresolved: usize,
}

/// What a ray learns from one face of the other mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Probe {
    Miss,
    /// Grazes an edge or vertex, or runs inside the face plane.
    Degenerate,
    /// The ray origin lies on the face; carries `normal · direction`.
    Coincident(Real),
    /// Passes through the face interior ahead of the origin.
    Crossing { distance: Real, dot: Real },
}

/// Result of casting one ray through the whole other mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Cast {
    Degenerate,
    Coincident(Real),
    Hits { count: usize, nearest: Option<(Real, Real)> },
}

impl Face {
    /// Classify by casting a ray from the centroid along the normal through
    /// `other`.
    ///
    /// Degenerate casts are retried with a perturbed direction up to
    /// `config.max_ray_retries` times; `None` once they are exhausted.
    pub fn ray_trace_classify(
        &self,
        pool: &[Vertex],
        other: &Mesh,
        config: &BooleanConfig,
        rng: &mut dyn RngCore,
    ) -> Option<FaceStatus> {
        self.ray_trace_with_retries(pool, other, config, rng).0
    }

    fn ray_trace_with_retries(
        &self,
        pool: &[Vertex],
        other: &Mesh,
        config: &BooleanConfig,
        rng: &mut dyn RngCore,
    ) -> (Option<FaceStatus>, usize) {
        let tol = config.plane_tolerance;
        let mut ray = Line::ray(self.centroid(pool), self.normal());

        for attempt in 0..=config.max_ray_retries {
            match cast(&ray, other, tol) {
                Cast::Degenerate => ray.perturb_direction(rng, config.perturbation),
                Cast::Coincident(dot) => {
                    let status = if dot > 0.0 {
                        FaceStatus::Same
                    } else {
                        FaceStatus::Opposite
                    };
                    return (Some(status), attempt);
                },
                Cast::Hits { count, nearest } => {
                    let inside = match config.ray_strategy {
                        RayStrategy::Parity => count % 2 == 1,
                        RayStrategy::NearestHit => nearest.is_some_and(|(_, dot)| dot > 0.0),
                    };
                    let status = if inside {
                        FaceStatus::Inside
                    } else {
                        FaceStatus::Outside
                    };
                    return (Some(status), attempt);
                },
            }
        }
        (None, config.max_ray_retries)
    }
}

fn probe(ray: &Line, parry_ray: &Ray, face: &Face, pool: &[Vertex], tol: Real) -> Probe {
    if !face
        .bounding_box
        .loosened(tol)
        .intersects_local_ray(parry_ray, Real::MAX)
    {
        return Probe::Miss;
    }

    let dot = face.normal().dot(&ray.direction);
    match ray.intersect_plane(&face.plane, tol) {
        PlaneIntersection::Parallel => Probe::Miss,
        PlaneIntersection::Contained => Probe::Degenerate,
        PlaneIntersection::Point(hit) => {
            let distance = ray.signed_distance_to(&hit);
            if distance.abs() < tol {
                match face.locate(&hit, pool, tol) {
                    PointLocation::Outside => Probe::Miss,
                    PointLocation::Interior | PointLocation::Boundary => Probe::Coincident(dot),
                }
            } else if distance > 0.0 {
                match face.locate(&hit, pool, tol) {
                    PointLocation::Outside => Probe::Miss,
                    PointLocation::Boundary => Probe::Degenerate,
                    PointLocation::Interior => Probe::Crossing { distance, dot },
                }
            } else {
                Probe::Miss
            }
        },
    }
}

/// Probe every face of `other`. A coincident face wins over everything else,
/// then any degenerate probe forces a re-cast.
fn cast(ray: &Line, other: &Mesh, tol: Real) -> Cast {
    let parry_ray = Ray::new(ray.point, ray.direction);

    #[cfg(not(feature = "parallel"))]
    let probes = other
        .faces
        .iter()
        .map(|f| probe(ray, &parry_ray, f, &other.vertices, tol));

    #[cfg(feature = "parallel")]
    let probes = other
        .faces
        .par_iter()
        .map(|f| probe(ray, &parry_ray, f, &other.vertices, tol))
        .collect::<Vec<_>>()
        .into_iter();

    let mut degenerate = false;
    let mut count = 0;
    let mut nearest: Option<(Real, Real)> = None;
    for p in probes {
        match p {
            Probe::Miss => {},
            Probe::Degenerate => degenerate = true,
            Probe::Coincident(dot) => return Cast::Coincident(dot),
            Probe::Crossing { distance, dot } => {
                count += 1;
                if nearest.is_none_or(|(d, _)| distance < d) {
                    nearest = Some((distance, dot));
                }
            },
        }
    }
    if degenerate {
        Cast::Degenerate
    } else {
        Cast::Hits { count, nearest }
    }
}

/// Classify every face of `mesh` against `other`.
///
/// With `Fail` as the unresolved policy, a face that stays unclassified is an
/// error; otherwise it receives the policy's status.
pub fn classify_faces(
    mesh: &mut Mesh,
    other: &Mesh,
    config: &BooleanConfig,
    rng: &mut dyn RngCore,
    operand: Operand,
) -> CsgResult<ClassifyStats> {
    let mut stats = ClassifyStats::default();
    mesh.build_adjacency();

    if !mesh.bounding_box().overlaps_fuzzy(&other.bounding_box()) {
        for face in &mut mesh.faces {
            face.status = FaceStatus::Outside;
        }
        for v in &mut mesh.vertices {
            if v.status == VertexStatus::Unknown {
                v.status = VertexStatus::Outside;
            }
        }
        return Ok(stats);
    }

    for i in 0..mesh.faces.len() {
        if mesh.faces[i].simple_classify(&mesh.vertices) {
            stats.inherited += 1;
        } else {
            stats.ray_traced += 1;
            let (status, retries) =
                mesh.faces[i].ray_trace_with_retries(&mesh.vertices, other, config, rng);
            stats.retries += retries;
            match status {
                Some(status) => mesh.faces[i].status = status,
                None => continue,
            }
        }
        mark_vertices(mesh, i);
    }

    for i in 0..mesh.faces.len() {
        if mesh.faces[i].status != FaceStatus::Unknown {
            continue;
        }
        // neighbours classified later in the pass may have settled it
        if !mesh.faces[i].simple_classify(&mesh.vertices) {
            stats.unresolved += 1;
            let status = match config.unresolved {
                UnresolvedPolicy::Outside => FaceStatus::Outside,
                UnresolvedPolicy::Inside => FaceStatus::Inside,
                UnresolvedPolicy::Fail => {
                    return Err(CsgError::UnresolvedClassification { operand, face: i });
                },
            };
            warn!(
                %operand,
                face = i,
                policy = ?config.unresolved,
                "face could not be classified; applying policy"
            );
            mesh.faces[i].status = status;
        }
        mark_vertices(mesh, i);
    }

    debug!(
        %operand,
        inherited = stats.inherited,
        ray_traced = stats.ray_traced,
        retries = stats.retries,
        unresolved = stats.unresolved,
        "classification finished"
    );
    Ok(stats)
}

/// Give the face's unknown vertices its status and flood it breadth-first over
/// unknown neighbours. Coplanar faces tag their vertices as boundary only.
fn mark_vertices(mesh: &mut Mesh, face: FaceId) {
    let status = match mesh.faces[face].status {
        FaceStatus::Inside => VertexStatus::Inside,
        FaceStatus::Outside => VertexStatus::Outside,
        FaceStatus::Same | FaceStatus::Opposite => {
            for id in mesh.faces[face].vertices {
                if mesh.vertices[id].status == VertexStatus::Unknown {
                    mesh.vertices[id].status = VertexStatus::Boundary;
                }
            }
            return;
        },
        FaceStatus::Unknown => return,
    };

    let mut queue = VecDeque::new();
    for id in mesh.faces[face].vertices {
        if mesh.vertices[id].status == VertexStatus::Unknown {
            mesh.vertices[id].status = status;
            queue.push_back(id);
        }
    }
    while let Some(id) = queue.pop_front() {
        for k in 0..mesh.vertices[id].adjacent.len() {
            let next = mesh.vertices[id].adjacent[k];
            if mesh.vertices[next].status == VertexStatus::Unknown {
                mesh.vertices[next].status = status;
                queue.push_back(next);
            }
        }
    }
}
