//! Face splitting along the intersection curve of two meshes.
//!
//! Every face of the target mesh that crosses a face of the other mesh is cut
//! along their common segment, so that afterwards no face of the target
//! straddles the other surface. Cutting uses a fixed table of triangle
//! subdivisions chosen by what the segment endpoints touch (a vertex, an edge
//! or the face interior).

use crate::aabb::AabbExt;
use crate::config::BooleanConfig;
use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::mesh::Mesh;
use crate::mesh::face::{Face, FaceId};
use crate::mesh::line::Line;
use crate::mesh::plane::Side;
use crate::mesh::segment::{EndpointKind, Segment};
use crate::mesh::vertex::{VertexId, VertexStatus};
use nalgebra::Point3;
use tracing::{debug, trace, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Counters reported by [`split_faces`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitStats {
    /// Face pairs whose segments overlapped.
    pub crossings: usize,
    /// Faces replaced by a subdivision.
    pub faces_split: usize,
    /// Splitting stopped at the growth limit.
    pub truncated: bool,
}

/// Split the faces of `mesh` along their intersections with `other`.
pub fn split_faces(mesh: &mut Mesh, other: &Mesh, config: &BooleanConfig) -> SplitStats {
    let tol = config.plane_tolerance;
    let mut stats = SplitStats::default();

    let other_bounds = other.bounding_box();
    let bounds = mesh.bounding_box();
    if !bounds.overlaps_fuzzy(&other_bounds) {
        return stats;
    }
    let candidates = candidate_faces(other, &bounds);
    let limit = mesh
        .face_count()
        .saturating_mul(config.split_growth_limit.max(1));

    let mut i = 0;
    'faces: while i < mesh.faces.len() {
        if mesh.faces.len() > limit {
            warn!(
                faces = mesh.faces.len(),
                limit, "face splitting exceeded its growth limit; stopping early"
            );
            stats.truncated = true;
            break;
        }
        if !mesh.faces[i].bounding_box.overlaps_fuzzy(&other_bounds) {
            i += 1;
            continue;
        }

        for &j in &candidates {
            let face = &mesh.faces[i];
            let other_face = &other.faces[j];
            if !face.bounding_box.overlaps_fuzzy(&other_face.bounding_box) {
                continue;
            }

            let distances = face
                .positions(&mesh.vertices)
                .map(|p| other_face.signed_distance(&p));
            if one_sided(&distances, tol) {
                continue;
            }
            let other_distances = other_face
                .positions(&other.vertices)
                .map(|p| face.signed_distance(&p));
            if one_sided(&other_distances, tol) {
                continue;
            }

            let Some(line) = Line::from_planes(&face.plane, &other_face.plane, tol) else {
                continue;
            };
            let Some(segment) = Segment::new(&line, face, &mesh.vertices, distances, tol) else {
                continue;
            };
            let Some(other_segment) =
                Segment::new(&line, other_face, &other.vertices, other_distances, tol)
            else {
                continue;
            };
            if !segment.overlaps(&other_segment, tol) {
                continue;
            }

            stats.crossings += 1;
            if split_face(mesh, i, &segment, &other_segment, tol) {
                stats.faces_split += 1;
                // slot `i` now holds a face that has not been checked yet
                continue 'faces;
            }
        }
        i += 1;
    }

    debug!(
        crossings = stats.crossings,
        faces_split = stats.faces_split,
        faces = mesh.face_count(),
        vertices = mesh.vertex_count(),
        "split phase finished"
    );
    stats
}

/// All three distances on the same side, including all on the plane.
fn one_sided(distances: &[Real; 3], tol: Real) -> bool {
    let sides = distances.map(|d| Side::of(d, tol));
    sides[0] == sides[1] && sides[1] == sides[2]
}

/// Faces of `other` whose box overlaps `bounds`.
#[cfg(not(feature = "parallel"))]
fn candidate_faces(other: &Mesh, bounds: &Aabb) -> Vec<FaceId> {
    other
        .faces
        .iter()
        .enumerate()
        .filter(|(_, f)| f.bounding_box.overlaps_fuzzy(bounds))
        .map(|(j, _)| j)
        .collect()
}

/// Faces of `other` whose box overlaps `bounds`.
#[cfg(feature = "parallel")]
fn candidate_faces(other: &Mesh, bounds: &Aabb) -> Vec<FaceId> {
    other
        .faces
        .par_iter()
        .enumerate()
        .filter(|(_, f)| f.bounding_box.overlaps_fuzzy(bounds))
        .map(|(j, _)| j)
        .collect()
}

/// Rotation of `face` starting at `first`.
fn rotated(face: [VertexId; 3], first: VertexId) -> [VertexId; 3] {
    match face.iter().position(|&v| v == first) {
        Some(1) => [face[1], face[2], face[0]],
        Some(2) => [face[2], face[0], face[1]],
        _ => face,
    }
}

/// The vertex of the edge `{p, q}` that comes first in winding order.
fn edge_start(face: [VertexId; 3], p: VertexId, q: VertexId) -> VertexId {
    if rotated(face, p)[1] == q { p } else { q }
}

/// Cut `[a, b, c]` at `n` on edge `ab`.
fn two_way([a, b, c]: [VertexId; 3], n: VertexId) -> Vec<[VertexId; 3]> {
    vec![[a, n, c], [n, b, c]]
}

/// Cut `[a, b, c]` at `n1` and `n2` on edge `ab`, `n1` nearer to `a`.
fn three_way_edge([a, b, c]: [VertexId; 3], n1: VertexId, n2: VertexId) -> Vec<[VertexId; 3]> {
    vec![[a, n1, c], [n1, n2, c], [n2, b, c]]
}

/// Fan `[a, b, c]` around the interior point `n`.
fn fan([a, b, c]: [VertexId; 3], n: VertexId) -> Vec<[VertexId; 3]> {
    vec![[a, b, n], [b, c, n], [c, a, n]]
}

/// Cut corner `b` off `[a, b, c]` through `nab` on edge `ab` and `nbc` on edge `bc`.
fn corner_cut([a, b, c]: [VertexId; 3], nab: VertexId, nbc: VertexId) -> Vec<[VertexId; 3]> {
    vec![[a, nab, nbc], [a, nbc, c], [nab, b, nbc]]
}

/// Cut `[a, b, c]` from `n1` on edge `ab` to the interior point `n2`.
fn four_way([a, b, c]: [VertexId; 3], n1: VertexId, n2: VertexId) -> Vec<[VertexId; 3]> {
    vec![[a, n1, n2], [n1, b, n2], [b, c, n2], [c, a, n2]]
}

/// Cut `[a, b, c]` along the interior segment `n1`-`n2`, roughly in line with
/// `a`, with `n2` nearer to `a`.
fn five_way([a, b, c]: [VertexId; 3], n1: VertexId, n2: VertexId) -> Vec<[VertexId; 3]> {
    vec![[b, c, n1], [b, n1, n2], [c, n2, n1], [b, n2, a], [c, a, n2]]
}

/// Replace face `index` by its subdivision along `segment`, the part of the
/// cutting line inside it, clipped to `other`, the part inside the other face.
///
/// Returns `false` when the face is left as it was.
fn split_face(
    mesh: &mut Mesh,
    index: FaceId,
    segment: &Segment,
    other: &Segment,
    tol: Real,
) -> bool {
    use EndpointKind::{Edge, Face as Interior, Vertex};

    // the deeper start and the shallower end of the two segments
    let (start_pos, start_depth, start_kind) = if other.start.depth > segment.start.depth + tol {
        (other.start.pos, other.start.depth, segment.middle)
    } else {
        (segment.start.pos, segment.start.depth, segment.start.kind)
    };
    let (end_pos, end_depth, end_kind) = if other.end.depth < segment.end.depth - tol {
        (other.end.pos, other.end.depth, segment.middle)
    } else {
        (segment.end.pos, segment.end.depth, segment.end.kind)
    };
    let start_vertex = segment.start.vertex;
    let end_vertex = segment.end.vertex;
    let original = mesh.faces[index].vertices;

    if start_kind == Vertex {
        mesh.vertices[start_vertex].status = VertexStatus::Boundary;
    }
    if end_kind == Vertex {
        mesh.vertices[end_vertex].status = VertexStatus::Boundary;
    }

    let case = (start_kind, segment.middle, end_kind);
    let pieces = match case {
        (Vertex, _, Vertex) => return false,

        // the segment runs along an edge
        (Vertex, Edge, Edge) => {
            let a = edge_start(original, start_vertex, end_vertex);
            two_way(rotated(original, a), new_vertex(mesh, end_pos))
        },
        (Edge, Edge, Vertex) => {
            let a = edge_start(original, start_vertex, end_vertex);
            two_way(rotated(original, a), new_vertex(mesh, start_pos))
        },
        (Edge, Edge, Edge) => {
            let a = edge_start(original, start_vertex, end_vertex);
            if (end_depth - start_depth).abs() < tol {
                two_way(rotated(original, a), new_vertex(mesh, end_pos))
            } else {
                let (near, far) = if a == start_vertex {
                    (start_pos, end_pos)
                } else {
                    (end_pos, start_pos)
                };
                let n1 = new_vertex(mesh, near);
                let n2 = new_vertex(mesh, far);
                three_way_edge(rotated(original, a), n1, n2)
            }
        },

        // the segment crosses the interior
        (Vertex, Interior, Edge) => two_way(rotated(original, end_vertex), new_vertex(mesh, end_pos)),
        (Edge, Interior, Vertex) => two_way(rotated(original, start_vertex), new_vertex(mesh, start_pos)),
        (Vertex, Interior, Interior) => fan(original, new_vertex(mesh, end_pos)),
        (Interior, Interior, Vertex) => fan(original, new_vertex(mesh, start_pos)),
        (Edge, Interior, Edge) => {
            let n_start = new_vertex(mesh, start_pos);
            let n_end = new_vertex(mesh, end_pos);
            if rotated(original, start_vertex)[1] == end_vertex {
                corner_cut(rotated(original, start_vertex), n_start, n_end)
            } else {
                corner_cut(rotated(original, end_vertex), n_end, n_start)
            }
        },
        (Edge, Interior, Interior) => {
            let n1 = new_vertex(mesh, start_pos);
            let n2 = new_vertex(mesh, end_pos);
            four_way(rotated(original, start_vertex), n1, n2)
        },
        (Interior, Interior, Edge) => {
            let n1 = new_vertex(mesh, end_pos);
            let n2 = new_vertex(mesh, start_pos);
            four_way(rotated(original, end_vertex), n1, n2)
        },
        (Interior, Interior, Interior) => {
            if (end_depth - start_depth).abs() < tol {
                fan(original, new_vertex(mesh, start_pos))
            } else {
                let positions = original.map(|id| mesh.vertices[id].pos);
                let direction = start_pos - end_pos;
                let lined = (0..3)
                    .map(|k| {
                        let towards = (end_pos - positions[k]).normalize();
                        (k, direction.dot(&towards).abs())
                    })
                    .max_by(|a, b| a.1.total_cmp(&b.1))
                    .map_or(0, |(k, _)| k);
                let pivot = positions[lined];
                let (far, near) = if (pivot - start_pos).norm() > (pivot - end_pos).norm() {
                    (start_pos, end_pos)
                } else {
                    (end_pos, start_pos)
                };
                let n1 = new_vertex(mesh, far);
                let n2 = new_vertex(mesh, near);
                five_way(rotated(original, original[lined]), n1, n2)
            }
        },

        _ => return false,
    };

    replace_face(mesh, index, original, pieces, case)
}

/// Pool vertex for a cut point; cut points lie on the other surface.
fn new_vertex(mesh: &mut Mesh, pos: Point3<Real>) -> VertexId {
    mesh.add_vertex(pos, VertexStatus::Boundary)
}

/// Swap face `index` for the non-degenerate `pieces`, unless nothing but the
/// original triangle would remain.
fn replace_face(
    mesh: &mut Mesh,
    index: FaceId,
    original: [VertexId; 3],
    pieces: Vec<[VertexId; 3]>,
    case: (EndpointKind, EndpointKind, EndpointKind),
) -> bool {
    let faces: Vec<Face> = pieces
        .into_iter()
        .filter_map(|ids| Face::new(ids, ids.map(|id| mesh.vertices[id].pos)))
        .collect();

    let unchanged = match faces.as_slice() {
        [] => true,
        [only] => rotated(only.vertices, original[0]) == original,
        _ => false,
    };
    if unchanged {
        return false;
    }

    trace!(face = index, ?case, pieces = faces.len(), "split face");
    mesh.remove_face(index);
    for face in faces {
        mesh.push_face(face);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::face::FaceStatus;
    use approx::assert_relative_eq;

    /// A single triangle in z = 0 and a large vertical quad through x = `x`.
    fn sheet_and_wall(x: Real) -> (Mesh, Mesh) {
        let sheet = Mesh::from_arrays(
            &[[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0]],
            &[0, 1, 2],
        );
        let wall = Mesh::from_arrays(
            &[[x, -10.0, -1.0], [x, 10.0, -1.0], [x, 10.0, 1.0], [x, -10.0, 1.0]],
            &[0, 1, 2, 0, 2, 3],
        );
        (sheet, wall)
    }

    #[test]
    fn wall_cuts_corner_off_triangle() {
        let (mut sheet, wall) = sheet_and_wall(1.0);
        let before = sheet.surface_area();
        let bounds = sheet.bounding_box();

        let stats = split_faces(&mut sheet, &wall, &BooleanConfig::default());
        assert!(stats.faces_split >= 1);
        assert_eq!(sheet.face_count(), 3);
        assert_relative_eq!(sheet.surface_area(), before, epsilon = 1e-9);
        assert_eq!(sheet.bounding_box(), bounds);

        // every new face lies on one side of the wall
        for f in sheet.faces() {
            let [a, b, c] = f.positions(sheet.vertices());
            let xs = [a.x, b.x, c.x];
            assert!(xs.iter().all(|&x| x <= 1.0 + 1e-9) || xs.iter().all(|&x| x >= 1.0 - 1e-9));
            assert_eq!(f.status(), FaceStatus::Unknown);
        }
        // cut points are tagged as boundary
        let boundary = sheet
            .vertices()
            .iter()
            .filter(|v| v.status == VertexStatus::Boundary)
            .count();
        assert_eq!(boundary, 2);
    }

    #[test]
    fn wall_through_vertex_splits_in_two() {
        let mut sheet = Mesh::from_arrays(
            &[[-2.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 4.0, 0.0]],
            &[0, 1, 2],
        );
        let (_, wall) = sheet_and_wall(0.0);
        split_faces(&mut sheet, &wall, &BooleanConfig::default());
        // x = 0 passes through the apex (0, 4) and the midpoint of the base
        assert_eq!(sheet.face_count(), 2);
        assert_relative_eq!(sheet.surface_area(), 8.0, epsilon = 1e-9);
    }

    #[test]
    fn disjoint_meshes_are_untouched() {
        let (mut sheet, wall) = sheet_and_wall(9.0);
        let stats = split_faces(&mut sheet, &wall, &BooleanConfig::default());
        assert_eq!(stats, SplitStats::default());
        assert_eq!(sheet.face_count(), 1);
    }

    #[test]
    fn subdivision_tables_preserve_area_and_winding() {
        let a = [0.0, 0.0, 0.0];
        let b = [1.0, 0.0, 0.0];
        let c = [0.0, 1.0, 0.0];
        let on_ab = [0.5, 0.0, 0.0];
        let on_ab2 = [0.75, 0.0, 0.0];
        let on_bc = [0.5, 0.5, 0.0];
        let inner = [0.2, 0.3, 0.0];
        let inner2 = [0.4, 0.4, 0.0];
        let mesh = Mesh::from_arrays(&[a, b, c, on_ab, on_ab2, on_bc, inner, inner2], &[]);
        let tri = [0, 1, 2];
        let tables = [
            two_way(tri, 3),
            three_way_edge(tri, 3, 4),
            fan(tri, 6),
            corner_cut(tri, 3, 5),
            four_way(tri, 3, 6),
            five_way(tri, 7, 6),
        ];
        for pieces in tables {
            let mut total = 0.0;
            for ids in pieces {
                let face = Face::new(ids, ids.map(|id| mesh.vertices[id].pos)).expect("valid piece");
                assert!(face.normal().z > 0.0);
                total += face.area();
            }
            assert_relative_eq!(total, 0.5, epsilon = 1e-12);
        }
    }
}
