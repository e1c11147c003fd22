//! The part of a cutting line that lies inside one triangle.

use crate::float_types::Real;
use crate::mesh::face::Face;
use crate::mesh::line::Line;
use crate::mesh::plane::Side;
use crate::mesh::vertex::{Vertex, VertexId};
use nalgebra::Point3;

/// What an endpoint, or the span between the endpoints, touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    Vertex,
    Edge,
    Face,
}

/// One end of a [`Segment`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Endpoint {
    pub pos: Point3<Real>,
    /// Signed distance along the cutting line.
    pub depth: Real,
    pub kind: EndpointKind,
    /// The vertex itself for `Vertex` endpoints, the first vertex of the crossed
    /// edge (in winding order) for `Edge` endpoints.
    pub vertex: VertexId,
}

/// Intersection of a cutting line with a face, ordered by depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Endpoint,
    pub end: Endpoint,
    pub middle: EndpointKind,
}

impl Segment {
    /// Clip `line` to `face`, given the signed distances of the face's vertices
    /// to the plane of the face being cut against.
    ///
    /// Returns `None` when all three distances share a sign (no crossing) or
    /// when two endpoints cannot be found.
    pub fn new(
        line: &Line,
        face: &Face,
        pool: &[Vertex],
        distances: [Real; 3],
        tol: Real,
    ) -> Option<Self> {
        let sides = distances.map(|d| Side::of(d, tol));
        if sides[0] == sides[1] && sides[1] == sides[2] {
            return None;
        }

        let ids = face.vertices;
        let mut ends: Vec<Endpoint> = Vec::with_capacity(2);
        let mut middle = EndpointKind::Face;

        for k in 0..3 {
            if sides[k] != Side::On {
                continue;
            }
            let (next, prev) = ((k + 1) % 3, (k + 2) % 3);
            let pos = pool[ids[k]].pos;
            let endpoint = Endpoint {
                pos,
                depth: line.signed_distance_to(&pos),
                kind: EndpointKind::Vertex,
                vertex: ids[k],
            };
            // a lone touching vertex is a point segment
            let copies = if sides[next] == sides[prev] { 2 } else { 1 };
            for _ in 0..copies {
                if ends.len() == 2 {
                    break;
                }
                if let Some(first) = ends.first() {
                    middle = if first.vertex == endpoint.vertex {
                        EndpointKind::Vertex
                    } else if first.kind == EndpointKind::Vertex {
                        EndpointKind::Edge
                    } else {
                        EndpointKind::Face
                    };
                }
                ends.push(endpoint);
            }
        }

        if ends.len() < 2 {
            for k in 0..3 {
                let next = (k + 1) % 3;
                let crosses = matches!(
                    (sides[k], sides[next]),
                    (Side::Front, Side::Back) | (Side::Back, Side::Front)
                );
                if !crosses || ends.len() == 2 {
                    continue;
                }
                let from = pool[ids[k]].pos;
                let to = pool[ids[next]].pos;
                let pos = Line::ray(from, to - from)
                    .intersect_line(line, tol)
                    .unwrap_or_else(|| {
                        // line solve degenerate: interpolate by plane distance
                        let t = distances[k] / (distances[k] - distances[next]);
                        from + (to - from) * t
                    });
                ends.push(Endpoint {
                    pos,
                    depth: line.signed_distance_to(&pos),
                    kind: EndpointKind::Edge,
                    vertex: ids[k],
                });
            }
        }

        let [mut start, mut end]: [Endpoint; 2] = ends.try_into().ok()?;
        if start.depth > end.depth {
            std::mem::swap(&mut start, &mut end);
        }
        Some(Segment { start, end, middle })
    }

    /// True unless one segment ends before the other starts.
    pub fn overlaps(&self, other: &Segment, tol: Real) -> bool {
        !(self.end.depth < other.start.depth + tol || other.end.depth < self.start.depth + tol)
    }

    /// Both endpoints at the same depth.
    pub fn is_point(&self, tol: Real) -> bool {
        (self.end.depth - self.start.depth).abs() < tol
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::plane::Plane;
    use crate::mesh::vertex::VertexStatus;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    const TOL: Real = 1e-10;

    fn setup(points: &[[Real; 3]]) -> (Vec<Vertex>, Face) {
        let pool: Vec<Vertex> = points
            .iter()
            .map(|p| Vertex::new(Point3::new(p[0], p[1], p[2]), VertexStatus::Unknown))
            .collect();
        let face = Face::new([0, 1, 2], [pool[0].pos, pool[1].pos, pool[2].pos]).expect("face");
        (pool, face)
    }

    fn cut(pool: &[Vertex], face: &Face, cutter: &Plane) -> Option<Segment> {
        let line = Line::from_planes(face.plane(), cutter, TOL)?;
        let distances = face.positions(pool).map(|p| cutter.signed_distance(&p));
        Segment::new(&line, face, pool, distances, TOL)
    }

    #[test]
    fn crossing_two_edges_is_edge_face_edge() {
        let (pool, face) = setup(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]]);
        let cutter = Plane { normal: Vector3::x(), w: 0.5 };
        let seg = cut(&pool, &face, &cutter).expect("crosses");

        assert_eq!(seg.start.kind, EndpointKind::Edge);
        assert_eq!(seg.end.kind, EndpointKind::Edge);
        assert_eq!(seg.middle, EndpointKind::Face);
        assert!(seg.start.depth < seg.end.depth);
        let mut xs = [seg.start.pos, seg.end.pos].map(|p| (p.x, p.y));
        xs.sort_by(|a, b| a.1.total_cmp(&b.1));
        assert_relative_eq!(xs[0].0, 0.5, epsilon = 1e-12);
        assert_relative_eq!(xs[0].1, 0.0, epsilon = 1e-12);
        assert_relative_eq!(xs[1].1, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn through_a_vertex_is_vertex_face_edge() {
        let (pool, face) = setup(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]]);
        let diagonal = Plane {
            normal: Vector3::new(1.0, -1.0, 0.0).normalize(),
            w: 0.0,
        };
        let seg = cut(&pool, &face, &diagonal).expect("crosses");
        let kinds = [seg.start.kind, seg.end.kind];
        assert!(kinds.contains(&EndpointKind::Vertex));
        assert!(kinds.contains(&EndpointKind::Edge));
        assert_eq!(seg.middle, EndpointKind::Face);
    }

    #[test]
    fn along_an_edge_is_vertex_edge_vertex() {
        let (pool, face) = setup(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]]);
        let wall = Plane { normal: -Vector3::y(), w: 0.0 };
        let seg = cut(&pool, &face, &wall).expect("touches");
        assert_eq!(seg.start.kind, EndpointKind::Vertex);
        assert_eq!(seg.end.kind, EndpointKind::Vertex);
        assert_eq!(seg.middle, EndpointKind::Edge);
        assert_relative_eq!((seg.end.depth - seg.start.depth).abs(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn touching_vertex_is_a_point_and_one_side_is_nothing() {
        let (pool, face) = setup(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]]);
        let corner = Plane {
            normal: Vector3::new(-1.0, -1.0, 0.0).normalize(),
            w: 0.0,
        };
        let seg = cut(&pool, &face, &corner).expect("touches corner");
        assert_eq!(seg.middle, EndpointKind::Vertex);
        assert!(seg.is_point(TOL));
        assert!(!seg.overlaps(&seg, TOL));

        let away = Plane { normal: Vector3::x(), w: 5.0 };
        assert!(cut(&pool, &face, &away).is_none());
    }
}
