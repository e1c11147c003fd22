//! T-junction repair.
//!
//! Coplanar overlaps are never split against each other, so a boolean result
//! can contain a vertex lying inside the edge of a neighbouring face. Splitting
//! that edge at the vertex makes the two sides share edges again.

use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::mesh::face::Face;
use crate::mesh::vertex::VertexId;
use tracing::{debug, warn};

impl Mesh {
    /// Split every face edge that has another referenced vertex strictly inside
    /// it (within `tol` of the edge). Returns the number of splits.
    pub fn stitch_t_junctions(&mut self, tol: Real) -> usize {
        let mut used = vec![false; self.vertices.len()];
        for face in &self.faces {
            for id in face.vertices {
                used[id] = true;
            }
        }
        let mut order: Vec<VertexId> = (0..self.vertices.len()).filter(|&id| used[id]).collect();
        order.sort_by(|&a, &b| self.vertices[a].pos.x.total_cmp(&self.vertices[b].pos.x));
        let xs: Vec<Real> = order.iter().map(|&id| self.vertices[id].pos.x).collect();

        let limit = (self.faces.len() + order.len()) * 8;
        let mut splits = 0;
        let mut i = 0;
        while i < self.faces.len() {
            if splits >= limit {
                warn!(splits, "stopping T-junction repair at its split limit");
                break;
            }
            let [a, b, c] = self.faces[i].vertices;
            let mut replaced = false;
            for (p, q, r) in [(a, b, c), (b, c, a), (c, a, b)] {
                let Some(v) = self.vertex_on_edge(p, q, &order, &xs, tol) else {
                    continue;
                };
                let first = Face::new([p, v, r], [p, v, r].map(|id| self.vertices[id].pos));
                let second = Face::new([v, q, r], [v, q, r].map(|id| self.vertices[id].pos));
                if let (Some(first), Some(second)) = (first, second) {
                    // the slot is re-examined with its first half
                    self.faces[i] = first;
                    self.faces.push(second);
                    splits += 1;
                    replaced = true;
                    break;
                }
            }
            if !replaced {
                i += 1;
            }
        }

        if splits > 0 {
            debug!(splits, faces = self.faces.len(), "stitched T-junctions");
        }
        splits
    }

    /// The vertex strictly inside edge `p → q` that is closest to `p`.
    fn vertex_on_edge(
        &self,
        p: VertexId,
        q: VertexId,
        order: &[VertexId],
        xs: &[Real],
        tol: Real,
    ) -> Option<VertexId> {
        let from = self.vertices[p].pos;
        let to = self.vertices[q].pos;
        let edge = to - from;
        let length_squared = edge.norm_squared();
        let lo = from.x.min(to.x) - tol;
        let hi = from.x.max(to.x) + tol;

        let mut best: Option<(Real, VertexId)> = None;
        for (&x, &id) in xs.iter().zip(order).skip(xs.partition_point(|&x| x < lo)) {
            if x > hi {
                break;
            }
            if id == p || id == q {
                continue;
            }
            let pos = self.vertices[id].pos;
            let t = (pos - from).dot(&edge) / length_squared;
            if t <= 0.0 || t >= 1.0 {
                continue;
            }
            if (pos - (from + edge * t)).norm() > tol {
                continue;
            }
            if best.is_none_or(|(best_t, _)| t < best_t) {
                best = Some((t, id));
            }
        }
        best.map(|(_, id)| id)
    }
}

#[cfg(test)]
mod tests {
    use crate::mesh::Mesh;
    use approx::assert_relative_eq;

    #[test]
    fn splits_edge_at_hanging_vertex() {
        // one big triangle next to two small ones sharing the long edge's midpoint
        let points = [
            [0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, -1.0, 0.0],
        ];
        let mut mesh = Mesh::from_arrays(&points, &[0, 1, 2, 0, 4, 3, 3, 4, 1]);
        let area = mesh.surface_area();
        assert_eq!(mesh.open_edge_count(), 7);

        assert_eq!(mesh.stitch_t_junctions(1e-7), 1);
        assert_eq!(mesh.face_count(), 4);
        assert_eq!(mesh.open_edge_count(), 4);
        assert_relative_eq!(mesh.surface_area(), area, epsilon = 1e-12);

        assert_eq!(mesh.stitch_t_junctions(1e-7), 0);
    }
}
