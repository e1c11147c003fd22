use crate::mesh::Mesh;
use crate::mesh::vertex::VertexId;
use hashbrown::HashMap;

impl Mesh {
    /// Checks if the Mesh object is manifold
    ///
    /// ### Returns
    /// Returns `true` if every edge is used by exactly two faces, once in each
    /// direction.
    ///
    /// ### Notes:
    /// - The second condition also rejects neighbors with flipped normals.
    /// - Vertices are compared by pool id, so near-duplicates were already merged
    ///   when they were inserted.
    pub fn is_manifold(&self) -> bool {
        !self.faces.is_empty() && self.edge_uses().values().all(|&(fwd, back)| fwd == 1 && back == 1)
    }

    /// Number of undirected edges not shared by exactly two faces.
    pub fn open_edge_count(&self) -> usize {
        self.edge_uses()
            .values()
            .filter(|&&(fwd, back)| fwd + back != 2)
            .count()
    }

    /// Per undirected edge (smaller id first), the number of faces using it in
    /// each direction.
    fn edge_uses(&self) -> HashMap<(VertexId, VertexId), (u32, u32)> {
        let mut uses: HashMap<(VertexId, VertexId), (u32, u32)> = HashMap::new();
        for face in &self.faces {
            let [a, b, c] = face.vertices;
            for (from, to) in [(a, b), (b, c), (c, a)] {
                let entry = uses.entry((from.min(to), from.max(to))).or_insert((0, 0));
                if from < to {
                    entry.0 += 1;
                } else {
                    entry.1 += 1;
                }
            }
        }
        uses
    }
}

#[cfg(test)]
mod tests {
    use crate::mesh::Mesh;

    #[test]
    fn closed_tetrahedron_is_manifold_and_open_one_is_not() {
        let points = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let closed = Mesh::from_arrays(&points, &[0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3]);
        assert!(closed.is_manifold());
        assert_eq!(closed.open_edge_count(), 0);

        let open = Mesh::from_arrays(&points, &[0, 2, 1, 0, 1, 3, 0, 3, 2]);
        assert!(!open.is_manifold());
        assert_eq!(open.open_edge_count(), 3);

        let flipped = Mesh::from_arrays(&points, &[0, 1, 2, 0, 1, 3, 0, 3, 2, 1, 2, 3]);
        assert!(!flipped.is_manifold());
        assert_eq!(flipped.open_edge_count(), 0);
    }
}
