//! Building the result mesh from classified faces.

use crate::config::BooleanConfig;
use crate::boolean::BooleanOp;
use crate::mesh::Mesh;
use crate::mesh::face::FaceStatus;
use crate::mesh::vertex::{VertexId, VertexStatus};
use tracing::trace;

/// Statuses of the first and second operand's faces kept by `op`, and whether
/// the second operand's faces are reversed.
pub const fn selection(op: BooleanOp) -> (&'static [FaceStatus], &'static [FaceStatus], bool) {
    match op {
        BooleanOp::Union => (&[FaceStatus::Outside, FaceStatus::Same], &[FaceStatus::Outside], false),
        BooleanOp::Intersection => (&[FaceStatus::Inside, FaceStatus::Same], &[FaceStatus::Inside], false),
        BooleanOp::Difference => (&[FaceStatus::Outside, FaceStatus::Opposite], &[FaceStatus::Inside], true),
    }
}

/// Copy the faces selected by `op` into a new mesh.
pub fn assemble(first: &Mesh, second: &Mesh, op: BooleanOp, config: &BooleanConfig) -> Mesh {
    let (keep_first, keep_second, invert_second) = selection(op);
    let mut result = Mesh::new();
    copy_faces(&mut result, first, keep_first, false);
    copy_faces(&mut result, second, keep_second, invert_second);

    if config.stitch_t_junctions {
        result.stitch_t_junctions(config.stitch_tolerance);
    }
    result
}

fn copy_faces(result: &mut Mesh, source: &Mesh, keep: &[FaceStatus], invert: bool) {
    let mut remap: Vec<Option<VertexId>> = vec![None; source.vertex_count()];
    for face in source.faces.iter().filter(|f| keep.contains(&f.status)) {
        let [a, b, c] = face.vertices.map(|id| {
            *remap[id].get_or_insert_with(|| result.add_vertex(source.vertices[id].pos, VertexStatus::Unknown))
        });
        let added = if invert {
            result.add_face(b, a, c)
        } else {
            result.add_face(a, b, c)
        };
        if added.is_none() {
            trace!(vertices = ?face.vertices, "dropping degenerate result face");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_is_kept_by_exactly_the_expected_operations() {
        let kept = |op, status| {
            let (first, second, _) = selection(op);
            (first.contains(&status), second.contains(&status))
        };
        assert_eq!(kept(BooleanOp::Union, FaceStatus::Same), (true, false));
        assert_eq!(kept(BooleanOp::Union, FaceStatus::Opposite), (false, false));
        assert_eq!(kept(BooleanOp::Intersection, FaceStatus::Inside), (true, true));
        assert_eq!(kept(BooleanOp::Difference, FaceStatus::Opposite), (true, false));
        assert_eq!(kept(BooleanOp::Difference, FaceStatus::Inside), (false, true));
        assert!(selection(BooleanOp::Difference).2);
    }
}
