mod support;

use approx::assert_relative_eq;
use nalgebra::Point3;
use support::{assert_bounds, bounding_box, cube, unit_cube};
use tricsg::BooleanModeller;
use tricsg::config::BooleanConfig;
use tricsg::mesh::Mesh;
use tricsg::mesh::face::FaceStatus;
use tricsg::mesh::vertex::VertexStatus;

#[test]
fn mesh_vertex_merge_is_idempotent() {
    let mut mesh = unit_cube([0.0; 3]);
    assert_eq!(mesh.vertex_count(), 8);

    for v in unit_cube([0.0; 3]).vertices() {
        let nudged = v.pos + nalgebra::Vector3::new(3e-6, -3e-6, 3e-6);
        mesh.add_vertex(nudged, VertexStatus::Unknown);
    }
    assert_eq!(mesh.vertex_count(), 8);
    assert_eq!(mesh.find_vertex(&Point3::new(1.0, 1.0, 1.0 + 9e-6)), Some(6));
    assert_eq!(mesh.find_vertex(&Point3::new(1.0, 1.0, 1.0 + 2e-5)), None);
}

#[test]
fn mesh_rejects_degenerate_triangles() {
    let points = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [2.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0],
    ];
    // collinear, repeated index, merged duplicate, valid
    let mesh = Mesh::from_arrays(&points, &[0, 1, 2, 0, 0, 3, 0, 4, 1, 0, 1, 3]);
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.face_count(), 1);
    assert_relative_eq!(mesh.surface_area(), 0.5, epsilon = 1e-12);
}

#[test]
fn mesh_cube_is_closed() {
    let mesh = cube([1.0, 2.0, 3.0], 2.0);
    assert!(mesh.is_manifold());
    assert_eq!(mesh.open_edge_count(), 0);
    assert_relative_eq!(mesh.volume(), 8.0, epsilon = 1e-12);
    assert_relative_eq!(mesh.surface_area(), 24.0, epsilon = 1e-12);
    assert_eq!(bounding_box(&mesh), [0.0, 1.0, 2.0, 2.0, 3.0, 4.0]);

    let aabb = mesh.bounding_box();
    assert_eq!(aabb.mins, Point3::new(0.0, 1.0, 2.0));
    assert_eq!(aabb.maxs, Point3::new(2.0, 3.0, 4.0));
}

#[test]
fn mesh_inversion_flips_volume() {
    let mut mesh = unit_cube([0.0; 3]);
    mesh.invert_faces();
    assert_relative_eq!(mesh.volume(), -1.0, epsilon = 1e-12);
    assert!(mesh.is_manifold());
}

#[test]
fn mesh_splitting_preserves_bounds_and_area() {
    let a = unit_cube([0.0; 3]);
    let b = unit_cube([0.5, 0.5, 0.5]);
    let modeller = BooleanModeller::new(a.clone(), b.clone(), &BooleanConfig::default())
        .expect("default policy never fails");

    let first = modeller.first();
    assert!(first.face_count() > a.face_count());
    assert_bounds(first, bounding_box(&a));
    assert_relative_eq!(first.surface_area(), a.surface_area(), epsilon = 1e-9);
    assert_relative_eq!(first.volume(), a.volume(), epsilon = 1e-9);

    let second = modeller.second();
    assert!(second.face_count() > b.face_count());
    assert_bounds(second, bounding_box(&b));
    assert_relative_eq!(second.surface_area(), b.surface_area(), epsilon = 1e-9);
}

#[test]
fn mesh_classification_is_complete() {
    let modeller = BooleanModeller::new(
        unit_cube([0.0; 3]),
        unit_cube([0.4, 0.3, -0.25]),
        &BooleanConfig::default(),
    )
    .expect("default policy never fails");

    for mesh in [modeller.first(), modeller.second()] {
        assert!(mesh.faces().iter().all(|f| f.status() != FaceStatus::Unknown));
        for face in mesh.faces() {
            for id in face.vertices() {
                assert_ne!(mesh.vertices()[id].status, VertexStatus::Unknown);
            }
        }
        assert!(mesh.faces().iter().any(|f| f.status() == FaceStatus::Inside));
        assert!(mesh.faces().iter().any(|f| f.status() == FaceStatus::Outside));
        assert!(mesh.vertices().iter().any(|v| v.status == VertexStatus::Boundary));
    }

    // every inside face lies within the other operand's box
    let other = modeller.second().bounding_box();
    for face in modeller.first().faces() {
        if face.status() == FaceStatus::Inside {
            let c = face.centroid(modeller.first().vertices());
            assert!(c.x >= other.mins.x - 1e-9 && c.y >= other.mins.y - 1e-9 && c.z <= other.maxs.z + 1e-9);
        }
    }
}

#[test]
fn mesh_coplanar_faces_are_same_or_opposite() {
    // the cubes touch along the x = 1 plane
    let modeller = BooleanModeller::new(
        unit_cube([0.0; 3]),
        unit_cube([1.0, 0.0, 0.0]),
        &BooleanConfig::default(),
    )
    .expect("default policy never fails");

    let statuses: Vec<FaceStatus> = modeller.first().faces().iter().map(|f| f.status()).collect();
    assert!(statuses.contains(&FaceStatus::Opposite));
    assert!(!statuses.contains(&FaceStatus::Inside));

    let union = modeller.union();
    assert_relative_eq!(union.volume(), 2.0, epsilon = 1e-6);
    assert!(modeller.intersection().volume().abs() < 1e-6);
}

#[test]
fn mesh_arrays_are_compact() {
    let mut mesh = unit_cube([0.0; 3]);
    mesh.add_vertex(Point3::new(9.0, 9.0, 9.0), VertexStatus::Unknown);
    assert_eq!(mesh.vertex_count(), 9);

    let (positions, indices) = mesh.to_arrays();
    assert_eq!(positions.len(), 8);
    assert_eq!(indices.len(), 36);
    assert!(indices.iter().all(|&i| i < positions.len()));
}
