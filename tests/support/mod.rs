//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use tricsg::{float_types::Real, mesh::Mesh};

/// Corner order: bottom face counter-clockwise from the min corner, then the
/// top face in the same order.
const CUBE_INDICES: [usize; 36] = [
    0, 2, 1, 0, 3, 2, // -z
    4, 5, 6, 4, 6, 7, // +z
    0, 1, 5, 0, 5, 4, // -y
    3, 7, 6, 3, 6, 2, // +y
    0, 4, 7, 0, 7, 3, // -x
    1, 2, 6, 1, 6, 5, // +x
];

/// An axis-aligned box of 12 outward-facing triangles.
pub fn cuboid(min: [Real; 3], max: [Real; 3]) -> Mesh {
    let [x0, y0, z0] = min;
    let [x1, y1, z1] = max;
    let corners = [
        [x0, y0, z0],
        [x1, y0, z0],
        [x1, y1, z0],
        [x0, y1, z0],
        [x0, y0, z1],
        [x1, y0, z1],
        [x1, y1, z1],
        [x0, y1, z1],
    ];
    Mesh::from_arrays(&corners, &CUBE_INDICES)
}

/// A cube with edge length `size` centred on `center`.
pub fn cube(center: [Real; 3], size: Real) -> Mesh {
    let h = size * 0.5;
    cuboid(
        [center[0] - h, center[1] - h, center[2] - h],
        [center[0] + h, center[1] + h, center[2] + h],
    )
}

/// The unit cube `[0, 1]³` shifted by `offset`.
pub fn unit_cube(offset: [Real; 3]) -> Mesh {
    cuboid(offset, [offset[0] + 1.0, offset[1] + 1.0, offset[2] + 1.0])
}

/// Returns `[min_x, min_y, min_z, max_x, max_y, max_z]` over the vertices
/// referenced by faces.
pub fn bounding_box(mesh: &Mesh) -> [Real; 6] {
    let mut bounds = [Real::MAX, Real::MAX, Real::MAX, Real::MIN, Real::MIN, Real::MIN];
    for face in mesh.faces() {
        for id in face.vertices() {
            let p = mesh.vertices()[id].pos;
            for axis in 0..3 {
                bounds[axis] = bounds[axis].min(p[axis]);
                bounds[axis + 3] = bounds[axis + 3].max(p[axis]);
            }
        }
    }
    bounds
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Asserts that the face-referenced bounds of `mesh` match `expected` to 1e-9.
#[track_caller]
pub fn assert_bounds(mesh: &Mesh, expected: [Real; 6]) {
    let actual = bounding_box(mesh);
    for (a, e) in actual.iter().zip(expected) {
        assert!(approx_eq(*a, e, 1e-9), "bounds {actual:?} != {expected:?}");
    }
}
