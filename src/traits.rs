use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::float_types::Real;
use nalgebra::{Matrix4, Rotation3, Translation3, Vector3};

/// Boolean operations + transformations
///
/// Booleans consume both operands; clone beforehand to keep the originals.
/// Transformations mutate in place and return `&mut Self` for chaining.
pub trait CSGOps: Sized {
    fn union(self, other: Self) -> Self;
    fn difference(self, other: Self) -> Self;
    fn intersection(self, other: Self) -> Self;
    fn transform(&mut self, matrix: &Matrix4<Real>);
    fn bounding_box(&self) -> Aabb;
    fn invalidate_bounding_box(&mut self);
    fn inverse(&mut self);

    /// Translate by vector.
    fn translate_vector(&mut self, vector: Vector3<Real>) -> &mut Self {
        self.transform(&Translation3::from(vector).to_homogeneous());
        self
    }

    /// Translate by x, y, and z.
    fn translate(&mut self, x: Real, y: Real, z: Real) -> &mut Self {
        self.translate_vector(Vector3::new(x, y, z))
    }

    /// Translate so that the bounding-box center is at the origin (0,0,0).
    fn center(&mut self) -> &mut Self {
        let aabb = self.bounding_box();
        let center = (aabb.mins.coords + aabb.maxs.coords) * 0.5;
        self.translate_vector(-center)
    }

    /// Translates the object so that its bottommost point(s) sit exactly at z=0.
    fn float(&mut self) -> &mut Self {
        let min_z = self.bounding_box().mins.z;
        self.translate(0.0, 0.0, -min_z)
    }

    /// Rotate about the x axis by `angle` radians.
    fn rotate_x(&mut self, angle: Real) -> &mut Self {
        let rot = Rotation3::from_axis_angle(&Vector3::x_axis(), angle);
        self.transform(&rot.to_homogeneous());
        self
    }

    /// Rotate about the y axis by `angle` radians.
    fn rotate_y(&mut self, angle: Real) -> &mut Self {
        let rot = Rotation3::from_axis_angle(&Vector3::y_axis(), angle);
        self.transform(&rot.to_homogeneous());
        self
    }

    /// Rotate about the z axis by `angle` radians.
    fn rotate_z(&mut self, angle: Real) -> &mut Self {
        let rot = Rotation3::from_axis_angle(&Vector3::z_axis(), angle);
        self.transform(&rot.to_homogeneous());
        self
    }

    /// Scales by scale_x, scale_y, scale_z
    fn scale(&mut self, sx: Real, sy: Real, sz: Real) -> &mut Self {
        let mat4 = Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz));
        self.transform(&mat4);
        self
    }
}
