//! Oriented planes of mesh faces.

use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// Sign of a point relative to a plane, with tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Back,
    On,
    Front,
}

impl Side {
    /// Classify a signed distance.
    #[inline]
    pub fn of(distance: Real, tol: Real) -> Self {
        if distance > tol {
            Side::Front
        } else if distance < -tol {
            Side::Back
        } else {
            Side::On
        }
    }
}

/// A plane with unit normal; points `p` on it satisfy `normal · p = w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3<Real>,
    pub w: Real,
}

impl Plane {
    /// Create a plane from three points.
    /// The normal direction follows the right-hand rule: (p2-p1) × (p3-p1).
    ///
    /// Returns `None` for collinear points.
    pub fn from_points(p1: &Point3<Real>, p2: &Point3<Real>, p3: &Point3<Real>) -> Option<Self> {
        let normal = (p2 - p1).cross(&(p3 - p1));
        let len = normal.norm();
        if len < Real::EPSILON {
            return None;
        }
        let normal = normal / len;
        Some(Plane {
            normal,
            w: normal.dot(&p1.coords),
        })
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    pub const fn offset(&self) -> Real {
        self.w
    }

    /// Signed distance, positive on the side the normal points to.
    #[inline]
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Flip the plane (reverse normal and offset)
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_sign_follows_winding() {
        let mut plane = Plane::from_points(
            &Point3::new(0.0, 0.0, 1.0),
            &Point3::new(1.0, 0.0, 1.0),
            &Point3::new(0.0, 1.0, 1.0),
        )
        .expect("non-degenerate");
        assert_eq!(plane.normal(), Vector3::z());
        assert_eq!(plane.offset(), 1.0);
        assert_eq!(plane.signed_distance(&Point3::new(3.0, -2.0, 3.0)), 2.0);
        plane.flip();
        assert_eq!(plane.signed_distance(&Point3::origin()), 1.0);
        assert_eq!(Side::of(1e-12, 1e-10), Side::On);
        assert_eq!(Side::of(-1e-9, 1e-10), Side::Back);
    }

    #[test]
    fn collinear_points_have_no_plane() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 1.0, 1.0);
        let c = Point3::new(2.0, 2.0, 2.0);
        assert!(Plane::from_points(&a, &b, &c).is_none());
    }
}
