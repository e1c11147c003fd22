//! Infinite lines: the intersection line of two face planes and classification rays.

use crate::float_types::Real;
use crate::mesh::plane::Plane;
use nalgebra::{Point3, Vector3};
use rand::Rng;

/// Where a line meets a plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaneIntersection {
    Point(Point3<Real>),
    /// The line lies in the plane.
    Contained,
    /// The line is parallel to the plane and off it.
    Parallel,
}

/// A line through `point` along the unit vector `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub point: Point3<Real>,
    pub direction: Vector3<Real>,
}

impl Line {
    /// Ray from `origin` along `direction` (normalized here).
    pub fn ray(origin: Point3<Real>, direction: Vector3<Real>) -> Self {
        Line {
            point: origin,
            direction: direction.normalize(),
        }
    }

    /// Intersection line of two planes, `None` when they are parallel.
    ///
    /// The direction is `n1 × n2`. The line point zeroes the coordinate of the
    /// dominant direction component and solves the remaining 2×2 system.
    pub fn from_planes(first: &Plane, second: &Plane, tol: Real) -> Option<Self> {
        let n1 = first.normal;
        let n2 = second.normal;
        let direction = n1.cross(&n2);
        if direction.norm() < tol {
            return None;
        }

        // planes written as n·p + d = 0
        let d1 = -first.w;
        let d2 = -second.w;
        let abs = direction.abs();
        let point = if abs.x >= abs.y && abs.x >= abs.z {
            Point3::new(
                0.0,
                (d2 * n1.z - d1 * n2.z) / direction.x,
                (d1 * n2.y - d2 * n1.y) / direction.x,
            )
        } else if abs.y >= abs.z {
            Point3::new(
                (d1 * n2.z - d2 * n1.z) / direction.y,
                0.0,
                (d2 * n1.x - d1 * n2.x) / direction.y,
            )
        } else {
            Point3::new(
                (d2 * n1.y - d1 * n2.y) / direction.z,
                (d1 * n2.x - d2 * n1.x) / direction.z,
                0.0,
            )
        };

        Some(Line {
            point,
            direction: direction.normalize(),
        })
    }

    /// Distance of a point on the line from the line's origin, negative behind it.
    pub fn signed_distance_to(&self, point: &Point3<Real>) -> Real {
        let offset = point - self.point;
        let distance = offset.norm();
        if offset.dot(&self.direction) < 0.0 {
            -distance
        } else {
            distance
        }
    }

    /// Intersection point with another line, solved on the axis pair with the
    /// largest determinant. `None` when the lines are parallel on every pair.
    pub fn intersect_line(&self, other: &Line, tol: Real) -> Option<Point3<Real>> {
        let d1 = self.direction;
        let d2 = other.direction;
        let delta = other.point - self.point;

        let (i, j, det) = [(0, 1), (0, 2), (1, 2)]
            .into_iter()
            .map(|(i, j)| (i, j, d1[i] * d2[j] - d1[j] * d2[i]))
            .max_by(|a, b| a.2.abs().total_cmp(&b.2.abs()))?;
        if det.abs() < tol {
            return None;
        }

        let t = (delta[i] * d2[j] - delta[j] * d2[i]) / det;
        Some(self.point + d1 * t)
    }

    /// Intersection with a plane.
    pub fn intersect_plane(&self, plane: &Plane, tol: Real) -> PlaneIntersection {
        let numerator = plane.signed_distance(&self.point);
        let denominator = plane.normal.dot(&self.direction);
        if denominator.abs() < tol {
            if numerator.abs() < tol {
                PlaneIntersection::Contained
            } else {
                PlaneIntersection::Parallel
            }
        } else {
            PlaneIntersection::Point(self.point - self.direction * (numerator / denominator))
        }
    }

    /// Add a jitter in `[0, magnitude)` to every direction component and renormalize.
    pub fn perturb_direction<R: Rng + ?Sized>(&mut self, rng: &mut R, magnitude: Real) {
        let jitter = Vector3::new(
            rng.gen_range(0.0..1.0),
            rng.gen_range(0.0..1.0),
            rng.gen_range(0.0..1.0),
        ) * magnitude;
        self.direction = (self.direction + jitter).normalize();
    }
}
