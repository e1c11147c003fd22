//! Fuzzy axis-aligned bounding boxes used as the cheap rejection filter of the split phase.

use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::float_types::{BOUNDS_TOLERANCE, Real};
use nalgebra::Point3;

/// Tolerance-aware helpers on top of parry's [`Aabb`].
pub trait AabbExt {
    /// Smallest box containing every point; the degenerate box at the origin when empty.
    fn from_positions<'a, I>(points: I) -> Aabb
    where
        I: IntoIterator<Item = &'a Point3<Real>>;

    /// True unless the boxes are provably disjoint on some axis, with `tol`
    /// of slack on every comparison.
    fn overlaps(&self, other: &Aabb, tol: Real) -> bool;

    /// [`AabbExt::overlaps`] with [`BOUNDS_TOLERANCE`].
    #[inline]
    fn overlaps_fuzzy(&self, other: &Aabb) -> bool {
        self.overlaps(other, BOUNDS_TOLERANCE)
    }

    /// Center point of the box
    fn centroid(&self) -> Point3<Real>;
}

impl AabbExt for Aabb {
    fn from_positions<'a, I>(points: I) -> Aabb
    where
        I: IntoIterator<Item = &'a Point3<Real>>,
    {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return Aabb::new(Point3::origin(), Point3::origin());
        };
        let mut mins = *first;
        let mut maxs = *first;
        for p in iter {
            mins = mins.inf(p);
            maxs = maxs.sup(p);
        }
        Aabb::new(mins, maxs)
    }

    #[inline]
    fn overlaps(&self, other: &Aabb, tol: Real) -> bool {
        !(self.mins.x > other.maxs.x + tol
            || self.maxs.x < other.mins.x - tol
            || self.mins.y > other.maxs.y + tol
            || self.maxs.y < other.mins.y - tol
            || self.mins.z > other.maxs.z + tol
            || self.maxs.z < other.mins.z - tol)
    }

    #[inline]
    fn centroid(&self) -> Point3<Real> {
        nalgebra::center(&self.mins, &self.maxs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_point_set_is_degenerate_origin_box() {
        let bb = Aabb::from_positions(std::iter::empty());
        assert_eq!(bb.mins, Point3::origin());
        assert_eq!(bb.maxs, Point3::origin());
    }

    #[test]
    fn touching_boxes_overlap_and_separated_boxes_do_not() {
        let pts_a = [Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)];
        let pts_b = [Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0)];
        let pts_c = [Point3::new(1.1, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0)];
        let a = Aabb::from_positions(&pts_a);
        let b = Aabb::from_positions(&pts_b);
        let c = Aabb::from_positions(&pts_c);

        assert!(a.overlaps_fuzzy(&b));
        assert!(!a.overlaps_fuzzy(&c));
        assert!(a.overlaps(&c, 0.2));
        assert_eq!(b.centroid(), Point3::new(1.5, 0.5, 0.5));
    }
}
