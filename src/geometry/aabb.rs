use crate::math::{transform_point, Matrix4, Point3, Vector3};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Creates a box from two opposite corners, in any order.
    #[must_use]
    pub fn new(a: Point3, b: Point3) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// A zero-size box at `point`.
    #[must_use]
    pub fn from_point(point: Point3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Smallest box enclosing all `points`, or `None` for an empty iterator.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = Self::from_point(*iter.next()?);
        Some(iter.fold(first, |acc, p| acc.including(p)))
    }

    /// Returns this box grown to include `point`.
    #[must_use]
    pub fn including(&self, point: &Point3) -> Self {
        Self {
            min: self.min.inf(point),
            max: self.max.sup(point),
        }
    }

    /// Smallest box enclosing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Returns this box grown by `margin` on every side.
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Self {
        let m = Vector3::repeat(margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Returns `true` if the boxes share at least one point (touching counts).
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Returns `true` if `point` lies inside or on the box.
    #[must_use]
    pub fn contains_point(&self, point: &Point3) -> bool {
        (0..3).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Edge lengths along X, Y and Z.
    #[must_use]
    pub fn extent(&self) -> Vector3 {
        self.max - self.min
    }

    /// The eight corners of the box.
    #[must_use]
    pub fn corners(&self) -> [Point3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
            Point3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Axis-aligned box enclosing this box after `matrix` is applied.
    ///
    /// Rotations make the result larger than the rotated content.
    #[must_use]
    pub fn transformed(&self, matrix: &Matrix4) -> Self {
        let corners = self.corners().map(|c| transform_point(matrix, &c));
        let first = Self::from_point(corners[0]);
        corners[1..].iter().fold(first, |acc, p| acc.including(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn new_orders_corners() {
        let b = Aabb::new(p(3.0, -1.0, 2.0), p(0.0, 4.0, -2.0));
        assert_eq!(b.min, p(0.0, -1.0, -2.0));
        assert_eq!(b.max, p(3.0, 4.0, 2.0));
    }

    #[test]
    fn from_points_empty_is_none() {
        let none: [Point3; 0] = [];
        assert!(Aabb::from_points(&none).is_none());
    }

    #[test]
    fn touching_boxes_overlap() {
        let a = Aabb::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
        let b = Aabb::new(p(1.0, 0.0, 0.0), p(2.0, 1.0, 1.0));
        let c = Aabb::new(p(1.5, 0.0, 0.0), p(2.0, 1.0, 1.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn rotated_box_encloses_corners() {
        let b = Aabb::new(p(0.0, 0.0, 0.0), p(2.0, 1.0, 1.0));
        let rot = Matrix4::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_2);
        let t = b.transformed(&rot);
        assert_relative_eq!(t.min.x, -1.0, epsilon = 1e-9);
        assert_relative_eq!(t.max.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(t.min.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(t.max.y, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn union_and_expand() {
        let a = Aabb::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
        let b = Aabb::new(p(5.0, -2.0, 0.5), p(6.0, 0.0, 3.0));
        let u = a.union(&b).expanded(1.0);
        assert_eq!(u.min, p(-1.0, -3.0, -1.0));
        assert_eq!(u.max, p(7.0, 2.0, 4.0));
        assert!(u.contains_point(&p(6.5, 1.5, 3.5)));
    }
}
