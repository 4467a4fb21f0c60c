use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::aabb::Aabb;

/// The axis of a conduit: a directed, finite line segment.
///
/// Parametrised by distance from the start point, `t` in `[0, length]`.
#[derive(Debug, Clone)]
pub struct Centerline {
    origin: Point3,
    direction: Vector3,
    length: f64,
}

impl Centerline {
    /// Creates a centerline running from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns an error if the two points coincide.
    pub fn new(start: Point3, end: Point3) -> Result<Self> {
        let span = end - start;
        let length = span.norm();
        if length < TOLERANCE {
            return Err(GeometryError::Degenerate("zero-length centerline".into()).into());
        }
        Ok(Self {
            origin: start,
            direction: span / length,
            length,
        })
    }

    /// Creates a centerline from an origin, a direction and an extent.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction is zero-length or the extent is not positive.
    pub fn from_origin(origin: Point3, direction: Vector3, length: f64) -> Result<Self> {
        let dir_len = direction.norm();
        if dir_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        if length < TOLERANCE {
            return Err(GeometryError::Degenerate("zero-length centerline".into()).into());
        }
        Ok(Self {
            origin,
            direction: direction / dir_len,
            length,
        })
    }

    #[must_use]
    pub fn start(&self) -> &Point3 {
        &self.origin
    }

    #[must_use]
    pub fn end(&self) -> Point3 {
        self.point_at(self.length)
    }

    /// Unit direction from start to end.
    #[must_use]
    pub fn direction(&self) -> &Vector3 {
        &self.direction
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Point at distance `t` from the start.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        Aabb::new(self.origin, self.end())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn endpoints_and_length() {
        let cl = Centerline::new(p(-5.0, 0.5, 5.0), p(15.0, 0.5, 5.0)).unwrap();
        assert!((cl.length() - 20.0).abs() < TOLERANCE);
        assert!((cl.end() - p(15.0, 0.5, 5.0)).norm() < TOLERANCE);
        assert!((cl.direction() - Vector3::x()).norm() < TOLERANCE);
        assert!((cl.point_at(5.0) - p(0.0, 0.5, 5.0)).norm() < TOLERANCE);
    }

    #[test]
    fn zero_length_is_rejected() {
        assert!(Centerline::new(p(1.0, 1.0, 1.0), p(1.0, 1.0, 1.0)).is_err());
        assert!(Centerline::from_origin(p(0.0, 0.0, 0.0), Vector3::x(), 0.0).is_err());
    }

    #[test]
    fn from_origin_normalises_direction() {
        let cl = Centerline::from_origin(p(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 4.0), 3.0)
            .unwrap();
        assert!((cl.end() - p(0.0, 0.0, 3.0)).norm() < TOLERANCE);
        let bb = cl.bounding_box();
        assert_eq!(bb.min, p(0.0, 0.0, 0.0));
        assert_eq!(bb.max, p(0.0, 0.0, 3.0));
    }
}
