use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

/// An infinite plane in 3D space.
///
/// Defined by an origin point and two orthonormal in-plane directions
/// (`u_dir`, `v_dir`). The normal is `u_dir x v_dir`.
#[derive(Debug, Clone)]
pub struct Plane {
    origin: Point3,
    u_dir: Vector3,
    v_dir: Vector3,
    normal: Vector3,
}

impl Plane {
    /// Creates a plane from an origin and a normal vector.
    ///
    /// The U and V directions are computed automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal vector is zero-length.
    pub fn from_normal(origin: Point3, normal: Vector3) -> Result<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / len;

        // Choose a reference vector not parallel to the normal
        let reference = if normal.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };

        let u_dir = normal.cross(&reference).normalize();
        let v_dir = normal.cross(&u_dir);

        Ok(Self {
            origin,
            u_dir,
            v_dir,
            normal,
        })
    }

    /// Fits a plane through a closed polygon using Newell's method.
    ///
    /// The normal follows the polygon winding (counter-clockwise seen from
    /// the normal side). The origin is the vertex centroid.
    ///
    /// # Errors
    ///
    /// Returns an error if the polygon has fewer than three points or zero area.
    pub fn from_polygon(points: &[Point3]) -> Result<Self> {
        if points.len() < 3 {
            return Err(
                GeometryError::Degenerate("polygon needs at least three points".into()).into(),
            );
        }

        let n = points.len();
        let mut normal = Vector3::zeros();
        for i in 0..n {
            let curr = &points[i];
            let next = &points[(i + 1) % n];
            normal.x += (curr.y - next.y) * (curr.z + next.z);
            normal.y += (curr.z - next.z) * (curr.x + next.x);
            normal.z += (curr.x - next.x) * (curr.y + next.y);
        }

        if normal.norm() < TOLERANCE {
            return Err(GeometryError::Degenerate("polygon has zero area".into()).into());
        }

        #[allow(clippy::cast_precision_loss)]
        let inv_n = 1.0 / n as f64;
        let centroid = points
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords)
            * inv_n;

        Self::from_normal(Point3::from(centroid), normal)
    }

    /// Returns the origin point of the plane.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the U direction vector.
    #[must_use]
    pub fn u_dir(&self) -> &Vector3 {
        &self.u_dir
    }

    /// Returns the V direction vector.
    #[must_use]
    pub fn v_dir(&self) -> &Vector3 {
        &self.v_dir
    }

    /// Returns the normal vector of the plane.
    #[must_use]
    pub fn plane_normal(&self) -> &Vector3 {
        &self.normal
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
    fn from_normal_builds_orthonormal_frame() {
        let plane = Plane::from_normal(p(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 3.0)).unwrap();
        assert!((plane.plane_normal() - Vector3::z()).norm() < TOLERANCE);
        assert!(plane.u_dir().dot(plane.v_dir()).abs() < TOLERANCE);
        assert!((plane.u_dir().cross(plane.v_dir()) - plane.plane_normal()).norm() < TOLERANCE);
    }

    #[test]
    fn zero_normal_is_rejected() {
        assert!(Plane::from_normal(p(0.0, 0.0, 0.0), Vector3::zeros()).is_err());
    }

    #[test]
    fn polygon_winding_sets_normal() {
        let ccw = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 1.0, 0.0)];
        let plane = Plane::from_polygon(&ccw).unwrap();
        assert!((plane.plane_normal() - Vector3::z()).norm() < TOLERANCE);
        assert!((plane.origin() - p(0.5, 0.5, 0.0)).norm() < TOLERANCE);

        let cw: Vec<Point3> = ccw.iter().rev().copied().collect();
        let plane = Plane::from_polygon(&cw).unwrap();
        assert!((plane.plane_normal() + Vector3::z()).norm() < TOLERANCE);
    }

    #[test]
    fn collinear_polygon_is_degenerate() {
        let pts = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)];
        assert!(Plane::from_polygon(&pts).is_err());
    }
}
