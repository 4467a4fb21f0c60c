//! The minimal geometry capability the penetration pipeline needs.
//!
//! Any kernel can take part by implementing these two traits; [`BrepSolid`]
//! is the adapter for this crate's own topology store.
//!
//! [`BrepSolid`]: super::brep::BrepSolid

use crate::error::Result;
use crate::geometry::{Aabb, Centerline};
use crate::math::Matrix4;
use crate::operations::query::FaceLineHits;

/// A bounded face of a solid's boundary.
pub trait BoundaryFace {
    /// Intersects the face with a finite centerline.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying geometry query fails.
    fn intersect_with_line(&self, line: &Centerline) -> Result<FaceLineHits>;
}

/// A solid described by its boundary faces.
pub trait BoundarySolid: Clone {
    type Face<'a>: BoundaryFace
    where
        Self: 'a;

    /// The faces bounding the solid, in a stable order.
    ///
    /// # Errors
    ///
    /// Returns an error if the boundary cannot be enumerated.
    fn boundary_faces(&self) -> Result<Vec<Self::Face<'_>>>;

    /// Signed volume; positive for a well-formed, outward-oriented solid.
    ///
    /// # Errors
    ///
    /// Returns an error if the volume cannot be computed.
    fn volume(&self) -> Result<f64>;

    /// Axis-aligned bounds of the solid.
    ///
    /// # Errors
    ///
    /// Returns an error if the bounds cannot be computed.
    fn bounding_box(&self) -> Result<Aabb>;

    /// A copy of the solid mapped through `matrix`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform degenerates the solid.
    fn transformed(&self, matrix: &Matrix4) -> Result<Self>;
}
