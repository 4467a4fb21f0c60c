use crate::error::{Result, TopologyError};
use crate::geometry::Aabb;
use crate::topology::{SolidId, TopologyStore};

/// Computes the axis-aligned bounding box of a solid.
///
/// All edges are straight, so the vertex positions bound the solid exactly.
pub struct BoundingBox {
    solid: SolidId,
}

impl BoundingBox {
    /// Creates a new `BoundingBox` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the query, returning the AABB.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid is missing or has no vertices.
    pub fn execute(&self, store: &TopologyStore) -> Result<Aabb> {
        let mut points = Vec::new();
        for vid in store.solid_vertices(self.solid)? {
            points.push(store.vertex(vid)?.point);
        }
        Aabb::from_points(&points)
            .ok_or_else(|| TopologyError::InvalidTopology("solid has no vertices".into()).into())
    }
}
