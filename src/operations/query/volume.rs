use crate::error::Result;
use crate::math::Point3;
use crate::topology::{SolidId, TopologyStore};

/// Computes the signed volume of a planar polyhedral solid.
///
/// Each face loop is fanned into triangles from its first vertex and the
/// signed tetrahedron `(1/6) * v0 . (v1 x v2)` is summed over all triangles.
/// Outward-wound faces give a positive volume; an inside-out shell gives a
/// negative one and an open or flat shell gives (near) zero.
pub struct Volume {
    solid: SolidId,
}

impl Volume {
    /// Creates a new `Volume` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the query, returning the signed volume.
    ///
    /// # Errors
    ///
    /// Returns an error if any entity of the solid is missing.
    pub fn execute(&self, store: &TopologyStore) -> Result<f64> {
        let mut six_volume = 0.0;
        for face_id in store.solid_faces(self.solid)? {
            let face = store.face(face_id)?;
            let sense = if face.same_sense { 1.0 } else { -1.0 };
            for &wire in std::iter::once(&face.outer_wire).chain(&face.inner_wires) {
                six_volume += sense * fan_determinant(&store.wire_points(wire)?);
            }
        }
        Ok(six_volume / 6.0)
    }
}

fn fan_determinant(loop_points: &[Point3]) -> f64 {
    let Some((v0, rest)) = loop_points.split_first() else {
        return 0.0;
    };
    rest.windows(2)
        .map(|w| v0.coords.dot(&w[0].coords.cross(&w[1].coords)))
        .sum()
}
