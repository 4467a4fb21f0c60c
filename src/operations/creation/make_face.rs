use crate::error::{GeometryError, Result, TopologyError};
use crate::geometry::surface::Plane;
use crate::math::intersect_3d::signed_distance_to_plane;
use crate::topology::{FaceData, FaceId, FaceSurface, TopologyStore, WireId};

/// Maximum distance a wire vertex may sit off the fitted face plane.
const PLANARITY_TOLERANCE: f64 = 1e-6;

/// Creates a planar face bounded by closed wires.
///
/// The face plane is fitted through the outer wire; its normal follows the
/// outer wire's winding.
pub struct MakeFace {
    outer_wire: WireId,
    inner_wires: Vec<WireId>,
}

impl MakeFace {
    /// Creates a new `MakeFace` operation.
    #[must_use]
    pub fn new(outer_wire: WireId, inner_wires: Vec<WireId>) -> Self {
        Self {
            outer_wire,
            inner_wires,
        }
    }

    /// Executes the operation, creating the face in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if a wire is open or missing, the outer wire has zero
    /// area, or any wire vertex lies off the fitted plane.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<FaceId> {
        let outer = store.wire_points(self.outer_wire)?;
        if !store.wire(self.outer_wire)?.is_closed {
            return Err(TopologyError::WireNotClosed.into());
        }
        let plane = Plane::from_polygon(&outer)?;

        for &wire in std::iter::once(&self.outer_wire).chain(&self.inner_wires) {
            if !store.wire(wire)?.is_closed {
                return Err(TopologyError::WireNotClosed.into());
            }
            let off_plane = store
                .wire_points(wire)?
                .iter()
                .any(|p| signed_distance_to_plane(p, &plane).abs() > PLANARITY_TOLERANCE);
            if off_plane {
                return Err(GeometryError::Degenerate("face wire is not planar".into()).into());
            }
        }

        Ok(store.add_face(FaceData {
            surface: FaceSurface::Plane(plane),
            outer_wire: self.outer_wire,
            inner_wires: self.inner_wires.clone(),
            same_sense: true,
        }))
    }
}
