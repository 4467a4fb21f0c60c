use crate::error::{OperationError, Result};
use crate::math::{Point3, TOLERANCE};
use crate::topology::{SolidId, TopologyStore};

use super::MakePolyhedron;

/// Face loops of a box, wound counter-clockwise seen from outside.
///
/// Corner `i` takes the max coordinate on X if bit 0 is set, on Y if bit 1
/// is set and on Z if bit 2 is set.
const BOX_FACES: [[usize; 4]; 6] = [
    [0, 2, 3, 1], // -Z
    [4, 5, 7, 6], // +Z
    [0, 1, 5, 4], // -Y
    [2, 6, 7, 3], // +Y
    [0, 4, 6, 2], // -X
    [1, 3, 7, 5], // +X
];

/// Creates an axis-aligned box solid from two corner points.
pub struct MakeBox {
    min_corner: Point3,
    max_corner: Point3,
}

impl MakeBox {
    /// Creates a new `MakeBox` operation. The corners may be given in any order.
    #[must_use]
    pub fn new(corner_a: Point3, corner_b: Point3) -> Self {
        Self {
            min_corner: corner_a.inf(&corner_b),
            max_corner: corner_a.sup(&corner_b),
        }
    }

    /// Executes the operation, creating the box in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if the box is flat along any axis.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        let extent = self.max_corner - self.min_corner;
        if extent.min() < TOLERANCE {
            return Err(OperationError::InvalidInput(format!(
                "box extent {extent:?} must be positive on every axis"
            ))
            .into());
        }

        let (lo, hi) = (self.min_corner, self.max_corner);
        let corners = (0..8)
            .map(|i| {
                Point3::new(
                    if i & 1 == 0 { lo.x } else { hi.x },
                    if i & 2 == 0 { lo.y } else { hi.y },
                    if i & 4 == 0 { lo.z } else { hi.z },
                )
            })
            .collect();
        let faces = BOX_FACES.iter().map(|f| f.to_vec()).collect();

        MakePolyhedron::new(corners, faces).execute(store)
    }
}
