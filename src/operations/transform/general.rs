use crate::error::Result;
use crate::geometry::surface::Plane;
use crate::math::{transform_point, Matrix4};
use crate::topology::{FaceSurface, OrientedEdge, SolidId, TopologyStore};

/// Applies an arbitrary 4x4 transformation matrix to a solid.
pub struct GeneralTransform {
    solid: SolidId,
    matrix: Matrix4,
}

impl GeneralTransform {
    /// Creates a new `GeneralTransform` operation.
    #[must_use]
    pub fn new(solid: SolidId, matrix: Matrix4) -> Self {
        Self { solid, matrix }
    }

    /// Executes the transformation, modifying the solid in-place.
    ///
    /// Transforms all vertex positions, then refits each face's plane to the
    /// moved vertices. Edges are straight and follow their vertices. A
    /// reflecting matrix (negative determinant) would turn the shell inside
    /// out, so every wire is reversed to keep faces wound outward.
    ///
    /// # Errors
    ///
    /// Returns an error if any topology entity is missing or the transform
    /// collapses a face.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<()> {
        for vid in store.solid_vertices(self.solid)? {
            let vertex = store.vertex_mut(vid)?;
            vertex.point = transform_point(&self.matrix, &vertex.point);
        }

        let reflects = self.matrix.fixed_view::<3, 3>(0, 0).determinant() < 0.0;
        let face_ids = store.solid_faces(self.solid)?;

        if reflects {
            let mut wires = Vec::new();
            for &face_id in &face_ids {
                let face = store.face(face_id)?;
                wires.push(face.outer_wire);
                wires.extend_from_slice(&face.inner_wires);
            }
            wires.sort_unstable();
            wires.dedup();
            for wire_id in wires {
                let reversed: Vec<OrientedEdge> = store
                    .wire(wire_id)?
                    .edges
                    .iter()
                    .rev()
                    .map(|oe| OrientedEdge::new(oe.edge, !oe.forward))
                    .collect();
                store.wire_mut(wire_id)?.edges = reversed;
            }
        }

        for face_id in face_ids {
            let outer = store.face(face_id)?.outer_wire;
            let plane = Plane::from_polygon(&store.wire_points(outer)?)?;
            store.face_mut(face_id)?.surface = FaceSurface::Plane(plane);
        }

        Ok(())
    }
}
