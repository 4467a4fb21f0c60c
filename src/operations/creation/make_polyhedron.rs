use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use crate::error::{GeometryError, OperationError, Result};
use crate::math::{Point3, TOLERANCE};
use crate::topology::{
    EdgeData, EdgeId, OrientedEdge, ShellData, SolidData, SolidId, TopologyStore,
    VertexData, WireData,
};

use super::MakeFace;

/// Creates a planar polyhedral solid from an indexed face list.
///
/// Each face is a loop of indices into `points`, wound counter-clockwise
/// when seen from outside the solid. Vertices and edges are shared between
/// faces, so a watertight face list produces a closed shell.
pub struct MakePolyhedron {
    points: Vec<Point3>,
    faces: Vec<Vec<usize>>,
}

impl MakePolyhedron {
    /// Creates a new `MakePolyhedron` operation.
    #[must_use]
    pub fn new(points: Vec<Point3>, faces: Vec<Vec<usize>>) -> Self {
        Self { points, faces }
    }

    /// Executes the operation, creating the solid in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than four faces, a face has fewer
    /// than three vertices, an index is out of range, or a face is degenerate.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        if self.faces.len() < 4 {
            return Err(
                OperationError::InvalidInput("a polyhedron needs at least four faces".into())
                    .into(),
            );
        }
        for face in &self.faces {
            if face.len() < 3 {
                return Err(
                    OperationError::InvalidInput("a face needs at least three vertices".into())
                        .into(),
                );
            }
            if let Some(&bad) = face.iter().find(|&&i| i >= self.points.len()) {
                return Err(
                    OperationError::InvalidInput(format!("vertex index {bad} out of range")).into(),
                );
            }
        }

        let vertices: Vec<_> = self
            .points
            .iter()
            .map(|&p| store.add_vertex(VertexData::new(p)))
            .collect();

        // Undirected edge key -> (edge, index of its start vertex, use count)
        let mut edges: FxHashMap<(usize, usize), (EdgeId, usize, u32)> = FxHashMap::default();
        let mut face_ids = Vec::with_capacity(self.faces.len());

        for face in &self.faces {
            let mut loop_edges = Vec::with_capacity(face.len());
            for (k, &a) in face.iter().enumerate() {
                let b = face[(k + 1) % face.len()];
                let key = (a.min(b), a.max(b));
                let entry = match edges.entry(key) {
                    Entry::Occupied(slot) => slot.into_mut(),
                    Entry::Vacant(slot) => {
                        if (self.points[b] - self.points[a]).norm() < TOLERANCE {
                            return Err(GeometryError::Degenerate(format!(
                                "zero-length edge between vertices {a} and {b}"
                            ))
                            .into());
                        }
                        let edge = store.add_edge(EdgeData {
                            start: vertices[a],
                            end: vertices[b],
                        });
                        slot.insert((edge, a, 0))
                    }
                };
                entry.2 += 1;
                loop_edges.push(OrientedEdge::new(entry.0, entry.1 == a));
            }

            let wire = store.add_wire(WireData {
                edges: loop_edges,
                is_closed: true,
            });
            face_ids.push(MakeFace::new(wire, vec![]).execute(store)?);
        }

        let is_closed = edges.values().all(|&(_, _, uses)| uses == 2);
        let shell = store.add_shell(ShellData {
            faces: face_ids,
            is_closed,
        });
        Ok(store.add_solid(SolidData {
            outer_shell: shell,
            inner_shells: vec![],
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn tetrahedron() -> (Vec<Point3>, Vec<Vec<usize>>) {
        let points = vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(0.0, 0.0, 1.0)];
        let faces = vec![vec![0, 2, 1], vec![0, 1, 3], vec![0, 3, 2], vec![1, 2, 3]];
        (points, faces)
    }

    #[test]
    fn tetrahedron_shell_is_closed() {
        let mut store = TopologyStore::new();
        let (points, faces) = tetrahedron();
        let solid = MakePolyhedron::new(points, faces).execute(&mut store).unwrap();

        let shell = store.solid(solid).unwrap().outer_shell;
        assert!(store.shell(shell).unwrap().is_closed);
        assert_eq!(store.solid_edges(solid).unwrap().len(), 6);
    }

    #[test]
    fn missing_face_leaves_shell_open() {
        let mut store = TopologyStore::new();
        let (points, mut faces) = tetrahedron();
        faces.pop();
        faces.push(vec![0, 1, 2]);
        faces.push(vec![0, 2, 3]);
        let solid = MakePolyhedron::new(points, faces).execute(&mut store).unwrap();

        let shell = store.solid(solid).unwrap().outer_shell;
        assert!(!store.shell(shell).unwrap().is_closed);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut store = TopologyStore::new();
        let (points, mut faces) = tetrahedron();
        faces[0][1] = 9;
        assert!(MakePolyhedron::new(points, faces).execute(&mut store).is_err());
    }

    #[test]
    fn coincident_vertices_are_rejected() {
        let mut store = TopologyStore::new();
        let (mut points, faces) = tetrahedron();
        points[3] = points[0];
        let result = MakePolyhedron::new(points, faces).execute(&mut store);
        assert!(matches!(
            result,
            Err(crate::error::PierceError::Geometry(GeometryError::Degenerate(_)))
        ));
    }

    #[test]
    fn too_few_faces_is_rejected() {
        let mut store = TopologyStore::new();
        let (points, faces) = tetrahedron();
        let result = MakePolyhedron::new(points, faces[..3].to_vec()).execute(&mut store);
        assert!(result.is_err());
    }
}
