use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::topology::{
    EdgeData, EdgeId, FaceData, OrientedEdge, ShellData, ShellId, SolidData, SolidId,
    TopologyStore, VertexId, WireData, WireId,
};

/// Deep-copies one solid from a source store into a target store.
///
/// Shared vertices and edges stay shared in the copy. Nothing else from the
/// source store is carried over, so the copy can be transformed without
/// touching the original.
pub struct CopySolid {
    solid: SolidId,
}

impl CopySolid {
    /// Creates a new `CopySolid` operation.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the copy, returning the new solid's ID in `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if any entity of the solid is missing from `source`.
    pub fn execute(&self, source: &TopologyStore, target: &mut TopologyStore) -> Result<SolidId> {
        let mut vertices: FxHashMap<VertexId, VertexId> = FxHashMap::default();
        for vid in source.solid_vertices(self.solid)? {
            vertices.insert(vid, target.add_vertex(*source.vertex(vid)?));
        }

        let mut edges: FxHashMap<EdgeId, EdgeId> = FxHashMap::default();
        for eid in source.solid_edges(self.solid)? {
            let edge = source.edge(eid)?;
            let copy = target.add_edge(EdgeData {
                start: vertices[&edge.start],
                end: vertices[&edge.end],
            });
            edges.insert(eid, copy);
        }

        let mut wires: FxHashMap<WireId, WireId> = FxHashMap::default();
        let mut copy_wire = |target: &mut TopologyStore, wid: WireId| -> Result<WireId> {
            if let Some(&done) = wires.get(&wid) {
                return Ok(done);
            }
            let wire = source.wire(wid)?;
            let copy = target.add_wire(WireData {
                edges: wire
                    .edges
                    .iter()
                    .map(|oe| OrientedEdge::new(edges[&oe.edge], oe.forward))
                    .collect(),
                is_closed: wire.is_closed,
            });
            wires.insert(wid, copy);
            Ok(copy)
        };

        let data = source.solid(self.solid)?;
        let mut copy_shell = |target: &mut TopologyStore, sid: ShellId| -> Result<ShellId> {
            let shell = source.shell(sid)?;
            let mut faces = Vec::with_capacity(shell.faces.len());
            for &fid in &shell.faces {
                let face = source.face(fid)?;
                let outer_wire = copy_wire(target, face.outer_wire)?;
                let inner_wires = face
                    .inner_wires
                    .iter()
                    .map(|&w| copy_wire(target, w))
                    .collect::<Result<Vec<_>>>()?;
                faces.push(target.add_face(FaceData {
                    surface: face.surface.clone(),
                    outer_wire,
                    inner_wires,
                    same_sense: face.same_sense,
                }));
            }
            Ok(target.add_shell(ShellData {
                faces,
                is_closed: shell.is_closed,
            }))
        };

        let outer_shell = copy_shell(target, data.outer_shell)?;
        let inner_shells = data
            .inner_shells
            .iter()
            .map(|&s| copy_shell(target, s))
            .collect::<Result<Vec<_>>>()?;

        Ok(target.add_solid(SolidData {
            outer_shell,
            inner_shells,
        }))
    }
}
