use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the topology store.
    pub struct EdgeId;
}

/// A straight edge between two vertices.
///
/// Solids here are planar polyhedra, so the segment between the endpoint
/// vertices is the whole edge geometry; transforming the vertices moves the
/// edge with them.
#[derive(Debug, Clone, Copy)]
pub struct EdgeData {
    /// Start vertex of the edge.
    pub start: VertexId,
    /// End vertex of the edge.
    pub end: VertexId,
}
