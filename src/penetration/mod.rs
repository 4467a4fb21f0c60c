//! Conduit penetration detection.
//!
//! [`CandidateCollector`] gathers structural elements from the host and its
//! visible links, a [`SpatialIndex`] narrows them per conduit,
//! [`SolidResolver`] picks each element's solid and [`LineSolidIntersector`]
//! turns centerline hits into [`IntersectionRecord`]s. [`PenetrationDetector`]
//! runs the whole chain.

pub mod brep;
pub mod capability;
pub mod collector;
pub mod detector;
pub mod diagnostics;
pub mod intersector;
pub mod model;
pub mod resolver;
pub mod sleeve;
pub mod spatial_index;

pub use brep::{BrepFace, BrepSolid};
pub use capability::{BoundaryFace, BoundarySolid};
pub use collector::{CandidateCollector, StructuralCandidate};
pub use detector::{Conduit, ConduitKind, ConduitPenetrations, DetectorConfig, PenetrationDetector};
pub use diagnostics::{CollectingSink, DiagnosticSink, NullSink, TracingSink};
pub use intersector::{representative_point, IntersectionRecord, LineSolidIntersector};
pub use model::{
    Category, Element, ElementId, ElementRef, LinkInstance, LinkVisibility, Model, ModelDocument,
    ModelSource,
};
pub use resolver::{GeometryEntry, GeometryInstance, GeometryTree, SolidResolver};
pub use sleeve::{PlacedSleeve, SleeveLocator};
pub use spatial_index::{Footprint, Located, SpatialIndex, DEFAULT_CELL_SIZE, MAX_CELL_ENTRIES};
