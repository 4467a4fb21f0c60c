use std::sync::Arc;

use crate::error::Result;
use crate::geometry::{Aabb, Centerline};
use crate::math::{Matrix4, Point3};
use crate::operations::creation::{MakeBox, MakePolyhedron};
use crate::operations::query::{BoundingBox, FaceLineHits, LineFaceIntersect, Volume};
use crate::operations::transform::{CopySolid, GeneralTransform};
use crate::topology::{FaceId, SolidId, TopologyStore};

use super::capability::{BoundaryFace, BoundarySolid};

/// A solid living in a shared topology store.
///
/// Cloning is cheap; the store is reference-counted and only copied when the
/// solid is transformed.
#[derive(Debug, Clone)]
pub struct BrepSolid {
    store: Arc<TopologyStore>,
    solid: SolidId,
}

impl BrepSolid {
    #[must_use]
    pub fn new(store: Arc<TopologyStore>, solid: SolidId) -> Self {
        Self { store, solid }
    }

    /// An axis-aligned box in a store of its own.
    ///
    /// # Errors
    ///
    /// Returns an error if the box is flat along any axis.
    pub fn from_box(corner_a: Point3, corner_b: Point3) -> Result<Self> {
        let mut store = TopologyStore::new();
        let solid = MakeBox::new(corner_a, corner_b).execute(&mut store)?;
        Ok(Self::new(Arc::new(store), solid))
    }

    /// A planar polyhedron in a store of its own. Faces index into `points`
    /// and wind counter-clockwise seen from outside.
    ///
    /// # Errors
    ///
    /// Returns an error if the face list does not describe a valid solid.
    pub fn from_polyhedron(points: Vec<Point3>, faces: Vec<Vec<usize>>) -> Result<Self> {
        let mut store = TopologyStore::new();
        let solid = MakePolyhedron::new(points, faces).execute(&mut store)?;
        Ok(Self::new(Arc::new(store), solid))
    }

    #[must_use]
    pub fn store(&self) -> &TopologyStore {
        &self.store
    }

    #[must_use]
    pub fn id(&self) -> SolidId {
        self.solid
    }
}

/// One face of a [`BrepSolid`].
#[derive(Debug, Clone, Copy)]
pub struct BrepFace<'a> {
    store: &'a TopologyStore,
    face: FaceId,
}

impl BoundaryFace for BrepFace<'_> {
    fn intersect_with_line(&self, line: &Centerline) -> Result<FaceLineHits> {
        LineFaceIntersect::new(line).execute(self.store, self.face)
    }
}

impl BoundarySolid for BrepSolid {
    type Face<'a> = BrepFace<'a>;

    fn boundary_faces(&self) -> Result<Vec<BrepFace<'_>>> {
        let store = self.store.as_ref();
        Ok(store
            .solid_faces(self.solid)?
            .into_iter()
            .map(|face| BrepFace { store, face })
            .collect())
    }

    fn volume(&self) -> Result<f64> {
        Volume::new(self.solid).execute(&self.store)
    }

    fn bounding_box(&self) -> Result<Aabb> {
        BoundingBox::new(self.solid).execute(&self.store)
    }

    fn transformed(&self, matrix: &Matrix4) -> Result<Self> {
        let mut store = TopologyStore::new();
        let solid = CopySolid::new(self.solid).execute(&self.store, &mut store)?;
        GeneralTransform::new(solid, *matrix).execute(&mut store)?;
        Ok(Self::new(Arc::new(store), solid))
    }
}
