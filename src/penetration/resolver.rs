//! Picks the one usable solid out of an element's geometry tree.

use crate::error::PenetrationError;
use crate::math::{Matrix4, Point3};

use super::capability::BoundarySolid;
use super::collector::StructuralCandidate;
use super::diagnostics::DiagnosticSink;

/// One entry of an element's geometry representation.
#[derive(Debug, Clone)]
pub enum GeometryEntry<S> {
    Solid(S),
    /// Nested geometry placed through its own transform.
    Instance(GeometryInstance<S>),
    /// Non-solid entries (model lines, reference points) are never selected.
    Polyline(Vec<Point3>),
}

/// Geometry defined once and placed into its parent through `transform`.
#[derive(Debug, Clone)]
pub struct GeometryInstance<S> {
    pub transform: Matrix4,
    pub geometry: GeometryTree<S>,
}

/// An element's geometry: entries in encounter order.
#[derive(Debug, Clone)]
pub struct GeometryTree<S> {
    entries: Vec<GeometryEntry<S>>,
}

impl<S> Default for GeometryTree<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<S> GeometryTree<S> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_solid(mut self, solid: S) -> Self {
        self.entries.push(GeometryEntry::Solid(solid));
        self
    }

    #[must_use]
    pub fn with_instance(mut self, transform: Matrix4, geometry: GeometryTree<S>) -> Self {
        self.entries
            .push(GeometryEntry::Instance(GeometryInstance { transform, geometry }));
        self
    }

    #[must_use]
    pub fn with_polyline(mut self, points: Vec<Point3>) -> Self {
        self.entries.push(GeometryEntry::Polyline(points));
        self
    }

    #[must_use]
    pub fn entries(&self) -> &[GeometryEntry<S>] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves a candidate's geometry to a single solid in host coordinates.
///
/// Depth-first, in encounter order, expanding instances in place. The first
/// solid with strictly positive volume wins; traversal stops there even if a
/// larger solid follows.
pub struct SolidResolver<'s> {
    sink: &'s dyn DiagnosticSink,
}

impl<'s> SolidResolver<'s> {
    #[must_use]
    pub fn new(sink: &'s dyn DiagnosticSink) -> Self {
        Self { sink }
    }

    /// Returns the candidate's solid, transformed by any enclosing instance
    /// placements and then by the candidate's link transform.
    ///
    /// A candidate with no usable solid is reported as `MissingGeometry` and
    /// yields `None`. A solid whose volume or transform query fails is
    /// reported as `GeometryQueryFailure`; a failing volume query only skips
    /// that entry.
    pub fn resolve<S: BoundarySolid>(&self, candidate: &StructuralCandidate<'_, S>) -> Option<S> {
        let Some((solid, placement)) = self.first_usable(candidate, candidate.geometry, None)
        else {
            self.sink.record(&PenetrationError::MissingGeometry {
                element: candidate.element,
            });
            return None;
        };

        let full = match (candidate.transform, placement) {
            (None, None) => return Some(solid.clone()),
            (Some(link), None) => link,
            (None, Some(inner)) => inner,
            (Some(link), Some(inner)) => link * inner,
        };

        match solid.transformed(&full) {
            Ok(moved) => Some(moved),
            Err(err) => {
                self.sink.record(&PenetrationError::GeometryQueryFailure {
                    element: candidate.element,
                    reason: err.to_string(),
                });
                None
            }
        }
    }

    fn first_usable<'t, S: BoundarySolid>(
        &self,
        candidate: &StructuralCandidate<'_, S>,
        tree: &'t GeometryTree<S>,
        placement: Option<Matrix4>,
    ) -> Option<(&'t S, Option<Matrix4>)> {
        for entry in tree.entries() {
            match entry {
                GeometryEntry::Solid(solid) => match solid.volume() {
                    Ok(volume) if volume > 0.0 => return Some((solid, placement)),
                    Ok(_) => {}
                    Err(err) => self.sink.record(&PenetrationError::GeometryQueryFailure {
                        element: candidate.element,
                        reason: err.to_string(),
                    }),
                },
                GeometryEntry::Instance(instance) => {
                    let nested = match placement {
                        Some(outer) => outer * instance.transform,
                        None => instance.transform,
                    };
                    if let Some(found) =
                        self.first_usable(candidate, &instance.geometry, Some(nested))
                    {
                        return Some(found);
                    }
                }
                GeometryEntry::Polyline(_) => {}
            }
        }
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{OperationError, Result};
    use crate::geometry::{Aabb, Centerline};
    use crate::math::Vector3;
    use crate::operations::query::FaceLineHits;
    use crate::penetration::brep::BrepSolid;
    use crate::penetration::capability::BoundaryFace;
    use crate::penetration::diagnostics::CollectingSink;
    use crate::penetration::model::{Category, ElementId, ElementRef};

    /// A solid that only knows its volume and a tag to tell instances apart.
    #[derive(Debug, Clone)]
    struct Tagged {
        tag: &'static str,
        volume: Option<f64>,
        offset: Vector3,
    }

    fn tagged(tag: &'static str, volume: f64) -> Tagged {
        Tagged {
            tag,
            volume: Some(volume),
            offset: Vector3::zeros(),
        }
    }

    struct NoFace;

    impl BoundaryFace for NoFace {
        fn intersect_with_line(&self, _line: &Centerline) -> Result<FaceLineHits> {
            Ok(FaceLineHits::disjoint())
        }
    }

    impl BoundarySolid for Tagged {
        type Face<'a> = NoFace;

        fn boundary_faces(&self) -> Result<Vec<NoFace>> {
            Ok(vec![])
        }

        fn volume(&self) -> Result<f64> {
            self.volume
                .ok_or_else(|| OperationError::Failed("volume unavailable".into()).into())
        }

        fn bounding_box(&self) -> Result<Aabb> {
            Ok(Aabb::from_point(Point3::from(self.offset)))
        }

        fn transformed(&self, matrix: &Matrix4) -> Result<Self> {
            let moved = crate::math::transform_point(matrix, &Point3::from(self.offset));
            Ok(Self {
                offset: moved.coords,
                ..self.clone()
            })
        }
    }

    fn candidate<'a, S>(
        geometry: &'a GeometryTree<S>,
        transform: Option<Matrix4>,
    ) -> StructuralCandidate<'a, S> {
        StructuralCandidate {
            element: ElementRef::host(ElementId(1)),
            category: Category::Wall,
            bounding_box: Aabb::from_point(Point3::origin()),
            transform,
            geometry,
        }
    }

    #[test]
    fn zero_volume_entry_is_passed_over() {
        let tree = GeometryTree::new()
            .with_solid(tagged("flat", 0.0))
            .with_solid(tagged("real", 5.0));
        let sink = CollectingSink::new();

        let solid = SolidResolver::new(&sink).resolve(&candidate(&tree, None)).unwrap();
        assert_eq!(solid.tag, "real");
        assert!(sink.is_empty());
    }

    #[test]
    fn negative_volume_is_never_selected() {
        let tree = GeometryTree::new()
            .with_solid(tagged("inverted", -3.0))
            .with_solid(tagged("flat", 0.0));
        let sink = CollectingSink::new();

        assert!(SolidResolver::new(&sink).resolve(&candidate(&tree, None)).is_none());
        assert!(matches!(
            sink.entries().as_slice(),
            [PenetrationError::MissingGeometry { .. }]
        ));
    }

    #[test]
    fn first_match_wins_over_larger_solid() {
        let tree = GeometryTree::new()
            .with_solid(tagged("small", 1.0))
            .with_solid(tagged("large", 100.0));
        let sink = CollectingSink::new();

        let solid = SolidResolver::new(&sink).resolve(&candidate(&tree, None)).unwrap();
        assert_eq!(solid.tag, "small");
    }

    #[test]
    fn instance_expanded_before_next_sibling() {
        let inner = GeometryTree::new()
            .with_polyline(vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)])
            .with_solid(tagged("nested", 2.0));
        let tree = GeometryTree::new()
            .with_solid(tagged("flat", 0.0))
            .with_instance(Matrix4::identity(), inner)
            .with_solid(tagged("sibling", 9.0));
        let sink = CollectingSink::new();

        let solid = SolidResolver::new(&sink).resolve(&candidate(&tree, None)).unwrap();
        assert_eq!(solid.tag, "nested");
    }

    #[test]
    fn placements_compose_with_link_transform() {
        let inner = GeometryTree::new().with_solid(tagged("nested", 2.0));
        let middle = GeometryTree::new()
            .with_instance(Matrix4::new_translation(&Vector3::new(0.0, 1.0, 0.0)), inner);
        let tree = GeometryTree::new()
            .with_instance(Matrix4::new_translation(&Vector3::new(10.0, 0.0, 0.0)), middle);
        let link = Matrix4::new_translation(&Vector3::new(0.0, 0.0, 100.0));
        let sink = CollectingSink::new();

        let solid = SolidResolver::new(&sink)
            .resolve(&candidate(&tree, Some(link)))
            .unwrap();
        assert!((solid.offset - Vector3::new(10.0, 1.0, 100.0)).norm() < 1e-12);
    }

    #[test]
    fn failing_volume_is_reported_and_skipped() {
        let broken = Tagged {
            tag: "broken",
            volume: None,
            offset: Vector3::zeros(),
        };
        let tree = GeometryTree::new()
            .with_solid(broken)
            .with_solid(tagged("real", 1.0));
        let sink = CollectingSink::new();

        let solid = SolidResolver::new(&sink).resolve(&candidate(&tree, None)).unwrap();
        assert_eq!(solid.tag, "real");
        assert!(matches!(
            sink.entries().as_slice(),
            [PenetrationError::GeometryQueryFailure { .. }]
        ));
    }

    #[test]
    fn empty_tree_is_missing_geometry() {
        let tree: GeometryTree<Tagged> = GeometryTree::new();
        let sink = CollectingSink::new();
        assert!(SolidResolver::new(&sink).resolve(&candidate(&tree, None)).is_none());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn linked_brep_solid_moves_into_host_space() {
        let wall = BrepSolid::from_box(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
            .unwrap();
        let tree = GeometryTree::new().with_solid(wall);
        let link = Matrix4::new_translation(&Vector3::new(0.0, 50.0, 0.0));
        let sink = CollectingSink::new();

        let solid = SolidResolver::new(&sink)
            .resolve(&candidate(&tree, Some(link)))
            .unwrap();
        let bb = solid.bounding_box().unwrap();
        assert!((bb.min.y - 50.0).abs() < 1e-10);
        assert!((bb.max.y - 51.0).abs() < 1e-10);
    }
}
