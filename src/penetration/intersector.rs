//! Centerline against solid boundary, reduced to one placement record.

use rayon::prelude::*;
use tracing::{debug, instrument, trace};

use crate::error::{PenetrationError, Result};
use crate::geometry::{Aabb, Centerline};
use crate::math::Point3;

use super::capability::{BoundaryFace, BoundarySolid};
use super::collector::StructuralCandidate;
use super::diagnostics::DiagnosticSink;
use super::model::ElementRef;
use super::resolver::SolidResolver;

/// Where a conduit passes through one structural element.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntersectionRecord {
    pub element: ElementRef,
    /// Bounds of the element's resolved solid, in host coordinates.
    pub bounding_box: Aabb,
    /// Midpoint of the entry and exit points.
    pub point: Point3,
}

/// Reduces intersection points to one representative point.
///
/// One point is returned unchanged. With more, the midpoint of the farthest
/// apart pair is taken; ties go to the first pair found.
#[must_use]
pub fn representative_point(points: &[Point3]) -> Option<Point3> {
    match points {
        [] => None,
        [only] => Some(*only),
        _ => {
            let mut best = (0, 1);
            let mut best_dist = f64::NEG_INFINITY;
            for i in 0..points.len() {
                for j in (i + 1)..points.len() {
                    let d = (points[j] - points[i]).norm_squared();
                    if d > best_dist {
                        best_dist = d;
                        best = (i, j);
                    }
                }
            }
            Some(nalgebra::center(&points[best.0], &points[best.1]))
        }
    }
}

/// Tests centerlines against resolved solids.
///
/// Failures for a single solid are reported to the sink and treated as "no
/// record"; they never abort a batch.
pub struct LineSolidIntersector<'s> {
    sink: &'s dyn DiagnosticSink,
}

impl<'s> LineSolidIntersector<'s> {
    #[must_use]
    pub fn new(sink: &'s dyn DiagnosticSink) -> Self {
        Self { sink }
    }

    /// Intersects `centerline` with `solid`, which must already be in the
    /// centerline's coordinate space.
    pub fn intersect<S: BoundarySolid>(
        &self,
        element: ElementRef,
        solid: &S,
        centerline: &Centerline,
    ) -> Option<IntersectionRecord> {
        match Self::try_intersect(element, solid, centerline) {
            Ok(record) => record,
            Err(err) => {
                self.sink.record(&PenetrationError::GeometryQueryFailure {
                    element,
                    reason: err.to_string(),
                });
                None
            }
        }
    }

    fn try_intersect<S: BoundarySolid>(
        element: ElementRef,
        solid: &S,
        centerline: &Centerline,
    ) -> Result<Option<IntersectionRecord>> {
        let mut points = Vec::new();
        for face in solid.boundary_faces()? {
            points.extend(face.intersect_with_line(centerline)?.points);
        }
        let Some(point) = representative_point(&points) else {
            return Ok(None);
        };
        trace!(%element, hits = points.len(), "centerline meets solid");
        Ok(Some(IntersectionRecord {
            element,
            bounding_box: solid.bounding_box()?,
            point,
        }))
    }

    /// Resolves each candidate's solid and intersects it with `centerline`.
    ///
    /// Records come back in candidate order. A missing centerline or an empty
    /// candidate list is reported as `DegenerateInput` and gives no records.
    #[instrument(skip_all, fields(candidates = candidates.len()))]
    pub fn intersect_candidates<S: BoundarySolid>(
        &self,
        centerline: Option<&Centerline>,
        candidates: &[&StructuralCandidate<'_, S>],
    ) -> Vec<IntersectionRecord> {
        let Some(centerline) = self.check_inputs(centerline, candidates.len()) else {
            return Vec::new();
        };
        let resolver = SolidResolver::new(self.sink);
        let records: Vec<_> = candidates
            .iter()
            .filter_map(|c| self.intersect_candidate(&resolver, c, centerline))
            .collect();
        debug!(records = records.len(), "intersected candidates");
        records
    }

    /// Same as [`intersect_candidates`](Self::intersect_candidates), with the
    /// per-candidate work spread over the rayon pool.
    #[instrument(skip_all, fields(candidates = candidates.len()))]
    pub fn par_intersect_candidates<S>(
        &self,
        centerline: Option<&Centerline>,
        candidates: &[&StructuralCandidate<'_, S>],
    ) -> Vec<IntersectionRecord>
    where
        S: BoundarySolid + Sync,
    {
        let Some(centerline) = self.check_inputs(centerline, candidates.len()) else {
            return Vec::new();
        };
        let resolver = SolidResolver::new(self.sink);
        let records: Vec<_> = candidates
            .par_iter()
            .filter_map(|c| self.intersect_candidate(&resolver, c, centerline))
            .collect();
        debug!(records = records.len(), "intersected candidates");
        records
    }

    fn check_inputs<'c>(
        &self,
        centerline: Option<&'c Centerline>,
        candidates: usize,
    ) -> Option<&'c Centerline> {
        let Some(centerline) = centerline else {
            self.sink
                .record(&PenetrationError::DegenerateInput("conduit has no centerline"));
            return None;
        };
        if candidates == 0 {
            self.sink
                .record(&PenetrationError::DegenerateInput("empty candidate set"));
            return None;
        }
        Some(centerline)
    }

    fn intersect_candidate<S: BoundarySolid>(
        &self,
        resolver: &SolidResolver<'_>,
        candidate: &StructuralCandidate<'_, S>,
        centerline: &Centerline,
    ) -> Option<IntersectionRecord> {
        let solid = resolver.resolve(candidate)?;
        self.intersect(candidate.element, &solid, centerline)
    }
}
