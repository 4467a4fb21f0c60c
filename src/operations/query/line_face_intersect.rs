use crate::error::Result;
use crate::geometry::Centerline;
use crate::math::intersect_3d::{centerline_plane_crossing, PlaneCrossing};
use crate::math::polygon_3d::{
    clip_segment_to_polygon, point_in_polygon_3d, point_strictly_in_polygon_3d, segment_point_at,
};
use crate::math::Point3;
use crate::topology::{FaceId, FaceSurface, TopologyStore};

/// How a centerline meets a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceOverlap {
    /// No common point within the segment.
    Disjoint,
    /// The segment pierces the face at an isolated point.
    Crossing,
    /// The segment lies in the face plane and overlaps the face region.
    Coplanar,
}

/// Points where a centerline meets a face, with the overlap classification.
///
/// For [`FaceOverlap::Coplanar`] the points are the endpoints of every
/// sub-segment lying on the face.
#[derive(Debug, Clone)]
pub struct FaceLineHits {
    pub overlap: FaceOverlap,
    pub points: Vec<Point3>,
}

impl FaceLineHits {
    /// A result with no common points.
    #[must_use]
    pub fn disjoint() -> Self {
        Self {
            overlap: FaceOverlap::Disjoint,
            points: Vec::new(),
        }
    }
}

/// Intersects a finite centerline with a bounded planar face.
pub struct LineFaceIntersect<'a> {
    centerline: &'a Centerline,
}

impl<'a> LineFaceIntersect<'a> {
    /// Creates a new intersection query.
    #[must_use]
    pub fn new(centerline: &'a Centerline) -> Self {
        Self { centerline }
    }

    /// Executes the query against one face of the store.
    ///
    /// Holes (inner wires) exclude their interior; a hit on a hole's boundary
    /// still counts as a hit on the face.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or any of its wires is missing.
    pub fn execute(&self, store: &TopologyStore, face_id: FaceId) -> Result<FaceLineHits> {
        let face = store.face(face_id)?;
        let FaceSurface::Plane(plane) = &face.surface;
        let outer = store.wire_points(face.outer_wire)?;
        let holes = face
            .inner_wires
            .iter()
            .map(|&w| store.wire_points(w))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let start = self.centerline.start();
        match centerline_plane_crossing(self.centerline, plane) {
            PlaneCrossing::Parallel | PlaneCrossing::Beyond => Ok(FaceLineHits::disjoint()),
            PlaneCrossing::At { point, .. } => {
                let on_face = point_in_polygon_3d(&point, &outer, plane)
                    && !holes
                        .iter()
                        .any(|hole| point_strictly_in_polygon_3d(&point, hole, plane));
                if on_face {
                    Ok(FaceLineHits {
                        overlap: FaceOverlap::Crossing,
                        points: vec![point],
                    })
                } else {
                    Ok(FaceLineHits::disjoint())
                }
            }
            PlaneCrossing::InPlane => {
                let end = self.centerline.end();
                let pieces = clip_segment_to_polygon(start, &end, &outer, plane);
                if pieces.is_empty() {
                    return Ok(FaceLineHits::disjoint());
                }
                let points = pieces
                    .iter()
                    .flat_map(|&(t0, t1)| {
                        [
                            segment_point_at(start, &end, t0),
                            segment_point_at(start, &end, t1),
                        ]
                    })
                    .collect();
                Ok(FaceLineHits {
                    overlap: FaceOverlap::Coplanar,
                    points,
                })
            }
        }
    }
}
