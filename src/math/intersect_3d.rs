use crate::geometry::surface::Plane;
use crate::geometry::Centerline;

use super::{Point3, TOLERANCE};

/// How a finite centerline meets an unbounded plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaneCrossing {
    /// Crosses the plane at distance `t` from the start, within the segment.
    At { point: Point3, t: f64 },
    /// The carrier line crosses the plane beyond one of the segment ends.
    Beyond,
    /// Parallel to the plane and off it.
    Parallel,
    /// Lies in the plane.
    InPlane,
}

/// Crosses `centerline` with `plane`.
///
/// A crossing within `TOLERANCE` of either end still counts as `At`.
#[must_use]
pub fn centerline_plane_crossing(centerline: &Centerline, plane: &Plane) -> PlaneCrossing {
    let start = centerline.start();
    let height = signed_distance_to_plane(start, plane);
    let rate = plane.plane_normal().dot(centerline.direction());

    if rate.abs() < TOLERANCE {
        return if height.abs() < TOLERANCE {
            PlaneCrossing::InPlane
        } else {
            PlaneCrossing::Parallel
        };
    }

    let t = -height / rate;
    if t < -TOLERANCE || t > centerline.length() + TOLERANCE {
        PlaneCrossing::Beyond
    } else {
        PlaneCrossing::At {
            point: centerline.point_at(t),
            t,
        }
    }
}

/// Signed distance from a point to a plane, positive on the normal side.
#[must_use]
pub fn signed_distance_to_plane(point: &Point3, plane: &Plane) -> f64 {
    plane.plane_normal().dot(&(point - plane.origin()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Vector3;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn floor_at(z: f64) -> Plane {
        Plane::from_normal(p(0.0, 0.0, z), Vector3::z()).unwrap()
    }

    #[test]
    fn vertical_riser_crosses_floor() {
        let riser = Centerline::new(p(2.0, 3.0, -1.0), p(2.0, 3.0, 4.0)).unwrap();
        let PlaneCrossing::At { point, t } = centerline_plane_crossing(&riser, &floor_at(3.0)) else {
            panic!("riser should cross the floor");
        };
        assert!((t - 4.0).abs() < TOLERANCE);
        assert!((point - p(2.0, 3.0, 3.0)).norm() < TOLERANCE);
    }

    #[test]
    fn sloped_run_measures_t_along_the_segment() {
        let run = Centerline::new(p(0.0, 0.0, -3.0), p(3.0, 3.0, 3.0)).unwrap();
        let PlaneCrossing::At { point, t } = centerline_plane_crossing(&run, &floor_at(0.0)) else {
            panic!("run should cross z = 0");
        };
        assert!((t - run.length() / 2.0).abs() < 1e-9);
        assert!(point.z.abs() < 1e-9);
    }

    #[test]
    fn short_segment_stops_before_plane() {
        let stub = Centerline::new(p(0.0, 0.0, 0.0), p(0.0, 0.0, 1.0)).unwrap();
        assert_eq!(centerline_plane_crossing(&stub, &floor_at(2.0)), PlaneCrossing::Beyond);
        assert_eq!(centerline_plane_crossing(&stub, &floor_at(-0.5)), PlaneCrossing::Beyond);
    }

    #[test]
    fn crossing_at_segment_end_counts() {
        let stub = Centerline::new(p(0.0, 0.0, 0.0), p(0.0, 0.0, 1.0)).unwrap();
        assert!(matches!(
            centerline_plane_crossing(&stub, &floor_at(1.0)),
            PlaneCrossing::At { .. }
        ));
    }

    #[test]
    fn horizontal_runs_are_parallel_or_in_plane() {
        let run = Centerline::new(p(0.0, 0.0, 2.0), p(10.0, 0.0, 2.0)).unwrap();
        assert_eq!(centerline_plane_crossing(&run, &floor_at(0.0)), PlaneCrossing::Parallel);
        assert_eq!(centerline_plane_crossing(&run, &floor_at(2.0)), PlaneCrossing::InPlane);
    }

    #[test]
    fn distance_sign_follows_normal() {
        let plane = floor_at(2.0);
        assert!((signed_distance_to_plane(&p(3.0, 1.0, 5.0), &plane) - 3.0).abs() < TOLERANCE);
        assert!((signed_distance_to_plane(&p(0.0, 0.0, 0.0), &plane) + 2.0).abs() < TOLERANCE);
    }
}
