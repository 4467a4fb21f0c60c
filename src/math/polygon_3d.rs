use crate::geometry::surface::Plane;

use super::{Point3, TOLERANCE};

/// Projects a 3D point onto the UV coordinate system of a plane.
#[must_use]
fn project_to_uv(point: &Point3, plane: &Plane) -> (f64, f64) {
    let diff = point - plane.origin();
    (diff.dot(plane.u_dir()), diff.dot(plane.v_dir()))
}

/// Point-in-polygon test for a 3D point coplanar with the polygon.
///
/// Projects to the plane's UV space and uses the winding number. Points on
/// the polygon boundary (within [`TOLERANCE`]) count as inside, so a line
/// grazing the shared edge of two faces is reported by both.
#[must_use]
pub fn point_in_polygon_3d(point: &Point3, polygon: &[Point3], plane: &Plane) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let (px, py) = project_to_uv(point, plane);
    let uvs: Vec<(f64, f64)> = polygon.iter().map(|p| project_to_uv(p, plane)).collect();

    on_boundary_2d(px, py, &uvs) || winding_number_2d(px, py, &uvs) != 0
}

/// Like [`point_in_polygon_3d`] but boundary points count as outside.
#[must_use]
pub fn point_strictly_in_polygon_3d(point: &Point3, polygon: &[Point3], plane: &Plane) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let (px, py) = project_to_uv(point, plane);
    let uvs: Vec<(f64, f64)> = polygon.iter().map(|p| project_to_uv(p, plane)).collect();

    !on_boundary_2d(px, py, &uvs) && winding_number_2d(px, py, &uvs) != 0
}

fn on_boundary_2d(px: f64, py: f64, verts: &[(f64, f64)]) -> bool {
    let n = verts.len();
    (0..n).any(|i| {
        let (x0, y0) = verts[i];
        let (x1, y1) = verts[(i + 1) % n];
        let (ex, ey) = (x1 - x0, y1 - y0);
        let len_sq = ex * ex + ey * ey;
        if len_sq < TOLERANCE * TOLERANCE {
            return (px - x0).hypot(py - y0) < TOLERANCE;
        }
        let s = (((px - x0) * ex + (py - y0) * ey) / len_sq).clamp(0.0, 1.0);
        (px - (x0 + s * ex)).hypot(py - (y0 + s * ey)) < TOLERANCE
    })
}

/// Winding number of point `(px, py)` with respect to polygon `verts`.
///
/// Non-zero => inside, zero => outside.
fn winding_number_2d(px: f64, py: f64, verts: &[(f64, f64)]) -> i32 {
    let n = verts.len();
    let mut winding = 0i32;
    for i in 0..n {
        let (x0, y0) = verts[i];
        let (x1, y1) = verts[(i + 1) % n];
        let side = cross_2d(x1 - x0, y1 - y0, px - x0, py - y0);

        if y0 <= py {
            if y1 > py && side > 0.0 {
                winding += 1;
            }
        } else if y1 <= py && side < 0.0 {
            winding -= 1;
        }
    }
    winding
}

#[inline]
fn cross_2d(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    ax * by - ay * bx
}

/// Clips a segment lying in `plane` against a polygon in the same plane.
///
/// Returns the inside portions as `(t_start, t_end)` pairs, `t` running over
/// `[0, 1]` from `seg_start` to `seg_end`. Non-convex polygons may yield
/// several pieces.
#[must_use]
pub fn clip_segment_to_polygon(
    seg_start: &Point3,
    seg_end: &Point3,
    polygon: &[Point3],
    plane: &Plane,
) -> Vec<(f64, f64)> {
    if polygon.len() < 3 {
        return Vec::new();
    }

    let (su, sv) = project_to_uv(seg_start, plane);
    let (eu, ev) = project_to_uv(seg_end, plane);
    let (du, dv) = (eu - su, ev - sv);
    let uvs: Vec<(f64, f64)> = polygon.iter().map(|p| project_to_uv(p, plane)).collect();

    let mut cuts = vec![0.0, 1.0];
    for i in 0..uvs.len() {
        let (ex0, ey0) = uvs[i];
        let (ex1, ey1) = uvs[(i + 1) % uvs.len()];
        let (edx, edy) = (ex1 - ex0, ey1 - ey0);

        let denom = cross_2d(du, dv, edx, edy);
        if denom.abs() < TOLERANCE {
            continue;
        }

        let (dx, dy) = (ex0 - su, ey0 - sv);
        let t = cross_2d(dx, dy, edx, edy) / denom;
        let s = cross_2d(dx, dy, du, dv) / denom;
        if (-TOLERANCE..=1.0 + TOLERANCE).contains(&t) && (-TOLERANCE..=1.0 + TOLERANCE).contains(&s)
        {
            cuts.push(t.clamp(0.0, 1.0));
        }
    }

    cuts.sort_by(f64::total_cmp);
    cuts.dedup_by(|a, b| (*a - *b).abs() < TOLERANCE);

    let mut pieces: Vec<(f64, f64)> = Vec::new();
    for win in cuts.windows(2) {
        let (t0, t1) = (win[0], win[1]);
        let mid = (t0 + t1) * 0.5;
        if winding_number_2d(su + du * mid, sv + dv * mid, &uvs) == 0 {
            continue;
        }
        match pieces.last_mut() {
            Some(last) if (t0 - last.1).abs() < TOLERANCE => last.1 = t1,
            _ => pieces.push((t0, t1)),
        }
    }

    pieces
}

/// Compute the 3D point along a segment at parameter `t`.
#[must_use]
pub fn segment_point_at(start: &Point3, end: &Point3, t: f64) -> Point3 {
    start + (end - start) * t
}
