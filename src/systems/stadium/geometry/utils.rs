// UTILS

use bevy::prelude::*;
use std::f32::consts::TAU;

/// Point on an axis-aligned ellipse in the XZ plane.
pub fn ellipse_point(radii: Vec2, angle: f32, y: f32) -> Vec3 {
    Vec3::new(radii.x * angle.cos(), y, radii.y * angle.sin())
}

/// Samples a closed ellipse, `segments + 1` points with the last equal to the first.
pub fn ellipse_points(radii: Vec2, segments: usize, y: f32) -> Vec<Vec3> {
    (0..=segments)
        .map(|i| ellipse_point(radii, i as f32 / segments as f32 * TAU, y))
        .collect()
}

/// Yaw that turns local +Z from `from` toward `to`, ignoring height.
pub fn yaw_facing(from: Vec3, to: Vec3) -> f32 {
    (to.x - from.x).atan2(to.z - from.z)
}

/// Yaw that turns local +X along the direction `from -> to` in the XZ plane.
pub fn yaw_along(from: Vec3, to: Vec3) -> f32 {
    (-(to.z - from.z)).atan2(to.x - from.x)
}

/// Rotation taking +Y onto `dir`.
pub fn align_y(dir: Vec3) -> Quat {
    Quat::from_rotation_arc(Vec3::Y, dir.normalize_or(Vec3::Y))
}

/// Computes the signed area of a polygon
/// # Returns the polygon's area as an `f32`, positive for counter-clockwise winding.
/// Returns 0.0 for polygons with fewer than 3 vertices.
pub fn polygon_area(polygon: &[Vec2]) -> f32 {
    if polygon.len() < 3 {
        return 0.0;
    }

    let n = polygon.len();
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += polygon[i].x * polygon[j].y - polygon[j].x * polygon[i].y;
    }
    area / 2.0
}

/// Earcut triangulation of an outline with optional holes.
/// # Returns the vertices (outline first, then each hole in order) and triangle indices into them.
/// Outlines with fewer than 3 points give no triangles.
pub fn triangulate(outline: &[Vec2], holes: &[&[Vec2]]) -> (Vec<Vec2>, Vec<u32>) {
    let mut vertices = outline.to_vec();
    let mut hole_starts = Vec::with_capacity(holes.len());
    for hole in holes.iter().filter(|h| h.len() >= 3) {
        hole_starts.push(vertices.len());
        vertices.extend_from_slice(hole);
    }
    if outline.len() < 3 {
        return (vertices, Vec::new());
    }

    let flat: Vec<f64> = vertices.iter().flat_map(|v| [v.x as f64, v.y as f64]).collect();
    match earcutr::earcut(&flat, &hole_starts, 2) {
        Ok(idx) => {
            let idx = idx.into_iter().map(|i| i as u32).collect();
            (vertices, idx)
        }
        Err(e) => {
            warn!("outline could not be triangulated: {:?}", e);
            (vertices, Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_sign_follows_winding() {
        let square = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        assert_eq!(polygon_area(&square), 1.0);
        let mut reversed = square.to_vec();
        reversed.reverse();
        assert_eq!(polygon_area(&reversed), -1.0);
    }

    // summed unsigned area of the triangles
    fn covered(vertices: &[Vec2], tris: &[u32]) -> f32 {
        tris.chunks_exact(3)
            .map(|t| polygon_area(&[vertices[t[0] as usize], vertices[t[1] as usize], vertices[t[2] as usize]]).abs())
            .sum()
    }

    #[test]
    fn triangulates_a_stepped_profile() {
        // L shape, one reflex corner
        let l = [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let (vertices, tris) = triangulate(&l, &[]);
        assert_eq!(vertices.len(), 6);
        assert_eq!(tris.len(), 12);
        assert!((covered(&vertices, &tris) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn hole_is_left_uncovered() {
        let outer = [Vec2::ZERO, Vec2::new(4.0, 0.0), Vec2::new(4.0, 4.0), Vec2::new(0.0, 4.0)];
        // five-sided hole, vertex counts differ from the outline
        let hole = [
            Vec2::new(1.0, 1.0),
            Vec2::new(2.0, 0.8),
            Vec2::new(3.0, 1.0),
            Vec2::new(3.0, 3.0),
            Vec2::new(1.0, 3.0),
        ];
        let (vertices, tris) = triangulate(&outer, &[&hole[..]]);
        assert_eq!(vertices.len(), 9);
        let expected = 16.0 - polygon_area(&hole).abs();
        assert!((covered(&vertices, &tris) - expected).abs() < 1e-4);
    }

    #[test]
    fn degenerate_outlines_give_nothing() {
        assert!(triangulate(&[Vec2::ZERO, Vec2::X], &[]).1.is_empty());
        // all on one line
        let line = [Vec2::ZERO, Vec2::X, Vec2::new(2.0, 0.0)];
        let (vertices, tris) = triangulate(&line, &[]);
        assert!(covered(&vertices, &tris) < 1e-6);
    }

    #[test]
    fn yaw_helpers_point_the_right_way() {
        // +Z rotated by yaw_facing ends up toward the target
        let yaw = yaw_facing(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0));
        let z = Quat::from_rotation_y(yaw) * Vec3::Z;
        assert!((z - Vec3::X).length() < 1e-5);

        let yaw = yaw_along(Vec3::ZERO, Vec3::new(0.0, 0.0, 3.0));
        let x = Quat::from_rotation_y(yaw) * Vec3::X;
        assert!((x - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn ellipse_loop_closes() {
        let pts = ellipse_points(Vec2::new(3.0, 2.0), 16, 0.5);
        assert_eq!(pts.len(), 17);
        assert!(pts[0].distance(pts[16]) < 1e-5);
        assert_eq!(pts[0], Vec3::new(3.0, 0.5, 0.0));
    }
}
