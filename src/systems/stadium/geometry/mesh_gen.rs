use bevy::prelude::*;
use bevy::prelude::MeshBuilder as _;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use std::f32::consts::TAU;

use crate::systems::stadium::scene::Shape;
use super::utils::{polygon_area, triangulate};

fn empty_mesh(topology: PrimitiveTopology) -> Mesh {
    Mesh::new(topology, RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD)
}

// collects flat-shaded triangles, winding follows the requested normal
#[derive(Default)]
struct MeshBuilder {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    fn tri(&mut self, mut p: [Vec3; 3], mut n: [Vec3; 3], mut uv: [Vec2; 3]) {
        let facing = (n[0] + n[1] + n[2]).normalize_or_zero();
        if (p[1] - p[0]).cross(p[2] - p[0]).dot(facing) < 0.0 {
            p.swap(1, 2);
            n.swap(1, 2);
            uv.swap(1, 2);
        }
        let base = self.positions.len() as u32;
        for i in 0..3 {
            self.positions.push(p[i].to_array());
            self.normals.push(n[i].to_array());
            self.uvs.push(uv[i].to_array());
        }
        self.indices.extend([base, base + 1, base + 2]);
    }

    // corners in ring order
    fn quad(&mut self, p: [Vec3; 4], n: [Vec3; 4], uv: [Vec2; 4]) {
        self.tri([p[0], p[1], p[2]], [n[0], n[1], n[2]], [uv[0], uv[1], uv[2]]);
        self.tri([p[0], p[2], p[3]], [n[0], n[2], n[3]], [uv[0], uv[2], uv[3]]);
    }

    fn flat_quad(&mut self, p: [Vec3; 4], normal: Vec3, uv: [Vec2; 4]) {
        self.quad(p, [normal; 4], uv);
    }

    fn build(self) -> Mesh {
        let mut mesh = empty_mesh(PrimitiveTopology::TriangleList);
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs);
        mesh.insert_indices(Indices::U32(self.indices));
        mesh
    }
}

fn open_loop(points: &[Vec2]) -> Vec<Vec2> {
    let mut pts = points.to_vec();
    while pts.len() > 1 && pts[0].distance_squared(pts[pts.len() - 1]) < 1e-10 {
        pts.pop();
    }
    pts
}

// build the stand body: caps from the earcut outline, then one wall per edge
fn extrude_profile(outline: &[Vec2], depth: f32) -> Mesh {
    let outline = open_loop(outline);
    if outline.len() < 3 || depth <= 0.0 {
        return empty_mesh(PrimitiveTopology::TriangleList);
    }

    let mut b = MeshBuilder::default();
    let at = |v: Vec2, z: f32| Vec3::new(v.x, v.y, z);
    let (min, max) = outline
        .iter()
        .fold((Vec2::MAX, Vec2::MIN), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    let span = (max - min).max(Vec2::splat(1e-6));
    let cap_uv = |v: Vec2| (v - min) / span;

    let (vertices, tris) = triangulate(&outline, &[]);
    for t in tris.chunks_exact(3) {
        let v = [vertices[t[0] as usize], vertices[t[1] as usize], vertices[t[2] as usize]];
        let uv = [cap_uv(v[0]), cap_uv(v[1]), cap_uv(v[2])];
        b.tri([at(v[0], 0.0), at(v[1], 0.0), at(v[2], 0.0)], [Vec3::NEG_Z; 3], uv);
        b.tri([at(v[0], depth), at(v[1], depth), at(v[2], depth)], [Vec3::Z; 3], uv);
    }

    let winding = if polygon_area(&outline) >= 0.0 { 1.0 } else { -1.0 };
    for i in 0..outline.len() {
        let v1 = outline[i];
        let v2 = outline[(i + 1) % outline.len()];
        let edge = v2 - v1;
        let len = edge.length();
        if len < 1e-6 {
            continue;
        }
        let n = Vec2::new(edge.y, -edge.x) / len * winding;
        b.flat_quad(
            [at(v1, 0.0), at(v2, 0.0), at(v2, depth), at(v1, depth)],
            Vec3::new(n.x, n.y, 0.0),
            [Vec2::ZERO, Vec2::new(len, 0.0), Vec2::new(len, depth), Vec2::new(0.0, depth)],
        );
    }
    b.build()
}

// walls along one closed loop; `solid_inside` is true for the outer boundary
fn loop_walls(b: &mut MeshBuilder, ring: &[Vec2], half: f32, solid_inside: bool) {
    let winding = if polygon_area(ring) >= 0.0 { 1.0 } else { -1.0 };
    let facing = if solid_inside { winding } else { -winding };
    let at = |v: Vec2, y: f32| Vec3::new(v.x, y, v.y);
    for i in 0..ring.len() {
        let (a, c) = (ring[i], ring[(i + 1) % ring.len()]);
        let edge = c - a;
        let len = edge.length();
        if len < 1e-6 {
            continue;
        }
        let n = Vec2::new(edge.y, -edge.x) / len * facing;
        b.flat_quad(
            [at(a, -half), at(c, -half), at(c, half), at(a, half)],
            Vec3::new(n.x, 0.0, n.y),
            [Vec2::ZERO, Vec2::new(len, 0.0), Vec2::new(len, half * 2.0), Vec2::new(0.0, half * 2.0)],
        );
    }
}

// flat plate in the XZ plane with one opening
fn slab_with_hole(outer: &[Vec2], hole: &[Vec2], thickness: f32) -> Mesh {
    let (outer, hole) = (open_loop(outer), open_loop(hole));
    if outer.len() < 3 {
        return empty_mesh(PrimitiveTopology::TriangleList);
    }

    let mut b = MeshBuilder::default();
    let half = thickness / 2.0;
    let at = |v: Vec2, y: f32| Vec3::new(v.x, y, v.y);
    let extent = outer.iter().fold(1e-6_f32, |m, v| m.max(v.x.abs()).max(v.y.abs()));
    let uv = |v: Vec2| (v / extent + Vec2::ONE) / 2.0;

    let (vertices, tris) = triangulate(&outer, &[hole.as_slice()]);
    for t in tris.chunks_exact(3) {
        let v = [vertices[t[0] as usize], vertices[t[1] as usize], vertices[t[2] as usize]];
        let uvs = [uv(v[0]), uv(v[1]), uv(v[2])];
        b.tri([at(v[0], half), at(v[1], half), at(v[2], half)], [Vec3::Y; 3], uvs);
        b.tri([at(v[0], -half), at(v[1], -half), at(v[2], -half)], [Vec3::NEG_Y; 3], uvs);
    }

    if thickness > 0.0 {
        loop_walls(&mut b, &outer, half, true);
        if hole.len() >= 3 {
            loop_walls(&mut b, &hole, half, false);
        }
    }
    b.build()
}

fn ellipse_disc(radii: Vec2, segments: usize) -> Mesh {
    let segments = segments.max(3);
    let mut b = MeshBuilder::default();
    let point = |i: usize| {
        let a = i as f32 / segments as f32 * TAU;
        Vec2::new(a.cos(), a.sin())
    };
    for i in 0..segments {
        let (u1, u2) = (point(i), point(i + 1));
        b.tri(
            [
                Vec3::ZERO,
                Vec3::new(u1.x * radii.x, 0.0, u1.y * radii.y),
                Vec3::new(u2.x * radii.x, 0.0, u2.y * radii.y),
            ],
            [Vec3::Y; 3],
            [Vec2::splat(0.5), (u1 + Vec2::ONE) / 2.0, (u2 + Vec2::ONE) / 2.0],
        );
    }
    b.build()
}

// circular cross-section swept around a closed path
fn tube(path: &[Vec3], radius: f32, radial_segments: usize) -> Mesh {
    let n = path.len();
    if n < 3 || radius <= 0.0 {
        return empty_mesh(PrimitiveTopology::TriangleList);
    }
    let radial = radial_segments.max(3);

    let rings: Vec<Vec<(Vec3, Vec3)>> = (0..n)
        .map(|i| {
            let tangent = (path[(i + 1) % n] - path[(i + n - 1) % n]).normalize_or(Vec3::X);
            let side = tangent.cross(Vec3::Y).normalize_or(Vec3::Z);
            (0..=radial)
                .map(|k| {
                    let a = k as f32 / radial as f32 * TAU;
                    let dir = side * a.cos() + Vec3::Y * a.sin();
                    (path[i] + dir * radius, dir)
                })
                .collect()
        })
        .collect();

    let mut b = MeshBuilder::default();
    for i in 0..n {
        let (r1, r2) = (&rings[i], &rings[(i + 1) % n]);
        let (v1, v2) = (i as f32 / n as f32, (i + 1) as f32 / n as f32);
        for k in 0..radial {
            let (u1, u2) = (k as f32 / radial as f32, (k + 1) as f32 / radial as f32);
            b.quad(
                [r1[k].0, r2[k].0, r2[k + 1].0, r1[k + 1].0],
                [r1[k].1, r2[k].1, r2[k + 1].1, r1[k + 1].1],
                [Vec2::new(u1, v1), Vec2::new(u1, v2), Vec2::new(u2, v2), Vec2::new(u2, v1)],
            );
        }
    }
    b.build()
}

// upright ribbon, faces inward; image v runs top to bottom
fn band(path: &[Vec3], height: f32) -> Mesh {
    let n = path.len();
    if n < 2 || height <= 0.0 {
        return empty_mesh(PrimitiveTopology::TriangleList);
    }
    let mut b = MeshBuilder::default();
    for i in 0..n {
        let (p1, p2) = (path[i], path[(i + 1) % n]);
        let mid = (p1 + p2) / 2.0;
        let edge = p2 - p1;
        let mut inward = Vec3::new(edge.z, 0.0, -edge.x).normalize_or_zero();
        if inward.dot(Vec3::new(-mid.x, 0.0, -mid.z)) < 0.0 {
            inward = -inward;
        }
        let (u1, u2) = (i as f32 / n as f32, (i + 1) as f32 / n as f32);
        let up = Vec3::Y * height;
        b.flat_quad(
            [p1, p2, p2 + up, p1 + up],
            inward,
            [Vec2::new(u1, 1.0), Vec2::new(u2, 1.0), Vec2::new(u2, 0.0), Vec2::new(u1, 0.0)],
        );
    }
    b.build()
}

fn polyline(points: &[Vec3], closed: bool) -> Mesh {
    let mut positions: Vec<[f32; 3]> = points.iter().map(|p| p.to_array()).collect();
    if closed {
        if let Some(first) = positions.first().copied() {
            positions.push(first);
        }
    }
    let count = positions.len();
    let mut mesh = empty_mesh(PrimitiveTopology::LineStrip);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, vec![[0.0, 1.0, 0.0]; count]);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, vec![[0.0, 0.0]; count]);
    mesh
}

/// Renderable mesh for a scene shape.
pub fn shape_to_mesh(shape: &Shape) -> Mesh {
    match shape {
        Shape::Cuboid(size) => Cuboid::new(size.x, size.y, size.z).into(),
        Shape::Cylinder { radius, height } => Cylinder::new(*radius, *height).into(),
        Shape::Rect(size) => Rectangle::new(size.x, size.y).into(),
        Shape::Ground(size) => Plane3d::default().mesh().size(size.x, size.y).build(),
        Shape::Profile { outline, depth } => extrude_profile(outline, *depth),
        Shape::Slab { outer, hole, thickness } => slab_with_hole(outer, hole, *thickness),
        Shape::Ellipse { radii, segments } => ellipse_disc(*radii, *segments),
        Shape::Tube { path, radius, radial_segments } => tube(path, *radius, *radial_segments),
        Shape::Band { path, height } => band(path, *height),
        Shape::Triangle(v) => {
            let mut b = MeshBuilder::default();
            b.tri(
                [v[0].extend(0.0), v[1].extend(0.0), v[2].extend(0.0)],
                [Vec3::Z; 3],
                [Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.5), Vec2::ZERO],
            );
            b.build()
        }
        Shape::Polyline { points, closed } => polyline(points, *closed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;
    use crate::systems::stadium::geometry::profile::build_profile;
    use crate::systems::stadium::params::StandParams;

    fn positions(mesh: &Mesh) -> Vec<Vec3> {
        match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
            Some(VertexAttributeValues::Float32x3(v)) => v.iter().map(|p| Vec3::from_array(*p)).collect(),
            _ => Vec::new(),
        }
    }

    // every triangle's winding agrees with its stored normal
    fn assert_consistent_winding(mesh: &Mesh) {
        let pos = positions(mesh);
        let Some(VertexAttributeValues::Float32x3(normals)) = mesh.attribute(Mesh::ATTRIBUTE_NORMAL) else {
            panic!("missing normals");
        };
        let Some(Indices::U32(idx)) = mesh.indices() else {
            panic!("missing indices");
        };
        for t in idx.chunks_exact(3) {
            let (a, b, c) = (pos[t[0] as usize], pos[t[1] as usize], pos[t[2] as usize]);
            let face = (b - a).cross(c - a);
            let n = Vec3::from_array(normals[t[0] as usize]);
            assert!(face.dot(n) >= -1e-6);
        }
    }

    #[test]
    fn stand_extrusion_covers_the_profile() {
        let profile = build_profile(StandParams::default().active_tiers());
        let mesh = extrude_profile(&profile.outline, 60.0);
        let pos = positions(&mesh);
        assert!(!pos.is_empty());

        let max = pos.iter().fold(Vec3::MIN, |m, p| m.max(*p));
        let min = pos.iter().fold(Vec3::MAX, |m, p| m.min(*p));
        assert!((max.x - profile.depth).abs() < 1e-3);
        assert!((max.y - profile.height).abs() < 1e-3);
        assert!((max.z - 60.0).abs() < 1e-4);
        assert!(min.x.abs() < 1e-4 && min.y.abs() < 1e-4 && min.z.abs() < 1e-4);
        assert_consistent_winding(&mesh);
    }

    #[test]
    fn walls_point_outward() {
        // clockwise square, as the stand outline is wound
        let square = [Vec2::ZERO, Vec2::new(0.0, 1.0), Vec2::ONE, Vec2::new(1.0, 0.0), Vec2::ZERO];
        let mesh = extrude_profile(&square, 1.0);
        let pos = positions(&mesh);
        let Some(VertexAttributeValues::Float32x3(normals)) = mesh.attribute(Mesh::ATTRIBUTE_NORMAL) else {
            panic!("missing normals");
        };
        let centre = Vec3::new(0.5, 0.5, 0.5);
        for (p, n) in pos.iter().zip(normals) {
            assert!((*p - centre).dot(Vec3::from_array(*n)) > 0.0);
        }
    }

    #[test]
    fn slab_leaves_the_hole_open() {
        let outer = vec![Vec2::new(-10.0, -10.0), Vec2::new(10.0, -10.0), Vec2::new(10.0, 10.0), Vec2::new(-10.0, 10.0)];
        let hole: Vec<Vec2> = outer.iter().map(|v| *v * 0.5).collect();
        let mesh = slab_with_hole(&outer, &hole, 1.0);
        assert_consistent_winding(&mesh);
        let Some(Indices::U32(idx)) = mesh.indices() else {
            panic!("missing indices");
        };
        let pos = positions(&mesh);
        for t in idx.chunks_exact(3) {
            let c = (pos[t[0] as usize] + pos[t[1] as usize] + pos[t[2] as usize]) / 3.0;
            // nothing inside the hole
            assert!(c.x.abs() >= 5.0 - 1e-4 || c.z.abs() >= 5.0 - 1e-4);
        }
    }

    #[test]
    fn slab_hole_may_have_its_own_vertex_count() {
        let outer = vec![Vec2::new(-10.0, -10.0), Vec2::new(10.0, -10.0), Vec2::new(10.0, 10.0), Vec2::new(-10.0, 10.0)];
        let hole: Vec<Vec2> = (0..8)
            .map(|i| {
                let a = i as f32 / 8.0 * TAU;
                Vec2::new(a.cos(), a.sin()) * 5.0
            })
            .collect();
        let mesh = slab_with_hole(&outer, &hole, 1.0);
        assert_consistent_winding(&mesh);

        let pos = positions(&mesh);
        let Some(VertexAttributeValues::Float32x3(normals)) = mesh.attribute(Mesh::ATTRIBUTE_NORMAL) else {
            panic!("missing normals");
        };
        // top face area is the plate minus the opening
        let top: f32 = pos
            .chunks_exact(3)
            .zip(normals.chunks_exact(3))
            .filter(|(_, n)| n[0][1] > 0.5)
            .map(|(t, _)| (t[1] - t[0]).cross(t[2] - t[0]).length() / 2.0)
            .sum();
        let expected = 400.0 - polygon_area(&hole).abs();
        assert!((top - expected).abs() < 1e-2);

        // inner walls face into the opening
        for (p, n) in pos.iter().zip(normals) {
            let n = Vec3::from_array(*n);
            if n.y.abs() < 0.5 && Vec2::new(p.x, p.z).length() < 6.0 {
                assert!(n.dot(Vec3::new(p.x, 0.0, p.z)) < 0.0);
            }
        }
    }

    #[test]
    fn band_and_tube_are_well_formed() {
        let path: Vec<Vec3> = (0..32)
            .map(|i| {
                let a = i as f32 / 32.0 * TAU;
                Vec3::new(a.cos() * 20.0, 0.0, a.sin() * 10.0)
            })
            .collect();
        let ribbon = band(&path, 2.0);
        assert_eq!(positions(&ribbon).len(), 32 * 6);
        assert_consistent_winding(&ribbon);

        let rope = tube(&path, 0.15, 12);
        assert_eq!(positions(&rope).len(), 32 * 12 * 6);
    }

    #[test]
    fn closed_polyline_repeats_its_start() {
        let pts = vec![Vec3::ZERO, Vec3::X, Vec3::Z];
        let mesh = polyline(&pts, true);
        let pos = positions(&mesh);
        assert_eq!(pos.len(), 4);
        assert_eq!(pos[0], pos[3]);
        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::LineStrip);
    }
}
