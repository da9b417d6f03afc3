// roof attachment
// per-stand cantilever slabs with struts, and whole-venue roofs with a hole over the field

use bevy::prelude::*;
use std::f32::consts::TAU;

use crate::config::*;
use crate::systems::stadium::params::{RoofParams, StadiumParams};
use crate::systems::stadium::scene::{Paint, RoofAnchor, SceneNode, Shape};
use super::profile::StandProfile;
use super::stands::{StandInstance, StandLayout};
use super::utils::{align_y, ellipse_points};

/// Slab depth for a stand of the given profile depth.
pub fn coverage_depth(profile_depth: f32, roof: &RoofParams) -> f32 {
    (profile_depth * roof.individual_coverage_factor)
        .max(roof.individual_min_coverage)
        .min(roof.individual_max_coverage)
        .max(MIN_ROOF_COVERAGE_FLOOR)
}

/// Support strut between a ground anchor and the underside of the slab.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Strut {
    pub base: Vec3,
    pub attach: Vec3,
}

impl Strut {
    pub fn length(&self) -> f32 {
        self.base.distance(self.attach)
    }

    pub fn is_degenerate(&self) -> bool {
        self.length() < MIN_STRUT_LENGTH
    }

    /// Cylinder transform spanning the strut, Y along its direction.
    pub fn transform(&self) -> Transform {
        Transform::from_translation((self.base + self.attach) / 2.0)
            .with_rotation(align_y(self.attach - self.base))
    }
}

/// Slab placement in stand-local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlabPlacement {
    pub center: Vec3,
    pub rotation: Quat,
    pub size: Vec3,
}

impl SlabPlacement {
    // positive tilt lifts the pitch-side edge
    pub fn for_stand(profile: &StandProfile, length: f32, roof: &RoofParams) -> Self {
        let depth = coverage_depth(profile.depth, roof);
        let thickness = roof.individual_thickness;
        Self {
            center: Vec3::new(
                profile.depth - depth / 2.0,
                profile.height + roof.individual_height_offset + thickness / 2.0,
                length / 2.0,
            ),
            rotation: Quat::from_rotation_z(-roof.individual_tilt),
            size: Vec3::new(depth, thickness, length),
        }
    }
}

/// Evenly inset positions along the stand run, relative to its middle.
pub fn support_offsets(count: usize, length: f32) -> Vec<f32> {
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        n => {
            let inset = length * 0.1;
            let start = -length / 2.0 + inset;
            let end = length / 2.0 - inset;
            (0..n).map(|i| start + i as f32 * (end - start) / (n - 1) as f32).collect()
        }
    }
}

/// Struts for a slab, including ones too short to build.
pub fn roof_struts(slab: &SlabPlacement, count: usize) -> Vec<Strut> {
    let (depth, thickness, length) = (slab.size.x, slab.size.y, slab.size.z);
    support_offsets(count, length)
        .into_iter()
        .map(|z| {
            // straight below the untilted pitch-side edge
            let base = Vec3::new(slab.center.x - depth / 2.0, 0.0, slab.center.z + z);
            let attach = slab.rotation * Vec3::new(-depth / 2.0, -thickness / 2.0, z) + slab.center;
            Strut { base, attach }
        })
        .collect()
}

/// Roof assembly for one football stand, plus the anchor the scoreboard sits on.
pub fn individual_roof(stand: &StandInstance, roof: &RoofParams) -> (SceneNode, RoofAnchor) {
    let slab = SlabPlacement::for_stand(&stand.profile, stand.length, roof);

    let slab_paint = Paint::solid(roof.individual_color)
        .rough(0.7, 0.2)
        .translucent(0.9)
        .double_sided();
    let support_paint = Paint::solid(roof.support_color).rough(0.6, 0.4);

    let mut assembly = SceneNode::group(format!("{}StandRoofAssembly", stand.side.label())).with_child(
        SceneNode::mesh(Shape::Cuboid(slab.size), slab_paint)
            .named("RoofSlab")
            .with_transform(Transform::from_translation(slab.center).with_rotation(slab.rotation)),
    );

    for (i, strut) in roof_struts(&slab, roof.individual_num_supports).into_iter().enumerate() {
        if strut.is_degenerate() {
            debug!("{} roof strut {} too short ({:.3} m), skipped", stand.side.label(), i, strut.length());
            continue;
        }
        assembly.children.push(
            SceneNode::mesh(
                Shape::Cylinder {
                    radius: ROOF_SUPPORT_RADIUS,
                    height: strut.length(),
                },
                support_paint,
            )
            .named(format!("RoofSupport{i}"))
            .with_transform(strut.transform()),
        );
    }

    let anchor = RoofAnchor {
        slab_center_y: slab.center.y,
        thickness: slab.size.y,
    };
    (assembly, anchor)
}

fn rect_loop(half: Vec2) -> Vec<Vec2> {
    vec![
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ]
}

fn column(name: String, radius: f32, height: f32, at: Vec2, paint: Paint) -> SceneNode {
    SceneNode::mesh(Shape::Cylinder { radius, height }, paint)
        .named(name)
        .at(Vec3::new(at.x, height / 2.0, at.y))
}

/// Rectangular frame over all four football stands.
pub fn overall_football_roof(params: &StadiumParams, layout: &StandLayout) -> SceneNode {
    let roof = &params.roof;
    let (depth, height) = if layout.is_empty() {
        let back = params.stands.tiers[0].back_wall_height;
        let height = if back > 0.0 { back } else { FALLBACK_STAND_HEIGHT };
        (FALLBACK_STAND_DEPTH, height)
    } else {
        (layout.max_depth(), layout.max_height())
    };

    let reach = params.stands.offset_from_pitch + depth + roof.overall_overhang;
    let half_outer = Vec2::new(params.pitch.length / 2.0 + reach, params.pitch.width / 2.0 + reach);
    let half_hole = Vec2::new(params.pitch.length / 2.0, params.pitch.width / 2.0);
    let thickness = roof.individual_thickness;

    let paint = Paint::solid(roof.overall_color)
        .translucent(roof.overall_opacity)
        .double_sided();
    let support_paint = Paint::solid(roof.support_color);

    let slab = SceneNode::mesh(
        Shape::Slab {
            outer: rect_loop(half_outer),
            hole: rect_loop(half_hole),
            thickness,
        },
        paint,
    )
    .named("OverallStadiumRoof")
    .at(Vec3::new(0.0, height + thickness / 2.0, 0.0));

    let inset = half_outer - Vec2::splat(roof.overall_overhang);
    let corners = [
        Vec2::new(inset.x, inset.y),
        Vec2::new(-inset.x, inset.y),
        Vec2::new(inset.x, -inset.y),
        Vec2::new(-inset.x, -inset.y),
    ];

    SceneNode::group("OverallRoofAssembly")
        .with_child(slab)
        .with_children(corners.iter().enumerate().map(|(i, &c)| {
            column(format!("RoofColumn{i}"), OVERALL_ROOF_COLUMN_RADIUS, height, c, support_paint)
        }))
}

/// Elliptical ring over the cricket stands.
pub fn cricket_roof(params: &StadiumParams, profile: &StandProfile) -> SceneNode {
    let roof = &params.roof;
    let c = &params.cricket;
    let offset = params.stands.offset_from_boundary;

    let outer = Vec2::new(c.boundary_radius_x, c.boundary_radius_z)
        + Vec2::splat(offset + profile.depth + roof.cricket_outer_overhang);
    let inner = (Vec2::new(c.boundary_radius_x, c.boundary_radius_z) - Vec2::splat(roof.cricket_inner_overhang))
        .max(Vec2::ZERO);
    let to_loop = |radii: Vec2| -> Vec<Vec2> {
        let mut pts: Vec<Vec2> = ellipse_points(radii, CRICKET_ROOF_SEGMENTS, 0.0)
            .into_iter()
            .map(|p| Vec2::new(p.x, p.z))
            .collect();
        pts.pop();
        pts
    };

    let height = profile.height + roof.cricket_height_offset;
    let thickness = roof.cricket_thickness;
    let paint = Paint::solid(roof.cricket_color)
        .translucent(roof.cricket_opacity)
        .double_sided();
    let support_paint = Paint::solid(roof.support_color);

    let slab = SceneNode::mesh(
        Shape::Slab {
            outer: to_loop(outer),
            hole: to_loop(inner),
            thickness,
        },
        paint,
    )
    .named("CricketOverallRoof")
    .at(Vec3::new(0.0, height + thickness / 2.0, 0.0));

    let ring = outer - Vec2::splat(roof.cricket_outer_overhang / 2.0);
    let n = roof.cricket_num_supports;
    let columns = (0..n).map(|i| {
        let a = i as f32 / n as f32 * TAU;
        column(
            format!("RoofColumn{i}"),
            roof.cricket_support_radius,
            height,
            Vec2::new(a.cos() * ring.x, a.sin() * ring.y),
            support_paint,
        )
    });

    SceneNode::group("CricketRoofAssembly").with_child(slab).with_children(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::stadium::geometry::stands::football_layout;

    fn profile(depth: f32, height: f32) -> StandProfile {
        StandProfile {
            outline: Vec::new(),
            depth,
            height,
            tiers: Vec::new(),
        }
    }

    #[test]
    fn coverage_is_clamped() {
        let roof = RoofParams::default();
        assert_eq!(coverage_depth(20.0, &roof), 15.0);
        assert_eq!(coverage_depth(2.0, &roof), roof.individual_min_coverage);
        assert_eq!(coverage_depth(100.0, &roof), roof.individual_max_coverage);

        let tiny = RoofParams {
            individual_min_coverage: 0.0,
            ..default()
        };
        assert_eq!(coverage_depth(0.0, &tiny), MIN_ROOF_COVERAGE_FLOOR);
    }

    #[test]
    fn flat_roof_struts_are_vertical() {
        let roof = RoofParams {
            individual_tilt: 0.0,
            ..default()
        };
        let slab = SlabPlacement::for_stand(&profile(20.0, 10.0), 60.0, &roof);
        let struts = roof_struts(&slab, 2);
        assert_eq!(struts.len(), 2);
        for s in &struts {
            assert!((s.attach.x - s.base.x).abs() < 1e-4);
            assert!((s.attach.z - s.base.z).abs() < 1e-4);
            // stand top + height offset
            assert!((s.length() - 12.0).abs() < 1e-4);
        }
    }

    #[test]
    fn tilt_lengthens_struts() {
        let flat = RoofParams {
            individual_tilt: 0.0,
            ..default()
        };
        let tilted = RoofParams::default();
        let p = profile(20.0, 10.0);
        let a = roof_struts(&SlabPlacement::for_stand(&p, 60.0, &flat), 1)[0];
        let b = roof_struts(&SlabPlacement::for_stand(&p, 60.0, &tilted), 1)[0];
        assert!(b.length() > a.length());
    }

    #[test]
    fn short_struts_are_dropped() {
        let roof = RoofParams {
            individual_tilt: 0.0,
            individual_height_offset: 0.0,
            individual_thickness: 0.0,
            ..default()
        };
        let mut stand = football_layout(&StadiumParams::default()).iter().next().cloned().unwrap();
        stand.profile = profile(20.0, 0.05);
        let (assembly, _) = individual_roof(&stand, &roof);
        // only the slab is left
        assert_eq!(assembly.children.len(), 1);
        assert_eq!(assembly.children[0].name.as_deref(), Some("RoofSlab"));
    }

    #[test]
    fn support_spacing() {
        assert_eq!(support_offsets(1, 50.0), vec![0.0]);
        assert_eq!(support_offsets(2, 50.0), vec![-20.0, 20.0]);
        assert_eq!(support_offsets(3, 50.0), vec![-20.0, 0.0, 20.0]);
        assert!(support_offsets(0, 50.0).is_empty());
    }

    #[test]
    fn strut_transform_spans_its_endpoints() {
        let s = Strut {
            base: Vec3::ZERO,
            attach: Vec3::new(1.0, 4.0, 0.0),
        };
        let t = s.transform();
        let top = t.transform_point(Vec3::new(0.0, s.length() / 2.0, 0.0));
        assert!(top.distance(s.attach) < 1e-4);
    }

    #[test]
    fn overall_roof_sits_on_the_tallest_stand() {
        let params = StadiumParams::default();
        let layout = football_layout(&params);
        let node = overall_football_roof(&params, &layout);
        let slab = node.find("OverallStadiumRoof").unwrap();
        let t = params.roof.individual_thickness;
        assert!((slab.transform.translation.y - (layout.max_height() + t / 2.0)).abs() < 1e-4);
        assert_eq!(node.children.len(), 5);
    }

    #[test]
    fn overall_roof_without_stands_uses_fallback_extent() {
        let params = StadiumParams::default();
        let node = overall_football_roof(&params, &StandLayout::default());
        let column = node.find("RoofColumn0").unwrap();
        let back = params.stands.tiers[0].back_wall_height;
        assert!((column.transform.translation.y - back / 2.0).abs() < 1e-4);
        let expected_x = params.pitch.length / 2.0 + params.stands.offset_from_pitch + FALLBACK_STAND_DEPTH;
        assert!((column.transform.translation.x - expected_x).abs() < 1e-3);
    }

    #[test]
    fn cricket_roof_columns_ring_the_stands() {
        let params = StadiumParams::default();
        let p = profile(30.0, 20.0);
        let node = cricket_roof(&params, &p);
        assert_eq!(node.children.len(), 1 + params.roof.cricket_num_supports);
        let col = node.find("RoofColumn0").unwrap();
        let expected = params.cricket.boundary_radius_x + params.stands.offset_from_boundary + 30.0
            + params.roof.cricket_outer_overhang / 2.0;
        assert!((col.transform.translation.x - expected).abs() < 1e-3);
    }
}
