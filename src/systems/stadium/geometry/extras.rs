// ad hoardings and scoreboards

use bevy::prelude::*;
use std::f32::consts::{FRAC_PI_2, PI};

use crate::config::*;
use crate::systems::stadium::params::{ExtrasParams, StadiumParams};
use crate::systems::stadium::scene::{Paint, SceneNode, Shape, TextureRef};
use super::stands::{StandHandle, StandLayout};
use super::utils::ellipse_points;

/// Horizontal texture repeat that keeps the banner image undistorted.
pub fn banner_repeat(width: f32, height: f32, aspect: f32) -> f32 {
    if height <= 0.0 || aspect <= 0.0 {
        return 1.0;
    }
    width / (height * aspect) * 2.0
}

/// Four panels facing the pitch, just outside the touchlines and goal lines.
/// `upload_aspect` is the width / height of an uploaded banner, if one is active.
pub fn football_ads(params: &StadiumParams, upload_aspect: Option<f32>) -> SceneNode {
    let e = &params.extras;
    let (l, w) = (params.pitch.length, params.pitch.width);
    let h = e.ad_height;
    let off = e.ad_offset_from_pitch;
    let aspect = upload_aspect.unwrap_or(AD_PLACEHOLDER_ASPECT);
    let y = h / 2.0 + 0.01;

    let panels = [
        (l, Vec3::new(0.0, y, -w / 2.0 - off), 0.0),
        (l, Vec3::new(0.0, y, w / 2.0 + off), PI),
        (w, Vec3::new(l / 2.0 + off, y, 0.0), -FRAC_PI_2),
        (w, Vec3::new(-l / 2.0 - off, y, 0.0), FRAC_PI_2),
    ];

    SceneNode::group("AdHoardings").with_children(panels.into_iter().enumerate().map(|(i, (width, at, yaw))| {
        let paint = Paint::solid([0xFF, 0xFF, 0xFF])
            .textured(
                TextureRef::AdBanner(e.ad_color),
                Vec2::new(banner_repeat(width, h, aspect), 1.0),
            )
            .glowing(e.ad_emissive_intensity)
            .double_sided();
        SceneNode::mesh(Shape::Rect(Vec2::new(width, h)), paint)
            .named(format!("AdHoarding{i}"))
            .at(at)
            .rotated(Quat::from_rotation_y(yaw))
            .without_shadows()
    }))
}

/// One continuous ribbon just outside the boundary rope.
pub fn cricket_ads(params: &StadiumParams, upload_aspect: Option<f32>) -> SceneNode {
    let e = &params.extras;
    let c = &params.cricket;
    let radii = Vec2::new(c.boundary_radius_x, c.boundary_radius_z) + Vec2::splat(e.cricket_ad_radius_offset);
    let mut path = ellipse_points(radii, CRICKET_AD_PATH_SEGMENTS, 0.0);
    let perimeter: f32 = path.windows(2).map(|w| w[0].distance(w[1])).sum();
    path.pop();

    let paint = match upload_aspect {
        Some(aspect) => Paint::solid([0xFF, 0xFF, 0xFF]).textured(
            TextureRef::AdBanner(e.ad_color),
            Vec2::new(banner_repeat(perimeter, e.cricket_ad_height, aspect) / 2.0, 1.0),
        ),
        None => Paint::solid(e.ad_color),
    }
    .rough(0.8, 0.0)
    .glowing(e.ad_emissive_intensity)
    .double_sided();

    SceneNode::group("CricketAdHoardings").with_child(
        SceneNode::mesh(
            Shape::Band {
                path,
                height: e.cricket_ad_height,
            },
            paint,
        )
        .named("AdRibbon")
        .without_shadows(),
    )
}

/// Rotation pointing local +Z from `from` at `to`.
/// Built from yaw then pitch only, so the board never rolls.
pub fn upright_facing(from: Vec3, to: Vec3) -> Quat {
    let dir = to - from;
    let flat = Vec2::new(dir.x, dir.z).length();
    let yaw = dir.x.atan2(dir.z);
    let pitch = -dir.y.atan2(flat);
    Quat::from_rotation_y(yaw) * Quat::from_rotation_x(pitch)
}

/// Vertical centre of the main scoreboard assembly in stand-local space.
pub fn scoreboard_center_y(roof_top: f32, e: &ExtrasParams) -> f32 {
    roof_top + e.scoreboard_offset_y_from_roof + e.scoreboard_support_height
        + (e.scoreboard_height + e.scoreboard_frame_thickness) / 2.0
}

fn board(width: f32, height: f32, frame: f32, frame_paint: Paint, screen_paint: Paint, frame_z: f32, screen_z: f32) -> [SceneNode; 2] {
    [
        SceneNode::mesh(Shape::Cuboid(Vec3::new(width + frame, height + frame, frame)), frame_paint)
            .named("ScoreboardFrame")
            .at(Vec3::new(0.0, 0.0, frame_z)),
        SceneNode::mesh(Shape::Rect(Vec2::new(width, height)), screen_paint)
            .named("ScoreboardScreen")
            .at(Vec3::new(0.0, 0.0, screen_z))
            .without_shadows(),
    ]
}

/// Scoreboard on top of a stand, in that stand's local frame.
pub fn main_scoreboard(params: &StadiumParams, layout: &StandLayout, handle: StandHandle) -> SceneNode {
    let e = &params.extras;
    let stand = layout.get(handle);

    let roof_top = stand.roof.map(|r| r.top()).unwrap_or(stand.profile.height);
    let center = Vec3::new(
        stand.profile.depth * SCOREBOARD_DEPTH_ON_ROOF + e.scoreboard_offset_depth_on_roof,
        scoreboard_center_y(roof_top, e),
        stand.length / 2.0 + e.scoreboard_offset_z_along_stand,
    );

    // field centre at the board's own height, brought into stand space
    let world = stand.transform.transform_point(center);
    let target = stand
        .transform
        .compute_affine()
        .inverse()
        .transform_point3(Vec3::new(0.0, world.y, 0.0));

    let total_height = e.scoreboard_height + e.scoreboard_frame_thickness;
    let t = e.scoreboard_frame_thickness;
    let support_paint = Paint::solid(e.scoreboard_support_color).rough(0.5, 0.5);
    let support = Shape::Cylinder {
        radius: SCOREBOARD_SUPPORT_RADIUS,
        height: e.scoreboard_support_height,
    };
    let leg_x = e.scoreboard_width * SCOREBOARD_SUPPORT_SPREAD / 2.0;
    let leg_y = -total_height / 2.0 - e.scoreboard_support_height / 2.0;

    SceneNode::group(format!("MainScoreboardOn{}", stand.group_name()))
        .with_transform(Transform::from_translation(center).with_rotation(upright_facing(center, target)))
        .with_children(board(
            e.scoreboard_width,
            e.scoreboard_height,
            t,
            Paint::solid(e.scoreboard_frame_color).rough(0.5, 0.4),
            Paint::solid(e.scoreboard_screen_color)
                .rough(0.6, 0.05)
                .glowing(e.scoreboard_emissive_intensity),
            0.0,
            t / 2.0 + 0.01,
        ))
        .with_children([
            SceneNode::mesh(support.clone(), support_paint).at(Vec3::new(-leg_x, leg_y, 0.0)),
            SceneNode::mesh(support, support_paint).at(Vec3::new(leg_x, leg_y, 0.0)),
        ])
}

/// Free-standing cricket scoreboard at a fixed world position.
pub fn cricket_scoreboard(params: &StadiumParams) -> SceneNode {
    let e = &params.extras;
    let [x, y, z] = e.cricket_scoreboard_position;
    let t = e.scoreboard_frame_thickness;

    SceneNode::group("CricketScoreboard")
        .at(Vec3::new(x, y + e.cricket_scoreboard_height / 2.0, z))
        .rotated(Quat::from_rotation_y(e.cricket_scoreboard_yaw))
        .with_children(board(
            e.cricket_scoreboard_width,
            e.cricket_scoreboard_height,
            t,
            Paint::solid(e.scoreboard_frame_color).rough(0.6, 0.4),
            Paint::solid(e.cricket_scoreboard_screen_color)
                .rough(1.0, 0.2)
                .glowing(e.cricket_scoreboard_emissive_intensity),
            -t / 2.0,
            0.01,
        ))
}
