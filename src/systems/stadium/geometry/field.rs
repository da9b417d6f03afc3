// playing surfaces and markings

use bevy::prelude::*;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::config::*;
use crate::systems::stadium::params::StadiumParams;
use crate::systems::stadium::scene::{Paint, SceneNode, Shape, TextureRef};
use super::utils::{ellipse_points, yaw_along};

const WHITE: [u8; 3] = [0xFF, 0xFF, 0xFF];
const GOAL_COLOR: [u8; 3] = [0xEE, 0xEE, 0xEE];
const FLAG_POLE_COLOR: [u8; 3] = [0x33, 0x33, 0x33];
const FLAG_COLOR: [u8; 3] = [0xFF, 0x00, 0x00];
const WICKET_COLOR: [u8; 3] = [0xCD, 0xA6, 0x80];

const CENTRE_CIRCLE_SEGMENTS: usize = 32;
const CORNER_ARC_SEGMENTS: usize = 16;
const FLAG_POLE_RADIUS: f32 = 0.05;
const ROPE_RADIAL_SEGMENTS: usize = 12;

fn line(size: Vec3, at: Vec3, paint: Paint) -> SceneNode {
    SceneNode::mesh(Shape::Cuboid(size), paint).at(at).without_shadows()
}

fn arc(center: Vec2, radius: f32, from: f32, to: f32, segments: usize, y: f32) -> Vec<Vec3> {
    (0..=segments)
        .map(|i| {
            let a = from + (to - from) * i as f32 / segments as f32;
            Vec3::new(center.x + a.cos() * radius, y, center.y + a.sin() * radius)
        })
        .collect()
}

/// Striped pitch, line markings, goals, corner flags and arcs.
pub fn football_field(params: &StadiumParams) -> SceneNode {
    let p = &params.pitch;
    let (len, wid, lw) = (p.length, p.width, p.line_width);
    let (half_l, half_w) = (len / 2.0, wid / 2.0);
    let line_y = lw / 2.0 + 0.001;
    let curve_y = 0.01 + lw / 2.0;

    let line_paint = Paint::solid(WHITE).double_sided();
    let mut field = SceneNode::group("FootballFieldGroup");

    field.children.push(
        SceneNode::mesh(
            Shape::Ground(Vec2::new(len, wid)),
            Paint::solid(WHITE)
                .double_sided()
                .textured(TextureRef::PitchStripes, Vec2::ONE),
        )
        .named("Pitch")
        .without_shadows(),
    );

    // touchlines, goal lines, halfway line
    let mut lines = SceneNode::group("PitchLines").with_children([
        line(Vec3::new(len, lw, lw), Vec3::new(0.0, line_y, half_w), line_paint),
        line(Vec3::new(len, lw, lw), Vec3::new(0.0, line_y, -half_w), line_paint),
        line(Vec3::new(lw, lw, wid), Vec3::new(half_l, line_y, 0.0), line_paint),
        line(Vec3::new(lw, lw, wid), Vec3::new(-half_l, line_y, 0.0), line_paint),
        line(Vec3::new(lw, lw, wid), Vec3::new(0.0, line_y, 0.0), line_paint),
    ]);

    // penalty and goal boxes at both ends
    for (box_len, box_wid) in [(PENALTY_AREA_LENGTH, PENALTY_AREA_WIDTH), (GOAL_AREA_LENGTH, GOAL_AREA_WIDTH)] {
        for end in [1.0_f32, -1.0] {
            let side_x = end * (half_l - box_len / 2.0);
            lines.children.extend([
                line(Vec3::new(box_len, lw, lw), Vec3::new(side_x, line_y, box_wid / 2.0), line_paint),
                line(Vec3::new(box_len, lw, lw), Vec3::new(side_x, line_y, -box_wid / 2.0), line_paint),
                line(Vec3::new(lw, lw, box_wid), Vec3::new(end * (half_l - box_len), line_y, 0.0), line_paint),
            ]);
        }
    }
    field.children.push(lines);

    let mut circle = arc(Vec2::ZERO, CENTER_CIRCLE_RADIUS, 0.0, TAU, CENTRE_CIRCLE_SEGMENTS, curve_y);
    circle.pop();
    field.children.push(
        SceneNode::mesh(Shape::Polyline { points: circle, closed: true }, Paint::solid(WHITE)).named("CentreCircle"),
    );

    let goal_paint = Paint::solid(GOAL_COLOR);
    for (i, end) in [1.0_f32, -1.0].into_iter().enumerate() {
        let x = end * (half_l + GOAL_POST_RADIUS);
        let post = Shape::Cylinder {
            radius: GOAL_POST_RADIUS,
            height: GOAL_HEIGHT,
        };
        field.children.push(
            SceneNode::group(format!("Goal{i}")).with_children([
                SceneNode::mesh(post.clone(), goal_paint).at(Vec3::new(x, GOAL_HEIGHT / 2.0, GOAL_WIDTH / 2.0)),
                SceneNode::mesh(post, goal_paint).at(Vec3::new(x, GOAL_HEIGHT / 2.0, -GOAL_WIDTH / 2.0)),
                SceneNode::mesh(
                    Shape::Cylinder {
                        radius: GOAL_POST_RADIUS,
                        height: GOAL_WIDTH,
                    },
                    goal_paint,
                )
                .at(Vec3::new(x, GOAL_HEIGHT, 0.0))
                .rotated(Quat::from_rotation_x(FRAC_PI_2)),
            ]),
        );
    }

    let corners = [
        (Vec2::new(half_l, half_w), 0.0, PI, 1.5 * PI),
        (Vec2::new(half_l, -half_w), FRAC_PI_2, FRAC_PI_2, PI),
        (Vec2::new(-half_l, -half_w), PI, 0.0, FRAC_PI_2),
        (Vec2::new(-half_l, half_w), -FRAC_PI_2, 1.5 * PI, TAU),
    ];
    let flag = Shape::Triangle([
        Vec2::ZERO,
        Vec2::new(CORNER_FLAG_WIDTH, CORNER_FLAG_HEIGHT / 2.0),
        Vec2::new(0.0, CORNER_FLAG_HEIGHT),
    ]);
    for (i, (corner, flag_yaw, arc_from, arc_to)) in corners.into_iter().enumerate() {
        field.children.push(
            SceneNode::group(format!("CornerFlag{i}")).with_children([
                SceneNode::mesh(
                    Shape::Cylinder {
                        radius: FLAG_POLE_RADIUS,
                        height: CORNER_FLAG_POLE_HEIGHT,
                    },
                    Paint::solid(FLAG_POLE_COLOR),
                )
                .at(Vec3::new(corner.x, CORNER_FLAG_POLE_HEIGHT / 2.0 + 0.01, corner.y)),
                SceneNode::mesh(flag.clone(), Paint::solid(FLAG_COLOR).double_sided())
                    .at(Vec3::new(corner.x, CORNER_FLAG_POLE_HEIGHT - CORNER_FLAG_HEIGHT / 2.0 + 0.01, corner.y))
                    .rotated(Quat::from_rotation_y(flag_yaw)),
            ]),
        );
        field.children.push(
            SceneNode::mesh(
                Shape::Polyline {
                    points: arc(corner, CORNER_ARC_RADIUS, arc_from, arc_to, CORNER_ARC_SEGMENTS, curve_y),
                    closed: false,
                },
                Paint::solid(WHITE),
            )
            .named(format!("CornerArc{i}")),
        );
    }

    field
}

/// Dash segments around the fielding circle, as (start, end) pairs.
pub fn circle_dashes(radii: Vec2, dashes: usize, y: f32) -> Vec<(Vec3, Vec3)> {
    let pts = ellipse_points(radii, dashes * 2, y);
    pts.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect()
}

/// Outfield, wicket strip, creases, fielding circle and boundary rope.
pub fn cricket_field(params: &StadiumParams) -> SceneNode {
    let c = &params.cricket;
    let boundary = Vec2::new(c.boundary_radius_x, c.boundary_radius_z);
    let lw = c.crease_line_width;
    let half_l = c.wicket_length / 2.0;
    let half_w = c.wicket_width / 2.0;

    let mut field = SceneNode::group("CricketFieldGroup").with_children([
        SceneNode::mesh(
            Shape::Ellipse {
                radii: boundary + Vec2::splat(CRICKET_OUTFIELD_MARGIN),
                segments: CRICKET_BOUNDARY_SEGMENTS,
            },
            Paint::solid(c.outfield_color).rough(0.8, 0.0).double_sided(),
        )
        .named("Outfield")
        .without_shadows(),
        SceneNode::mesh(
            Shape::Ground(Vec2::new(c.wicket_length, c.wicket_width)),
            Paint::solid(WICKET_COLOR).rough(0.7, 0.0),
        )
        .named("WicketArea")
        .at(Vec3::new(0.0, 0.01, 0.0))
        .without_shadows(),
    ]);

    // lines are boxes: X run, crease thickness, Z run
    let crease_paint = Paint::solid(WHITE).glowing(0.2);
    let crease_y = 0.02 + lw / 2.0;
    let popping = c.wicket_width.max(CRICKET_MIN_POPPING_CREASE);
    let mut creases = SceneNode::group("Creases");
    for end in [1.0_f32, -1.0] {
        creases.children.extend([
            line(Vec3::new(lw, lw, popping), Vec3::new(end * half_l, crease_y, 0.0), crease_paint),
            line(
                Vec3::new(lw, lw, c.wicket_width),
                Vec3::new(end * (half_l - CRICKET_BOWLING_CREASE_INSET), crease_y, 0.0),
                crease_paint,
            ),
        ]);
        // return creases run along the pitch from the bowling crease
        let return_x = end * (half_l + CRICKET_RETURN_CREASE_LENGTH / 2.0 - CRICKET_BOWLING_CREASE_INSET);
        for z in [half_w, -half_w] {
            creases.children.push(line(
                Vec3::new(CRICKET_RETURN_CREASE_LENGTH, lw, lw),
                Vec3::new(return_x, crease_y, z),
                crease_paint,
            ));
        }
    }
    field.children.push(creases);

    let t = c.circle_line_thickness;
    let circle_paint = Paint::solid(c.circle_color).glowing(0.2);
    let dashes = circle_dashes(Vec2::new(c.circle_radius_x, c.circle_radius_z), CRICKET_30_YARD_DASHES, 0.025)
        .into_iter()
        .map(|(a, b)| {
            SceneNode::mesh(Shape::Cuboid(Vec3::new(a.distance(b), t, t)), circle_paint)
                .with_transform(
                    Transform::from_translation((a + b) / 2.0 + Vec3::Y * (t / 2.0))
                        .with_rotation(Quat::from_rotation_y(yaw_along(a, b))),
                )
                .without_shadows()
        });
    field.children.push(SceneNode::group("ThirtyYardCircle").with_children(dashes));

    let mut rope_path = ellipse_points(boundary, CRICKET_BOUNDARY_SEGMENTS, c.rope_radius + 0.01);
    rope_path.pop();
    field.children.push(
        SceneNode::mesh(
            Shape::Tube {
                path: rope_path,
                radius: c.rope_radius,
                radial_segments: ROPE_RADIAL_SEGMENTS,
            },
            Paint::solid(c.rope_color).rough(0.5, 0.1),
        )
        .named("BoundaryRope"),
    );

    field
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn football_markings_are_complete() {
        let field = football_field(&StadiumParams::default());
        let lines = field.find("PitchLines").unwrap();
        // 5 main lines + 2 boxes * 2 ends * 3 lines
        assert_eq!(lines.children.len(), 17);
        assert!(field.find("Goal0").is_some());
        assert!(field.find("Goal1").is_some());
        for i in 0..4 {
            assert!(field.find(&format!("CornerFlag{i}")).is_some());
            assert!(field.find(&format!("CornerArc{i}")).is_some());
        }
    }

    #[test]
    fn corner_arcs_curl_into_the_pitch() {
        let params = StadiumParams::default();
        let field = football_field(&params);
        for i in 0..4 {
            let arc = field.find(&format!("CornerArc{i}")).unwrap();
            let Some(crate::systems::stadium::scene::Visual::Mesh {
                shape: Shape::Polyline { points, .. },
                ..
            }) = &arc.visual
            else {
                panic!("arc is not a polyline");
            };
            let mid = points[points.len() / 2];
            assert!(mid.x.abs() < params.pitch.length / 2.0);
            assert!(mid.z.abs() < params.pitch.width / 2.0);
        }
    }

    #[test]
    fn goals_stand_on_the_goal_lines() {
        let params = StadiumParams::default();
        let field = football_field(&params);
        let goal = field.find("Goal0").unwrap();
        let post = goal.children[0].transform.translation;
        assert!((post.x - (params.pitch.length / 2.0 + GOAL_POST_RADIUS)).abs() < 1e-4);
        assert!((post.z - GOAL_WIDTH / 2.0).abs() < 1e-4);
        let bar = &goal.children[2];
        // crossbar spans Z
        assert!((bar.transform.rotation * Vec3::Y).z.abs() > 0.99);
    }

    #[test]
    fn fielding_circle_has_64_dashes() {
        let dashes = circle_dashes(Vec2::splat(CRICKET_30_YARD_RADIUS), CRICKET_30_YARD_DASHES, 0.0);
        assert_eq!(dashes.len(), 64);
        for (a, b) in &dashes {
            assert!((a.length() - CRICKET_30_YARD_RADIUS).abs() < 1e-3);
            assert!(a.distance(*b) > 0.0);
        }
    }

    #[test]
    fn dashes_follow_the_curve() {
        let field = cricket_field(&StadiumParams::default());
        let circle = field.find("ThirtyYardCircle").unwrap();
        for dash in &circle.children {
            let pos = dash.transform.translation;
            let along = dash.transform.rotation * Vec3::X;
            let radial = Vec3::new(pos.x, 0.0, pos.z).normalize();
            assert!(along.dot(radial).abs() < 0.1);
        }
    }

    #[test]
    fn cricket_field_parts() {
        let params = StadiumParams::default();
        let field = cricket_field(&params);
        assert!(field.find("Outfield").is_some());
        assert!(field.find("WicketArea").is_some());
        assert!(field.find("BoundaryRope").is_some());
        // 2 ends * (popping + bowling + 2 return)
        assert_eq!(field.find("Creases").unwrap().children.len(), 8);
    }
}
