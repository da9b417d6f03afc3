// floodlight towers

use bevy::prelude::*;
use std::f32::consts::TAU;

use crate::config::*;
use crate::systems::stadium::params::{Sport, StadiumParams, TimeOfDay};
use crate::systems::stadium::scene::{Paint, SceneNode, Shape, SpotFixture};

const HOUSING_SIZE: Vec3 = Vec3::new(1.5, 0.8, 1.2);

// rough stand depth from the first tier only, keeps towers clear of the seating
fn estimated_stand_depth(params: &StadiumParams) -> f32 {
    let t = &params.stands.tiers[0];
    if t.num_rows > 0 {
        t.num_rows as f32 * t.row_step_depth + t.walkway_at_top_depth
    } else {
        FALLBACK_STAND_DEPTH
    }
}

/// Ground positions of every tower for the current sport.
pub fn tower_positions(params: &StadiumParams) -> Vec<Vec3> {
    let est = estimated_stand_depth(params);
    match params.sport {
        Sport::Football => {
            let reach = params.stands.offset_from_pitch + est * 0.5 + FOOTBALL_TOWER_MARGIN;
            let x = params.pitch.length / 2.0 + reach;
            let z = params.pitch.width / 2.0 + reach;
            vec![
                Vec3::new(x, 0.0, z),
                Vec3::new(-x, 0.0, z),
                Vec3::new(-x, 0.0, -z),
                Vec3::new(x, 0.0, -z),
            ]
        }
        Sport::Cricket => {
            let c = &params.cricket;
            let extra = params.stands.offset_from_boundary + est + CRICKET_TOWER_MARGIN;
            let ring = Vec2::new(c.boundary_radius_x + extra, c.boundary_radius_z + extra);
            let n = params.floodlights.cricket_towers;
            (0..n)
                .map(|i| {
                    let a = i as f32 / n as f32 * TAU;
                    Vec3::new(ring.x * a.cos(), 0.0, ring.y * a.sin())
                })
                .collect()
        }
    }
}

/// Spot intensity for the current time of day.
pub fn spot_intensity(params: &StadiumParams) -> f32 {
    let f = &params.floodlights;
    match f.time_of_day {
        TimeOfDay::Night if f.on_at_night => f.spot_intensity,
        _ => f.spot_intensity * DAYTIME_FLOODLIGHT_FACTOR,
    }
}

/// Lamp offsets across the head of a tower.
pub fn lamp_offsets(count: usize) -> Vec<f32> {
    let start = -((count as f32 - 1.0) * FLOODLIGHT_SPACING) / 2.0;
    (0..count).map(|i| start + i as f32 * FLOODLIGHT_SPACING).collect()
}

/// Towers aimed at the field centre, each with a row of lamps.
/// Only the first lamp of a tower may cast shadows, and only up to the venue cap.
pub fn floodlight_towers(params: &StadiumParams) -> SceneNode {
    let f = &params.floodlights;
    let h = f.tower_height;
    let paint = Paint::solid(f.tower_color);
    let intensity = spot_intensity(params);
    let mut shadow_casters = 0;

    let towers = tower_positions(params).into_iter().enumerate().map(|(n, pos)| {
        // tower -Z looks at the centre
        let frame = Transform::from_translation(pos).looking_at(Vec3::ZERO, Vec3::Y);
        let to_local = frame.compute_affine().inverse();
        let aim = to_local.transform_point3(Vec3::ZERO);

        let mut tower = SceneNode::group(format!("FloodlightTower{}", n + 1))
            .with_transform(frame)
            .with_child(
                SceneNode::mesh(
                    Shape::Cylinder {
                        radius: FLOODLIGHT_POLE_RADIUS,
                        height: h,
                    },
                    paint,
                )
                .at(Vec3::new(0.0, h / 2.0, 0.0)),
            );

        for (i, x) in lamp_offsets(f.lights_per_tower).into_iter().enumerate() {
            tower.children.push(SceneNode::mesh(Shape::Cuboid(HOUSING_SIZE), paint).at(Vec3::new(x, h - 1.0, 0.0)));

            let shadows = i == 0 && shadow_casters < MAX_SHADOW_CASTERS;
            if shadows {
                shadow_casters += 1;
            }
            let lamp = Vec3::new(x, h - 0.6, 0.0);
            tower.children.push(
                SceneNode::spot(SpotFixture {
                    color: f.spot_color,
                    intensity,
                    range: f.spot_range,
                    outer_angle: f.spot_angle,
                    inner_angle: f.spot_angle * (1.0 - f.spot_penumbra),
                    shadows,
                })
                .named(format!("FloodlightSpot{i}"))
                .with_transform(Transform::from_translation(lamp).looking_at(aim, Vec3::Y)),
            );
        }
        tower
    });

    SceneNode::group("Floodlights").with_children(towers.collect::<Vec<_>>())
}
