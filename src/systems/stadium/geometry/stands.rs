// stand layout
// football: one extruded profile per pitch side; cricket: a ring of radial segments

use bevy::prelude::*;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::systems::stadium::params::{StadiumParams, StandSide};
use crate::systems::stadium::scene::{Paint, RoofAnchor, SceneNode, Shape};
use super::profile::{StandProfile, build_profile};
use super::utils::yaw_facing;

/// Typed reference to a stand produced in the current pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StandHandle(usize);

#[derive(Clone, Debug, PartialEq)]
pub struct StandInstance {
    pub side: StandSide,
    pub display_name: String,
    /// stand-local to world; local X points away from the pitch, local Z runs along the stand
    pub transform: Transform,
    pub profile: StandProfile,
    pub length: f32,
    pub color: [u8; 3],
    pub roof: Option<RoofAnchor>,
}

impl StandInstance {
    pub fn group_name(&self) -> String {
        format!("{}StandGroup", self.side.label())
    }

    /// True when `query` (already lowercased) names this stand by side or by display name.
    pub fn answers_to(&self, query: &str) -> bool {
        self.group_name().to_lowercase().contains(query) || self.display_name.to_lowercase().contains(query)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StandLayout {
    stands: Vec<StandInstance>,
}

impl StandLayout {
    pub fn get(&self, handle: StandHandle) -> &StandInstance {
        &self.stands[handle.0]
    }

    pub fn get_mut(&mut self, handle: StandHandle) -> &mut StandInstance {
        &mut self.stands[handle.0]
    }

    pub fn handles(&self) -> impl Iterator<Item = StandHandle> {
        (0..self.stands.len()).map(StandHandle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StandInstance> {
        self.stands.iter()
    }

    pub fn len(&self) -> usize {
        self.stands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stands.is_empty()
    }

    /// Case-insensitive substring match against stand group and display names.
    /// Only an unambiguous query resolves.
    pub fn find_by_name(&self, query: &str) -> Option<StandHandle> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        let mut matches = self
            .handles()
            .filter(|&h| self.get(h).answers_to(&query));
        match (matches.next(), matches.next()) {
            (Some(h), None) => Some(h),
            _ => None,
        }
    }

    pub fn max_depth(&self) -> f32 {
        self.stands.iter().map(|s| s.profile.depth).fold(0.0, f32::max)
    }

    pub fn max_height(&self) -> f32 {
        self.stands.iter().map(|s| s.profile.height).fold(0.0, f32::max)
    }
}

// placement for each side, relative to the pitch centre
fn side_placement(side: StandSide, pitch: Vec2, offset: f32) -> (f32, Transform) {
    let (half_l, half_w) = (pitch.x / 2.0, pitch.y / 2.0);
    let (length, translation, yaw) = match side {
        StandSide::East => (pitch.x, Vec3::new(half_l, 0.0, half_w + offset), -FRAC_PI_2),
        StandSide::West => (pitch.x, Vec3::new(-half_l, 0.0, -(half_w + offset)), FRAC_PI_2),
        StandSide::North => (pitch.y, Vec3::new(half_l + offset, 0.0, -half_w), 0.0),
        StandSide::South => (pitch.y, Vec3::new(-(half_l + offset), 0.0, half_w), PI),
    };
    (length, Transform::from_translation(translation).with_rotation(Quat::from_rotation_y(yaw)))
}

/// Resolves and places the four football stands; hidden ones are left out.
pub fn football_layout(params: &StadiumParams) -> StandLayout {
    let pitch = Vec2::new(params.pitch.length, params.pitch.width);
    let stands = StandSide::ALL
        .iter()
        .map(|&side| params.stands.resolve(side))
        .filter(|eff| eff.show)
        .map(|eff| {
            let (length, transform) = side_placement(eff.side, pitch, eff.offset_from_pitch);
            StandInstance {
                side: eff.side,
                display_name: eff.display_name,
                transform,
                profile: build_profile(&eff.tiers),
                length,
                color: eff.color,
                roof: None,
            }
        })
        .collect();
    StandLayout { stands }
}

/// Group node with the extruded stand; roof and scoreboard get attached to it later.
pub fn football_stand_node(stand: &StandInstance) -> SceneNode {
    let body = SceneNode::mesh(
        Shape::Profile {
            outline: stand.profile.outline.clone(),
            depth: stand.length,
        },
        Paint::solid(stand.color).rough(0.8, 0.2),
    )
    .named(stand.display_name.clone());

    SceneNode::group(stand.group_name())
        .with_transform(stand.transform)
        .with_child(body)
}

/// Colour section of cricket segment `i`.
pub fn cricket_section(i: usize, segments: usize, sections: usize) -> usize {
    ((i as f32 / segments as f32) * sections as f32).floor() as usize % sections
}

/// Seats allowed per colour section.
pub fn cricket_section_capacity(segments: usize, sections: usize, total_rows: u32, seats_per_row: usize) -> usize {
    ((segments as f32 / sections as f32) * total_rows as f32 * seats_per_row as f32).ceil() as usize
}

pub struct CricketStands {
    pub nodes: Vec<SceneNode>,
    pub profile: StandProfile,
}

const STEP_COLOR: [u8; 3] = [0xb3, 0xe5, 0xfc];
const WALL_COLOR: [u8; 3] = [0xbd, 0xbd, 0xbd];

/// Radial seating ring around the boundary.
pub fn cricket_stands(params: &StadiumParams) -> CricketStands {
    let c = &params.cricket;
    let profile = build_profile(params.stands.active_tiers());
    let ring = Vec2::new(
        c.boundary_radius_x + params.stands.offset_from_boundary,
        c.boundary_radius_z + params.stands.offset_from_boundary,
    );

    let segments = c.stand_segments;
    let sections = c.seat_colors.len();
    let spr = c.seats_per_row;
    let capacity = cricket_section_capacity(segments, sections, profile.total_rows(), spr);

    let mut seat_groups: Vec<SceneNode> = (0..sections)
        .map(|k| SceneNode::group(format!("CricketSeats{k}")))
        .collect();
    let seat_paints: Vec<Paint> = c.seat_colors.iter().map(|&col| Paint::solid(col).rough(0.5, 0.2)).collect();
    let step_paint = Paint::solid(STEP_COLOR).rough(0.7, 0.1);
    let wall_paint = Paint::solid(WALL_COLOR).rough(0.8, 0.1);

    let mut nodes = Vec::with_capacity(segments + sections);
    for i in 0..segments {
        let a0 = i as f32 / segments as f32 * TAU;
        let a1 = (i + 1) as f32 / segments as f32 * TAU;
        let span = a1 - a0;
        let mid = (a0 + a1) / 2.0;
        let section = cricket_section(i, segments, sections);

        let mut group = SceneNode::group(format!("CricketStandSegment{i}_Group"));

        for anchor in &profile.tiers {
            let tier = anchor.tier;
            for r in 0..tier.num_rows {
                let row = anchor.row(r);
                let radius = ring + Vec2::splat(row.x);

                let seat_size = Vec3::new(
                    1.2 * (radius.x * span / spr as f32).abs(),
                    tier.row_step_height * 0.8,
                    tier.row_step_depth * 0.9,
                );
                for s in 0..spr {
                    let angle = a0 + span * (s as f32 + 0.5) / spr as f32;
                    let pos = Vec3::new(angle.cos() * radius.x, row.y + seat_size.y / 2.0, angle.sin() * radius.y);
                    let seats = &mut seat_groups[section];
                    if seats.children.len() >= capacity {
                        continue;
                    }
                    seats.children.push(
                        SceneNode::mesh(Shape::Cuboid(Vec3::ONE), seat_paints[section]).with_transform(
                            Transform::from_translation(pos)
                                .with_rotation(Quat::from_rotation_y(yaw_facing(pos, Vec3::new(0.0, pos.y, 0.0))))
                                .with_scale(seat_size),
                        ),
                    );
                }

                let avg = (radius.x + radius.y) / 2.0;
                let pos = Vec3::new(mid.cos() * radius.x, row.y - 0.075, mid.sin() * radius.y);
                let step = Vec3::new((avg * span).abs(), 0.15, tier.row_step_depth * 0.95);
                group.children.push(
                    SceneNode::mesh(Shape::Cuboid(Vec3::ONE), step_paint).with_transform(
                        Transform::from_translation(pos)
                            .with_rotation(Quat::from_rotation_y(yaw_facing(pos, Vec3::new(0.0, pos.y, 0.0))))
                            .with_scale(step),
                    ),
                );
            }

            if tier.back_wall_height > 0.0 {
                let radius = ring + Vec2::splat(anchor.walkway_end.x);
                let avg = (radius.x + radius.y) / 2.0;
                let pos = Vec3::new(
                    mid.cos() * radius.x,
                    anchor.walkway_end.y + tier.back_wall_height / 2.0,
                    mid.sin() * radius.y,
                );
                let wall = Vec3::new((avg * span).abs(), tier.back_wall_height, 0.3 * tier.row_step_depth);
                group.children.push(
                    SceneNode::mesh(Shape::Cuboid(Vec3::ONE), wall_paint).with_transform(
                        Transform::from_translation(pos)
                            .with_rotation(Quat::from_rotation_y(yaw_facing(pos, Vec3::new(0.0, pos.y, 0.0))))
                            .with_scale(wall),
                    ),
                );
            }
        }

        nodes.push(group);
    }

    nodes.extend(seat_groups);
    CricketStands { nodes, profile }
}
