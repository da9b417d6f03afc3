pub mod extras;
pub mod field;
pub mod floodlights;
pub mod mesh_gen;
pub mod profile;
pub mod roofs;
pub mod stands;
pub mod utils;

use bevy::prelude::*;

use crate::systems::stadium::params::{RoofMode, Sport, StadiumParams};
use crate::systems::stadium::scene::StadiumModel;

/// One full generation pass. Pure: the same parameters always give the same model.
/// `upload_aspect` is the width / height of the active ad banner upload, if any.
pub fn generate_stadium(params: &StadiumParams, upload_aspect: Option<f32>) -> StadiumModel {
    let params = params.sanitized();
    let mut model = match params.sport {
        Sport::Football => football(&params, upload_aspect),
        Sport::Cricket => cricket(&params, upload_aspect),
    };

    if params.floodlights.show {
        model.nodes.push(floodlights::floodlight_towers(&params));
        let towers = floodlights::tower_positions(&params)
            .iter()
            .map(|p| p.length())
            .fold(0.0, f32::max);
        model.extent = model.extent.max(towers);
    }
    model
}

fn football(params: &StadiumParams, upload_aspect: Option<f32>) -> StadiumModel {
    let mut model = StadiumModel::default();

    if params.pitch.show {
        model.nodes.push(field::football_field(params));
    }

    if params.stands.show {
        let mut layout = stands::football_layout(params);
        let mut stand_nodes = Vec::with_capacity(layout.len());

        for handle in layout.handles().collect::<Vec<_>>() {
            let mut node = stands::football_stand_node(layout.get(handle));
            if params.roof.mode == RoofMode::Individual && params.roof.individual_enable {
                let (roof, anchor) = roofs::individual_roof(layout.get(handle), &params.roof);
                node.children.push(roof);
                layout.get_mut(handle).roof = Some(anchor);
            }
            stand_nodes.push(node);
        }

        if params.extras.show_scoreboard {
            match layout.find_by_name(&params.extras.scoreboard_stand_name) {
                Some(handle) => {
                    let board = extras::main_scoreboard(params, &layout, handle);
                    let group = layout.get(handle).group_name();
                    if let Some(node) = stand_nodes.iter_mut().find(|n| n.name.as_deref() == Some(group.as_str())) {
                        node.children.push(board);
                    }
                }
                None => debug!(
                    "no single stand matches \"{}\", scoreboard skipped",
                    params.extras.scoreboard_stand_name
                ),
            }
        }

        model.nodes.extend(stand_nodes);
        if params.roof.mode == RoofMode::Overall {
            model.nodes.push(roofs::overall_football_roof(params, &layout));
        }
        model.stands = layout;
    }

    if params.extras.show_ads {
        model.nodes.push(extras::football_ads(params, upload_aspect));
    }

    let half_pitch = params.pitch.length.max(params.pitch.width) / 2.0;
    model.extent = half_pitch + params.stands.offset_from_pitch + model.stands.max_depth();
    model
}

fn cricket(params: &StadiumParams, upload_aspect: Option<f32>) -> StadiumModel {
    let c = &params.cricket;
    let mut model = StadiumModel::default();

    if c.show_field {
        model.nodes.push(field::cricket_field(params));
    }

    let mut stand_depth = 0.0;
    if params.stands.show {
        let ring = stands::cricket_stands(params);
        if params.roof.cricket_enable {
            model.nodes.push(roofs::cricket_roof(params, &ring.profile));
        }
        stand_depth = ring.profile.depth;
        model.nodes.extend(ring.nodes);
    }

    if params.extras.show_cricket_scoreboard {
        model.nodes.push(extras::cricket_scoreboard(params));
    }
    if params.extras.show_cricket_ads {
        model.nodes.push(extras::cricket_ads(params, upload_aspect));
    }

    model.extent = c.boundary_radius_x.max(c.boundary_radius_z) + params.stands.offset_from_boundary + stand_depth;
    model
}
