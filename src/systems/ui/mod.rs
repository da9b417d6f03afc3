use bevy::prelude::*;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin}; // fps
use bevy_egui::{egui, EguiContexts, EguiPlugin, EguiPrimaryContextPass};

use crate::systems::stadium::RegenerateEvent;
use crate::systems::stadium::params::{RoofMode, Sport, StadiumParams, StandSide, TierSpec, TimeOfDay};
use crate::systems::stadium::preset::load_preset;
use crate::systems::stadium::spawn::GeneratedStadium;
use crate::systems::stadium::textures::AdTexture;

// text fields and the last status message
#[derive(Resource, Default)]
pub struct PanelState {
    pub ad_path: String,
    pub preset_path: String,
    pub status: Option<String>,
}

pub struct UIPlugin;

impl Plugin for UIPlugin {
    fn build(&self, app: &mut App) {
        assert!(app.is_plugin_added::<EguiPlugin>());
        app
            .init_resource::<PanelState>()
            .add_systems(EguiPrimaryContextPass, (ui_main, fps)); // UI rendering here
    }
}

fn metres(ui: &mut egui::Ui, value: &mut f32, range: std::ops::RangeInclusive<f32>, text: &str) -> bool {
    ui.add(egui::Slider::new(value, range).text(text).suffix(" m")).changed()
}

fn degrees(ui: &mut egui::Ui, radians: &mut f32, max_degrees: f32, text: &str) -> bool {
    let mut deg = radians.to_degrees();
    let changed = ui
        .add(egui::Slider::new(&mut deg, 0.0..=max_degrees).text(text).suffix("°"))
        .changed();
    if changed {
        *radians = deg.to_radians();
    }
    changed
}

fn colour(ui: &mut egui::Ui, rgb: &mut [u8; 3], text: &str) -> bool {
    ui.horizontal(|ui| {
        let changed = ui.color_edit_button_srgb(rgb).changed();
        ui.label(text);
        changed
    })
    .inner
}

// checkbox enables the override, the slider edits it
fn override_metres(
    ui: &mut egui::Ui,
    value: &mut Option<f32>,
    fallback: f32,
    range: std::ops::RangeInclusive<f32>,
    text: &str,
) -> bool {
    ui.horizontal(|ui| {
        let mut enabled = value.is_some();
        let mut changed = ui.checkbox(&mut enabled, "").changed();
        if changed {
            *value = enabled.then_some(fallback);
        }
        match value {
            Some(v) => changed |= metres(ui, v, range, text),
            None => {
                ui.label(format!("{text}: {fallback:.2} m (global)"));
            }
        }
        changed
    })
    .inner
}

fn tier_controls(ui: &mut egui::Ui, tier: &mut TierSpec, stacked: bool) -> bool {
    let mut changed = false;
    changed |= ui.add(egui::Slider::new(&mut tier.num_rows, 0..=60).text("Rows")).changed();
    changed |= metres(ui, &mut tier.front_wall_height, 0.0..=5.0, "Front Wall Height");
    changed |= metres(ui, &mut tier.row_step_height, 0.1..=1.0, "Row Step Height");
    changed |= metres(ui, &mut tier.row_step_depth, 0.3..=1.5, "Row Step Depth");
    changed |= metres(ui, &mut tier.walkway_at_top_depth, 0.0..=5.0, "Top Walkway Depth");
    changed |= metres(ui, &mut tier.back_wall_height, 0.0..=10.0, "Back Wall Height");
    if stacked {
        changed |= metres(ui, &mut tier.vertical_offset, 0.0..=10.0, "Vertical Offset");
        changed |= metres(ui, &mut tier.horizontal_offset, -10.0..=10.0, "Horizontal Offset");
    }
    changed
}

fn stand_controls(ui: &mut egui::Ui, params: &mut StadiumParams) -> bool {
    let mut regenerate = false;
    let stands = &mut params.stands;

    regenerate |= ui.checkbox(&mut stands.show, "Show Stands").changed();
    regenerate |= metres(ui, &mut stands.offset_from_pitch, 0.0..=30.0, "Offset From Pitch");
    regenerate |= metres(ui, &mut stands.offset_from_boundary, 0.0..=40.0, "Offset From Boundary");
    regenerate |= colour(ui, &mut stands.color, "Stand Colour");
    regenerate |= ui
        .add(egui::Slider::new(&mut stands.num_tiers, 1..=3).text("Tiers"))
        .on_hover_text("Stacked seating blocks per stand.")
        .changed();

    let num_tiers = stands.num_tiers.clamp(1, 3);
    for (i, tier) in stands.tiers.iter_mut().take(num_tiers).enumerate() {
        egui::CollapsingHeader::new(format!("Tier {}", i + 1))
            .default_open(i == 0)
            .show(ui, |ui| {
                regenerate |= tier_controls(ui, tier, i > 0);
            });
    }

    ui.separator();
    regenerate |= ui
        .checkbox(&mut stands.use_individual_settings, "Per-Stand Settings")
        .on_hover_text("Football only. Overrides apply to the first tier.")
        .changed();
    if stands.use_individual_settings {
        let global = stands.clone();
        for side in StandSide::ALL {
            let o = &mut stands.overrides[side.index()];
            let tier = &global.tiers[0];
            egui::CollapsingHeader::new(side.label())
                .default_open(false)
                .show(ui, |ui| {
                    let mut show = o.show.unwrap_or(global.show);
                    if ui.checkbox(&mut show, "Show").changed() {
                        o.show = Some(show);
                        regenerate = true;
                    }
                    let mut name = o.name.clone().unwrap_or_default();
                    ui.horizontal(|ui| {
                        ui.label("Name:");
                        if ui.text_edit_singleline(&mut name).changed() {
                            o.name = (!name.trim().is_empty()).then_some(name);
                            regenerate = true;
                        }
                    });
                    let mut color = o.color.unwrap_or(global.color);
                    if colour(ui, &mut color, "Colour") {
                        o.color = Some(color);
                        regenerate = true;
                    }
                    regenerate |= override_metres(ui, &mut o.offset_from_pitch, global.offset_from_pitch, 0.0..=30.0, "Offset");

                    let mut rows = o.num_rows.unwrap_or(tier.num_rows);
                    if ui.add(egui::Slider::new(&mut rows, 0..=60).text("Rows")).changed() {
                        o.num_rows = Some(rows);
                        regenerate = true;
                    }
                    regenerate |= override_metres(ui, &mut o.front_wall_height, tier.front_wall_height, 0.0..=5.0, "Front Wall");
                    regenerate |= override_metres(ui, &mut o.row_step_height, tier.row_step_height, 0.1..=1.0, "Step Height");
                    regenerate |= override_metres(ui, &mut o.row_step_depth, tier.row_step_depth, 0.3..=1.5, "Step Depth");
                    regenerate |= override_metres(ui, &mut o.walkway_at_top_depth, tier.walkway_at_top_depth, 0.0..=5.0, "Walkway");
                    regenerate |= override_metres(ui, &mut o.back_wall_height, tier.back_wall_height, 0.0..=10.0, "Back Wall");

                    if ui.button("Reset").clicked() {
                        *o = default();
                        regenerate = true;
                    }
                });
        }
    }
    regenerate
}

fn roof_controls(ui: &mut egui::Ui, params: &mut StadiumParams) -> bool {
    let mut regenerate = false;
    let roof = &mut params.roof;

    ui.horizontal(|ui| {
        ui.label("Mode:");
        for (mode, text) in [(RoofMode::None, "None"), (RoofMode::Individual, "Individual"), (RoofMode::Overall, "Overall")] {
            regenerate |= ui.selectable_value(&mut roof.mode, mode, text).changed();
        }
    });
    regenerate |= colour(ui, &mut roof.support_color, "Support Colour");

    egui::CollapsingHeader::new("Individual Roofs").show(ui, |ui| {
        regenerate |= ui.checkbox(&mut roof.individual_enable, "Enable").changed();
        regenerate |= metres(ui, &mut roof.individual_height_offset, 0.0..=10.0, "Height Offset");
        regenerate |= ui
            .add(egui::Slider::new(&mut roof.individual_coverage_factor, 0.1..=1.5).text("Coverage"))
            .on_hover_text("Fraction of the stand depth the roof covers.")
            .changed();
        regenerate |= metres(ui, &mut roof.individual_min_coverage, 0.0..=20.0, "Min Coverage");
        regenerate |= metres(ui, &mut roof.individual_max_coverage, 5.0..=60.0, "Max Coverage");
        regenerate |= degrees(ui, &mut roof.individual_tilt, 30.0, "Tilt");
        regenerate |= metres(ui, &mut roof.individual_thickness, 0.1..=2.0, "Thickness");
        regenerate |= ui
            .add(egui::Slider::new(&mut roof.individual_num_supports, 1..=8).text("Supports"))
            .changed();
        regenerate |= colour(ui, &mut roof.individual_color, "Colour");
    });

    egui::CollapsingHeader::new("Overall Roof").show(ui, |ui| {
        regenerate |= metres(ui, &mut roof.overall_overhang, 0.0..=20.0, "Overhang");
        regenerate |= ui
            .add(egui::Slider::new(&mut roof.overall_opacity, 0.0..=1.0).text("Opacity"))
            .changed();
        regenerate |= colour(ui, &mut roof.overall_color, "Colour");
    });

    egui::CollapsingHeader::new("Cricket Roof").show(ui, |ui| {
        regenerate |= ui.checkbox(&mut roof.cricket_enable, "Enable").changed();
        regenerate |= metres(ui, &mut roof.cricket_height_offset, 0.0..=10.0, "Height Offset");
        regenerate |= metres(ui, &mut roof.cricket_outer_overhang, 0.0..=30.0, "Outer Overhang");
        regenerate |= metres(ui, &mut roof.cricket_inner_overhang, 0.0..=30.0, "Inner Overhang");
        regenerate |= metres(ui, &mut roof.cricket_thickness, 0.1..=3.0, "Thickness");
        regenerate |= ui
            .add(egui::Slider::new(&mut roof.cricket_num_supports, 1..=24).text("Columns"))
            .changed();
        regenerate |= metres(ui, &mut roof.cricket_support_radius, 0.1..=2.0, "Column Radius");
        regenerate |= ui
            .add(egui::Slider::new(&mut roof.cricket_opacity, 0.0..=1.0).text("Opacity"))
            .changed();
        regenerate |= colour(ui, &mut roof.cricket_color, "Colour");
    });
    regenerate
}

fn field_controls(ui: &mut egui::Ui, params: &mut StadiumParams) -> bool {
    let mut regenerate = false;
    match params.sport {
        Sport::Football => {
            let pitch = &mut params.pitch;
            regenerate |= ui.checkbox(&mut pitch.show, "Show Pitch").changed();
            regenerate |= metres(ui, &mut pitch.length, 90.0..=120.0, "Length");
            regenerate |= metres(ui, &mut pitch.width, 45.0..=90.0, "Width");
            regenerate |= metres(ui, &mut pitch.line_width, 0.05..=0.3, "Line Width");
        }
        Sport::Cricket => {
            let c = &mut params.cricket;
            regenerate |= ui.checkbox(&mut c.show_field, "Show Field").changed();
            regenerate |= metres(ui, &mut c.boundary_radius_x, 40.0..=100.0, "Boundary Radius X");
            regenerate |= metres(ui, &mut c.boundary_radius_z, 40.0..=100.0, "Boundary Radius Z");
            regenerate |= metres(ui, &mut c.circle_radius_x, 15.0..=40.0, "30-Yard Radius X");
            regenerate |= metres(ui, &mut c.circle_radius_z, 15.0..=40.0, "30-Yard Radius Z");
            regenerate |= metres(ui, &mut c.wicket_length, 15.0..=25.0, "Wicket Length");
            regenerate |= metres(ui, &mut c.wicket_width, 2.0..=6.0, "Wicket Width");
            regenerate |= metres(ui, &mut c.rope_radius, 0.05..=0.5, "Rope Radius");
            regenerate |= colour(ui, &mut c.outfield_color, "Outfield");
            regenerate |= colour(ui, &mut c.rope_color, "Rope");
            regenerate |= colour(ui, &mut c.circle_color, "30-Yard Circle");
            ui.separator();
            regenerate |= ui
                .add(egui::Slider::new(&mut c.stand_segments, 8..=120).text("Stand Segments"))
                .changed();
            regenerate |= ui
                .add(egui::Slider::new(&mut c.seats_per_row, 1..=6).text("Seats Per Row"))
                .changed();
            ui.horizontal(|ui| {
                ui.label("Seat Sections:");
                for rgb in c.seat_colors.iter_mut() {
                    regenerate |= ui.color_edit_button_srgb(rgb).changed();
                }
                if ui.button("+").clicked() && c.seat_colors.len() < 8 {
                    let last = c.seat_colors.last().copied().unwrap_or(params.stands.color);
                    c.seat_colors.push(last);
                    regenerate = true;
                }
                if ui.button("-").clicked() && c.seat_colors.len() > 1 {
                    c.seat_colors.pop();
                    regenerate = true;
                }
            });
        }
    }
    regenerate
}

fn floodlight_controls(ui: &mut egui::Ui, params: &mut StadiumParams) -> bool {
    let mut regenerate = false;
    let f = &mut params.floodlights;

    ui.horizontal(|ui| {
        ui.label("Time:");
        regenerate |= ui.selectable_value(&mut f.time_of_day, TimeOfDay::Day, "Day").changed();
        regenerate |= ui.selectable_value(&mut f.time_of_day, TimeOfDay::Night, "Night").changed();
    });
    regenerate |= ui.checkbox(&mut f.on_at_night, "Floodlights On At Night").changed();
    regenerate |= ui.checkbox(&mut f.show, "Show Towers").changed();
    regenerate |= metres(ui, &mut f.tower_height, 15.0..=70.0, "Tower Height");
    regenerate |= ui.add(egui::Slider::new(&mut f.lights_per_tower, 1..=8).text("Lights Per Tower")).changed();
    regenerate |= ui.add(egui::Slider::new(&mut f.cricket_towers, 3..=12).text("Cricket Towers")).changed();
    regenerate |= ui.add(egui::Slider::new(&mut f.spot_intensity, 0.0..=500.0).text("Intensity")).changed();
    regenerate |= degrees(ui, &mut f.spot_angle, 80.0, "Beam Angle");
    regenerate |= ui.add(egui::Slider::new(&mut f.spot_penumbra, 0.0..=1.0).text("Penumbra")).changed();
    regenerate |= metres(ui, &mut f.spot_range, 100.0..=1500.0, "Range");
    regenerate |= colour(ui, &mut f.spot_color, "Light Colour");
    regenerate |= colour(ui, &mut f.tower_color, "Tower Colour");
    regenerate
}

fn extras_controls(ui: &mut egui::Ui, params: &mut StadiumParams, generated: &GeneratedStadium) -> bool {
    let mut regenerate = false;
    let e = &mut params.extras;

    egui::CollapsingHeader::new("Ad Hoardings").show(ui, |ui| {
        regenerate |= ui.checkbox(&mut e.show_ads, "Football Hoardings").changed();
        regenerate |= ui.checkbox(&mut e.show_cricket_ads, "Cricket Ribbon").changed();
        regenerate |= metres(ui, &mut e.ad_height, 0.5..=3.0, "Height");
        regenerate |= metres(ui, &mut e.ad_offset_from_pitch, 0.5..=10.0, "Offset");
        regenerate |= metres(ui, &mut e.cricket_ad_height, 0.5..=4.0, "Ribbon Height");
        regenerate |= metres(ui, &mut e.cricket_ad_radius_offset, 0.0..=10.0, "Ribbon Offset");
        regenerate |= ui
            .add(egui::Slider::new(&mut e.ad_emissive_intensity, 0.0..=3.0).text("Glow"))
            .changed();
        regenerate |= colour(ui, &mut e.ad_color, "Placeholder Colour");
    });

    egui::CollapsingHeader::new("Scoreboard").show(ui, |ui| {
        regenerate |= ui.checkbox(&mut e.show_scoreboard, "Football Scoreboard").changed();
        ui.horizontal(|ui| {
            ui.label("On Stand:");
            regenerate |= ui.text_edit_singleline(&mut e.scoreboard_stand_name).changed();
        });
        if e.show_scoreboard && generated.stands.find_by_name(&e.scoreboard_stand_name).is_none() {
            ui.label(egui::RichText::new("No single stand matches").color(egui::Color32::from_rgb(178, 34, 34)));
        }
        regenerate |= metres(ui, &mut e.scoreboard_width, 5.0..=40.0, "Width");
        regenerate |= metres(ui, &mut e.scoreboard_height, 2.0..=15.0, "Height");
        regenerate |= metres(ui, &mut e.scoreboard_frame_thickness, 0.1..=1.0, "Frame");
        regenerate |= metres(ui, &mut e.scoreboard_offset_y_from_roof, 0.0..=10.0, "Above Roof");
        regenerate |= metres(ui, &mut e.scoreboard_offset_z_along_stand, -50.0..=50.0, "Along Stand");
        regenerate |= metres(ui, &mut e.scoreboard_offset_depth_on_roof, -20.0..=20.0, "Depth On Roof");
        regenerate |= metres(ui, &mut e.scoreboard_support_height, 0.0..=10.0, "Support Height");
        regenerate |= ui
            .add(egui::Slider::new(&mut e.scoreboard_emissive_intensity, 0.0..=3.0).text("Glow"))
            .changed();
        regenerate |= colour(ui, &mut e.scoreboard_screen_color, "Screen");
        regenerate |= colour(ui, &mut e.scoreboard_frame_color, "Frame");
        regenerate |= colour(ui, &mut e.scoreboard_support_color, "Supports");

        ui.separator();
        regenerate |= ui.checkbox(&mut e.show_cricket_scoreboard, "Cricket Scoreboard").changed();
        regenerate |= metres(ui, &mut e.cricket_scoreboard_width, 5.0..=50.0, "Width");
        regenerate |= metres(ui, &mut e.cricket_scoreboard_height, 2.0..=20.0, "Height");
        let [x, y, z] = &mut e.cricket_scoreboard_position;
        regenerate |= metres(ui, x, -150.0..=150.0, "X");
        regenerate |= metres(ui, y, 0.0..=50.0, "Y");
        regenerate |= metres(ui, z, -150.0..=150.0, "Z");
        regenerate |= degrees(ui, &mut e.cricket_scoreboard_yaw, 360.0, "Facing");
        regenerate |= colour(ui, &mut e.cricket_scoreboard_screen_color, "Screen");
    });
    regenerate
}

fn ui_main(
    mut contexts: EguiContexts,
    mut params: ResMut<StadiumParams>,
    mut regen_events: EventWriter<RegenerateEvent>,
    mut panel: ResMut<PanelState>,
    mut ad: ResMut<AdTexture>,
    asset_server: Res<AssetServer>,
    generated: Res<GeneratedStadium>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        egui::SidePanel::left("config_panel")
            .default_width(280.0)
            .min_width(250.0)
            .max_width(420.0)
            .resizable(true)
            .show(ctx, |ui| {
                let mut regenerate = false;

                // camera
                ui.label("Camera: ");
                ui.label("WASD - Move");
                ui.label("Scroll - Zoom");
                ui.label("MMB - Rotate");

                ui.separator();

                ui.horizontal(|ui| {
                    ui.label("Sport:");
                    regenerate |= ui.selectable_value(&mut params.sport, Sport::Football, "Football").changed();
                    regenerate |= ui.selectable_value(&mut params.sport, Sport::Cricket, "Cricket").changed();
                });
                ui.label(format!(
                    "{} nodes, {} stands, pass {}",
                    generated.node_count,
                    generated.stands.len(),
                    generated.passes
                ));

                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    egui::CollapsingHeader::new("Field")
                        .default_open(true)
                        .show(ui, |ui| regenerate |= field_controls(ui, &mut params));
                    egui::CollapsingHeader::new("Stands")
                        .show(ui, |ui| regenerate |= stand_controls(ui, &mut params));
                    egui::CollapsingHeader::new("Roofs")
                        .show(ui, |ui| regenerate |= roof_controls(ui, &mut params));
                    egui::CollapsingHeader::new("Floodlights")
                        .show(ui, |ui| regenerate |= floodlight_controls(ui, &mut params));
                    egui::CollapsingHeader::new("Extras")
                        .show(ui, |ui| regenerate |= extras_controls(ui, &mut params, &generated));

                    ui.separator();

                    // banner image, relative to the assets folder
                    ui.label("Ad Banner Image:");
                    ui.text_edit_singleline(&mut panel.ad_path);
                    ui.horizontal(|ui| {
                        if ui.button("Load").clicked() && !panel.ad_path.trim().is_empty() {
                            ad.request(panel.ad_path.trim(), &asset_server);
                        }
                        if ui.button("Clear").clicked() && ad.clear() {
                            regenerate = true;
                        }
                    });
                    if let Some(path) = &ad.path {
                        let state = if ad.pending.is_some() { "loading" } else { "active" };
                        ui.label(format!("{path} ({state})"));
                    }

                    ui.separator();

                    ui.label("Preset (TOML):");
                    ui.text_edit_singleline(&mut panel.preset_path);
                    ui.horizontal(|ui| {
                        if ui.button("Load Preset").clicked() {
                            match load_preset(panel.preset_path.trim()) {
                                Ok(loaded) => {
                                    *params = loaded;
                                    panel.status = Some(format!("loaded {}", panel.preset_path.trim()));
                                    regenerate = true;
                                }
                                Err(e) => {
                                    warn!("{}", e);
                                    panel.status = Some(e.to_string());
                                }
                            }
                        }
                        if ui.button("Defaults").clicked() {
                            *params = StadiumParams::default();
                            regenerate = true;
                        }
                    });
                    if let Some(status) = &panel.status {
                        ui.label(status);
                    }
                });

                ui.separator();
                ui.label("ESC - Exit");

                // trigger regeneration on any parameter change
                if regenerate {
                    regen_events.write(RegenerateEvent);
                }
            });
    }
}

fn fps(
    mut contexts: EguiContexts,
    diagnostics: Res<DiagnosticsStore>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        egui::Area::new(egui::Id::new("fps_counter"))
            .anchor(egui::Align2::RIGHT_TOP, egui::Vec2::new(-10.0, 10.0))
            .show(ctx, |ui| {
                if let Some(fps) = diagnostics
                    .get(&FrameTimeDiagnosticsPlugin::FPS)
                    .and_then(|d| d.smoothed())
                {
                    ui.label(egui::RichText::new(format!("{:.0}", fps))
                        .size(26.0)
                        .color(egui::Color32::WHITE));
                }
            });
    }
}
