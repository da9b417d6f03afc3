// stadium generation parameters
// everything the generators read lives here; the control panel and presets mutate it

use bevy::prelude::*;
use serde::Deserialize;

use crate::config::*;

/// sRGB colour triple
pub type Rgb = [u8; 3];

pub fn srgb(c: Rgb) -> Color {
    Color::srgb_u8(c[0], c[1], c[2])
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    #[default]
    Football,
    Cricket,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoofMode {
    None,
    Overall,
    #[default]
    Individual,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    #[default]
    Day,
    Night,
}

/// The four football stands, in the order their overrides are stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StandSide {
    East,
    West,
    North,
    South,
}

impl StandSide {
    pub const ALL: [StandSide; 4] = [StandSide::East, StandSide::West, StandSide::North, StandSide::South];

    pub fn label(self) -> &'static str {
        match self {
            StandSide::East => "East",
            StandSide::West => "West",
            StandSide::North => "North",
            StandSide::South => "South",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// One block of seating rows.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TierSpec {
    pub num_rows: u32,
    pub front_wall_height: f32,
    pub row_step_height: f32,
    pub row_step_depth: f32,
    pub walkway_at_top_depth: f32,
    pub back_wall_height: f32,
    // setback from the tier below, ignored for the first tier
    pub vertical_offset: f32,
    pub horizontal_offset: f32,
}

impl Default for TierSpec {
    fn default() -> Self {
        Self {
            num_rows: 20,
            front_wall_height: 1.0,
            row_step_height: 0.4,
            row_step_depth: 0.8,
            walkway_at_top_depth: 1.5,
            back_wall_height: 0.5,
            vertical_offset: 0.0,
            horizontal_offset: 0.0,
        }
    }
}

impl TierSpec {
    pub fn is_active(&self) -> bool {
        self.num_rows > 0
    }

    fn sanitized(mut self) -> Self {
        self.front_wall_height = self.front_wall_height.max(0.0);
        self.row_step_height = self.row_step_height.max(0.0);
        self.row_step_depth = self.row_step_depth.max(0.0);
        self.walkway_at_top_depth = self.walkway_at_top_depth.max(0.0);
        self.back_wall_height = self.back_wall_height.max(0.0);
        self
    }
}

/// Per-side values; `None` falls back to the global setting.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StandOverride {
    pub name: Option<String>,
    pub show: Option<bool>,
    pub offset_from_pitch: Option<f32>,
    pub color: Option<Rgb>,
    pub num_rows: Option<u32>,
    pub front_wall_height: Option<f32>,
    pub row_step_height: Option<f32>,
    pub row_step_depth: Option<f32>,
    pub walkway_at_top_depth: Option<f32>,
    pub back_wall_height: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StandParams {
    pub show: bool,
    pub offset_from_pitch: f32,
    pub offset_from_boundary: f32,
    pub color: Rgb,
    pub num_tiers: usize,
    pub tiers: [TierSpec; 3],
    pub use_individual_settings: bool,
    pub overrides: [StandOverride; 4],
}

impl Default for StandParams {
    fn default() -> Self {
        Self {
            show: true,
            offset_from_pitch: STAND_OFFSET_FROM_PITCH,
            offset_from_boundary: STAND_OFFSET_FROM_BOUNDARY,
            color: [0x88, 0x88, 0x88],
            num_tiers: 3,
            tiers: [
                TierSpec::default(),
                TierSpec {
                    num_rows: 15,
                    front_wall_height: 0.5,
                    row_step_height: 0.45,
                    row_step_depth: 0.85,
                    walkway_at_top_depth: 2.0,
                    back_wall_height: 1.0,
                    vertical_offset: 3.0,
                    horizontal_offset: -1.0,
                },
                TierSpec {
                    num_rows: 10,
                    front_wall_height: 0.5,
                    row_step_height: 0.5,
                    row_step_depth: 0.9,
                    walkway_at_top_depth: 1.0,
                    back_wall_height: 1.5,
                    vertical_offset: 3.5,
                    horizontal_offset: -1.5,
                },
            ],
            use_individual_settings: false,
            overrides: Default::default(),
        }
    }
}

/// Stand settings after per-side fallback.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectiveStand {
    pub side: StandSide,
    pub display_name: String,
    pub show: bool,
    pub offset_from_pitch: f32,
    pub color: Rgb,
    pub tiers: Vec<TierSpec>,
}

impl StandParams {
    /// The tier blocks `num_tiers` allows the generators to read.
    pub fn active_tiers(&self) -> &[TierSpec] {
        &self.tiers[..self.num_tiers.clamp(1, 3)]
    }

    pub fn resolve(&self, side: StandSide) -> EffectiveStand {
        let mut tiers = self.active_tiers().to_vec();
        let default_name = format!("{} Stand", side.label());

        if !self.use_individual_settings {
            return EffectiveStand {
                side,
                display_name: default_name,
                show: self.show,
                offset_from_pitch: self.offset_from_pitch,
                color: self.color,
                tiers,
            };
        }

        let o = &self.overrides[side.index()];
        let tier1 = &mut tiers[0];
        tier1.num_rows = o.num_rows.unwrap_or(tier1.num_rows);
        tier1.front_wall_height = o.front_wall_height.unwrap_or(tier1.front_wall_height).max(0.0);
        tier1.row_step_height = o.row_step_height.unwrap_or(tier1.row_step_height).max(0.0);
        tier1.row_step_depth = o.row_step_depth.unwrap_or(tier1.row_step_depth).max(0.0);
        tier1.walkway_at_top_depth = o.walkway_at_top_depth.unwrap_or(tier1.walkway_at_top_depth).max(0.0);
        tier1.back_wall_height = o.back_wall_height.unwrap_or(tier1.back_wall_height).max(0.0);

        EffectiveStand {
            side,
            display_name: o.name.clone().unwrap_or(default_name),
            show: o.show.unwrap_or(self.show),
            offset_from_pitch: o.offset_from_pitch.unwrap_or(self.offset_from_pitch).max(0.0),
            color: o.color.unwrap_or(self.color),
            tiers,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PitchParams {
    pub show: bool,
    pub length: f32,
    pub width: f32,
    pub line_width: f32,
}

impl Default for PitchParams {
    fn default() -> Self {
        Self {
            show: true,
            length: PITCH_LENGTH,
            width: PITCH_WIDTH,
            line_width: LINE_WIDTH,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CricketParams {
    pub show_field: bool,
    pub boundary_radius_x: f32,
    pub boundary_radius_z: f32,
    pub outfield_color: Rgb,
    pub wicket_length: f32,
    pub wicket_width: f32,
    pub crease_line_width: f32,
    pub rope_color: Rgb,
    pub rope_radius: f32,
    pub circle_radius_x: f32,
    pub circle_radius_z: f32,
    pub circle_color: Rgb,
    pub circle_line_thickness: f32,
    pub stand_segments: usize,
    pub seats_per_row: usize,
    pub seat_colors: Vec<Rgb>,
}

impl Default for CricketParams {
    fn default() -> Self {
        Self {
            show_field: true,
            boundary_radius_x: CRICKET_BOUNDARY_RADIUS_X,
            boundary_radius_z: CRICKET_BOUNDARY_RADIUS_Z,
            outfield_color: [0x22, 0x8B, 0x22],
            wicket_length: CRICKET_WICKET_LENGTH,
            wicket_width: CRICKET_WICKET_WIDTH,
            crease_line_width: CRICKET_CREASE_LINE_WIDTH,
            rope_color: [0xFF, 0xFF, 0xFF],
            rope_radius: 0.15,
            circle_radius_x: CRICKET_30_YARD_RADIUS,
            circle_radius_z: CRICKET_30_YARD_RADIUS,
            circle_color: [0xFF, 0xFF, 0xFF],
            circle_line_thickness: 0.08,
            stand_segments: CRICKET_STAND_SEGMENTS,
            seats_per_row: CRICKET_SEATS_PER_ROW,
            seat_colors: vec![[0x8B, 0xC3, 0x4A], [0x9E, 0x9E, 0x9E], [0xB0, 0xE0, 0xE6]],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoofParams {
    pub mode: RoofMode,
    pub support_color: Rgb,

    pub individual_enable: bool,
    pub individual_height_offset: f32,
    pub individual_coverage_factor: f32,
    pub individual_min_coverage: f32,
    pub individual_max_coverage: f32,
    pub individual_tilt: f32,
    pub individual_thickness: f32,
    pub individual_color: Rgb,
    pub individual_num_supports: usize,

    pub overall_overhang: f32,
    pub overall_color: Rgb,
    pub overall_opacity: f32,

    pub cricket_enable: bool,
    pub cricket_height_offset: f32,
    pub cricket_outer_overhang: f32,
    pub cricket_inner_overhang: f32,
    pub cricket_thickness: f32,
    pub cricket_color: Rgb,
    pub cricket_opacity: f32,
    pub cricket_num_supports: usize,
    pub cricket_support_radius: f32,
}

impl Default for RoofParams {
    fn default() -> Self {
        Self {
            mode: RoofMode::Individual,
            support_color: [0x55, 0x55, 0x55],
            individual_enable: true,
            individual_height_offset: 2.0,
            individual_coverage_factor: 0.75,
            individual_min_coverage: 5.0,
            individual_max_coverage: 40.0,
            individual_tilt: std::f32::consts::PI / 18.0,
            individual_thickness: 0.5,
            individual_color: [0x99, 0x99, 0x99],
            individual_num_supports: 2,
            overall_overhang: 5.0,
            overall_color: [0x77, 0x77, 0x77],
            overall_opacity: 0.9,
            cricket_enable: true,
            cricket_height_offset: 3.0,
            cricket_outer_overhang: 10.0,
            cricket_inner_overhang: 5.0,
            cricket_thickness: 0.8,
            cricket_color: [0x77, 0x88, 0x99],
            cricket_opacity: 0.95,
            cricket_num_supports: 8,
            cricket_support_radius: OVERALL_ROOF_COLUMN_RADIUS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FloodlightParams {
    pub show: bool,
    pub tower_height: f32,
    pub tower_color: Rgb,
    pub lights_per_tower: usize,
    pub cricket_towers: usize,
    pub spot_color: Rgb,
    pub spot_intensity: f32,
    pub spot_angle: f32,
    pub spot_penumbra: f32,
    pub spot_range: f32,
    pub time_of_day: TimeOfDay,
    pub on_at_night: bool,
}

impl Default for FloodlightParams {
    fn default() -> Self {
        Self {
            show: true,
            tower_height: 38.0,
            tower_color: [0xCC, 0xCC, 0xCC],
            lights_per_tower: 3,
            cricket_towers: 6,
            spot_color: [0xFF, 0xF8, 0xE1],
            spot_intensity: 150.0,
            spot_angle: std::f32::consts::PI / 5.0,
            spot_penumbra: 0.2,
            spot_range: 700.0,
            time_of_day: TimeOfDay::Day,
            on_at_night: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtrasParams {
    pub show_ads: bool,
    pub ad_height: f32,
    pub ad_offset_from_pitch: f32,
    pub ad_color: Rgb,
    pub ad_emissive_intensity: f32,
    pub show_cricket_ads: bool,
    pub cricket_ad_height: f32,
    pub cricket_ad_radius_offset: f32,

    pub show_scoreboard: bool,
    pub scoreboard_stand_name: String,
    pub scoreboard_width: f32,
    pub scoreboard_height: f32,
    pub scoreboard_frame_thickness: f32,
    pub scoreboard_frame_color: Rgb,
    pub scoreboard_screen_color: Rgb,
    pub scoreboard_emissive_intensity: f32,
    pub scoreboard_offset_y_from_roof: f32,
    pub scoreboard_offset_z_along_stand: f32,
    pub scoreboard_offset_depth_on_roof: f32,
    pub scoreboard_support_height: f32,
    pub scoreboard_support_color: Rgb,

    pub show_cricket_scoreboard: bool,
    pub cricket_scoreboard_width: f32,
    pub cricket_scoreboard_height: f32,
    pub cricket_scoreboard_position: [f32; 3],
    pub cricket_scoreboard_yaw: f32,
    pub cricket_scoreboard_screen_color: Rgb,
    pub cricket_scoreboard_emissive_intensity: f32,
}

impl Default for ExtrasParams {
    fn default() -> Self {
        Self {
            show_ads: true,
            ad_height: 1.0,
            ad_offset_from_pitch: 2.0,
            ad_color: [0x94, 0x00, 0xFF],
            ad_emissive_intensity: 0.5,
            show_cricket_ads: true,
            cricket_ad_height: 2.0,
            cricket_ad_radius_offset: 0.5,
            show_scoreboard: true,
            scoreboard_stand_name: "North".to_string(),
            scoreboard_width: 18.0,
            scoreboard_height: 7.0,
            scoreboard_frame_thickness: 0.4,
            scoreboard_frame_color: [0x28, 0x28, 0x28],
            scoreboard_screen_color: [0x10, 0x10, 0x18],
            scoreboard_emissive_intensity: 0.9,
            scoreboard_offset_y_from_roof: 1.0,
            scoreboard_offset_z_along_stand: 0.0,
            scoreboard_offset_depth_on_roof: 0.0,
            scoreboard_support_height: 3.0,
            scoreboard_support_color: [0x44, 0x44, 0x44],
            show_cricket_scoreboard: true,
            cricket_scoreboard_width: 25.0,
            cricket_scoreboard_height: 10.0,
            cricket_scoreboard_position: [0.0, 15.0, -90.0],
            cricket_scoreboard_yaw: 0.0,
            cricket_scoreboard_screen_color: [0x0A, 0x0A, 0x1A],
            cricket_scoreboard_emissive_intensity: 1.5,
        }
    }
}

// the whole configuration object
#[derive(Resource, Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StadiumParams {
    pub sport: Sport,
    pub pitch: PitchParams,
    pub cricket: CricketParams,
    pub stands: StandParams,
    pub roof: RoofParams,
    pub floodlights: FloodlightParams,
    pub extras: ExtrasParams,
}

impl StadiumParams {
    /// Clamp degenerate values so every generator can trust its inputs.
    /// Lengths and radii become non-negative, counts at least one.
    pub fn sanitized(&self) -> StadiumParams {
        let mut p = self.clone();

        p.pitch.length = p.pitch.length.max(0.0);
        p.pitch.width = p.pitch.width.max(0.0);
        p.pitch.line_width = p.pitch.line_width.max(0.0);

        let c = &mut p.cricket;
        c.boundary_radius_x = c.boundary_radius_x.max(0.0);
        c.boundary_radius_z = c.boundary_radius_z.max(0.0);
        c.wicket_length = c.wicket_length.max(0.0);
        c.wicket_width = c.wicket_width.max(0.0);
        c.crease_line_width = c.crease_line_width.max(0.0);
        c.rope_radius = c.rope_radius.max(0.0);
        c.circle_radius_x = c.circle_radius_x.max(0.0);
        c.circle_radius_z = c.circle_radius_z.max(0.0);
        c.circle_line_thickness = c.circle_line_thickness.max(0.0);
        c.stand_segments = c.stand_segments.max(1);
        c.seats_per_row = c.seats_per_row.max(1);
        if c.seat_colors.is_empty() {
            c.seat_colors.push(p.stands.color);
        }

        let s = &mut p.stands;
        s.num_tiers = s.num_tiers.clamp(1, 3);
        s.offset_from_pitch = s.offset_from_pitch.max(0.0);
        s.offset_from_boundary = s.offset_from_boundary.max(0.0);
        for tier in s.tiers.iter_mut() {
            *tier = tier.sanitized();
        }

        let r = &mut p.roof;
        r.individual_min_coverage = r.individual_min_coverage.max(0.0);
        r.individual_max_coverage = r.individual_max_coverage.max(0.0);
        r.individual_coverage_factor = r.individual_coverage_factor.max(0.0);
        r.individual_thickness = r.individual_thickness.max(0.0);
        r.individual_num_supports = r.individual_num_supports.max(1);
        r.overall_overhang = r.overall_overhang.max(0.0);
        r.overall_opacity = r.overall_opacity.clamp(0.0, 1.0);
        r.cricket_outer_overhang = r.cricket_outer_overhang.max(0.0);
        r.cricket_inner_overhang = r.cricket_inner_overhang.max(0.0);
        r.cricket_thickness = r.cricket_thickness.max(0.0);
        r.cricket_opacity = r.cricket_opacity.clamp(0.0, 1.0);
        r.cricket_num_supports = r.cricket_num_supports.max(1);
        r.cricket_support_radius = r.cricket_support_radius.max(0.0);

        let f = &mut p.floodlights;
        f.tower_height = f.tower_height.max(0.0);
        f.lights_per_tower = f.lights_per_tower.max(1);
        f.cricket_towers = f.cricket_towers.max(1);
        f.spot_intensity = f.spot_intensity.max(0.0);
        f.spot_range = f.spot_range.max(0.0);
        f.spot_penumbra = f.spot_penumbra.clamp(0.0, 1.0);

        let e = &mut p.extras;
        e.ad_height = e.ad_height.max(0.0);
        e.ad_offset_from_pitch = e.ad_offset_from_pitch.max(0.0);
        e.cricket_ad_height = e.cricket_ad_height.max(0.0);
        e.scoreboard_width = e.scoreboard_width.max(0.0);
        e.scoreboard_height = e.scoreboard_height.max(0.0);
        e.scoreboard_frame_thickness = e.scoreboard_frame_thickness.max(0.0);
        e.scoreboard_support_height = e.scoreboard_support_height.max(0.0);
        e.cricket_scoreboard_width = e.cricket_scoreboard_width.max(0.0);
        e.cricket_scoreboard_height = e.cricket_scoreboard_height.max(0.0);

        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_fall_back_field_by_field() {
        let mut stands = StandParams::default();
        stands.use_individual_settings = true;
        stands.overrides[StandSide::North.index()] = StandOverride {
            offset_from_pitch: Some(12.0),
            num_rows: Some(4),
            ..default()
        };

        let north = stands.resolve(StandSide::North);
        assert_eq!(north.offset_from_pitch, 12.0);
        assert_eq!(north.tiers[0].num_rows, 4);
        // untouched fields come from the globals
        assert_eq!(north.color, stands.color);
        assert_eq!(north.tiers[0].row_step_depth, stands.tiers[0].row_step_depth);
        assert!(north.show);

        let south = stands.resolve(StandSide::South);
        assert_eq!(south.offset_from_pitch, stands.offset_from_pitch);
        assert_eq!(south.tiers[0].num_rows, stands.tiers[0].num_rows);
    }

    #[test]
    fn overrides_ignored_without_individual_mode() {
        let mut stands = StandParams::default();
        stands.overrides[0].show = Some(false);
        assert!(stands.resolve(StandSide::East).show);
    }

    #[test]
    fn num_tiers_bounds_the_tier_blocks() {
        let mut stands = StandParams::default();
        stands.num_tiers = 2;
        assert_eq!(stands.active_tiers().len(), 2);
        stands.num_tiers = 9;
        assert_eq!(stands.active_tiers().len(), 3);
    }

    #[test]
    fn sanitizing_clamps_negative_lengths() {
        let mut params = StadiumParams::default();
        params.pitch.length = -5.0;
        params.stands.tiers[1].row_step_depth = -1.0;
        params.cricket.stand_segments = 0;
        params.cricket.seat_colors.clear();

        let clean = params.sanitized();
        assert_eq!(clean.pitch.length, 0.0);
        assert_eq!(clean.stands.tiers[1].row_step_depth, 0.0);
        // offsets are signed on purpose
        assert_eq!(clean.stands.tiers[1].horizontal_offset, -1.0);
        assert_eq!(clean.cricket.stand_segments, 1);
        assert_eq!(clean.cricket.seat_colors.len(), 1);
    }
}
