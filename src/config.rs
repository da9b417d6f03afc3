// Configuration file, All measurements in real-world meters (1 unit = 1 meter)
// This controls the initial generation parameter settings

// Football pitch (FIFA-ish defaults)
pub const PITCH_LENGTH: f32 = 100.6;
pub const PITCH_WIDTH: f32 = 64.0;
pub const LINE_WIDTH: f32 = 0.15;

// Fixed football markings
pub const CENTER_CIRCLE_RADIUS: f32 = 9.15;
pub const PENALTY_AREA_LENGTH: f32 = 16.5;
pub const PENALTY_AREA_WIDTH: f32 = 40.32;
pub const GOAL_AREA_LENGTH: f32 = 5.5;
pub const GOAL_AREA_WIDTH: f32 = 18.32;
pub const GOAL_WIDTH: f32 = 7.32;
pub const GOAL_HEIGHT: f32 = 2.44;
pub const GOAL_POST_RADIUS: f32 = 0.06;
pub const CORNER_ARC_RADIUS: f32 = 1.0;
pub const CORNER_FLAG_POLE_HEIGHT: f32 = 1.5;
pub const CORNER_FLAG_WIDTH: f32 = 0.5;
pub const CORNER_FLAG_HEIGHT: f32 = 0.4;
pub const PITCH_STRIPES: u32 = 8;

// Cricket ground
pub const CRICKET_BOUNDARY_RADIUS_X: f32 = 75.0;
pub const CRICKET_BOUNDARY_RADIUS_Z: f32 = 65.0;
pub const CRICKET_WICKET_LENGTH: f32 = 20.12;
pub const CRICKET_WICKET_WIDTH: f32 = 4.0;
pub const CRICKET_CREASE_LINE_WIDTH: f32 = 0.05;
pub const CRICKET_MIN_POPPING_CREASE: f32 = 2.64;
pub const CRICKET_BOWLING_CREASE_INSET: f32 = 1.22; // from the stumps
pub const CRICKET_RETURN_CREASE_LENGTH: f32 = 2.44;
pub const CRICKET_30_YARD_RADIUS: f32 = 27.43;
pub const CRICKET_30_YARD_DASHES: usize = 64;
pub const CRICKET_OUTFIELD_MARGIN: f32 = 20.0; // grass beyond the rope
pub const CRICKET_BOUNDARY_SEGMENTS: usize = 128;

// Stands
pub const STAND_OFFSET_FROM_PITCH: f32 = 5.0;
pub const STAND_OFFSET_FROM_BOUNDARY: f32 = 10.0;
pub const CRICKET_STAND_SEGMENTS: usize = 60;
pub const CRICKET_SEATS_PER_ROW: usize = 2;

// Roofs
pub const MIN_ROOF_COVERAGE_FLOOR: f32 = 0.1; // slabs never thinner than this
pub const MIN_STRUT_LENGTH: f32 = 0.1;        // shorter struts are dropped
pub const ROOF_SUPPORT_RADIUS: f32 = 0.3;
pub const OVERALL_ROOF_COLUMN_RADIUS: f32 = 0.5;
pub const FALLBACK_STAND_DEPTH: f32 = 20.0;   // overall roof extent with no stands
pub const FALLBACK_STAND_HEIGHT: f32 = 15.0;
pub const CRICKET_ROOF_SEGMENTS: usize = 64;

// Floodlights
pub const FLOODLIGHT_SPACING: f32 = 2.0;
pub const FLOODLIGHT_POLE_RADIUS: f32 = 0.5;
pub const FOOTBALL_TOWER_MARGIN: f32 = 12.0;
pub const CRICKET_TOWER_MARGIN: f32 = 15.0;
pub const MAX_SHADOW_CASTERS: usize = 8;
pub const DAYTIME_FLOODLIGHT_FACTOR: f32 = 0.01;
pub const FLOODLIGHT_LUMENS_PER_UNIT: f32 = 100_000.0; // spot intensity slider to bevy lumens

// Extras
pub const SCOREBOARD_SUPPORT_RADIUS: f32 = 0.2;
pub const SCOREBOARD_SUPPORT_SPREAD: f32 = 0.7; // fraction of the board width
pub const SCOREBOARD_DEPTH_ON_ROOF: f32 = 0.7;  // fraction of the profile depth
pub const AD_PLACEHOLDER_ASPECT: f32 = 4.0;     // 256 x 64 placeholder texture
pub const CRICKET_AD_PATH_SEGMENTS: usize = 128;

// Scene lighting and camera
pub const SUN_ILLUMINANCE_PER_UNIT: f32 = 10_000.0;   // lux at full daylight
pub const AMBIENT_BRIGHTNESS_PER_UNIT: f32 = 500.0;
pub const CAMERA_MIN_EXTENT: f32 = 100.0;
pub const CAMERA_HEIGHT_FACTOR: f32 = 2.5;
