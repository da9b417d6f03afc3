// entry point for the stadium generation plugin
use bevy::math::bounding::Aabb2d;
use bevy::prelude::*;
use bevy_rts_camera::RtsCamera;

use crate::config::*;

pub mod geometry;
pub mod params;
pub mod preset;
pub mod scene;
pub mod spawn;
pub mod textures;

use params::{Rgb, StadiumParams, TimeOfDay, srgb};
use spawn::{GeneratedStadium, RenderCache};
use textures::{AdTexture, GeneratedTextures};

// Event for regeneration; every event in a frame collapses into one pass
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct RegenerateEvent;

/// The scene's directional light.
#[derive(Component)]
pub struct Sun;

struct Environment {
    sun: Rgb,
    sun_strength: f32,
    sun_position: Vec3,
    ambient: Rgb,
    ambient_strength: f32,
    sky: Rgb,
}

fn environment(time: TimeOfDay) -> Environment {
    match time {
        TimeOfDay::Day => Environment {
            sun: [0xFF, 0xFF, 0xFF],
            sun_strength: 1.0,
            sun_position: Vec3::new(50.0, 100.0, 75.0),
            ambient: [0x88, 0x88, 0x88],
            ambient_strength: 0.6,
            sky: [0x87, 0xCE, 0xEB],
        },
        TimeOfDay::Night => Environment {
            sun: [0x6a, 0x8c, 0xff],
            sun_strength: 0.12,
            sun_position: Vec3::new(50.0, 60.0, 40.0),
            ambient: [0x22, 0x33, 0x66],
            ambient_strength: 0.25,
            sky: [0x0a, 0x0a, 0x22],
        },
    }
}

// main plugin for generation
pub struct StadiumPlugin;

impl Plugin for StadiumPlugin {
    fn build(&self, app: &mut App) {
        app
            // a preset inserted before the plugin wins over the defaults
            .init_resource::<StadiumParams>()
            .init_resource::<GeneratedStadium>()
            .init_resource::<RenderCache>()
            .init_resource::<GeneratedTextures>()
            .init_resource::<AdTexture>()
            .add_event::<RegenerateEvent>()
            .add_systems(Startup, |mut regen: EventWriter<RegenerateEvent>| {
                regen.write(RegenerateEvent);
            })
            .add_systems(
                Update,
                (
                    textures::promote_ad_upload,
                    spawn::handle_regeneration,
                    fit_camera.run_if(resource_changed::<GeneratedStadium>),
                    apply_time_of_day.run_if(resource_changed::<StadiumParams>),
                )
                    .chain(),
            );
    }
}

fn apply_time_of_day(
    params: Res<StadiumParams>,
    mut clear_color: ResMut<ClearColor>,
    mut ambient: ResMut<AmbientLight>,
    mut suns: Query<(&mut DirectionalLight, &mut Transform), With<Sun>>,
) {
    let env = environment(params.floodlights.time_of_day);
    clear_color.0 = srgb(env.sky);
    ambient.color = srgb(env.ambient);
    ambient.brightness = env.ambient_strength * AMBIENT_BRIGHTNESS_PER_UNIT;
    for (mut light, mut transform) in suns.iter_mut() {
        light.color = srgb(env.sun);
        light.illuminance = env.sun_strength * SUN_ILLUMINANCE_PER_UNIT;
        *transform = Transform::from_translation(env.sun_position).looking_at(Vec3::ZERO, Vec3::Y);
    }
}

// keep the camera over the venue
fn fit_camera(generated: Res<GeneratedStadium>, mut cameras: Query<&mut RtsCamera>) {
    let extent = generated.extent.max(CAMERA_MIN_EXTENT);
    for mut camera in cameras.iter_mut() {
        camera.bounds = Aabb2d::new(Vec2::ZERO, Vec2::splat(extent));
        camera.height_max = extent * CAMERA_HEIGHT_FACTOR;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn night_is_darker_than_day() {
        let (day, night) = (environment(TimeOfDay::Day), environment(TimeOfDay::Night));
        assert!(night.sun_strength < day.sun_strength);
        assert!(night.ambient_strength < day.ambient_strength);
        let brightness = |c: Rgb| c.iter().map(|&v| v as u32).sum::<u32>();
        assert!(brightness(night.sky) < brightness(day.sky));
    }

    #[test]
    fn lighting_follows_time_of_day() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ClearColor>()
            .init_resource::<AmbientLight>()
            .init_resource::<StadiumParams>()
            .add_systems(Update, apply_time_of_day);
        let sun = app
            .world_mut()
            .spawn((Sun, DirectionalLight::default(), Transform::default()))
            .id();

        app.world_mut().resource_mut::<StadiumParams>().floodlights.time_of_day = TimeOfDay::Night;
        app.update();

        let light = app.world().entity(sun).get::<DirectionalLight>().map(|l| l.illuminance);
        assert_eq!(light, Some(0.12 * SUN_ILLUMINANCE_PER_UNIT));
        assert_eq!(app.world().resource::<ClearColor>().0, srgb([0x0a, 0x0a, 0x22]));
    }
}
