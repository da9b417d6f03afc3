use bevy::prelude::*;
use bevy::math::bounding::Aabb2d;
use bevy::window::{WindowPlugin, PrimaryWindow};
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy_egui::EguiPlugin;
use bevy_rts_camera::*;
use clap::Parser;
use std::path::PathBuf;

pub mod config;
pub mod systems;

// import modules here
use systems::stadium::{StadiumPlugin, Sun};
use systems::stadium::params::StadiumParams;
use systems::stadium::preset::load_preset;
use systems::stadium::textures::AdTexture;
use systems::ui::UIPlugin;

/// Parametric football and cricket stadium generator.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// TOML preset to start from; missing fields keep their defaults
    #[arg(long)]
    preset: Option<PathBuf>,

    /// banner image for the ad hoardings, relative to the assets folder
    #[arg(long)]
    ad_image: Option<String>,
}

fn main() -> bevy::app::AppExit {
    let cli = Cli::parse();

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Stadium Generator".into(),
                mode: bevy::window::WindowMode::Windowed,
                resolution: bevy::window::WindowResolution::new(1920.0, 1080.0),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(RtsCameraPlugin);

    // presets go in before the plugin so they win over the defaults
    if let Some(path) = &cli.preset {
        match load_preset(path) {
            Ok(params) => {
                info!("using preset {}", path.display());
                app.insert_resource(params);
            }
            Err(e) => warn!("{}, starting from defaults", e),
        }
    }

    app
        // my custom plugins
        .add_plugins(StadiumPlugin)
        .add_plugins(UIPlugin)

        .add_systems(Startup, (start, maximize_window))
        .add_systems(Update, handle_exit);

    if let Some(path) = cli.ad_image {
        app.add_systems(Startup, move |mut ad: ResMut<AdTexture>, asset_server: Res<AssetServer>| {
            ad.request(path.clone(), &asset_server);
        });
    }

    app.run()
}

fn maximize_window(mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    for mut window in windows.iter_mut() {
        window.set_maximized(true);
    }
}

// application entry point here
fn start(
    mut commands: Commands,
    params: Res<StadiumParams>,
) {
    // spawn camera, bounds are refitted after every pass
    commands.spawn((
        RtsCamera {
            bounds: Aabb2d::new(
                Vec2::ZERO,
                Vec2::splat(config::CAMERA_MIN_EXTENT * 2.0),
            ),
            min_angle: 0.4,
            height_max: 400.0,
            ..default()
        },
        RtsCameraControls {
            key_up: KeyCode::KeyW,
            key_down: KeyCode::KeyS,
            key_left: KeyCode::KeyA,
            key_right: KeyCode::KeyD,
            key_rotate_left: KeyCode::KeyQ,
            key_rotate_right: KeyCode::KeyE,
            pan_speed: 60.0,
            zoom_sensitivity: 0.15,
            edge_pan_width: 0.0,
            ..default()
        },
    ));

    // sun; colour and angle follow the time of day
    commands.spawn((
        Sun,
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::default(),
    ));

    info!("starting with {:?} layout", params.sport);
}

// application exit
fn handle_exit(
    keys: Res<ButtonInput<KeyCode>>,
    mut exit: EventWriter<AppExit>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_parse() {
        let cli = Cli::try_parse_from(["stadium_gen", "--preset", "night.toml", "--ad-image", "ads/banner.png"]).unwrap();
        assert_eq!(cli.preset, Some(PathBuf::from("night.toml")));
        assert_eq!(cli.ad_image.as_deref(), Some("ads/banner.png"));

        let bare = Cli::try_parse_from(["stadium_gen"]).unwrap();
        assert!(bare.preset.is_none() && bare.ad_image.is_none());
    }
}
