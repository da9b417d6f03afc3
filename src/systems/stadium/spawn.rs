// drawable sink: turns a StadiumModel into entities
// teardown of the previous pass and spawn of the next happen in one command batch

use bevy::math::Affine2;
use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use bevy::render::render_resource::Face;
use std::collections::{HashMap, HashSet};

use crate::config::FLOODLIGHT_LUMENS_PER_UNIT;
use super::RegenerateEvent;
use super::geometry::generate_stadium;
use super::geometry::mesh_gen::shape_to_mesh;
use super::geometry::stands::StandLayout;
use super::params::{Rgb, StadiumParams, srgb};
use super::scene::{Paint, SceneNode, Shape, SpotFixture, StadiumModel, TextureRef, Visual};
use super::textures::{AdTexture, GeneratedTextures};

/// Root of everything one pass spawned.
#[derive(Component)]
pub struct Stadium;

/// What the last pass produced, for the camera and the panel.
#[derive(Resource, Default)]
pub struct GeneratedStadium {
    pub root: Option<Entity>,
    pub stands: StandLayout,
    pub extent: f32,
    pub node_count: usize,
    pub passes: u32,
}

// unit primitives are shared and scaled per instance
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum SharedMesh {
    Cuboid([u32; 3]),
    Cylinder([u32; 2]),
    Rect([u32; 2]),
}

impl SharedMesh {
    fn of(shape: &Shape) -> Option<Self> {
        match shape {
            Shape::Cuboid(s) => Some(Self::Cuboid([s.x.to_bits(), s.y.to_bits(), s.z.to_bits()])),
            Shape::Cylinder { radius, height } => Some(Self::Cylinder([radius.to_bits(), height.to_bits()])),
            Shape::Rect(s) => Some(Self::Rect([s.x.to_bits(), s.y.to_bits()])),
            _ => None,
        }
    }
}

/// Materials and primitive meshes kept across passes.
/// Entries no longer referenced after a pass are dropped, which releases the assets.
#[derive(Resource, Default)]
pub struct RenderCache {
    materials: HashMap<Paint, Handle<StandardMaterial>>,
    meshes: HashMap<SharedMesh, Handle<Mesh>>,
    used_materials: HashSet<Paint>,
    used_meshes: HashSet<SharedMesh>,
    banner: Option<AssetId<Image>>,
}

impl RenderCache {
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    // banner materials hold the image they were built with
    fn invalidate_banner(&mut self, banner: Option<AssetId<Image>>) {
        if self.banner != banner {
            self.materials
                .retain(|paint, _| !matches!(paint.texture, Some(TextureRef::AdBanner(_))));
            self.banner = banner;
        }
    }

    // colours of every banner material still cached
    fn banner_colors(&self) -> HashSet<Rgb> {
        self.materials
            .keys()
            .filter_map(|paint| match paint.texture {
                Some(TextureRef::AdBanner(color)) => Some(color),
                _ => None,
            })
            .collect()
    }

    fn evict_unused(&mut self) {
        let (materials, meshes) = (std::mem::take(&mut self.used_materials), std::mem::take(&mut self.used_meshes));
        self.materials.retain(|paint, _| materials.contains(paint));
        self.meshes.retain(|key, _| meshes.contains(key));
    }
}

fn material_for(paint: &Paint, texture: Option<Handle<Image>>) -> StandardMaterial {
    let color = srgb(paint.color);
    let glow = texture.is_some() && paint.emissive > 0.0;
    StandardMaterial {
        base_color: color.with_alpha(paint.opacity),
        base_color_texture: texture.clone(),
        emissive: color.to_linear() * paint.emissive,
        emissive_texture: if glow { texture } else { None },
        perceptual_roughness: paint.roughness,
        metallic: paint.metallic,
        alpha_mode: if paint.opacity < 1.0 { AlphaMode::Blend } else { AlphaMode::Opaque },
        double_sided: paint.double_sided,
        cull_mode: if paint.double_sided { None } else { Some(Face::Back) },
        uv_transform: Affine2::from_scale(paint.uv_repeat),
        ..default()
    }
}

fn spot_light(spot: &SpotFixture) -> SpotLight {
    SpotLight {
        color: srgb(spot.color),
        intensity: spot.intensity * FLOODLIGHT_LUMENS_PER_UNIT,
        range: spot.range,
        shadows_enabled: spot.shadows,
        outer_angle: spot.outer_angle,
        inner_angle: spot.inner_angle.min(spot.outer_angle),
        ..default()
    }
}

/// Everything a pass needs to write into the world.
pub struct StadiumSink<'a, 'w, 's> {
    pub commands: &'a mut Commands<'w, 's>,
    pub cache: &'a mut RenderCache,
    pub textures: &'a mut GeneratedTextures,
    pub ad: &'a AdTexture,
    pub meshes: &'a mut Assets<Mesh>,
    pub materials: &'a mut Assets<StandardMaterial>,
    pub images: &'a mut Assets<Image>,
}

impl StadiumSink<'_, '_, '_> {
    fn material(&mut self, paint: &Paint) -> Handle<StandardMaterial> {
        self.cache.used_materials.insert(*paint);
        if let Some(handle) = self.cache.materials.get(paint) {
            return handle.clone();
        }
        let texture = paint
            .texture
            .map(|t| self.textures.resolve(t, self.ad, self.images));
        let handle = self.materials.add(material_for(paint, texture));
        self.cache.materials.insert(*paint, handle.clone());
        handle
    }

    fn mesh(&mut self, shape: &Shape) -> Handle<Mesh> {
        let Some(key) = SharedMesh::of(shape) else {
            return self.meshes.add(shape_to_mesh(shape));
        };
        self.cache.used_meshes.insert(key);
        if let Some(handle) = self.cache.meshes.get(&key) {
            return handle.clone();
        }
        let handle = self.meshes.add(shape_to_mesh(shape));
        self.cache.meshes.insert(key, handle.clone());
        handle
    }

    fn spawn_node(&mut self, node: &SceneNode) -> Entity {
        let mut entity = self.commands.spawn((node.transform, Visibility::default()));
        if let Some(name) = &node.name {
            entity.insert(Name::new(name.clone()));
        }
        let id = entity.id();

        match &node.visual {
            Some(Visual::Mesh { shape, paint, shadows }) => {
                let mesh = self.mesh(shape);
                let material = self.material(paint);
                let mut entity = self.commands.entity(id);
                entity.insert((Mesh3d(mesh), MeshMaterial3d(material)));
                if !shadows {
                    entity.insert(NotShadowCaster);
                }
            }
            Some(Visual::Spot(spot)) => {
                self.commands.entity(id).insert(spot_light(spot));
            }
            None => {}
        }

        let children: Vec<Entity> = node.children.iter().map(|c| self.spawn_node(c)).collect();
        if !children.is_empty() {
            self.commands.entity(id).add_children(&children);
        }
        id
    }

    /// Replace the previous pass with `model`.
    pub fn rebuild(&mut self, model: StadiumModel, generated: &mut GeneratedStadium) {
        if let Some(root) = generated.root.take() {
            self.commands.entity(root).try_despawn();
        }

        self.cache.invalidate_banner(self.ad.active.as_ref().map(Handle::id));
        let root = self
            .commands
            .spawn((Stadium, Name::new("Stadium"), Transform::default(), Visibility::default()))
            .id();
        let children: Vec<Entity> = model.nodes.iter().map(|n| self.spawn_node(n)).collect();
        self.commands.entity(root).add_children(&children);
        self.cache.evict_unused();
        self.textures.retain_banners(&self.cache.banner_colors(), self.images);

        generated.root = Some(root);
        generated.node_count = model.node_count();
        generated.extent = model.extent;
        generated.stands = model.stands;
        generated.passes += 1;
    }
}

// coalesce every request this frame into one pass
pub fn handle_regeneration(
    mut commands: Commands,
    mut events: EventReader<RegenerateEvent>,
    params: Res<StadiumParams>,
    ad: Res<AdTexture>,
    mut generated: ResMut<GeneratedStadium>,
    mut cache: ResMut<RenderCache>,
    mut textures: ResMut<GeneratedTextures>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    let model = generate_stadium(&params, ad.aspect(&images));
    info!(
        "stadium regenerated: {:?}, {} nodes, {} stands",
        params.sport,
        model.node_count(),
        model.stands.len()
    );

    StadiumSink {
        commands: &mut commands,
        cache: &mut cache,
        textures: &mut textures,
        ad: &ad,
        meshes: &mut meshes,
        materials: &mut materials,
        images: &mut images,
    }
    .rebuild(model, &mut generated);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::stadium::params::Sport;

    fn test_app(params: StadiumParams) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .init_asset::<Image>()
            .add_event::<RegenerateEvent>()
            .insert_resource(params)
            .init_resource::<AdTexture>()
            .init_resource::<GeneratedStadium>()
            .init_resource::<RenderCache>()
            .init_resource::<GeneratedTextures>()
            .add_systems(Update, handle_regeneration);
        app
    }

    fn regenerate(app: &mut App) -> (usize, Vec<String>) {
        app.world_mut().send_event(RegenerateEvent);
        app.update();
        let world = app.world_mut();
        let mut names: Vec<String> = world.query::<&Name>().iter(world).map(|n| n.as_str().to_owned()).collect();
        names.sort();
        let entities = world.query::<Entity>().iter(world).count();
        (entities, names)
    }

    #[test]
    fn regenerating_does_not_accumulate() {
        let mut app = test_app(StadiumParams::default());
        let first = regenerate(&mut app);
        let second = regenerate(&mut app);
        assert_eq!(first, second);
        assert_eq!(app.world().resource::<GeneratedStadium>().passes, 2);

        let world = app.world_mut();
        assert_eq!(world.query_filtered::<Entity, With<Stadium>>().iter(world).count(), 1);
    }

    #[test]
    fn spawned_nodes_match_the_model() {
        let params = StadiumParams::default();
        let expected = generate_stadium(&params, None).node_count();
        let mut app = test_app(params);
        regenerate(&mut app);

        let world = app.world_mut();
        let spawned = world.query_filtered::<Entity, With<ChildOf>>().iter(world).count();
        assert_eq!(spawned, expected);
        assert_eq!(app.world().resource::<GeneratedStadium>().node_count, expected);
    }

    #[test]
    fn unused_materials_are_evicted() {
        let mut app = test_app(StadiumParams::default());
        regenerate(&mut app);
        let football = app.world().resource::<RenderCache>().material_count();

        app.world_mut().resource_mut::<StadiumParams>().sport = Sport::Cricket;
        app.world_mut().resource_mut::<StadiumParams>().floodlights.show = false;
        regenerate(&mut app);
        assert!(app.world().resource::<RenderCache>().material_count() > 0);

        app.world_mut().resource_mut::<StadiumParams>().sport = Sport::Football;
        app.world_mut().resource_mut::<StadiumParams>().floodlights.show = true;
        regenerate(&mut app);
        assert_eq!(app.world().resource::<RenderCache>().material_count(), football);
    }

    #[test]
    fn recolouring_ads_does_not_pile_up_images() {
        let mut app = test_app(StadiumParams::default());
        regenerate(&mut app);
        let images = app.world().resource::<Assets<Image>>().len();
        assert!(images > 0);

        for i in 0..20u8 {
            app.world_mut().resource_mut::<StadiumParams>().extras.ad_color = [i * 12, 40, 200];
            regenerate(&mut app);
        }
        assert_eq!(app.world().resource::<Assets<Image>>().len(), images);
        assert_eq!(app.world().resource::<GeneratedTextures>().banner_count(), 1);
    }

    #[test]
    fn new_banner_drops_banner_materials() {
        let mut cache = RenderCache::default();
        let banner = Paint::solid([255, 255, 255]).textured(TextureRef::AdBanner([1, 2, 3]), Vec2::ONE);
        let plain = Paint::solid([1, 2, 3]);
        cache.materials.insert(banner, Handle::default());
        cache.materials.insert(plain, Handle::default());

        cache.invalidate_banner(None);
        assert_eq!(cache.material_count(), 2);
        cache.invalidate_banner(Some(AssetId::default()));
        assert_eq!(cache.material_count(), 1);
        assert!(cache.materials.contains_key(&plain));
    }

    #[test]
    fn material_follows_paint() {
        let paint = Paint::solid([255, 0, 0]).translucent(0.5).double_sided().glowing(2.0);
        let m = material_for(&paint, None);
        assert_eq!(m.alpha_mode, AlphaMode::Blend);
        assert!(m.cull_mode.is_none());
        assert!(m.emissive.red > 0.0);
        assert!(m.emissive_texture.is_none());

        let opaque = material_for(&Paint::solid([0, 0, 0]), None);
        assert_eq!(opaque.alpha_mode, AlphaMode::Opaque);
        assert_eq!(opaque.cull_mode, Some(Face::Back));
    }
}
