// scene model
// the generators only describe what to draw; spawn.rs turns the tree into entities

use bevy::prelude::*;
use std::hash::{Hash, Hasher};

use super::params::Rgb;

/// Textures that are resolved at spawn time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureRef {
    PitchStripes,
    // uploaded ad image, or a generated placeholder in this colour
    AdBanner(Rgb),
}

/// Surface description, used as the material cache key.
#[derive(Clone, Copy, Debug)]
pub struct Paint {
    pub color: Rgb,
    pub texture: Option<TextureRef>,
    pub emissive: f32,
    pub roughness: f32,
    pub metallic: f32,
    pub opacity: f32,
    pub double_sided: bool,
    pub uv_repeat: Vec2,
}

impl Paint {
    pub fn solid(color: Rgb) -> Self {
        Self {
            color,
            texture: None,
            emissive: 0.0,
            roughness: 0.8,
            metallic: 0.1,
            opacity: 1.0,
            double_sided: false,
            uv_repeat: Vec2::ONE,
        }
    }

    pub fn rough(mut self, roughness: f32, metallic: f32) -> Self {
        self.roughness = roughness;
        self.metallic = metallic;
        self
    }

    pub fn glowing(mut self, intensity: f32) -> Self {
        self.emissive = intensity;
        self
    }

    pub fn translucent(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }

    pub fn textured(mut self, texture: TextureRef, repeat: Vec2) -> Self {
        self.texture = Some(texture);
        self.uv_repeat = repeat;
        self
    }

    fn key(&self) -> (Rgb, Option<TextureRef>, [u32; 6], bool) {
        (
            self.color,
            self.texture,
            [
                self.emissive.to_bits(),
                self.roughness.to_bits(),
                self.metallic.to_bits(),
                self.opacity.to_bits(),
                self.uv_repeat.x.to_bits(),
                self.uv_repeat.y.to_bits(),
            ],
            self.double_sided,
        )
    }
}

impl PartialEq for Paint {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Paint {}

impl Hash for Paint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Geometry of one drawable, in the node's local frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// centred box with full extents
    Cuboid(Vec3),
    /// Y-aligned, centred
    Cylinder { radius: f32, height: f32 },
    /// XY plane facing +Z
    Rect(Vec2),
    /// XZ plane facing +Y
    Ground(Vec2),
    /// outline in local XY, extruded along +Z from 0 to `depth`
    Profile { outline: Vec<Vec2>, depth: f32 },
    /// flat plate in XZ between an outer loop and one hole, centred on y
    Slab { outer: Vec<Vec2>, hole: Vec<Vec2>, thickness: f32 },
    /// filled ellipse in XZ facing +Y
    Ellipse { radii: Vec2, segments: usize },
    /// circular tube along a closed XZ path
    Tube { path: Vec<Vec3>, radius: f32, radial_segments: usize },
    /// vertical ribbon standing on a closed XZ path
    Band { path: Vec<Vec3>, height: f32 },
    /// flat triangle in local XY
    Triangle([Vec2; 3]),
    Polyline { points: Vec<Vec3>, closed: bool },
}

/// A spot light aimed down the node's -Z axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotFixture {
    pub color: Rgb,
    pub intensity: f32,
    pub range: f32,
    pub outer_angle: f32,
    pub inner_angle: f32,
    pub shadows: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Visual {
    Mesh { shape: Shape, paint: Paint, shadows: bool },
    Spot(SpotFixture),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneNode {
    pub name: Option<String>,
    pub transform: Transform,
    pub visual: Option<Visual>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..default()
        }
    }

    pub fn mesh(shape: Shape, paint: Paint) -> Self {
        Self {
            visual: Some(Visual::Mesh { shape, paint, shadows: true }),
            ..default()
        }
    }

    pub fn spot(fixture: SpotFixture) -> Self {
        Self {
            visual: Some(Visual::Spot(fixture)),
            ..default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn at(mut self, translation: Vec3) -> Self {
        self.transform.translation = translation;
        self
    }

    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn without_shadows(mut self) -> Self {
        if let Some(Visual::Mesh { shadows, .. }) = &mut self.visual {
            *shadows = false;
        }
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = SceneNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// this node plus all descendants
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::count).sum::<usize>()
    }

    /// Depth-first search by exact name.
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        if self.name.as_deref() == Some(name) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    /// Visit every node with its accumulated world transform.
    pub fn walk(&self, parent: &GlobalTransform, f: &mut impl FnMut(&SceneNode, &GlobalTransform)) {
        let world = parent.mul_transform(self.transform);
        f(self, &world);
        for child in &self.children {
            child.walk(&world, f);
        }
    }
}

/// Roof slab data the scoreboard needs, in stand-local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoofAnchor {
    pub slab_center_y: f32,
    pub thickness: f32,
}

impl RoofAnchor {
    pub fn top(&self) -> f32 {
        self.slab_center_y + self.thickness / 2.0
    }
}

/// Everything one generation pass produced.
#[derive(Clone, Debug, Default)]
pub struct StadiumModel {
    pub nodes: Vec<SceneNode>,
    pub stands: super::geometry::stands::StandLayout,
    /// half size of the venue footprint, for fitting the camera
    pub extent: f32,
}

impl StadiumModel {
    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(SceneNode::count).sum()
    }

    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        self.nodes.iter().find_map(|n| n.find(name))
    }

    /// Every named node, depth-first.
    pub fn names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for node in &self.nodes {
            node.walk(&GlobalTransform::IDENTITY, &mut |n, _| {
                if let Some(name) = &n.name {
                    names.push(name.clone());
                }
            });
        }
        names
    }

    pub fn spots(&self) -> Vec<SpotFixture> {
        let mut spots = Vec::new();
        for node in &self.nodes {
            node.walk(&GlobalTransform::IDENTITY, &mut |n, _| {
                if let Some(Visual::Spot(s)) = &n.visual {
                    spots.push(*s);
                }
            });
        }
        spots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_equality_tracks_every_field() {
        let a = Paint::solid([1, 2, 3]);
        assert_eq!(a, Paint::solid([1, 2, 3]));
        assert_ne!(a, a.glowing(0.5));
        assert_ne!(a, a.double_sided());
        assert_ne!(a, a.textured(TextureRef::PitchStripes, Vec2::ONE));
    }

    #[test]
    fn walk_accumulates_transforms() {
        let tree = SceneNode::group("root")
            .at(Vec3::new(10.0, 0.0, 0.0))
            .with_child(SceneNode::group("leaf").at(Vec3::new(0.0, 2.0, 0.0)));

        let mut leaf_pos = None;
        tree.walk(&GlobalTransform::IDENTITY, &mut |n, t| {
            if n.name.as_deref() == Some("leaf") {
                leaf_pos = Some(t.translation());
            }
        });
        assert_eq!(leaf_pos, Some(Vec3::new(10.0, 2.0, 0.0)));
        assert_eq!(tree.count(), 2);
    }
}
