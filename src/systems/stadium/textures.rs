// generated textures and the uploaded ad banner

use bevy::asset::AssetLoadFailedEvent;
use bevy::image::{ImageAddressMode, ImageLoaderSettings, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use std::collections::{HashMap, HashSet};

use crate::config::*;
use super::RegenerateEvent;
use super::params::Rgb;
use super::scene::TextureRef;

const STRIPE_DARK: Rgb = [0x38, 0x8E, 0x3C];
const STRIPE_LIGHT: Rgb = [0x43, 0xA0, 0x47];
const STRIPE_TEXTURE_SIZE: (u32, u32) = (1024, 512);
const BANNER_TEXTURE_SIZE: (u32, u32) = (256, 64);
const LED_PITCH: u32 = 4;

fn repeat_sampler() -> ImageSampler {
    ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v: ImageAddressMode::Repeat,
        ..default()
    })
}

fn rgba_image(size: (u32, u32), pixel: impl Fn(u32, u32) -> [u8; 4]) -> Image {
    let (w, h) = size;
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&pixel(x, y));
        }
    }
    Image::new(
        Extent3d {
            width: w,
            height: h,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    )
}

/// Mowing stripes across the pitch length.
pub fn pitch_stripes_image() -> Image {
    let (w, _) = STRIPE_TEXTURE_SIZE;
    let stripe = (w / PITCH_STRIPES).max(1);
    rgba_image(STRIPE_TEXTURE_SIZE, |x, _| {
        let [r, g, b] = if (x / stripe) % 2 == 0 { STRIPE_DARK } else { STRIPE_LIGHT };
        [r, g, b, 255]
    })
}

/// LED-grid placeholder banner in the ad colour, tiled along the hoardings.
pub fn placeholder_banner_image(color: Rgb) -> Image {
    let (w, _) = BANNER_TEXTURE_SIZE;
    let mut image = rgba_image(BANNER_TEXTURE_SIZE, |x, y| {
        // dark gap between leds
        if x % LED_PITCH == LED_PITCH - 1 || y % LED_PITCH == LED_PITCH - 1 {
            return [0, 0, 0, 255];
        }
        let wave = 0.6 + 0.4 * (x as f32 / w as f32 * std::f32::consts::TAU * 2.0).sin();
        let [r, g, b] = color.map(|c| (c as f32 * wave) as u8);
        [r, g, b, 255]
    });
    image.sampler = repeat_sampler();
    image
}

/// Banner upload state. Only the most recent request can become active.
#[derive(Resource, Default)]
pub struct AdTexture {
    pub pending: Option<Handle<Image>>,
    pub active: Option<Handle<Image>>,
    pub path: Option<String>,
}

impl AdTexture {
    pub fn request(&mut self, path: impl Into<String>, asset_server: &AssetServer) {
        let path = path.into();
        info!("loading ad banner {}", path);
        self.pending = Some(asset_server.load_with_settings(path.clone(), |s: &mut ImageLoaderSettings| {
            s.sampler = repeat_sampler();
        }));
        self.path = Some(path);
    }

    /// Back to the generated placeholder. Returns true if a banner was in use.
    pub fn clear(&mut self) -> bool {
        self.pending = None;
        self.path = None;
        self.active.take().is_some()
    }

    /// Width over height of the active upload.
    pub fn aspect(&self, images: &Assets<Image>) -> Option<f32> {
        let image = images.get(self.active.as_ref()?)?;
        let size = image.size();
        (size.y > 0).then(|| size.x as f32 / size.y as f32)
    }
}

/// Generated images, made once and shared by every pass.
#[derive(Resource, Default)]
pub struct GeneratedTextures {
    stripes: Option<Handle<Image>>,
    banners: HashMap<Rgb, Handle<Image>>,
}

impl GeneratedTextures {
    pub fn resolve(&mut self, texture: TextureRef, ad: &AdTexture, images: &mut Assets<Image>) -> Handle<Image> {
        match texture {
            TextureRef::PitchStripes => self
                .stripes
                .get_or_insert_with(|| images.add(pitch_stripes_image()))
                .clone(),
            TextureRef::AdBanner(color) => match &ad.active {
                Some(upload) => upload.clone(),
                None => self
                    .banners
                    .entry(color)
                    .or_insert_with(|| images.add(placeholder_banner_image(color)))
                    .clone(),
            },
        }
    }

    /// Frees placeholder banners for colours outside `keep`.
    pub fn retain_banners(&mut self, keep: &HashSet<Rgb>, images: &mut Assets<Image>) {
        self.banners.retain(|color, handle| {
            let used = keep.contains(color);
            if !used {
                images.remove(handle.id());
            }
            used
        });
    }

    pub fn banner_count(&self) -> usize {
        self.banners.len()
    }
}

// swap in a finished upload and rebuild once
pub fn promote_ad_upload(
    mut loaded: EventReader<AssetEvent<Image>>,
    mut failed: EventReader<AssetLoadFailedEvent<Image>>,
    mut ad: ResMut<AdTexture>,
    mut regen: EventWriter<RegenerateEvent>,
) {
    for event in loaded.read() {
        let AssetEvent::LoadedWithDependencies { id } = event else {
            continue;
        };
        if ad.pending.as_ref().is_some_and(|h| h.id() == *id) {
            ad.active = ad.pending.take();
            regen.write(RegenerateEvent);
        }
    }
    for event in failed.read() {
        if ad.pending.as_ref().is_some_and(|h| h.id() == event.id) {
            warn!("ad banner {} failed to load: {}", event.path, event.error);
            ad.pending = None;
            ad.path = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stripes_alternate() {
        let image = pitch_stripes_image();
        let stripe = STRIPE_TEXTURE_SIZE.0 / PITCH_STRIPES;
        let data = image.data.as_ref().map(Vec::as_slice).unwrap_or_default();
        assert_eq!(&data[0..3], &STRIPE_DARK);
        let second = (stripe * 4) as usize;
        assert_eq!(&data[second..second + 3], &STRIPE_LIGHT);
    }

    #[test]
    fn placeholder_matches_banner_aspect() {
        let image = placeholder_banner_image([0x94, 0x00, 0xff]);
        assert_eq!(image.width() as f32 / image.height() as f32, AD_PLACEHOLDER_ASPECT);
    }

    #[test]
    fn stale_banners_are_freed() {
        let mut images = Assets::<Image>::default();
        let mut textures = GeneratedTextures::default();
        let ad = AdTexture::default();
        let colors: Vec<Rgb> = (0..20).map(|i| [i * 10, 0, 0xff]).collect();
        for &c in &colors {
            textures.resolve(TextureRef::AdBanner(c), &ad, &mut images);
        }
        assert_eq!(images.len(), 20);

        textures.retain_banners(&HashSet::from([colors[3]]), &mut images);
        assert_eq!(textures.banner_count(), 1);
        assert_eq!(images.len(), 1);
    }

    #[test]
    fn clearing_reports_an_active_banner() {
        let mut ad = AdTexture::default();
        assert!(!ad.clear());
        ad.active = Some(Handle::default());
        assert!(ad.clear());
        assert!(ad.active.is_none());
    }
}
