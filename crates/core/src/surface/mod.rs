use std::{
    collections::hash_map::RandomState,
    fmt,
    hash::BuildHasher,
    time::{SystemTime, UNIX_EPOCH},
};

use serde::Serialize;

use crate::{config::SurfaceConfig, FramedArtifact, PhotoId};

/// Source of uniform samples used to scatter prints over the surface.
pub trait RandomSource: Send {
    /// Returns a sample in `[0, 1)`.
    fn next_unit(&mut self) -> f32;
}

/// SplitMix64 generator. Seed it explicitly for reproducible layouts.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seeds from the clock mixed with the process hasher keys.
    pub fn from_entropy() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::new(RandomState::new().hash_one(nanos))
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f32 {
        // top 24 bits fill the f32 mantissa exactly
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }
}

/// A print lying on the surface.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedItem {
    pub artifact: FramedArtifact,
    pub x: f32,
    pub y: f32,
    pub rotation_deg: f32,
    pub z_index: u64,
    pub scale: f32,
}

impl PlacedItem {
    pub fn id(&self) -> PhotoId {
        self.artifact.id
    }
}

/// Decides where released prints land and keeps the stacking order.
///
/// The stacking counter only ever moves forward; every placement and every
/// bring-to-front takes the next value, so two items never share an index.
pub struct SpatialModel {
    config: SurfaceConfig,
    last_z: u64,
    rng: Box<dyn RandomSource>,
}

impl SpatialModel {
    pub fn new(config: SurfaceConfig, rng: Box<dyn RandomSource>) -> Self {
        Self {
            config,
            last_z: 0,
            rng,
        }
    }

    pub fn seeded(config: SurfaceConfig, seed: u64) -> Self {
        Self::new(config, Box::new(SeededRandom::new(seed)))
    }

    /// Highest stacking index issued so far, 0 before the first placement.
    pub fn last_stacking_index(&self) -> u64 {
        self.last_z
    }

    /// Scatters `artifact` over a surface of the given size. The item's
    /// footprint stays at least `margin` away from every edge; surfaces too
    /// small for that pin the item to the top-left margin.
    pub fn place(
        &mut self,
        artifact: FramedArtifact,
        surface_width: f32,
        surface_height: f32,
    ) -> PlacedItem {
        let cfg = &self.config;
        let span_x = (surface_width - cfg.item_width - 2.0 * cfg.margin).max(0.0);
        let span_y = (surface_height - cfg.item_height - 2.0 * cfg.margin).max(0.0);
        let (margin, max_rotation, scale) = (cfg.margin, cfg.max_rotation_deg, cfg.initial_scale);

        let x = margin + self.rng.next_unit() * span_x;
        let y = margin + self.rng.next_unit() * span_y;
        let rotation_deg = (self.rng.next_unit() * 2.0 - 1.0) * max_rotation;
        let z_index = self.next_stacking_index();

        tracing::debug!(id = %artifact.id, x, y, rotation_deg, z_index, "placed print");
        PlacedItem {
            artifact,
            x,
            y,
            rotation_deg,
            z_index,
            scale,
        }
    }

    /// Moves `item` above everything placed or raised so far.
    pub fn bring_to_front(&mut self, item: &mut PlacedItem) -> u64 {
        item.z_index = self.next_stacking_index();
        item.z_index
    }

    /// Adds `delta` to the item's scale, clamped to the configured bounds.
    /// A NaN delta leaves the scale untouched.
    pub fn rescale(&self, item: &mut PlacedItem, delta: f32) -> f32 {
        if !delta.is_nan() {
            item.scale = (item.scale + delta).clamp(self.config.min_scale, self.config.max_scale);
        }
        item.scale
    }

    fn next_stacking_index(&mut self) -> u64 {
        self.last_z += 1;
        self.last_z
    }
}

impl fmt::Debug for SpatialModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialModel")
            .field("config", &self.config)
            .field("last_z", &self.last_z)
            .finish()
    }
}
