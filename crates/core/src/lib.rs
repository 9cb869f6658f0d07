//! Core library for the Photo Booth application.
//!
//! Uploaded images become instant prints in three steps. Each module owns one
//! of them:
//!
//! - [`framing`] composes a source image and caption into a fixed-ratio print.
//! - [`lifecycle`] holds pending uploads, the release queue and the placed
//!   prints, and moves photos between them.
//! - [`surface`] decides where released prints land, their stacking order and
//!   their scale.

pub mod config;
pub mod error;
pub mod framing;
pub mod lifecycle;
pub mod source;
pub mod surface;

pub use config::{BoothConfig, DevelopConfig, FramingConfig, SurfaceConfig};
pub use error::{BoothError, Result};
pub use framing::{
    CaptionRenderer, CropBox, FrameLayout, FramedArtifact, FramedBitmap, Framer, PolaroidFramer,
};
pub use lifecycle::{BoothSnapshot, DevelopReport, PendingView, PhotoBooth, PhotoState};
pub use source::{PhotoId, SourceImage};
pub use surface::{PlacedItem, RandomSource, SeededRandom, SpatialModel};
