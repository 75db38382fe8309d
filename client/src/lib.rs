//! Incremental tiled seed map.
//!
//! The core ([`SeedMap`] and its parts) is headless and runs against any
//! [`WorldEngine`], [`PixelSurface`] and [`AssetLoader`]; [`web`] binds it to
//! a browser canvas and the page's JS engine.

pub mod assets;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod map;
pub mod overlay;
pub mod scheduler;
pub mod surface;
pub mod viewport;
pub mod web;

pub use assets::{AssetLoader, MarkerAsset};
pub use cache::{ContentCache, HitResult};
pub use config::{MapConfig, Settings};
pub use engine::{TileRequest, WorldEngine};
pub use error::MapError;
pub use map::SeedMap;
pub use overlay::PointKind;
pub use scheduler::{Operation, Phase, TileRegion};
pub use surface::{PixelBlock, PixelSurface, RasterImage, RasterSurface};
pub use viewport::{PanDirection, ViewportState};
