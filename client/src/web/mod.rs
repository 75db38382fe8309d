//! Browser bindings for the map: a 2D-canvas surface, an `<img>` marker
//! loader and the bridge to the JS world engine.

mod bridge;
mod images;
mod surface;

pub use bridge::{ENGINE_GLOBAL, EngineBridge, SeedEngine};
pub use images::ImageLoader;
pub use surface::CanvasSurface;

use crate::map::SeedMap;

pub type WebMap = SeedMap<EngineBridge, CanvasSurface, ImageLoader>;
