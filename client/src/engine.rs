use seedmap_shared::{CategoryCode, Seed, StructureKind, WorldPos};

use crate::scheduler::TileRegion;

pub type TileCallback = Box<dyn FnOnce(Vec<CategoryCode>)>;
pub type PointCallback = Box<dyn FnOnce(WorldPos)>;
pub type PointsCallback = Box<dyn FnOnce(Vec<WorldPos>)>;

/// One asynchronous tile computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRequest {
    pub version: String,
    pub seed: Seed,
    pub pix_dim: u8,
    pub region: TileRegion,
}

/// The external world-content engine.
///
/// Every call returns immediately and invokes its callback exactly once, on the
/// same thread, possibly before the call returns. No ordering between callbacks
/// is assumed.
pub trait WorldEngine {
    /// Compute the row-major `width x height` category grid for the region.
    fn request_tile(&self, request: &TileRequest, done: TileCallback);
    fn find_spawn(&self, version: &str, seed: Seed, done: PointCallback);
    fn find_strongholds(&self, version: &str, seed: Seed, count: u32, done: PointsCallback);
    fn structures_in_regions(
        &self,
        version: &str,
        kind: StructureKind,
        seed: Seed,
        region_radius: u32,
        done: PointsCallback,
    );
    /// Per-request resolution hint, updated on every zoom change.
    fn set_resolution(&self, pix_dim: u8);
}
