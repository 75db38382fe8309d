use std::collections::HashMap;

use seedmap_shared::{BLOCKS_PER_CELL, CategoryCode, biome_label};

use crate::error::MapError;
use crate::viewport::ViewportState;

/// Last known category per biome cell, for hit-testing.
/// Filled as tile results arrive; dropped wholesale when the seed changes.
#[derive(Debug, Default)]
pub struct ContentCache {
    cells: HashMap<(i64, i64), CategoryCode>,
}

/// A successful hit-test: world block coordinates and the biome label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitResult {
    pub world_x: i64,
    pub world_z: i64,
    pub code: CategoryCode,
    pub label: &'static str,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a row-major `width x height` tile result whose top-left cell is
    /// `(origin_x, origin_z)`. A short result keeps the cells it has.
    pub fn record(
        &mut self,
        grid: &[CategoryCode],
        origin_x: i64,
        origin_z: i64,
        width: u32,
        height: u32,
    ) -> Result<(), MapError> {
        let width = width as usize;
        let height = height as usize;
        let expected = width * height;
        for (idx, &code) in grid.iter().take(expected).enumerate() {
            let i = (idx % width) as i64;
            let j = (idx / width) as i64;
            self.cells.insert((origin_x + i, origin_z + j), code);
        }
        if grid.len() < expected {
            return Err(MapError::TileSizeMismatch {
                origin_x,
                origin_z,
                expected,
                actual: grid.len(),
            });
        }
        Ok(())
    }

    pub fn lookup(&self, cx: i64, cz: i64) -> Option<CategoryCode> {
        self.cells.get(&(cx, cz)).copied()
    }

    pub fn reset_for_new_seed(&mut self) {
        self.cells.clear();
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Resolve a canvas pixel to the cached biome under it.
pub fn hit_test(
    viewport: &ViewportState,
    cache: &ContentCache,
    px: f64,
    pz: f64,
) -> Option<HitResult> {
    if px < 0.0
        || pz < 0.0
        || px >= f64::from(viewport.canvas_width)
        || pz >= f64::from(viewport.canvas_height)
    {
        return None;
    }
    let (cx, cz) = viewport.screen_to_world(px, pz);
    let code = cache.lookup(cx, cz)?;
    let label = biome_label(code)?;
    Some(HitResult {
        world_x: cx * BLOCKS_PER_CELL,
        world_z: cz * BLOCKS_PER_CELL,
        code,
        label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> ViewportState {
        ViewportState {
            draw_dim: 50,
            pix_dim: 1,
            offset_x: 5,
            offset_z: 5,
            canvas_width: 500,
            canvas_height: 500,
        }
    }

    #[test]
    fn record_is_row_major() {
        let mut cache = ContentCache::new();
        // 3 wide, 2 tall
        cache.record(&[1, 2, 3, 4, 5, 6], 10, -20, 3, 2).unwrap();
        assert_eq!(cache.lookup(10, -20), Some(1));
        assert_eq!(cache.lookup(12, -20), Some(3));
        assert_eq!(cache.lookup(10, -19), Some(4));
        assert_eq!(cache.lookup(12, -19), Some(6));
        assert_eq!(cache.lookup(13, -19), None);
        assert_eq!(cache.len(), 6);
    }

    #[test]
    fn short_result_keeps_present_cells() {
        let mut cache = ContentCache::new();
        let err = cache.record(&[7, 7, 7], 0, 0, 2, 2).unwrap_err();
        assert_eq!(
            err,
            MapError::TileSizeMismatch {
                origin_x: 0,
                origin_z: 0,
                expected: 4,
                actual: 3
            }
        );
        assert_eq!(cache.lookup(0, 1), Some(7));
        assert_eq!(cache.lookup(1, 1), None);
    }

    #[test]
    fn long_result_ignores_excess() {
        let mut cache = ContentCache::new();
        cache.record(&[1, 1, 1, 1, 9, 9], 0, 0, 2, 2).unwrap();
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn reset_drops_everything() {
        let mut cache = ContentCache::new();
        cache.record(&[1, 2, 3, 4], 0, 0, 2, 2).unwrap();
        cache.reset_for_new_seed();
        assert!(cache.is_empty());
        assert_eq!(cache.lookup(0, 0), None);
    }

    #[test]
    fn hit_test_reports_block_coordinates() {
        let mut cache = ContentCache::new();
        cache.record(&[1, 4, 7, 21], 0, 0, 2, 2).unwrap();
        let vp = viewport();

        let hit = hit_test(&vp, &cache, 250.0, 250.0).unwrap();
        assert_eq!((hit.world_x, hit.world_z), (0, 0));
        assert_eq!(hit.label, "Plains");

        let hit = hit_test(&vp, &cache, 251.2, 251.7).unwrap();
        assert_eq!((hit.world_x, hit.world_z), (4, 4));
        assert_eq!(hit.label, "Jungle");
    }

    #[test]
    fn hit_test_misses() {
        let mut cache = ContentCache::new();
        cache.record(&[1, 250], 0, 0, 2, 1).unwrap();
        let vp = viewport();

        // Uncached cell
        assert_eq!(hit_test(&vp, &cache, 10.0, 10.0), None);
        // Cached but unlabelled code
        assert_eq!(hit_test(&vp, &cache, 251.0, 250.0), None);
        // Off the canvas
        assert_eq!(hit_test(&vp, &cache, -1.0, 250.0), None);
        assert_eq!(hit_test(&vp, &cache, 500.0, 250.0), None);
    }
}
