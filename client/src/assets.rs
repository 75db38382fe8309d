use std::collections::HashMap;
use std::collections::hash_map::Entry;

use seedmap_shared::StructureKind;

use crate::viewport::ViewportSnapshot;

pub const SPAWN_SRC: &str = "/img/spawn.png";
pub const STRONGHOLD_SRC: &str = "/img/eye.png";

pub type AssetCallback<I> = Box<dyn FnOnce(Result<I, String>)>;

/// Loads marker images. The callback runs exactly once, possibly synchronously.
pub trait AssetLoader {
    type Image;

    fn load(&self, src: &'static str, done: AssetCallback<Self::Image>);
}

/// Marker image used for an overlay point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerAsset {
    Spawn,
    Stronghold,
    Structure(StructureKind),
}

impl MarkerAsset {
    pub fn src(self) -> Option<&'static str> {
        match self {
            MarkerAsset::Spawn => Some(SPAWN_SRC),
            MarkerAsset::Stronghold => Some(STRONGHOLD_SRC),
            MarkerAsset::Structure(kind) => kind.marker_src(),
        }
    }

    /// Drawn size in pixels; markers are centred on their point.
    pub fn size(self) -> (f64, f64) {
        match self {
            MarkerAsset::Spawn => (32.0, 30.0),
            MarkerAsset::Stronghold | MarkerAsset::Structure(_) => (30.0, 30.0),
        }
    }

    /// Top-left corner and size of the marker centred on screen point `(sx, sz)`.
    pub fn rect_at(self, sx: i64, sz: i64) -> MarkerRect {
        let (width, height) = self.size();
        MarkerRect {
            x: sx as f64 - width / 2.0,
            y: sz as f64 - height / 2.0,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A marker paint waiting for its image, tagged with the viewport it was
/// computed for and the overlay epoch it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingPaint {
    pub snapshot: ViewportSnapshot,
    pub epoch: u64,
    pub rect: MarkerRect,
}

enum AssetSlot<I> {
    Loaded(I),
    Pending(Vec<PendingPaint>),
    Missing,
}

/// Result of asking the cache for an image.
pub enum AssetLookup<'a, I> {
    Ready(&'a I),
    /// Queued behind a load; `start_load` is true for the first paint of this asset.
    Queued { start_load: bool },
    Missing,
}

/// Marker image cache: loaded, pending (with queued paints), or missing.
pub struct AssetCache<I> {
    slots: HashMap<MarkerAsset, AssetSlot<I>>,
}

impl<I> Default for AssetCache<I> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<I> AssetCache<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the image if loaded; otherwise queue `paint` until it is.
    pub fn lookup_or_queue(&mut self, asset: MarkerAsset, paint: PendingPaint) -> AssetLookup<'_, I> {
        if asset.src().is_none() {
            return AssetLookup::Missing;
        }
        match self.slots.entry(asset) {
            Entry::Vacant(slot) => {
                slot.insert(AssetSlot::Pending(vec![paint]));
                AssetLookup::Queued { start_load: true }
            }
            Entry::Occupied(slot) => match slot.into_mut() {
                AssetSlot::Pending(queue) => {
                    queue.push(paint);
                    AssetLookup::Queued { start_load: false }
                }
                AssetSlot::Missing => AssetLookup::Missing,
                AssetSlot::Loaded(image) => AssetLookup::Ready(image),
            },
        }
    }

    /// Settle a load. Returns the queued paints on success; they are the caller's
    /// to validate against the current viewport.
    pub fn resolve(&mut self, asset: MarkerAsset, result: Result<I, String>) -> Vec<PendingPaint> {
        let queued = match self.slots.remove(&asset) {
            Some(AssetSlot::Pending(queue)) => queue,
            _ => Vec::new(),
        };
        match result {
            Ok(image) => {
                self.slots.insert(asset, AssetSlot::Loaded(image));
                queued
            }
            Err(_) => {
                self.slots.insert(asset, AssetSlot::Missing);
                Vec::new()
            }
        }
    }

    pub fn image(&self, asset: MarkerAsset) -> Option<&I> {
        match self.slots.get(&asset) {
            Some(AssetSlot::Loaded(image)) => Some(image),
            _ => None,
        }
    }

    pub fn is_pending(&self, asset: MarkerAsset) -> bool {
        matches!(self.slots.get(&asset), Some(AssetSlot::Pending(_)))
    }
}
