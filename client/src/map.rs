use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, info, warn};
use seedmap_shared::{CategoryCode, Seed, StructureKind, WorldPos};

use crate::assets::{AssetCache, AssetLoader, AssetLookup, MarkerAsset, PendingPaint};
use crate::cache::{ContentCache, HitResult, hit_test};
use crate::config::MapConfig;
use crate::engine::{TileRequest, WorldEngine};
use crate::error::MapError;
use crate::overlay::{OverlayState, PointKind};
use crate::scheduler::{Operation, Phase, TileRegion, TileScheduler, edge_strip, full_grid};
use crate::surface::{PixelBlock, PixelSurface};
use crate::viewport::{PanDirection, ViewportState};

pub type HitHandler = Rc<dyn Fn(&HitResult)>;
pub type PointsHandler = Rc<dyn Fn(PointKind, &[WorldPos])>;

/// A point-finder call, captured with the world it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PointsQuery {
    kind: PointKind,
    version: String,
    seed: Seed,
    stronghold_count: u32,
    region_radius: u32,
}

/// Outward calls computed under the state borrow and dispatched after it ends.
/// Engine and loader callbacks may run synchronously, so nothing outside the
/// state is touched while it is borrowed.
#[derive(Debug)]
enum Effect {
    Tile(TileRequest),
    SetResolution(u8),
    FindPoints(PointsQuery),
    LoadAsset(MarkerAsset),
    NotifyPoints(PointKind, Vec<WorldPos>),
}

struct MapState<S: PixelSurface> {
    config: MapConfig,
    version: String,
    seed: Option<Seed>,
    viewport: ViewportState,
    cache: ContentCache,
    scheduler: TileScheduler,
    overlay: OverlayState,
    assets: AssetCache<S::Image>,
    surface: S,
    show_labels: bool,
    /// Bumped whenever painted markers stop being valid: a cleared raster,
    /// a hidden kind, or a new world. Queued paints from older epochs are dropped.
    overlay_epoch: u64,
}

impl<S: PixelSurface> MapState<S> {
    fn is_current(&self, version: &str, seed: Seed) -> bool {
        self.seed == Some(seed) && self.version == version
    }

    fn bump_overlay_epoch(&mut self) {
        self.overlay_epoch = self.overlay_epoch.wrapping_add(1);
    }

    fn issue(&mut self, operation: Operation, regions: Vec<TileRegion>, seed: Seed) -> Vec<Effect> {
        if let Err(err) = self.scheduler.begin(operation, regions.len()) {
            debug!("{err}");
            return Vec::new();
        }
        debug!("{operation:?}: {} tile requests", regions.len());
        regions
            .into_iter()
            .map(|region| {
                Effect::Tile(TileRequest {
                    version: self.version.clone(),
                    seed,
                    pix_dim: self.viewport.pix_dim,
                    region,
                })
            })
            .collect()
    }

    fn full_redraw(&mut self) -> Vec<Effect> {
        let Some(seed) = self.seed else {
            debug!("redraw skipped: no seed set");
            return Vec::new();
        };
        if self.scheduler.is_busy() {
            if !self.scheduler.redraw_pending() {
                debug!(
                    "redraw deferred behind {} outstanding tiles",
                    self.scheduler.outstanding()
                );
            }
            self.scheduler.defer_redraw();
            return Vec::new();
        }
        self.bump_overlay_epoch();
        self.surface.clear();
        self.cache.reset_for_new_seed();
        let regions = full_grid(&self.viewport);
        self.issue(Operation::FullRedraw, regions, seed)
    }

    fn pan(&mut self, direction: PanDirection) -> Vec<Effect> {
        let Some(seed) = self.seed else {
            debug!("pan skipped: no seed set");
            return Vec::new();
        };
        let operation = Operation::Pan(direction);
        if let Err(err) = self.scheduler.check_idle(operation) {
            debug!("{err}");
            return Vec::new();
        }
        let ((dx, dy), strip) = self.viewport.pan(direction);
        self.surface.blit_self(dx, dy);
        self.surface.fill_background(strip, self.config.background);
        let regions = edge_strip(&self.viewport, strip);
        self.issue(operation, regions, seed)
    }

    fn zoom(&mut self, delta: i8) -> Vec<Effect> {
        if self.scheduler.is_busy() {
            debug!("zoom ignored while {} tiles are outstanding", self.scheduler.outstanding());
            return Vec::new();
        }
        if !self.viewport.zoom_by(delta) {
            return Vec::new();
        }
        let mut effects = vec![Effect::SetResolution(self.viewport.pix_dim)];
        effects.extend(self.full_redraw());
        effects
    }

    fn complete_tile(&mut self, request: &TileRequest, grid: Vec<CategoryCode>) -> Vec<Effect> {
        if self.is_current(&request.version, request.seed) {
            let region = &request.region;
            if let Err(err) = self.cache.record(
                &grid,
                region.origin_x,
                region.origin_z,
                region.width,
                region.height,
            ) {
                warn!("{err}");
            }
            let block = PixelBlock::from_categories(
                &grid,
                region.width,
                region.height,
                request.pix_dim,
                self.config.background,
            );
            self.surface.paint_block(region.screen_x, region.screen_y, &block);
        } else {
            debug!("discarding tile for seed {} (superseded)", request.seed);
        }

        let Some(settled) = self.scheduler.complete() else {
            return Vec::new();
        };
        if settled.redraw_pending {
            return self.full_redraw();
        }
        if settled.operation == Operation::FullRedraw {
            info!("redraw complete: {} cells cached", self.cache.len());
        }
        self.render_overlay(None)
    }

    /// Paint markers (and their labels) for the shown kinds, or just `only`.
    fn render_overlay(&mut self, only: Option<PointKind>) -> Vec<Effect> {
        let snapshot = self.viewport.snapshot();
        let epoch = self.overlay_epoch;
        let mut effects = Vec::new();
        for marker in self.overlay.markers(&self.viewport, only) {
            let asset = marker.kind.asset();
            let rect = asset.rect_at(marker.screen.0, marker.screen.1);
            match self
                .assets
                .lookup_or_queue(
                    asset,
                    PendingPaint {
                        snapshot,
                        epoch,
                        rect,
                    },
                )
            {
                AssetLookup::Ready(image) => {
                    self.surface
                        .draw_image(image, rect.x, rect.y, rect.width, rect.height);
                }
                AssetLookup::Queued { start_load: true } => effects.push(Effect::LoadAsset(asset)),
                AssetLookup::Queued { start_load: false } | AssetLookup::Missing => {}
            }
            if self.show_labels {
                self.surface.draw_label(
                    &marker.label(),
                    marker.screen.0 as f64,
                    marker.screen.1 as f64,
                );
            }
        }
        effects
    }

    fn complete_asset(&mut self, asset: MarkerAsset, result: Result<S::Image, String>) {
        if let Err(reason) = &result {
            warn!(
                "{}",
                MapError::AssetLoad {
                    src: asset.src().unwrap_or_default().to_string(),
                    reason: reason.clone(),
                }
            );
        }
        let queued = self.assets.resolve(asset, result);
        let Some(image) = self.assets.image(asset) else {
            return;
        };
        let current = self.viewport.snapshot();
        for paint in queued {
            if paint.snapshot != current || paint.epoch != self.overlay_epoch {
                debug!("dropping stale {asset:?} marker paint");
                continue;
            }
            let rect = paint.rect;
            self.surface
                .draw_image(image, rect.x, rect.y, rect.width, rect.height);
        }
    }

    fn fetch_points(&mut self, kind: PointKind) -> Vec<Effect> {
        let Some(seed) = self.seed else {
            return Vec::new();
        };
        if !self.overlay.claim_fetch(kind) {
            return Vec::new();
        }
        vec![Effect::FindPoints(PointsQuery {
            kind,
            version: self.version.clone(),
            seed,
            stronghold_count: self.config.stronghold_count,
            region_radius: self.config.structure_region_radius,
        })]
    }

    fn complete_points(&mut self, query: &PointsQuery, points: Vec<WorldPos>) -> Vec<Effect> {
        if !self.is_current(&query.version, query.seed) {
            debug!("discarding {:?} for seed {} (superseded)", query.kind, query.seed);
            return Vec::new();
        }
        for err in self
            .overlay
            .accept(query.kind, points, self.config.world_border)
        {
            warn!("{err}");
        }
        let mut effects = vec![Effect::NotifyPoints(
            query.kind,
            self.overlay.points(query.kind),
        )];
        // A busy map repaints every shown kind when it settles.
        if self.overlay.is_shown(query.kind) && !self.scheduler.is_busy() {
            effects.extend(self.render_overlay(Some(query.kind)));
        }
        effects
    }

    fn show(&mut self, kind: PointKind) -> Vec<Effect> {
        let changed = self.overlay.set_shown(kind, true);
        if !self.overlay.has_points(kind) {
            return self.fetch_points(kind);
        }
        if changed && !self.scheduler.is_busy() {
            return self.render_overlay(Some(kind));
        }
        Vec::new()
    }

    /// Markers are baked into the raster, so hiding repaints the map.
    fn hide(&mut self, kind: PointKind) -> Vec<Effect> {
        if self.overlay.set_shown(kind, false) {
            self.bump_overlay_epoch();
            self.full_redraw()
        } else {
            Vec::new()
        }
    }

    fn set_visible_structures(&mut self, kinds: &[StructureKind]) -> Vec<Effect> {
        let before: Vec<StructureKind> = self.overlay.visible_structures().collect();
        if !self.overlay.set_visible_structures(kinds) {
            return Vec::new();
        }
        let removed = before.iter().any(|kind| !kinds.contains(kind));
        let mut effects = Vec::new();
        for &kind in kinds {
            if before.contains(&kind) {
                continue;
            }
            let kind = PointKind::Structure(kind);
            if !self.overlay.has_points(kind) {
                effects.extend(self.fetch_points(kind));
            } else if !removed && !self.scheduler.is_busy() {
                effects.extend(self.render_overlay(Some(kind)));
            }
        }
        if removed {
            self.bump_overlay_epoch();
            effects.extend(self.full_redraw());
        }
        effects
    }

    fn set_show_labels(&mut self, show: bool) -> Vec<Effect> {
        if self.show_labels == show {
            return Vec::new();
        }
        self.show_labels = show;
        self.full_redraw()
    }

    /// Forget everything derived from the old world and refetch shown points.
    fn invalidate_world(&mut self) -> Vec<Effect> {
        self.bump_overlay_epoch();
        self.cache.reset_for_new_seed();
        self.overlay
            .reset_for_new_seed()
            .into_iter()
            .flat_map(|kind| self.fetch_points(kind))
            .collect()
    }

    fn set_seed(&mut self, seed: Seed) -> Vec<Effect> {
        if self.seed == Some(seed) {
            return Vec::new();
        }
        info!("seed set to {seed}");
        self.seed = Some(seed);
        self.invalidate_world()
    }

    fn set_version(&mut self, version: &str) -> Vec<Effect> {
        if self.version == version {
            return Vec::new();
        }
        info!("game version set to {version}");
        self.version = version.to_string();
        self.invalidate_world()
    }
}

struct Shared<E, S: PixelSurface, L> {
    engine: E,
    loader: L,
    state: RefCell<MapState<S>>,
    on_click: RefCell<Option<HitHandler>>,
    on_hover: RefCell<Option<HitHandler>>,
    on_points: RefCell<Option<PointsHandler>>,
}

/// Incremental tiled seed map.
///
/// Tile content comes from a [`WorldEngine`] one tile per request and is
/// painted into a [`PixelSurface`] as it arrives. Panning shifts the existing
/// raster and requests only the exposed strip. Structural operations
/// (redraw, pan, zoom) are serialized: pans and zooms while tiles are
/// outstanding are ignored, and a redraw is deferred until they settle.
///
/// Cloning yields another handle to the same map.
pub struct SeedMap<E, S: PixelSurface, L> {
    shared: Rc<Shared<E, S, L>>,
}

impl<E, S: PixelSurface, L> Clone for SeedMap<E, S, L> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<E, S, L> SeedMap<E, S, L>
where
    E: WorldEngine + 'static,
    S: PixelSurface + 'static,
    S::Image: 'static,
    L: AssetLoader<Image = S::Image> + 'static,
{
    pub fn new(config: MapConfig, surface: S, engine: E, loader: L) -> Result<Self, MapError> {
        config.validate()?;
        if surface.width() != config.canvas_width || surface.height() != config.canvas_height {
            warn!(
                "surface is {}x{} but map is configured for {}x{}",
                surface.width(),
                surface.height(),
                config.canvas_width,
                config.canvas_height
            );
        }
        let viewport = config.viewport();
        engine.set_resolution(viewport.pix_dim);
        let state = MapState {
            version: config.game_version.clone(),
            config,
            seed: None,
            viewport,
            cache: ContentCache::new(),
            scheduler: TileScheduler::new(),
            overlay: OverlayState::new(),
            assets: AssetCache::new(),
            surface,
            show_labels: true,
            overlay_epoch: 0,
        };
        Ok(Self {
            shared: Rc::new(Shared {
                engine,
                loader,
                state: RefCell::new(state),
                on_click: RefCell::new(None),
                on_hover: RefCell::new(None),
                on_points: RefCell::new(None),
            }),
        })
    }

    fn update(shared: &Rc<Shared<E, S, L>>, f: impl FnOnce(&mut MapState<S>) -> Vec<Effect>) {
        let effects = {
            let mut state = shared.state.borrow_mut();
            f(&mut state)
        };
        Self::dispatch(shared, effects);
    }

    fn run(&self, f: impl FnOnce(&mut MapState<S>) -> Vec<Effect>) {
        Self::update(&self.shared, f);
    }

    fn dispatch(shared: &Rc<Shared<E, S, L>>, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Tile(request) => {
                    let weak = Rc::downgrade(shared);
                    let issued = request.clone();
                    shared.engine.request_tile(
                        &request,
                        Box::new(move |grid| {
                            Self::with_live(&weak, |shared| {
                                Self::update(shared, |state| state.complete_tile(&issued, grid));
                            });
                        }),
                    );
                }
                Effect::SetResolution(pix_dim) => shared.engine.set_resolution(pix_dim),
                Effect::FindPoints(query) => Self::find_points(shared, query),
                Effect::LoadAsset(asset) => {
                    let Some(src) = asset.src() else {
                        continue;
                    };
                    let weak = Rc::downgrade(shared);
                    shared.loader.load(
                        src,
                        Box::new(move |result| {
                            Self::with_live(&weak, |shared| {
                                Self::update(shared, |state| {
                                    state.complete_asset(asset, result);
                                    Vec::new()
                                });
                            });
                        }),
                    );
                }
                Effect::NotifyPoints(kind, points) => {
                    let handler = shared.on_points.borrow().clone();
                    if let Some(handler) = handler {
                        handler(kind, &points);
                    }
                }
            }
        }
    }

    fn find_points(shared: &Rc<Shared<E, S, L>>, query: PointsQuery) {
        let weak = Rc::downgrade(shared);
        let kind = query.kind;
        let version = query.version.clone();
        let (seed, count, radius) = (query.seed, query.stronghold_count, query.region_radius);
        let deliver = move |points: Vec<WorldPos>| {
            Self::with_live(&weak, |shared| {
                Self::update(shared, |state| state.complete_points(&query, points));
            });
        };
        match kind {
            PointKind::Spawn => shared.engine.find_spawn(
                &version,
                seed,
                Box::new(move |pos| deliver(vec![pos])),
            ),
            PointKind::Strongholds => {
                shared
                    .engine
                    .find_strongholds(&version, seed, count, Box::new(deliver))
            }
            PointKind::Structure(structure) => shared.engine.structures_in_regions(
                &version,
                structure,
                seed,
                radius,
                Box::new(deliver),
            ),
        }
    }

    /// Callbacks that outlive the map are dropped silently.
    fn with_live(weak: &Weak<Shared<E, S, L>>, f: impl FnOnce(&Rc<Shared<E, S, L>>)) {
        if let Some(shared) = weak.upgrade() {
            f(&shared);
        }
    }

    /// Switch worlds. Cached content and fetched points are dropped and shown
    /// point kinds are fetched again; the raster is kept until the next redraw.
    pub fn set_seed(&self, seed: Seed) {
        self.run(|state| state.set_seed(seed));
    }

    pub fn set_game_version(&self, version: &str) {
        self.run(|state| state.set_version(version));
    }

    pub fn show_spawn(&self) {
        self.run(|state| state.show(PointKind::Spawn));
    }

    pub fn hide_spawn(&self) {
        self.run(|state| state.hide(PointKind::Spawn));
    }

    pub fn show_strongholds(&self) {
        self.run(|state| state.show(PointKind::Strongholds));
    }

    pub fn hide_strongholds(&self) {
        self.run(|state| state.hide(PointKind::Strongholds));
    }

    pub fn show_structure(&self, kind: StructureKind) {
        self.run(|state| state.show(PointKind::Structure(kind)));
    }

    pub fn hide_structure(&self, kind: StructureKind) {
        self.run(|state| state.hide(PointKind::Structure(kind)));
    }

    pub fn set_visible_structure_kinds(&self, kinds: &[StructureKind]) {
        self.run(|state| state.set_visible_structures(kinds));
    }

    pub fn set_show_coordinate_labels(&self, show: bool) {
        self.run(|state| state.set_show_labels(show));
    }

    pub fn redraw(&self) {
        self.run(MapState::full_redraw);
    }

    pub fn pan(&self, direction: PanDirection) {
        self.run(|state| state.pan(direction));
    }

    pub fn pan_left(&self) {
        self.pan(PanDirection::Left);
    }

    pub fn pan_right(&self) {
        self.pan(PanDirection::Right);
    }

    pub fn pan_up(&self) {
        self.pan(PanDirection::Up);
    }

    pub fn pan_down(&self) {
        self.pan(PanDirection::Down);
    }

    pub fn zoom_in(&self) {
        self.run(|state| state.zoom(1));
    }

    pub fn zoom_out(&self) {
        self.run(|state| state.zoom(-1));
    }

    pub fn hit_test(&self, px: f64, pz: f64) -> Option<HitResult> {
        let state = self.shared.state.borrow();
        hit_test(&state.viewport, &state.cache, px, pz)
    }

    pub fn set_click_handler(&self, handler: impl Fn(&HitResult) + 'static) {
        *self.shared.on_click.borrow_mut() = Some(Rc::new(handler));
    }

    pub fn set_hover_handler(&self, handler: impl Fn(&HitResult) + 'static) {
        *self.shared.on_hover.borrow_mut() = Some(Rc::new(handler));
    }

    pub fn set_points_handler(&self, handler: impl Fn(PointKind, &[WorldPos]) + 'static) {
        *self.shared.on_points.borrow_mut() = Some(Rc::new(handler));
    }

    /// Hit-test a click and pass a hit to the click handler.
    pub fn handle_click(&self, px: f64, pz: f64) -> Option<HitResult> {
        Self::notify(&self.shared.on_click, self.hit_test(px, pz))
    }

    pub fn handle_pointer_move(&self, px: f64, pz: f64) -> Option<HitResult> {
        Self::notify(&self.shared.on_hover, self.hit_test(px, pz))
    }

    fn notify(slot: &RefCell<Option<HitHandler>>, hit: Option<HitResult>) -> Option<HitResult> {
        let hit = hit?;
        let handler = slot.borrow().clone();
        if let Some(handler) = handler {
            handler(&hit);
        }
        Some(hit)
    }

    pub fn phase(&self) -> Phase {
        self.shared.state.borrow().scheduler.phase()
    }

    pub fn outstanding_tiles(&self) -> usize {
        self.shared.state.borrow().scheduler.outstanding()
    }

    pub fn viewport(&self) -> ViewportState {
        self.shared.state.borrow().viewport
    }

    pub fn seed(&self) -> Option<Seed> {
        self.shared.state.borrow().seed
    }

    pub fn game_version(&self) -> String {
        self.shared.state.borrow().version.clone()
    }

    /// Cached category of biome cell `(cx, cz)`.
    pub fn lookup(&self, cx: i64, cz: i64) -> Option<CategoryCode> {
        self.shared.state.borrow().cache.lookup(cx, cz)
    }

    pub fn cached_cells(&self) -> usize {
        self.shared.state.borrow().cache.len()
    }

    pub fn points(&self, kind: PointKind) -> Vec<WorldPos> {
        self.shared.state.borrow().overlay.points(kind)
    }

    pub fn spawn(&self) -> Option<WorldPos> {
        self.points(PointKind::Spawn).first().copied()
    }

    pub fn is_shown(&self, kind: PointKind) -> bool {
        self.shared.state.borrow().overlay.is_shown(kind)
    }

    pub fn engine(&self) -> &E {
        &self.shared.engine
    }

    pub fn loader(&self) -> &L {
        &self.shared.loader
    }

    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.shared.state.borrow().surface)
    }
}
