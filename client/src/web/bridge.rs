use serde::Deserialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use seedmap_shared::{CategoryCode, Seed, StructureKind, WorldPos};

use crate::engine::{PointCallback, PointsCallback, TileCallback, TileRequest, WorldEngine};

/// Global under which the page exposes its engine queue.
pub const ENGINE_GLOBAL: &str = "seedEngine";

#[wasm_bindgen]
extern "C" {
    /// The page's world-engine queue. Seeds are passed as `BigInt`.
    #[derive(Clone, Debug)]
    pub type SeedEngine;

    #[wasm_bindgen(method)]
    fn draw(
        this: &SeedEngine,
        version: &str,
        seed: JsValue,
        start_x: f64,
        start_z: f64,
        width: u32,
        height: u32,
        done: JsValue,
    );

    #[wasm_bindgen(method, js_name = findSpawn)]
    fn find_spawn(this: &SeedEngine, version: &str, seed: JsValue, done: JsValue);

    #[wasm_bindgen(method, js_name = findStrongholds)]
    fn find_strongholds(this: &SeedEngine, version: &str, seed: JsValue, count: u32, done: JsValue);

    #[wasm_bindgen(method, js_name = getStructuresInRegions)]
    fn get_structures_in_regions(
        this: &SeedEngine,
        version: &str,
        kind: u32,
        seed: JsValue,
        region_radius: u32,
        done: JsValue,
    );

    #[wasm_bindgen(method, setter = pixDim)]
    fn set_pix_dim(this: &SeedEngine, pix_dim: u8);
}

/// Point-finder results as the engine reports them.
#[derive(Debug, Deserialize)]
struct CoordsPayload {
    #[serde(default)]
    coords: Vec<(i64, i64)>,
}

fn decode_points(value: JsValue) -> Vec<WorldPos> {
    match serde_wasm_bindgen::from_value::<CoordsPayload>(value) {
        Ok(payload) => payload
            .coords
            .into_iter()
            .map(|(x, z)| WorldPos::new(x, z))
            .collect(),
        Err(err) => {
            log::warn!("malformed point-finder result: {err}");
            Vec::new()
        }
    }
}

fn points_closure(done: PointsCallback) -> JsValue {
    Closure::once_into_js(move |value: JsValue| done(decode_points(value)))
}

/// [`WorldEngine`] backed by `window.seedEngine`.
#[derive(Clone, Debug)]
pub struct EngineBridge {
    engine: SeedEngine,
}

impl EngineBridge {
    pub fn new(engine: SeedEngine) -> Self {
        Self { engine }
    }

    /// The engine installed on the page, if any.
    pub fn from_window() -> Option<Self> {
        let window = web_sys::window()?;
        let value = js_sys::Reflect::get(&window, &JsValue::from_str(ENGINE_GLOBAL)).ok()?;
        if value.is_undefined() || value.is_null() {
            return None;
        }
        Some(Self::new(value.unchecked_into::<SeedEngine>()))
    }
}

impl WorldEngine for EngineBridge {
    fn request_tile(&self, request: &TileRequest, done: TileCallback) {
        let region = request.region;
        let callback = Closure::once_into_js(move |colors: JsValue| {
            // Plain arrays and typed arrays both come through as bytes.
            let grid: Vec<CategoryCode> = js_sys::Uint8Array::new(&colors).to_vec();
            done(grid);
        });
        self.engine.draw(
            &request.version,
            JsValue::from(request.seed),
            region.origin_x as f64,
            region.origin_z as f64,
            region.width,
            region.height,
            callback,
        );
    }

    fn find_spawn(&self, version: &str, seed: Seed, done: PointCallback) {
        let callback = Closure::once_into_js(move |x: f64, z: f64| {
            done(WorldPos::new(x as i64, z as i64));
        });
        self.engine
            .find_spawn(version, JsValue::from(seed), callback);
    }

    fn find_strongholds(&self, version: &str, seed: Seed, count: u32, done: PointsCallback) {
        self.engine
            .find_strongholds(version, JsValue::from(seed), count, points_closure(done));
    }

    fn structures_in_regions(
        &self,
        version: &str,
        kind: StructureKind,
        seed: Seed,
        region_radius: u32,
        done: PointsCallback,
    ) {
        self.engine.get_structures_in_regions(
            version,
            kind.engine_id(),
            JsValue::from(seed),
            region_radius,
            points_closure(done),
        );
    }

    fn set_resolution(&self, pix_dim: u8) {
        self.engine.set_pix_dim(pix_dim);
    }
}
