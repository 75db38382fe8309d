use std::cell::RefCell;

use leptos::prelude::*;
use web_sys::{MouseEvent, PointerEvent};

use seedmap_client::web::{CanvasSurface, EngineBridge, ImageLoader, WebMap};
use seedmap_client::{HitResult, MapConfig, PointKind, SeedMap};

use crate::app::{Hovered, MapReady, StatusLine};

pub(crate) const CANVAS_WIDTH: u32 = 800;
pub(crate) const CANVAS_HEIGHT: u32 = 600;

thread_local! {
    static MAP: RefCell<Option<WebMap>> = const { RefCell::new(None) };
}

/// Handle to the mounted map. Cloned out so callers never hold the slot
/// while the map calls back into the page.
pub(crate) fn current_map() -> Option<WebMap> {
    MAP.with(|slot| slot.borrow().clone())
}

fn describe_hit(hit: &HitResult) -> String {
    format!("{} ({}, {})", hit.label, hit.world_x, hit.world_z)
}

fn describe_points(kind: PointKind, count: usize) -> String {
    match kind {
        PointKind::Spawn => "Spawn located".to_string(),
        PointKind::Strongholds => format!("{count} strongholds located"),
        PointKind::Structure(structure) => format!("{count} {} found", structure.label()),
    }
}

fn mount_map(canvas: web_sys::HtmlCanvasElement, config: MapConfig) -> Result<WebMap, String> {
    let engine = EngineBridge::from_window()
        .ok_or_else(|| format!("no world engine on window.{}", seedmap_client::web::ENGINE_GLOBAL))?;
    let surface = CanvasSurface::new(canvas).ok_or("canvas has no 2d context")?;
    SeedMap::new(config, surface, engine, ImageLoader).map_err(|err| err.to_string())
}

#[component]
pub fn MapCanvas(config: MapConfig) -> impl IntoView {
    let Hovered(hovered) = expect_context();
    let MapReady(ready) = expect_context();
    let StatusLine(status) = expect_context();

    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

    Effect::new(move || {
        let Some(canvas) = canvas_ref.get() else {
            return;
        };
        if ready.get_untracked() {
            return;
        }
        let map = match mount_map(canvas, config.clone()) {
            Ok(map) => map,
            Err(err) => {
                log::error!("map unavailable: {err}");
                status.set(err);
                return;
            }
        };
        map.set_hover_handler(move |hit| hovered.set(Some(describe_hit(hit))));
        map.set_click_handler(|hit| log::info!("clicked {}", describe_hit(hit)));
        map.set_points_handler(move |kind, points| {
            status.set(describe_points(kind, points.len()));
        });
        MAP.with(|slot| *slot.borrow_mut() = Some(map));
        ready.set(true);
    });

    on_cleanup(|| {
        MAP.with(|slot| slot.borrow_mut().take());
    });

    let on_click = move |e: MouseEvent| {
        if let Some(map) = current_map() {
            map.handle_click(f64::from(e.offset_x()), f64::from(e.offset_y()));
        }
    };

    let on_pointer_move = move |e: PointerEvent| {
        let Some(map) = current_map() else {
            return;
        };
        if map
            .handle_pointer_move(f64::from(e.offset_x()), f64::from(e.offset_y()))
            .is_none()
        {
            hovered.set(None);
        }
    };

    view! {
        <canvas
            node_ref=canvas_ref
            width=CANVAS_WIDTH.to_string()
            height=CANVAS_HEIGHT.to_string()
            style="display: block; background: #000; image-rendering: pixelated; cursor: crosshair;"
            on:click=on_click
            on:pointermove=on_pointer_move
            on:pointerleave=move |_| hovered.set(None)
        />
    }
}

/// Run `f` against the mounted map, if there is one.
pub(crate) fn with_map(f: impl FnOnce(&WebMap)) {
    if let Some(map) = current_map() {
        f(&map);
    }
}
