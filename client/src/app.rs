use std::cell::RefCell;

use gloo_storage::Storage;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use seedmap_client::config::SETTINGS_STORAGE_KEY;
use seedmap_client::{PanDirection, Settings};
use seedmap_shared::{Seed, StructureKind};

use crate::canvas::{CANVAS_HEIGHT, CANVAS_WIDTH, MapCanvas, current_map, with_map};
use crate::sidebar::Sidebar;

struct KeydownBinding {
    window: web_sys::Window,
    _handler: Closure<dyn Fn(web_sys::KeyboardEvent)>,
}

thread_local! {
    static KEYDOWN_BINDING: RefCell<Option<KeydownBinding>> = const { RefCell::new(None) };
}

/// Newtype wrappers so same-typed signals stay distinct in Leptos context.
#[derive(Clone, Copy)]
pub(crate) struct Hovered(pub RwSignal<Option<String>>);
#[derive(Clone, Copy)]
pub(crate) struct StatusLine(pub RwSignal<String>);
#[derive(Clone, Copy)]
pub(crate) struct MapReady(pub RwSignal<bool>);
#[derive(Clone, Copy)]
pub(crate) struct ActiveSeed(pub RwSignal<Option<Seed>>);
#[derive(Clone, Copy)]
pub(crate) struct GameVersion(pub RwSignal<String>);
#[derive(Clone, Copy)]
pub(crate) struct ShowSpawn(pub RwSignal<bool>);
#[derive(Clone, Copy)]
pub(crate) struct ShowStrongholds(pub RwSignal<bool>);
#[derive(Clone, Copy)]
pub(crate) struct ShowLabels(pub RwSignal<bool>);
#[derive(Clone, Copy)]
pub(crate) struct VisibleStructures(pub RwSignal<Vec<StructureKind>>);
#[derive(Clone, Copy)]
pub(crate) struct Zoom(pub RwSignal<u8>);

pub(crate) fn pan(direction: PanDirection) {
    with_map(|map| map.pan(direction));
}

/// Zoom the mounted map and mirror the resulting level into `zoom`.
/// A zoom while tiles are outstanding is ignored, so the level may not move.
pub(crate) fn zoom(zoom: RwSignal<u8>, zoom_in: bool) {
    with_map(|map| {
        if zoom_in {
            map.zoom_in();
        } else {
            map.zoom_out();
        }
        zoom.set(map.viewport().pix_dim);
    });
}

#[component]
pub fn App() -> impl IntoView {
    let saved: Settings = gloo_storage::LocalStorage::get(SETTINGS_STORAGE_KEY).unwrap_or_default();
    let config = saved.map_config(CANVAS_WIDTH, CANVAS_HEIGHT);

    let hovered: RwSignal<Option<String>> = RwSignal::new(None);
    let status: RwSignal<String> = RwSignal::new(String::new());
    let ready: RwSignal<bool> = RwSignal::new(false);
    let seed: RwSignal<Option<Seed>> = RwSignal::new(saved.seed);
    let version: RwSignal<String> = RwSignal::new(saved.game_version.clone());
    let show_spawn: RwSignal<bool> = RwSignal::new(saved.show_spawn);
    let show_strongholds: RwSignal<bool> = RwSignal::new(saved.show_strongholds);
    let show_labels: RwSignal<bool> = RwSignal::new(saved.show_coordinate_labels);
    let structures: RwSignal<Vec<StructureKind>> = RwSignal::new(saved.structures.clone());
    let zoom_level: RwSignal<u8> = RwSignal::new(config.pix_dim);

    provide_context(Hovered(hovered));
    provide_context(StatusLine(status));
    provide_context(MapReady(ready));
    provide_context(ActiveSeed(seed));
    provide_context(GameVersion(version));
    provide_context(ShowSpawn(show_spawn));
    provide_context(ShowStrongholds(show_strongholds));
    provide_context(ShowLabels(show_labels));
    provide_context(VisibleStructures(structures));
    provide_context(Zoom(zoom_level));

    // Persist settings on change
    Effect::new(move || {
        let settings = Settings {
            seed: seed.get(),
            game_version: version.get(),
            show_spawn: show_spawn.get(),
            show_strongholds: show_strongholds.get(),
            show_coordinate_labels: show_labels.get(),
            structures: structures.get(),
            pix_dim: zoom_level.get(),
        };
        let _ = gloo_storage::LocalStorage::set(SETTINGS_STORAGE_KEY, &settings);
    });

    // Settings flow into the map once it is mounted. Each setter is a no-op
    // when nothing changed, so effects re-running on `ready` is harmless.
    Effect::new(move || {
        let version = version.get();
        if !ready.get() {
            return;
        }
        let Some(map) = current_map() else {
            return;
        };
        if map.game_version() != version {
            map.set_game_version(&version);
            map.redraw();
        }
    });

    Effect::new(move || {
        let seed = seed.get();
        if !ready.get() {
            return;
        }
        if let (Some(map), Some(seed)) = (current_map(), seed)
            && map.seed() != Some(seed)
        {
            status.set(format!("Seed {seed}"));
            map.set_seed(seed);
            map.redraw();
        }
    });

    Effect::new(move || {
        let show = show_spawn.get();
        if !ready.get() {
            return;
        }
        with_map(|map| if show { map.show_spawn() } else { map.hide_spawn() });
    });

    Effect::new(move || {
        let show = show_strongholds.get();
        if !ready.get() {
            return;
        }
        with_map(|map| {
            if show {
                map.show_strongholds();
            } else {
                map.hide_strongholds();
            }
        });
    });

    Effect::new(move || {
        let show = show_labels.get();
        if !ready.get() {
            return;
        }
        with_map(|map| map.set_show_coordinate_labels(show));
    });

    Effect::new(move || {
        let kinds = structures.get();
        if !ready.get() {
            return;
        }
        with_map(|map| map.set_visible_structure_kinds(&kinds));
    });

    // Arrow keys pan, +/- zoom, R redraws
    Effect::new(move || {
        let Some(window) = web_sys::window() else {
            return;
        };

        KEYDOWN_BINDING.with(|slot| {
            if let Some(old) = slot.borrow_mut().take() {
                let _ = old.window.remove_event_listener_with_callback(
                    "keydown",
                    old._handler.as_ref().unchecked_ref(),
                );
            }
        });

        let handler =
            Closure::<dyn Fn(web_sys::KeyboardEvent)>::new(move |e: web_sys::KeyboardEvent| {
                let target_tag = e
                    .target()
                    .and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok())
                    .map(|el| el.tag_name())
                    .unwrap_or_default();
                // Don't intercept when typing in an input
                if target_tag == "INPUT" || target_tag == "SELECT" {
                    return;
                }

                let direction = match e.key().as_str() {
                    "ArrowLeft" => Some(PanDirection::Left),
                    "ArrowRight" => Some(PanDirection::Right),
                    "ArrowUp" => Some(PanDirection::Up),
                    "ArrowDown" => Some(PanDirection::Down),
                    "+" | "=" => {
                        zoom(zoom_level, true);
                        None
                    }
                    "-" => {
                        zoom(zoom_level, false);
                        None
                    }
                    "r" => {
                        with_map(|map| map.redraw());
                        None
                    }
                    _ => return,
                };
                e.prevent_default();
                if let Some(direction) = direction {
                    pan(direction);
                }
            });

        if window
            .add_event_listener_with_callback("keydown", handler.as_ref().unchecked_ref())
            .is_ok()
        {
            KEYDOWN_BINDING.with(|slot| {
                *slot.borrow_mut() = Some(KeydownBinding {
                    window: window.clone(),
                    _handler: handler,
                });
            });
        }
    });

    let hover_text = move || hovered.get().unwrap_or_default();

    view! {
        <div style="display: flex; gap: 16px; padding: 16px; background: #0c0e17; min-height: 100vh; box-sizing: border-box; font-family: 'Inter', system-ui, sans-serif; color: #e2e0d8;">
            <div style="display: flex; flex-direction: column; gap: 8px;">
                <MapCanvas config=config />
                <div style="height: 1.2em; font-family: 'JetBrains Mono', monospace; font-size: 0.8rem; color: #9a98a0;">
                    {hover_text}
                </div>
            </div>
            <Sidebar />
        </div>
    }
}
