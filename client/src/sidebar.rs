use leptos::prelude::*;
use wasm_bindgen::JsCast;

use seedmap_client::PanDirection;
use seedmap_shared::{StructureKind, parse_seed};

use crate::app::{
    ActiveSeed, GameVersion, ShowLabels, ShowSpawn, ShowStrongholds, StatusLine,
    VisibleStructures, Zoom, pan, zoom,
};
use crate::canvas::with_map;

const GAME_VERSIONS: &[&str] = &[
    "1.16", "1.15", "1.14", "1.13", "1.12", "1.11", "1.10", "1.9", "1.8", "1.7",
];

const BUTTON_STYLE: &str = "padding: 6px 10px; background: #1a1d2a; border: 1px solid #282c3e; border-radius: 4px; color: #e2e0d8; cursor: pointer; font-size: 0.85rem;";
const SECTION_STYLE: &str = "font-size: 0.7rem; letter-spacing: 0.08em; text-transform: uppercase; color: #5a5860; margin: 12px 0 4px;";

fn input_value(e: &leptos::ev::Event) -> Option<String> {
    let target = e.target()?;
    if let Some(input) = target.dyn_ref::<web_sys::HtmlInputElement>() {
        return Some(input.value());
    }
    target
        .dyn_ref::<web_sys::HtmlSelectElement>()
        .map(|select| select.value())
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let ActiveSeed(seed) = expect_context();
    let GameVersion(version) = expect_context();
    let ShowSpawn(show_spawn) = expect_context();
    let ShowStrongholds(show_strongholds) = expect_context();
    let ShowLabels(show_labels) = expect_context();
    let StatusLine(status) = expect_context();
    let Zoom(zoom_level) = expect_context();

    let seed_text = RwSignal::new(seed.get_untracked().map(|s| s.to_string()).unwrap_or_default());

    let on_seed_change = move |e: leptos::ev::Event| {
        let Some(text) = input_value(&e) else {
            return;
        };
        seed_text.set(text.clone());
        match parse_seed(&text) {
            Some(parsed) => seed.set(Some(parsed)),
            None => status.set("Enter a seed".to_string()),
        }
    };

    let on_version_change = move |e: leptos::ev::Event| {
        if let Some(value) = input_value(&e) {
            version.set(value);
        }
    };

    view! {
        <div style="width: 280px; display: flex; flex-direction: column;">
            <div style=SECTION_STYLE>"Seed"</div>
            <input
                type="text"
                placeholder="Seed or text"
                style="padding: 8px 10px; background: #1a1d2a; border: 1px solid #282c3e; border-radius: 6px; color: #e2e0d8; font-family: 'JetBrains Mono', monospace;"
                prop:value=move || seed_text.get()
                on:change=on_seed_change
            />
            <select
                style="margin-top: 6px; padding: 6px; background: #1a1d2a; border: 1px solid #282c3e; border-radius: 6px; color: #e2e0d8;"
                on:change=on_version_change
            >
                {GAME_VERSIONS
                    .iter()
                    .map(|&v| {
                        view! {
                            <option value=v selected=move || version.get() == v>{v}</option>
                        }
                    })
                    .collect_view()}
            </select>

            <div style=SECTION_STYLE>"View"</div>
            <div style="display: grid; grid-template-columns: repeat(3, 1fr); gap: 4px;">
                <span />
                <button style=BUTTON_STYLE on:click=move |_| pan(PanDirection::Up)>"Up"</button>
                <span />
                <button style=BUTTON_STYLE on:click=move |_| pan(PanDirection::Left)>"Left"</button>
                <button style=BUTTON_STYLE on:click=move |_| with_map(|map| map.redraw())>"Redraw"</button>
                <button style=BUTTON_STYLE on:click=move |_| pan(PanDirection::Right)>"Right"</button>
                <button style=BUTTON_STYLE on:click=move |_| zoom(zoom_level, false)>"-"</button>
                <button style=BUTTON_STYLE on:click=move |_| pan(PanDirection::Down)>"Down"</button>
                <button style=BUTTON_STYLE on:click=move |_| zoom(zoom_level, true)>"+"</button>
            </div>
            <div style="font-size: 0.75rem; color: #5a5860; margin-top: 4px;">
                {move || format!("Zoom {}x", zoom_level.get())}
            </div>

            <div style=SECTION_STYLE>"Overlay"</div>
            <SettingsToggleRow label="Spawn" active=show_spawn />
            <SettingsToggleRow label="Strongholds" active=show_strongholds />
            <SettingsToggleRow label="Coordinate Labels" active=show_labels />

            <div style=SECTION_STYLE>"Structures"</div>
            {StructureKind::ALL
                .iter()
                .map(|&kind| view! { <StructureToggleRow kind=kind /> })
                .collect_view()}

            <div style="margin-top: 12px; font-size: 0.8rem; color: #9a98a0; min-height: 1.2em;">
                {move || status.get()}
            </div>
        </div>
    }
}

#[component]
fn StructureToggleRow(kind: StructureKind) -> impl IntoView {
    let VisibleStructures(structures) = expect_context();
    let active = RwSignal::new(structures.get_untracked().contains(&kind));

    Effect::new(move || {
        let on = active.get();
        structures.update(|kinds| {
            let present = kinds.contains(&kind);
            if on && !present {
                kinds.push(kind);
            } else if !on && present {
                kinds.retain(|k| *k != kind);
            }
        });
    });

    view! { <SettingsToggleRow label=kind.label() active=active /> }
}

#[component]
fn SettingsToggleRow(
    label: &'static str,
    active: RwSignal<bool>,
) -> impl IntoView {
    let on_click = move |_| {
        active.update(|v| *v = !*v);
    };

    view! {
        <div
            style="display: flex; align-items: center; justify-content: space-between; padding: 7px 10px; border-radius: 4px; cursor: pointer; transition: background 0.15s;"
            on:click=on_click
            on:mouseenter=|e| {
                if let Some(el) = e.target().and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok()) {
                    el.style().set_property("background", "#232738").ok();
                }
            }
            on:mouseleave=|e| {
                if let Some(el) = e.target().and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok()) {
                    el.style().set_property("background", "transparent").ok();
                }
            }
        >
            <span style="font-size: 0.88rem; color: #e2e0d8;">{label}</span>
            <span style=move || {
                if active.get() {
                    "display: inline-block; width: 8px; height: 8px; border-radius: 50%; background: #50c878; box-shadow: 0 0 5px rgba(80,200,120,0.4); flex-shrink: 0;"
                } else {
                    "display: inline-block; width: 8px; height: 8px; border-radius: 50%; background: #3a3f5c; flex-shrink: 0;"
                }
            } />
        </div>
    }
}
