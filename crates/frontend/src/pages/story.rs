use dioxus::logger::tracing::warn;
use dioxus::prelude::*;
use electomap_shared::models::Marker;

use crate::api::{self, Feature};
use crate::components::map_view::MapView;

const TOPOLOGY: Asset = asset!("/assets/electorates.geojson");

/// Focus script for the walkthrough, in the same shape the widget accepts
/// from an article config. Unknown names and junk zooms fall back safely.
const STEPS_JSON: &str = r#"[
    {},
    { "electorate": "Sydney", "and": ["Chifley"] },
    { "electorate": "Griffith", "zoom": 30 },
    { "electorate": "Maranoa", "and": "Griffith" },
    { "electorate": "Bowman", "and": ["Bonner"] },
    { "electorate": "Mayo", "hide": true },
    {}
]"#;

const STEP_BLURBS: &[&str] = &[
    "Every federal electorate, colored by the party that holds it.",
    "Sydney and its neighbour Chifley sit close enough to frame together.",
    "Griffith, framed at a hand-picked zoom.",
    "Maranoa is vast; pairing it with Griffith pulls the frame wide.",
    "Bowman and Bonner, both with labels pinned clear of the bay.",
    "Mayo, with its label suppressed for the annotation overlay.",
    "Back to the national view.",
];

fn party_fill(name: &str) -> String {
    let color = match name {
        "Sydney" | "Chifley" | "Griffith" | "Fenner" => "#e53946",
        "Maranoa" | "Parkes" | "Moreton" => "#1a5dab",
        "Bowman" | "Bonner" => "#7d7dd4",
        "Mayo" => "#e87b1e",
        _ => "#c9c9c9",
    };
    color.to_string()
}

fn seat_label(name: &str) -> String {
    let holder = match name {
        "Sydney" => "ALP",
        "Chifley" => "ALP",
        "Griffith" => "ALP",
        "Maranoa" => "LNP",
        "Parkes" => "NAT",
        "Bowman" => "LNP",
        "Bonner" => "LNP",
        "Mayo" => "CA",
        "Fenner" => "ALP",
        _ => return name.to_string(),
    };
    format!("{name} ({holder})")
}

#[component]
pub fn Story() -> Element {
    let topology = use_resource(|| async { api::fetch_topology(&TOPOLOGY.to_string()).await });

    let steps: Vec<Marker> = use_hook(|| match serde_json::from_str(STEPS_JSON) {
        Ok(steps) => steps,
        Err(e) => {
            warn!(error = %e, "bad step config");
            vec![Marker::default()]
        }
    });
    let step_count = steps.len();

    let mut step = use_signal(|| 0usize);
    let mut zoom_factor = use_signal(|| 1.0f64);

    let marker = use_memo({
        let steps = steps.clone();
        move || steps.get(*step.read()).cloned()
    });

    let features = use_memo(move || -> Vec<Feature> {
        match &*topology.read() {
            Some(Ok(t)) => t.features.clone(),
            _ => Vec::new(),
        }
    });

    let cur = *step.read();
    let blurb = STEP_BLURBS.get(cur).copied().unwrap_or("");
    let factor = *zoom_factor.read();

    let map_section = match &*topology.read() {
        Some(Err(e)) => rsx! {
            div { class: "story-error", "Could not load boundaries: {e}" }
        },
        Some(Ok(_)) => rsx! {
            MapView {
                features,
                marker,
                fill: party_fill as fn(&str) -> String,
                label_text: seat_label as fn(&str) -> String,
                on_zoom: move |factor| zoom_factor.set(factor),
                legend: rsx! {
                    span { class: "legend-swatch", style: "background: #e53946;", "ALP" }
                    span { class: "legend-swatch", style: "background: #1a5dab;", "LNP" }
                    span { class: "legend-swatch", style: "background: #e87b1e;", "CA" }
                },
            }
        },
        None => rsx! {
            div { class: "story-loading", "Loading boundaries..." }
        },
    };

    rsx! {
        div { class: "story",
            div { class: "story-map", {map_section} }

            div { class: "story-controls",
                button {
                    disabled: cur == 0,
                    onclick: move |_| {
                        let s = *step.peek();
                        if s > 0 {
                            step.set(s - 1);
                        }
                    },
                    "Back"
                }
                span { class: "story-progress", "{cur + 1} / {step_count}" }
                button {
                    disabled: cur + 1 >= step_count,
                    onclick: move |_| {
                        let s = *step.peek();
                        if s + 1 < step_count {
                            step.set(s + 1);
                        }
                    },
                    "Next"
                }
                span { class: "story-zoom", "1:{factor:.3}" }
            }

            p { class: "story-blurb", "{blurb}" }
        }
    }
}
