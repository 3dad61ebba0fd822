use dioxus::logger::tracing::{debug, info};
use dioxus::prelude::*;
use electomap_shared::controller::{FocusUpdate, MapController};
use electomap_shared::labels::{LabelFormatter, LabelPool, LabelSlot};
use electomap_shared::models::{District, Marker, Point, Viewport};
use electomap_shared::planner::FocusTrigger;
use gloo_timers::future::TimeoutFuture;

use crate::api::Feature;
use crate::projection::{project_topology, DistrictShape};

const MAP_CONTAINER_ID: &str = "electorate-map-container";

const DEFAULT_FILL: &str = "#d5d5d5";
const STROKE_COLOR: &str = "#333";

// Label balloon geometry in unscaled SVG units.
const BALLOON_WIDTH: f64 = 280.0;
const BALLOON_HEIGHT: f64 = 50.0;

// ---------------------------------------------------------------------------
// DOM helpers
// ---------------------------------------------------------------------------

/// Get the bounding client rect of the map container element.
fn container_rect() -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(MAP_CONTAINER_ID)?;
    Some(element.get_bounding_client_rect())
}

fn container_viewport() -> Option<Viewport> {
    let rect = container_rect()?;
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None;
    }
    Some(Viewport::new(rect.width(), rect.height()))
}

// ---------------------------------------------------------------------------
// Style builders (pure functions, easily testable)
// ---------------------------------------------------------------------------

/// The camera targets a step; CSS interpolates toward it.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CameraFrame {
    center: Point,
    zoom: f64,
    duration_ms: f64,
}

const INITIAL_FRAME: CameraFrame = CameraFrame {
    center: Point { x: 0.0, y: 0.0 },
    zoom: 1.0,
    duration_ms: 0.0,
};

/// CSS transform that puts `center` in the middle of the viewport at the
/// given zoom, with the transition that carries the camera there.
fn camera_style(viewport: Viewport, frame: CameraFrame) -> String {
    format!(
        "transform: translate({}px, {}px) scale({}) translate({}px, {}px); \
         transition: transform {}ms ease-in-out;",
        viewport.width / 2.0,
        viewport.height / 2.0,
        frame.zoom,
        -frame.center.x,
        -frame.center.y,
        frame.duration_ms
    )
}

/// Stroke weight is animated alongside the camera so outlines never pop.
fn stroke_style(width: f64, duration_ms: f64) -> String {
    format!(
        "stroke: {STROKE_COLOR}; stroke-width: {width}; \
         transition: stroke-width {duration_ms}ms ease-in-out;"
    )
}

fn balloon_style(slot: &LabelSlot) -> String {
    let display = if slot.visible { "inline" } else { "none" };
    format!(
        "transform: translate({}px, {}px) scale({}); display: {display};",
        slot.anchor.x, slot.anchor.y, slot.scale
    )
}

// ---------------------------------------------------------------------------
// Focus plumbing
// ---------------------------------------------------------------------------

/// Push an accepted focus update into the render signals and walk the
/// camera through its steps. Bumping the epoch first makes any older step
/// walker stop at its next check, so overlapping requests settle on the
/// newest target.
fn apply_update(
    update: FocusUpdate,
    mut camera: Signal<CameraFrame>,
    mut stroke: Signal<(f64, f64)>,
    mut paint_order: Signal<Vec<usize>>,
    mut epoch: Signal<u64>,
    on_zoom: Option<EventHandler<f64>>,
) {
    paint_order.set(update.paint_order);
    stroke.set((
        update.transition.stroke_width,
        update.transition.stroke_duration_ms,
    ));
    if let Some(cb) = on_zoom {
        cb.call(update.zoom_factor);
    }

    let my_epoch = *epoch.peek() + 1;
    epoch.set(my_epoch);
    let steps = update.transition.steps;
    debug!(steps = steps.len(), "starting camera transition");

    spawn(async move {
        for step in steps {
            if *epoch.peek() != my_epoch {
                return;
            }
            camera.set(CameraFrame {
                center: step.center,
                zoom: step.zoom,
                duration_ms: step.duration_ms,
            });
            if step.duration_ms > 0.0 {
                TimeoutFuture::new(step.duration_ms as u32).await;
            }
        }
    });
}

fn with_formatter<R>(
    label_text: Option<fn(&str) -> String>,
    f: impl FnOnce(Option<&LabelFormatter>) -> R,
) -> R {
    match label_text {
        Some(fmt) => {
            let closure = move |d: &District| fmt(&d.name);
            f(Some(&closure))
        }
        None => f(None),
    }
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

#[component]
pub fn MapView(
    /// Boundary features, already fetched and decoded by the page.
    features: ReadSignal<Vec<Feature>>,
    /// Focus request from the embedding page; `None` shows the overview.
    marker: ReadSignal<Option<Marker>>,
    /// Fill color per electorate name.
    fill: Option<fn(&str) -> String>,
    /// Label text per electorate name; defaults to the name itself.
    label_text: Option<fn(&str) -> String>,
    /// Scales every animation duration; 0 jumps instantly.
    #[props(default = 1.0)]
    dampener: f64,
    /// Disable click-to-focus, for embeds that drive focus externally.
    #[props(default)]
    disable_clicks: bool,
    /// Reported after each accepted focus: 1 / target zoom.
    on_zoom: Option<EventHandler<f64>>,
    legend: Option<Element>,
) -> Element {
    let mut controller = use_signal(|| None::<MapController>);
    let mut shapes = use_signal(Vec::<DistrictShape>::new);

    let camera = use_signal(|| INITIAL_FRAME);
    let stroke = use_signal(|| (0.5, 0.0));
    let paint_order = use_signal(Vec::<usize>::new);
    let mut labels = use_signal(LabelPool::new);
    let epoch = use_signal(|| 0u64);

    let mut init_controller = move |viewport: Viewport| {
        let projected = project_topology(&features.peek(), viewport);
        info!(
            districts = projected.len(),
            width = viewport.width,
            height = viewport.height,
            "map initialized"
        );
        let districts: Vec<District> = projected.iter().map(|s| s.district.clone()).collect();
        controller.set(Some(MapController::new(districts, viewport)));
        shapes.set(projected);
    };

    let mut run_focus = move |m: Option<Marker>, trigger: FocusTrigger| {
        let update = with_formatter(label_text, |formatter| {
            let mut guard = controller.write();
            let ctrl = guard.as_mut()?;
            let update = ctrl.focus(m.as_ref(), trigger, dampener, formatter);
            labels.set(ctrl.labels().clone());
            update
        });
        if let Some(update) = update {
            apply_update(update, camera, stroke, paint_order, epoch, on_zoom);
        }
    };

    // Focus whenever the marker changes. The first run also builds the
    // controller, once the container has been laid out and can be measured.
    use_effect(move || {
        let m = marker.read().clone();
        if controller.peek().is_none() {
            let Some(viewport) = container_viewport() else {
                // Not laid out yet; the resize observer will catch up.
                return;
            };
            init_controller(viewport);
        }
        run_focus(m, FocusTrigger::Marker);
    });

    let on_resize = move |_| {
        let Some(viewport) = container_viewport() else {
            return;
        };
        if controller.peek().is_none() {
            init_controller(viewport);
            run_focus(marker.peek().clone(), FocusTrigger::Marker);
            return;
        }
        if !controller
            .peek()
            .as_ref()
            .is_some_and(|c| c.needs_resize(viewport))
        {
            return;
        }
        debug!(width = viewport.width, height = viewport.height, "resized");
        let projected = project_topology(&features.peek(), viewport);
        let districts: Vec<District> = projected.iter().map(|s| s.district.clone()).collect();
        shapes.set(projected);

        let update = with_formatter(label_text, |formatter| {
            let mut guard = controller.write();
            let ctrl = guard.as_mut()?;
            let update = ctrl.resize(viewport, districts, formatter);
            labels.set(ctrl.labels().clone());
            update
        });
        if let Some(update) = update {
            apply_update(update, camera, stroke, paint_order, epoch, on_zoom);
        }
    };

    let viewport = controller
        .read()
        .as_ref()
        .map(|c| c.viewport())
        .unwrap_or(Viewport::new(0.0, 0.0));
    let frame = *camera.read();
    let (stroke_width, stroke_ms) = *stroke.read();
    let group_style = format!(
        "{} {}",
        camera_style(viewport, frame),
        stroke_style(stroke_width, stroke_ms)
    );

    // Render in paint order so the focused set sits on top; fall back to
    // load order before the first focus lands.
    let shape_list = shapes.read();
    let order = paint_order.read();
    let ordered: Vec<usize> = if order.len() == shape_list.len() {
        order.clone()
    } else {
        (0..shape_list.len()).collect()
    };

    let pool = labels.read();
    let legend_node = legend.map(|l| {
        rsx! {
            div { class: "map-legend", {l} }
        }
    });

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "electorate-map",
            onresize: on_resize,

            svg {
                width: "100%",
                height: "100%",
                g {
                    style: "{group_style}",
                    for i in ordered {
                        path {
                            key: "{shape_list[i].district.name}",
                            d: "{shape_list[i].path}",
                            fill: fill
                                .map(|f| f(&shape_list[i].district.name))
                                .unwrap_or_else(|| DEFAULT_FILL.to_string()),
                            onclick: {
                                let name = shape_list[i].district.name.clone();
                                move |_| {
                                    if !disable_clicks {
                                        debug!(electorate = %name, "click focus");
                                        run_focus(
                                            Some(Marker::for_electorate(&name)),
                                            FocusTrigger::Click,
                                        );
                                    }
                                }
                            },
                        }
                    }

                    LabelBalloon { slot: pool.main.clone(), main: true }
                    for (i, slot) in pool.others.iter().enumerate() {
                        LabelBalloon { key: "{i}", slot: slot.clone(), main: false }
                    }
                }
            }

            {legend_node}
        }
    }
}

/// One pooled label balloon. Hidden balloons keep their last position and
/// text so showing them again is just a display flip.
#[component]
fn LabelBalloon(slot: LabelSlot, main: bool) -> Element {
    let class = if main {
        "label-balloon label-balloon-main"
    } else {
        "label-balloon"
    };
    let style = balloon_style(&slot);
    rsx! {
        g {
            class: "{class}",
            style: "{style}",
            pointer_events: "none",
            g {
                transform: "translate(-140, -69)",
                rect {
                    width: "{BALLOON_WIDTH}",
                    height: "{BALLOON_HEIGHT}",
                    rx: "3",
                }
                polygon {
                    points: "0,0 10,20 20,0",
                    transform: "translate(130, 49)",
                }
                text {
                    x: "{BALLOON_WIDTH / 2.0}",
                    y: "33",
                    text_anchor: "middle",
                    font_size: "22",
                    "{slot.text}"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_style_centers_target() {
        let viewport = Viewport::new(1200.0, 800.0);
        let frame = CameraFrame {
            center: Point::new(660.0, 400.0),
            zoom: 0.8,
            duration_ms: 1000.0,
        };
        let style = camera_style(viewport, frame);
        assert!(style.contains("translate(600px, 400px)"));
        assert!(style.contains("scale(0.8)"));
        assert!(style.contains("translate(-660px, -400px)"));
        assert!(style.contains("transform 1000ms"));
    }

    #[test]
    fn test_stroke_style_animates_width() {
        let style = stroke_style(0.01, 900.0);
        assert!(style.contains("stroke-width: 0.01"));
        assert!(style.contains("stroke-width 900ms"));
    }

    #[test]
    fn test_balloon_style_hidden_keeps_position() {
        let mut slot = LabelSlot::new();
        slot.anchor = Point::new(100.0, 50.0);
        slot.scale = 0.02;
        let style = balloon_style(&slot);
        assert!(style.contains("translate(100px, 50px)"));
        assert!(style.contains("scale(0.02)"));
        assert!(style.contains("display: none"));
    }

    #[test]
    fn test_balloon_style_visible() {
        let mut slot = LabelSlot::new();
        slot.visible = true;
        assert!(balloon_style(&slot).contains("display: inline"));
    }
}
