use dioxus::logger::tracing::debug;
use dioxus::prelude::*;
use outage_shared::controller::{Frame, MapController, SceneObserver};
use outage_shared::document::FeatureId;
use outage_shared::render::{Scene, Shape, Variant};
use outage_shared::selection::FeatureState;
use outage_shared::svg::defs_for;

use crate::api;
use crate::components::status_bar::StatusBarView;

/// How often the container size is re-measured. Unchanged sizes are
/// dropped by the controller, so this only redraws on an actual resize.
const RESIZE_POLL_MS: u32 = 250;

const LABEL_FONT_SIZE: f64 = 10.0;

fn container_id(variant: Variant) -> String {
    format!("boundary-map-{variant}")
}

/// Get the bounding client rect of the map container element.
fn container_rect(id: &str) -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(id)?;
    Some(element.get_bounding_client_rect())
}

/// Pushes every controller frame into a signal the component renders from.
struct FrameSink(Signal<Frame>);

impl SceneObserver for FrameSink {
    fn on_frame(&mut self, frame: &Frame) {
        self.0.set(frame.clone());
    }
}

#[component]
pub fn BoundaryMap(variant: Variant) -> Element {
    let frame = use_signal(Frame::default);
    let mut controller = use_signal(move || MapController::new(variant, FrameSink(frame)));

    let _document_loader = use_resource(move || async move {
        let result = api::fetch_boundary_document().await;
        if let Ok(mut c) = controller.try_write() {
            c.document_loaded(result);
        }
    });

    let _values_loader = use_resource(move || async move {
        if variant != Variant::Heat {
            return;
        }
        let result = api::fetch_map_data().await;
        if let Ok(mut c) = controller.try_write() {
            c.values_loaded(result);
        }
    });

    let _resize_watch = use_future(move || async move {
        let id = container_id(variant);
        loop {
            if let Some(rect) = container_rect(&id) {
                match controller.try_write() {
                    Ok(mut c) => c.resize(rect.width(), rect.height()),
                    Err(_) => break,
                }
            }
            gloo_timers::future::TimeoutFuture::new(RESIZE_POLL_MS).await;
        }
    });

    use_drop(move || {
        if let Ok(mut c) = controller.try_write() {
            debug!(%variant, "map torn down");
            c.teardown();
        }
    });

    let current = frame.read().clone();
    let defs_markup = defs_for(variant);
    let tooltip = current.scene.as_ref().and_then(hovered_tooltip);

    rsx! {
        div { class: "map-panel",
            div { id: container_id(variant), class: "map-container map-{variant}",
                if let Some(scene) = current.scene {
                    svg {
                        xmlns: "http://www.w3.org/2000/svg",
                        width: "{scene.width}",
                        height: "{scene.height}",
                        view_box: "0 0 {scene.width} {scene.height}",
                        defs { dangerous_inner_html: "{defs_markup}" }
                        for shape in scene.shapes.iter().cloned() {
                            RegionPath { key: "{shape.id}", shape, controller }
                        }
                        if variant == Variant::Heat {
                            for shape in scene.shapes.iter().cloned() {
                                RegionLabel { key: "label-{shape.id}", shape }
                            }
                        }
                    }
                }
                if let Some((tip, x, y)) = tooltip {
                    div {
                        class: "map-tooltip",
                        style: "left: {x}px; top: {y}px;",
                        "{tip}"
                    }
                }
            }
            StatusBarView { status: current.status }
        }
    }
}

/// Tooltip text and anchor of the hovered region, if it has one.
fn hovered_tooltip(scene: &Scene) -> Option<(String, f64, f64)> {
    let shape = scene
        .shapes
        .iter()
        .find(|s| s.state == FeatureState::Hovered)?;
    let (x, y) = shape.label_anchor?;
    Some((shape.tooltip.clone()?, x, y))
}

#[component]
fn RegionPath(shape: Shape, controller: Signal<MapController<FrameSink>>) -> Element {
    let id: FeatureId = shape.id;
    let mut controller = controller;

    rsx! {
        path {
            class: "region",
            "data-feature": "{id}",
            d: "{shape.path}",
            fill: "{shape.fill}",
            stroke: "{shape.stroke}",
            stroke_width: "{shape.stroke_width}",
            opacity: "{shape.opacity}",
            onmouseenter: move |_| controller.write().pointer_enter(id),
            onmouseleave: move |_| controller.write().pointer_leave(id),
            onclick: move |_| controller.write().click(id),
        }
    }
}

#[component]
fn RegionLabel(shape: Shape) -> Element {
    let (Some(name), Some((x, y))) = (shape.name, shape.label_anchor) else {
        return rsx! {};
    };

    rsx! {
        text {
            class: "region-label",
            x: "{x}",
            y: "{y}",
            font_size: "{LABEL_FONT_SIZE}",
            text_anchor: "middle",
            dominant_baseline: "central",
            pointer_events: "none",
            "{name}"
        }
    }
}
