use dioxus::prelude::*;
use outage_shared::heat::HeatScale;

/// Low-to-high color key for the heat map.
#[component]
pub fn HeatLegend() -> Element {
    let scale = HeatScale::default();
    let gradient = format!(
        "background: linear-gradient(to right, {}, {});",
        scale.low, scale.high
    );

    rsx! {
        div { class: "heat-legend",
            span { class: "heat-legend-label", "Low" }
            div { class: "heat-legend-bar", style: "{gradient}" }
            span { class: "heat-legend-label", "High" }
        }
    }
}
