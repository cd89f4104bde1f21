use dioxus::prelude::*;
use outage_shared::render::Variant;

use crate::components::boundary_map::BoundaryMap;
use crate::components::heat_legend::HeatLegend;

pub const TITLE: &str = "Odisha Power Outage Distribution";

#[component]
pub fn HeatPage() -> Element {
    rsx! {
        document::Title { "{TITLE}" }
        div { class: "page",
            div { class: "header",
                h1 { "{TITLE}" }
                HeatLegend {}
            }
            BoundaryMap { variant: Variant::Heat }
        }
    }
}
