use dioxus::prelude::*;
use outage_shared::render::Variant;

use crate::components::boundary_map::BoundaryMap;

pub const TITLE: &str = "Odisha Live Power Outage Dashboard";

#[component]
pub fn DotsPage() -> Element {
    rsx! {
        document::Title { "{TITLE}" }
        div { class: "page",
            div { class: "header",
                h1 { "{TITLE}" }
            }
            BoundaryMap { variant: Variant::DotPattern }
        }
    }
}
