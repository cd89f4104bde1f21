use dioxus::prelude::*;

use crate::Route;

#[component]
pub fn NavBar() -> Element {
    rsx! {
        nav { class: "nav",
            Link { class: "nav-link", active_class: "active", to: Route::DotsMap {}, "Dots Map" }
            Link { class: "nav-link", active_class: "active", to: Route::HeatMap {}, "Heat Map" }
        }
        Outlet::<Route> {}
    }
}
