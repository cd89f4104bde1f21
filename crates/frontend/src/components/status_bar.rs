use dioxus::prelude::*;
use outage_shared::status::StatusBar;

#[component]
pub fn StatusBarView(status: StatusBar) -> Element {
    if !status.visible {
        return rsx! {};
    }

    rsx! {
        div { class: "status-bar", role: "status", "{status.text}" }
    }
}
