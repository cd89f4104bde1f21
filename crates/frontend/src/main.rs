mod api;
mod components;
mod pages;

use dioxus::prelude::*;

use components::navigation::NavBar;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[layout(NavBar)]
    #[route("/")]
    DotsMap {},
    #[route("/choropleth")]
    HeatMap {},
}

#[component]
fn DotsMap() -> Element {
    rsx! {
        pages::dots::DotsPage {}
    }
}

#[component]
fn HeatMap() -> Element {
    rsx! {
        pages::heat::HeatPage {}
    }
}

const CSS: Asset = asset!("/assets/main.css");

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Stylesheet { href: CSS }
        Router::<Route> {}
    }
}

fn main() {
    launch(App);
}
