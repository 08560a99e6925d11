mod api;
mod components;
mod coords;
mod pages;

use citymap_shared::scene::MapConfig;
use dioxus::prelude::*;

use crate::api::GeocoderConfig;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    Home {},
}

#[component]
fn Home() -> Element {
    rsx! {
        pages::city_search::CitySearch {}
    }
}

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    use_context_provider(GeocoderConfig::default);
    use_context_provider(MapConfig::default);

    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        document::Title { "City Map Viewer" }
        Router::<Route> {}
    }
}

fn main() {
    launch(App);
}
