use std::rc::Rc;

use citymap_shared::scene::{MapConfig, ViewModel};
use citymap_shared::search::{SearchController, SearchSession};
use dioxus::prelude::*;

use crate::api::{GeocoderConfig, NominatimClient};
use crate::components::map_view::MapView;
use crate::components::search_form::SearchForm;

#[component]
pub fn CitySearch() -> Element {
    let geocoder_config = use_context::<GeocoderConfig>();
    let map_config = use_context::<MapConfig>();

    let controller =
        use_hook(|| Rc::new(SearchController::new(NominatimClient::new(geocoder_config))));

    // Query text and the outcome of the last search to complete
    let mut session = use_signal(SearchSession::default);

    let view = ViewModel::from_state(&session.read().state, &map_config);
    let query = session.read().query.clone();

    rsx! {
        div { class: "app",
            SearchForm {
                query: query,
                error: view.error,
                on_input: move |text: String| session.write().set_query(text),
                on_submit: move |_| {
                    let text = session.read().query.clone();
                    let controller = controller.clone();
                    // Searches are not cancelled; whichever finishes last wins
                    spawn(async move {
                        let outcome = controller.submit_search(&text).await;
                        session.write().apply(outcome);
                    });
                },
            }

            if let Some(scene) = view.map {
                MapView { scene: scene }
            }
        }
    }
}
