use dioxus::prelude::*;

#[component]
pub fn SearchForm(
    query: String,
    error: Option<&'static str>,
    on_input: EventHandler<String>,
    on_submit: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "card search-card",
            h1 { "City Map Viewer" }
            label { r#for: "city-input", "Enter City Name" }
            input {
                id: "city-input",
                r#type: "text",
                placeholder: "e.g. Paris",
                value: "{query}",
                oninput: move |evt: Event<FormData>| on_input.call(evt.value()),
                onkeydown: move |evt: Event<KeyboardData>| {
                    if evt.key() == Key::Enter {
                        on_submit.call(());
                    }
                },
            }
            button {
                class: "primary",
                onclick: move |_| on_submit.call(()),
                "Show Map"
            }
            if let Some(message) = error {
                p { class: "error", role: "alert", "{message}" }
            }
        }
    }
}
