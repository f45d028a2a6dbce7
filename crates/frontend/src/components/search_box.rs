use dioxus::prelude::*;

use accessable_shared::models::CatalogLocation;

use crate::api;

const RESULT_LIMIT: usize = 8;

#[component]
pub fn SearchBox(on_select: EventHandler<CatalogLocation>, on_clear: EventHandler<()>) -> Element {
    let mut term = use_signal(String::new);
    let results = use_resource(move || {
        let term = term.read().clone();
        async move {
            if term.trim().is_empty() {
                return Ok(Vec::new());
            }
            api::search_locations(&term, RESULT_LIMIT).await
        }
    });

    let hits: Vec<CatalogLocation> = match &*results.read() {
        Some(Ok(hits)) => hits.clone(),
        Some(Err(e)) => {
            dioxus::logger::tracing::warn!(error = %e, "location search failed");
            Vec::new()
        }
        None => Vec::new(),
    };

    rsx! {
        div { class: "panel search-box",
            h3 { "Explore an accessible NYC" }
            input {
                r#type: "search",
                placeholder: "Search places…",
                "aria-label": "Search places",
                value: "{term}",
                oninput: move |evt: Event<FormData>| {
                    let value = evt.value();
                    if value.trim().is_empty() {
                        on_clear.call(());
                    }
                    term.set(value);
                },
            }
            if !hits.is_empty() {
                ul { class: "search-results",
                    for hit in hits {
                        li { key: "{hit.id}",
                            button {
                                onclick: {
                                    let hit = hit.clone();
                                    move |_| {
                                        on_select.call(hit.clone());
                                        term.set(String::new());
                                    }
                                },
                                "{hit.name}"
                                if let Some(borough) = &hit.borough {
                                    span { class: "muted", " · {borough}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
