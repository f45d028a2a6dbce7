use dioxus::prelude::*;

use accessable_shared::models::LocationType;

const ALL: &str = "all";

/// Categories offered in the filter, without the catch-all.
fn choices() -> impl Iterator<Item = LocationType> {
    LocationType::ALL
        .into_iter()
        .filter(|t| *t != LocationType::Other)
}

fn parse_choice(value: &str) -> Option<LocationType> {
    if value == ALL {
        None
    } else {
        Some(LocationType::from_slug(value))
    }
}

#[component]
pub fn FilterBar(
    filter: Signal<Option<LocationType>>,
    nearby_only: Signal<bool>,
    nearby_available: bool,
) -> Element {
    let current = filter.read().as_ref().map(|t| t.slug()).unwrap_or(ALL);

    rsx! {
        div { class: "panel filter-bar",
            h3 { "Show" }
            select {
                "aria-label": "Filter locations",
                value: "{current}",
                onchange: move |evt: Event<FormData>| {
                    filter.set(parse_choice(&evt.value()));
                },
                option { value: ALL, selected: current == ALL, "All locations" }
                for t in choices() {
                    option {
                        value: "{t.slug()}",
                        selected: current == t.slug(),
                        "{t}"
                    }
                }
            }
            label { class: "toggle",
                input {
                    r#type: "checkbox",
                    checked: *nearby_only.read(),
                    disabled: !nearby_available,
                    onchange: move |evt: Event<FormData>| nearby_only.set(evt.checked()),
                }
                " Show nearby locations only"
            }
        }
    }
}
