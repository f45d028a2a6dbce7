use dioxus::prelude::*;

use accessable_shared::overlay::InstructionPanel;

#[component]
pub fn RoutePanel(
    panel: Option<InstructionPanel>,
    dismissable: bool,
    requesting: bool,
    can_retry: bool,
    on_dismiss: EventHandler<()>,
    on_retry: EventHandler<()>,
) -> Element {
    let has_panel = panel.is_some();
    if !has_panel && !requesting && !can_retry {
        return rsx! {};
    }

    rsx! {
        div { class: "panel route-panel",
            div { class: "route-panel-header",
                h3 { "Walking route" }
                if dismissable {
                    button {
                        class: "dismiss",
                        "aria-label": "Dismiss route",
                        onclick: move |_| on_dismiss.call(()),
                        "×"
                    }
                }
            }
            if requesting {
                div { class: "route-status", "Finding an accessible route…" }
            }
            if let Some(panel) = panel {
                div { class: "route-summary", "{panel.summary}" }
                ol { class: "route-steps",
                    for (i, line) in panel.lines.iter().enumerate() {
                        li { key: "{i}", "{line}" }
                    }
                }
            }
            if can_retry && !requesting {
                button {
                    class: "secondary",
                    onclick: move |_| on_retry.call(()),
                    "Retry route"
                }
            }
        }
    }
}
