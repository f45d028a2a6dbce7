use dioxus::prelude::*;

use accessable_shared::RoutingBackendError;

/// How long a notification stays up.
pub const TOAST_MS: u32 = 6_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    /// Distinguishes two notifications with the same text.
    pub id: u64,
    pub text: String,
}

/// User-facing text for a failed route request.
pub fn toast_text(err: &RoutingBackendError) -> String {
    match err {
        RoutingBackendError::Rejected { message, .. } if !message.is_empty() => {
            format!("Could not find a route: {message}")
        }
        RoutingBackendError::Timeout { .. } => {
            "The routing service took too long to answer. Please try again.".to_string()
        }
        RoutingBackendError::Transport(_) => {
            "Could not reach the routing service. Check your connection.".to_string()
        }
        other => format!("Could not find a route: {other}"),
    }
}

#[component]
pub fn ErrorToast(toast: Signal<Option<Toast>>) -> Element {
    use_effect(move || {
        let Some(id) = toast.read().as_ref().map(|t| t.id) else {
            return;
        };
        spawn(async move {
            gloo_timers::future::TimeoutFuture::new(TOAST_MS).await;
            // A newer toast restarts its own timer
            if toast.peek().as_ref().map(|t| t.id) == Some(id) {
                toast.set(None);
            }
        });
    });

    let Some(current) = toast.read().clone() else {
        return rsx! {};
    };

    rsx! {
        div {
            class: "error-toast",
            role: "alert",
            span { "{current.text}" }
            button {
                class: "dismiss",
                "aria-label": "Close notification",
                onclick: move |_| toast.set(None),
                "×"
            }
        }
    }
}
