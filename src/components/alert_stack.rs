//! Global alert banner stack.
//!
//! Renders whatever the pipeline pushed into the alert queue. This is
//! the only place error/success messages reach the DOM; components never
//! interpret HTTP statuses themselves.

use leptos::prelude::*;

use crate::state::alerts::{Alert, AlertKind};

#[component]
pub fn AlertStack() -> impl IntoView {
    let alerts = expect_context::<RwSignal<Vec<Alert>>>();

    view! {
        <div class="alert-stack">
            {move || {
                alerts
                    .get()
                    .into_iter()
                    .map(|alert| {
                        let class = match alert.kind {
                            AlertKind::Error => "alert alert--error",
                            AlertKind::Warning => "alert alert--warning",
                            AlertKind::Info => "alert alert--info",
                            AlertKind::Success => "alert alert--success",
                        };
                        let id = alert.id;
                        view! {
                            <div class=class role="alert">
                                <span class="alert__message">{alert.message.clone()}</span>
                                <button
                                    class="alert__dismiss"
                                    on:click=move |_| crate::app::client().alerts().dismiss(id)
                                >
                                    "\u{d7}"
                                </button>
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}
