//! Login page.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::guards::{GuardOutcome, check_guest};
use crate::net::types::LoginRequest;

/// Login form. Guest-only: a user with a valid session is bounced home.
#[component]
pub fn LoginPage() -> impl IntoView {
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let pending = RwSignal::new(false);

    let navigate = use_navigate();

    // Guest guard: probe the session once on mount.
    Effect::new(move || {
        let client = crate::app::client();
        leptos::task::spawn_local(async move {
            if let GuardOutcome::Redirect(route) = check_guest(&client).await {
                client.navigate(route);
            }
        });
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if pending.get() {
            return;
        }
        pending.set(true);

        let request = LoginRequest {
            email: email.get(),
            password: password.get(),
        };
        let client = crate::app::client();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            let result = client.login(&request).await;
            pending.set(false);
            if result.is_ok() {
                navigate("/", NavigateOptions::default());
            }
            // Failures were already surfaced by the pipeline.
        });
    };

    view! {
        <div class="login-page">
            <h1>"Moblog"</h1>
            <form class="login-page__form" on:submit=on_submit>
                <label>
                    "Email"
                    <input
                        type="email"
                        prop:value=email
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Password"
                    <input
                        type="password"
                        prop:value=password
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </label>
                <button type="submit" class="btn btn--primary" disabled=pending>
                    {move || if pending.get() { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
        </div>
    }
}
