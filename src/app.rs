//! Root application component: shared client, contexts, and routing.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::alert_stack::AlertStack;
use crate::net::pipeline::ApiClient;
use crate::net::types::CurrentUser;
use crate::pages::{feed::FeedPage, login::LoginPage, not_found::NotFoundPage};
use crate::state::alerts::Alert;

thread_local! {
    static CLIENT: ApiClient = build_client();
}

#[cfg(feature = "hydrate")]
fn build_client() -> ApiClient {
    ApiClient::browser()
}

#[cfg(not(feature = "hydrate"))]
fn build_client() -> ApiClient {
    use std::rc::Rc;

    use crate::net::http::NullTransport;
    use crate::state::token::{MemoryCache, TokenStore};
    ApiClient::new(
        Rc::new(NullTransport),
        TokenStore::new(Rc::new(MemoryCache::default())),
    )
}

/// The app-wide pipeline client. One instance per page load; every call
/// site shares its token store, session and alert queue.
pub fn client() -> ApiClient {
    CLIENT.with(Clone::clone)
}

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Mirrors the session and alert stores into reactive signals, wires
/// the notification push channel, and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let alerts = RwSignal::new(Vec::<Alert>::new());
    let user = RwSignal::new(Option::<CurrentUser>::None);
    provide_context(alerts);
    provide_context(user);

    wire_stores(alerts, user);

    view! {
        <Stylesheet id="leptos" href="/pkg/moblog.css"/>
        <Title text="Moblog"/>

        <AlertStack/>

        <Router>
            <Routes fallback=|| view! { <NotFoundPage/> }>
                <Route path=StaticSegment("") view=FeedPage/>
                <Route path=(StaticSegment("auth"), StaticSegment("login")) view=LoginPage/>
            </Routes>
        </Router>
    }
}

/// Bridge the plain stores into reactive signals and start background
/// tasks (snapshot stream, initial who-am-I, push channel).
fn wire_stores(alerts: RwSignal<Vec<Alert>>, user: RwSignal<Option<CurrentUser>>) {
    #[cfg(feature = "hydrate")]
    {
        use futures::StreamExt;

        let client = client();

        // Alert queue -> signal, with auto-dismiss timers.
        let alert_store = client.alerts().clone();
        client.alerts().set_watcher(move |queue| {
            alerts.set(queue.to_vec());
            if let Some(last) = queue.last() {
                let store = alert_store.clone();
                let id = last.id;
                let delay = last.kind.duration_ms();
                leptos::task::spawn_local(async move {
                    gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(
                        delay,
                    )))
                    .await;
                    store.dismiss(id);
                });
            }
        });

        // Session snapshot stream -> signal.
        let mut snapshots = client.session().subscribe();
        leptos::task::spawn_local(async move {
            while let Some(u) = snapshots.next().await {
                user.set(u);
            }
        });

        // Warm start: validate any cached token via the who-am-I probe
        // and hook up the notification push channel.
        if client.is_authenticated() {
            let probe = client.clone();
            leptos::task::spawn_local(async move {
                let _ = probe.fetch_current_user().await;
            });

            let mut source = crate::net::push::WebSocketSource::new(client.token().get());
            crate::net::push::attach(&mut source, client.feed().clone());
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (alerts, user);
    }
}
