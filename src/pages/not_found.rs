//! Not-found page, also the target of primary-entity 404 redirects.

use leptos::prelude::*;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="not-found-page">
            <h1>"404"</h1>
            <p>"The page you are looking for does not exist."</p>
            <a href="/">"Back to the feed"</a>
        </div>
    }
}
