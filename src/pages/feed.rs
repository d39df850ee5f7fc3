//! Post feed page.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::guards::{GuardOutcome, check_auth};
use crate::net::types::Post;

async fn load_posts() -> Option<Vec<Post>> {
    crate::app::client().posts(0, 10).await.ok().map(|p| p.content)
}

/// Feed page listing recent posts. Requires authentication.
#[component]
pub fn FeedPage() -> impl IntoView {
    let navigate = use_navigate();

    // Auth guard on mount.
    Effect::new(move || {
        let client = crate::app::client();
        if let GuardOutcome::Redirect(route) = check_auth(client.token(), "/") {
            navigate(route, NavigateOptions::default());
        }
    });

    let posts = LocalResource::new(load_posts);

    view! {
        <div class="feed-page">
            <h1>"Feed"</h1>
            <Suspense fallback=move || view! { <p>"Loading posts..."</p> }>
                {move || {
                    posts
                        .get()
                        .map(|loaded| match loaded {
                            Some(list) if !list.is_empty() => {
                                list.into_iter()
                                    .map(|post| {
                                        view! {
                                            <article class="feed-page__post">
                                                <h2>{post.post_title.clone()}</h2>
                                                <p class="feed-page__author">
                                                    {format!("by {}", post.creator_username)}
                                                </p>
                                                <p>{post.post_content.clone()}</p>
                                            </article>
                                        }
                                            .into_any()
                                    })
                                    .collect_view()
                                    .into_any()
                            }
                            Some(_) => view! { <p>"No posts yet."</p> }.into_any(),
                            None => view! { <p>"Could not load the feed."</p> }.into_any(),
                        })
                }}
            </Suspense>
        </div>
    }
}
