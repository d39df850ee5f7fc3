//! # moblog-client
//!
//! Leptos + WASM frontend for the Moblog social-blogging service.
//! Talks to the backend REST API and the notification push channel.
//!
//! The interesting machinery lives in `net`: every outbound call goes
//! through a request pipeline that attaches the bearer token, classifies
//! failures, and performs a single refresh-and-retry cycle when an access
//! token has expired. Shared client state (token store, session snapshot,
//! alert queue, notification feed) lives in `state` and is handed to the
//! pipeline explicitly so the whole thing is testable off-browser.

pub mod app;
pub mod components;
pub mod guards;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Entry point for client-side hydration.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
