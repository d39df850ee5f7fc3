//! Inbound notification push channel.
//!
//! The transport is an external collaborator; the core only knows the
//! [`EventSource`] trait with a single handler registration. The
//! browser implementation rides a WebSocket with the access token as a
//! query parameter and reconnects with exponential backoff, like every
//! other push consumer in this app's family.

#[cfg(test)]
#[path = "push_test.rs"]
mod push_test;

use crate::net::types::Notification;
use crate::state::notifications::NotificationFeed;

/// Something that delivers parsed notifications. One handler, set once.
pub trait EventSource {
    fn on_message(&mut self, handler: Box<dyn Fn(Notification)>);
}

/// Wire an event source into the feed store: every inbound notification
/// is prepended.
pub fn attach(source: &mut dyn EventSource, feed: NotificationFeed) {
    source.on_message(Box::new(move |n| feed.receive(n)));
}

/// Browser WebSocket source for `/ws/notifications`.
#[cfg(feature = "hydrate")]
pub struct WebSocketSource {
    token: Option<String>,
}

#[cfg(feature = "hydrate")]
impl WebSocketSource {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    fn url(&self) -> String {
        let location = web_sys::window()
            .and_then(|w| w.location().href().ok())
            .unwrap_or_default();
        let proto = if location.starts_with("https") { "wss" } else { "ws" };
        let host = web_sys::window()
            .and_then(|w| w.location().host().ok())
            .unwrap_or_else(|| "localhost:4200".to_owned());
        match &self.token {
            Some(t) => format!("{proto}://{host}/ws/notifications?token={t}"),
            None => format!("{proto}://{host}/ws/notifications"),
        }
    }
}

#[cfg(feature = "hydrate")]
impl EventSource for WebSocketSource {
    fn on_message(&mut self, handler: Box<dyn Fn(Notification)>) {
        let url = self.url();
        leptos::task::spawn_local(run_client(url, handler));
    }
}

/// Connection loop with reconnect backoff.
#[cfg(feature = "hydrate")]
async fn run_client(url: String, handler: Box<dyn Fn(Notification)>) {
    use futures::StreamExt;
    use gloo_net::websocket::Message;
    use gloo_net::websocket::futures::WebSocket;

    let mut backoff_ms: u32 = 1000;
    let max_backoff_ms: u32 = 10_000;

    loop {
        match WebSocket::open(&url) {
            Ok(ws) => {
                let (_write, mut read) = ws.split();
                backoff_ms = 1000;
                while let Some(msg) = read.next().await {
                    match msg {
                        Ok(Message::Text(text)) => {
                            match serde_json::from_str::<Notification>(&text) {
                                Ok(n) => handler(n),
                                Err(e) => log::debug!("unparseable notification: {e}"),
                            }
                        }
                        Ok(Message::Bytes(_)) => {}
                        Err(e) => {
                            log::warn!("notification socket error: {e}");
                            break;
                        }
                    }
                }
                log::debug!("notification socket closed");
            }
            Err(e) => {
                log::warn!("notification socket connect failed: {e}");
            }
        }

        gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(backoff_ms))).await;
        backoff_ms = (backoff_ms * 2).min(max_backoff_ms);
    }
}
