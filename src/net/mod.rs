//! Networking: the request pipeline and everything it feeds.
//!
//! DESIGN
//! ======
//! `http` defines the transport seam, `classify` the status routing
//! table, `pipeline` the attach/dispatch/recover state machine, `api`
//! the typed endpoint helpers, `push` the notification channel, and
//! `types` the wire DTOs. The pipeline owns all retry and redirect
//! behavior; nothing above it looks at raw status codes.

pub mod api;
pub mod classify;
pub mod http;
pub mod pipeline;
pub mod push;
pub mod toast;
pub mod types;
