//! Shared client-side state.
//!
//! DESIGN
//! ======
//! Each store is a cheap `Rc`-backed handle passed explicitly to the
//! request pipeline and the UI, never looked up ambiently. That keeps
//! the pipeline testable with plain constructors and lets logically
//! concurrent requests share one token/session without globals.

pub mod alerts;
pub mod notifications;
pub mod session;
pub mod token;
