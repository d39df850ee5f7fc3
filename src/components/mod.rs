//! Shared UI components.

pub mod alert_stack;
