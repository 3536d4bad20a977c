//! Terminal dashboard for the factory backend.
//!
//! Each panel is driven by a polling fetch hook (see [`hooks::use_api`]) and
//! rendered as plain text by the matching module under [`views`].

pub mod app;
pub mod config;
pub mod hooks;
pub mod telemetry;
pub mod utils;
pub mod views;
