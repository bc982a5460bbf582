//! # portal
//!
//! Leptos + WASM client core for a youth-movement member portal: activity
//! browsing and enrollment, news, profiles and the administrative screens.
//!
//! This crate contains the auth store, the authenticated REST client and its
//! typed endpoints, the Firebase Storage image client, permission gating for
//! routes and elements, declarative form validation, and the pages that tie
//! them together. Browser-only code is behind the `hydrate` feature; server
//! rendering uses `ssr`.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install console logging and hydrate the server-rendered
/// markup.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        web_sys::console::warn_1(&"console logger already installed".into());
    }
    tracing::info!("hydrating portal client");
    leptos::mount::hydrate_body(app::App);
}
