//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read the auth store, route rules and API client from Leptos
//! context providers installed by `app::App`. Decisions are delegated to the
//! pure helpers in `util`; these modules only render and navigate.

pub mod alert;
pub mod form;
pub mod protected_route;
