//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration (fetching, submitting,
//! navigating) and delegates gating, validation and rendering details to
//! `util` and `components`. Access control is applied by wrapping pages in
//! `ProtectedRoute` at the router.

pub mod activities;
pub mod activity;
pub mod admin_categories;
pub mod login;
pub mod unauthorized;
