//! Client-side application state.
//!
//! SYSTEM CONTEXT
//! ==============
//! State types are plain structs; the root component wraps them in
//! `RwSignal`s and provides them through context.

pub mod auth;
