//! Utility helpers shared across pages and components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser storage, permission decisions and form
//! validation from page and component logic so they can be tested without a
//! DOM.

pub mod auth;
pub mod form;
pub mod storage;
