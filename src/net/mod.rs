//! Networking modules for the REST API and image storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` is the HTTP seam, `api` the authenticated JSON client,
//! `resources` the typed endpoints, `images` the Firebase Storage client, and
//! `types` the wire schema.

pub mod api;
pub mod images;
pub mod resources;
#[cfg(test)]
pub(crate) mod testing;
pub mod transport;
pub mod types;
