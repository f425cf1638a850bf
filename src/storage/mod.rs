//! Storage layer for the router
//!
//! Durable state is limited to small JSON documents, one per provider. They
//! are written through [`JsonStore`], which versions every document and
//! replaces files atomically.

pub mod json_store;

pub use json_store::JsonStore;
