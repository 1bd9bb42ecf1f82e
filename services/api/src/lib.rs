//! services/api/src/lib.rs
//!
//! The HTTP and WebSocket surface over the docgen core stores.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
