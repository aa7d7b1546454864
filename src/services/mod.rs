// src/services/mod.rs

//! # Services Module
//!
//! Everything that talks to the backing store.

// Store handle: probe, descriptor, schema setup
pub mod data_context;
// Table layout, dialects and seed rows
pub mod schema;
// Read/insert queries over todo_items
pub mod todo_items;

pub use data_context::{DataContext, DataContextOptions, ProbeResult};
