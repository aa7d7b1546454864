// src/lib.rs

//! # Function App
//!
//! Azure Functions custom handler exposing a database-aware `HealthCheck`
//! function and a small data layer for to-do items.

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
pub mod telemetry;
