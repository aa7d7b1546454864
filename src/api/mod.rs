// src/api/mod.rs

//! # API Module
//!
//! Request handlers and the state they share.

pub mod auth;
pub mod health;
pub mod state;
pub mod todos;
