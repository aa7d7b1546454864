// src/main.rs

//! # Main Application Entry Point
//!
//! Loads `.env`, then hands over to [`function_app::bootstrap::run`]. Any
//! start-up failure, including a missing connection string, exits non-zero.

use std::process::ExitCode;

/// The main entry point for the Tokio runtime.
#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    match function_app::bootstrap::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // The subscriber may not be installed yet, so report on stderr.
            eprintln!("function-app failed to start: {e}");
            ExitCode::FAILURE
        }
    }
}
