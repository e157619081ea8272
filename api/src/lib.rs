//! HTTP surface of the OTP service
//!
//! Exposes issuing, verifying and inspecting one-time passwords over
//! actix-web. The binary in `main.rs` wires real collaborators; tests build
//! the same app over in-memory ones.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::create_app;
pub use routes::otp::AppState;
