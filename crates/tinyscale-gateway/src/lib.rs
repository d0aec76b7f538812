//! HTTP front end of the tinyscale URL shortener.
//!
//! [`App::router`] builds the `axum` router over an [`AppState`] holding the
//! shortener and redirector behind trait objects, so the binary can choose
//! storage and cache backends at startup.

pub mod app;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod model;
pub mod state;
pub mod telemetry;

pub use app::App;
pub use error::AppError;
pub use state::AppState;
