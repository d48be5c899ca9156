//! imgvault API library
//!
//! HTTP handlers, error rendering and application setup around the upload processor.

pub mod constants;
pub mod error;
mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
