//! TagForge HTTP API: image upload analysis and health.

pub mod analyze;
pub mod error;
pub mod health;
pub mod server;

pub use error::{ApiError, ErrorResponse};
pub use server::{build_router, start_server, AppState};
