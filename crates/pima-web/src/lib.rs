//! Pima prediction service: `/health`, `/metrics` and `/predict` over HTTP.

pub mod error;
pub mod handlers;
pub mod model;
pub mod router;
pub mod state;
pub mod validation;

pub use error::ServiceError;
pub use model::LogisticModel;
pub use router::build_router;
pub use state::{AppState, SharedState};
