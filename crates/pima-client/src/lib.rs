//! pima-client: Form submission handler for the Pima diabetes prediction service.
//! Collects the eight feature fields, posts them to `/predict`, renders the
//! label and confidence, then fetches and renders `/metrics`.

pub mod coerce;
pub mod form;
pub mod api;
pub mod view;
pub mod handler;

pub use api::{ApiError, HttpPredictionApi, PredictionApi};
pub use form::FormInput;
pub use handler::{FormHandler, MetricsStatus, SubmitError, SubmitOutcome};
pub use view::{MemoryView, TerminalView, View};
