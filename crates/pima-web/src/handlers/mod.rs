//! HTTP handlers for all service routes.

pub mod health;
pub mod metrics;
pub mod predict;
