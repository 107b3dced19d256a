//! HTTP handlers for the manifesto service.

pub mod app;
pub mod manifesto;
pub mod metrics;
