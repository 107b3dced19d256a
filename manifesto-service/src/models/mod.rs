//! Domain models for the manifesto service.

pub mod manifesto;

pub use manifesto::{manifesto_filename, ManifestoFields, ManifestoRequest, ManifestoResponse};
