//! ponte: a cross-process rendering bridge.
//!
//! A host process hands the bridge a component identifier and a property set;
//! the bridge resolves the component, renders it, and answers with a single
//! [`ponte_api_types::RenderEnvelope`] — markup on success, a structured
//! error otherwise. The render cycle lives in [`application`]; the engine
//! behind the [`domain::component::ComponentSource`] seam is swappable.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
