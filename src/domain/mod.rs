//! Domain layer: the component capability seam and the failure taxonomy.

pub mod component;
pub mod error;
