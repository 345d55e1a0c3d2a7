use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::error::ComponentError;

/// Output of one successful component render.
///
/// The bridge's wire contract forwards only `html`. `css` and `head` stay on
/// this seam so engines that produce them are not lossy before the envelope
/// is built; the invoker discards them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOutput {
    pub html: String,
    pub css: Option<StyleOutput>,
    pub head: Option<String>,
}

impl RenderOutput {
    pub fn markup_only(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            css: None,
            head: None,
        }
    }
}

/// Structured style output some engines emit alongside markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleOutput {
    pub code: String,
    pub map: Option<String>,
}

/// An executable reference to one loaded component definition.
///
/// The definition behind a handle is immutable once loaded; observing source
/// changes requires loading a fresh handle.
pub trait ComponentHandle: Send + Sync + std::fmt::Debug {
    /// Render the component with the supplied properties.
    fn render(&self, props: &serde_json::Value) -> Result<RenderOutput, ComponentError>;
}

/// Pluggable capability that resolves identifiers and loads definitions.
/// The core depends only on this seam; the engine behind it is swappable and
/// mockable.
pub trait ComponentSource: Send + Sync {
    /// Map a component identifier to the canonical key used for caching.
    /// Fails with [`ComponentError::Resolution`] when the identifier does not
    /// name a loadable component.
    fn locate(&self, id: &str) -> Result<PathBuf, ComponentError>;

    /// Load the definition behind a previously located key.
    fn load(&self, id: &str, key: &Path) -> Result<Arc<dyn ComponentHandle>, ComponentError>;
}
