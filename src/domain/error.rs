use std::error::Error as StdError;

use thiserror::Error;

type Source = Box<dyn StdError + Send + Sync + 'static>;

/// Failures raised below the invoker boundary, one variant per pipeline
/// stage. The invoker converts these into the failure envelope; nothing else
/// catches them.
#[derive(Debug, Error)]
pub enum ComponentError {
    /// The identifier did not resolve to a loadable component.
    #[error("failed to resolve component `{path}`")]
    Resolution {
        path: String,
        #[source]
        source: Source,
    },
    /// The component resolved but its definition could not be loaded.
    #[error("failed to load component `{path}`")]
    Load {
        path: String,
        #[source]
        source: Source,
    },
    /// The component loaded but its render call failed.
    #[error("render failed for component `{path}`")]
    Render {
        path: String,
        #[source]
        source: Source,
    },
}

impl ComponentError {
    pub fn resolution(path: impl Into<String>, source: impl Into<Source>) -> Self {
        Self::Resolution {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn load(path: impl Into<String>, source: impl Into<Source>) -> Self {
        Self::Load {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn render(path: impl Into<String>, source: impl Into<Source>) -> Self {
        Self::Render {
            path: path.into(),
            source: source.into(),
        }
    }

    /// The component identifier the failure is attributed to.
    pub fn path(&self) -> &str {
        match self {
            Self::Resolution { path, .. } | Self::Load { path, .. } | Self::Render { path, .. } => {
                path.as_str()
            }
        }
    }

    /// Category name surfaced on the wire as `error.type`.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Resolution { .. } => "ResolutionError",
            Self::Load { .. } => "LoadError",
            Self::Render { .. } => "RenderError",
        }
    }
}
