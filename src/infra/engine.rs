use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use handlebars::Handlebars;
use tracing::debug;

use crate::domain::component::{ComponentHandle, ComponentSource, RenderOutput};
use crate::domain::error::ComponentError;

const ENTRY_TEMPLATE: &str = "component";

/// The shipped [`ComponentSource`]: loads Handlebars template files as
/// components.
///
/// Strict variable resolution is deliberate: a property the component
/// dereferences but the request omits must fail the render, not silently
/// produce empty markup.
#[derive(Debug, Default)]
pub struct TemplateEngine {
    base_dir: Option<PathBuf>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative identifiers against `dir`. Absolute identifiers are
    /// used as-is either way.
    pub fn with_base_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(dir.into()),
        }
    }

    fn resolve_path(&self, id: &str) -> PathBuf {
        let raw = Path::new(id);
        match (&self.base_dir, raw.is_absolute()) {
            (Some(base), false) => base.join(raw),
            _ => raw.to_path_buf(),
        }
    }
}

impl ComponentSource for TemplateEngine {
    fn locate(&self, id: &str) -> Result<PathBuf, ComponentError> {
        self.resolve_path(id)
            .canonicalize()
            .map_err(|err| ComponentError::resolution(id, err))
    }

    fn load(&self, id: &str, key: &Path) -> Result<Arc<dyn ComponentHandle>, ComponentError> {
        let source = fs::read_to_string(key).map_err(|err| ComponentError::load(id, err))?;

        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry
            .register_template_string(ENTRY_TEMPLATE, source)
            .map_err(|err| ComponentError::load(id, err))?;

        debug!(
            target: "ponte::engine",
            component = id,
            key = %key.display(),
            "compiled component template"
        );

        Ok(Arc::new(TemplateComponent {
            id: id.to_string(),
            registry,
        }))
    }
}

#[derive(Debug)]
struct TemplateComponent {
    id: String,
    registry: Handlebars<'static>,
}

impl ComponentHandle for TemplateComponent {
    fn render(&self, props: &serde_json::Value) -> Result<RenderOutput, ComponentError> {
        let html = self
            .registry
            .render(ENTRY_TEMPLATE, props)
            .map_err(|err| ComponentError::render(self.id.as_str(), err))?;

        // Template components carry no style or head output.
        Ok(RenderOutput::markup_only(html))
    }
}
