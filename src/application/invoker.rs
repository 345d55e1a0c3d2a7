use std::error::Error as StdError;

use ponte_api_types::{RenderEnvelope, RenderFailure};
use tracing::{debug, warn};

use crate::application::loader::ComponentLoader;
use crate::domain::component::RenderOutput;
use crate::domain::error::ComponentError;

/// Execute one render attempt and fold the outcome into the wire envelope.
///
/// This is the bridge boundary: whatever fails underneath — resolution, load,
/// or the render call itself — comes back as data. The function never returns
/// an error and makes exactly one attempt; retry policy belongs to the host.
pub fn render(
    loader: &ComponentLoader,
    component: &str,
    props: &serde_json::Value,
) -> RenderEnvelope {
    match attempt(loader, component, props) {
        Ok(output) => {
            debug!(
                target: "ponte::invoker",
                component,
                markup_bytes = output.html.len(),
                "render succeeded"
            );
            // css and head are dropped here: the bridge ships markup only.
            RenderEnvelope::success(output.html)
        }
        Err(err) => {
            warn!(target: "ponte::invoker", component, error = %err, "render failed");
            RenderEnvelope::failure(component, failure_detail(&err))
        }
    }
}

/// Envelope for input that never became a render request, e.g. an
/// unparseable line on the serve loop. The host still receives exactly one
/// envelope per request, so its framing stays aligned.
pub fn rejected_request(err: &serde_json::Error) -> RenderEnvelope {
    let message = err.to_string();
    RenderEnvelope::failure(
        "",
        RenderFailure {
            kind: "RequestError".to_string(),
            message: message.clone(),
            stack: message,
        },
    )
}

fn attempt(
    loader: &ComponentLoader,
    component: &str,
    props: &serde_json::Value,
) -> Result<RenderOutput, ComponentError> {
    let handle = loader.load(component)?;
    handle.render(props)
}

/// Flatten a failure into the wire detail. `stack` is the rendered cause
/// chain, starting with the failure itself, one cause per line.
fn failure_detail(err: &ComponentError) -> RenderFailure {
    let mut lines = vec![err.to_string()];
    let mut current = StdError::source(err);
    while let Some(inner) = current {
        lines.push(inner.to_string());
        current = inner.source();
    }

    RenderFailure {
        kind: err.category().to_string(),
        message: err.to_string(),
        stack: lines.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::config::Mode;
    use crate::domain::component::{ComponentHandle, ComponentSource};

    enum Script {
        Succeed(&'static str),
        FailResolution,
        FailLoad,
        FailRender,
    }

    struct OneShot {
        script: Script,
    }

    impl ComponentSource for OneShot {
        fn locate(&self, id: &str) -> Result<PathBuf, ComponentError> {
            if matches!(self.script, Script::FailResolution) {
                return Err(ComponentError::resolution(
                    id,
                    io::Error::new(io::ErrorKind::NotFound, "no such file or directory"),
                ));
            }
            Ok(PathBuf::from(id))
        }

        fn load(&self, id: &str, _key: &Path) -> Result<Arc<dyn ComponentHandle>, ComponentError> {
            match self.script {
                Script::FailLoad => Err(ComponentError::load(
                    id,
                    io::Error::new(io::ErrorKind::InvalidData, "unclosed block"),
                )),
                Script::Succeed(html) => Ok(Arc::new(Fixed {
                    html: Some(html),
                    id: id.to_string(),
                })),
                Script::FailRender => Ok(Arc::new(Fixed {
                    html: None,
                    id: id.to_string(),
                })),
                Script::FailResolution => unreachable!("locate already failed"),
            }
        }
    }

    #[derive(Debug)]
    struct Fixed {
        html: Option<&'static str>,
        id: String,
    }

    impl ComponentHandle for Fixed {
        fn render(&self, _props: &serde_json::Value) -> Result<RenderOutput, ComponentError> {
            match self.html {
                Some(html) => Ok(RenderOutput::markup_only(html)),
                None => Err(ComponentError::render(
                    self.id.as_str(),
                    io::Error::new(io::ErrorKind::InvalidInput, "property `name` is undefined"),
                )),
            }
        }
    }

    fn loader_for(script: Script) -> ComponentLoader {
        ComponentLoader::new(Arc::new(OneShot { script }), Mode::Development)
    }

    #[test]
    fn success_produces_the_markup_envelope() {
        let loader = loader_for(Script::Succeed("<p>Hello from Svelte</p>"));
        let envelope = render(&loader, "Hello.hbs", &json!({ "name": "Svelte" }));

        assert!(envelope.is_success());
        assert_eq!(envelope.markup(), Some("<p>Hello from Svelte</p>"));
    }

    #[test]
    fn resolution_failure_is_attributed_to_the_original_identifier() {
        let loader = loader_for(Script::FailResolution);
        let envelope = render(&loader, "/missing/Nope.hbs", &json!({}));

        let RenderEnvelope::Failure {
            path,
            error,
            markup,
            component,
        } = envelope
        else {
            panic!("expected failure envelope");
        };
        assert_eq!(path, "/missing/Nope.hbs");
        assert_eq!(error.kind, "ResolutionError");
        assert!(!error.message.is_empty());
        assert!(error.stack.contains("no such file or directory"));
        assert!(markup.is_none());
        assert!(component.is_none());
    }

    #[test]
    fn load_failure_maps_to_its_category() {
        let loader = loader_for(Script::FailLoad);
        let envelope = render(&loader, "Broken.hbs", &json!({}));
        assert_eq!(envelope.error().map(|e| e.kind.as_str()), Some("LoadError"));
    }

    #[test]
    fn render_failure_maps_to_its_category() {
        let loader = loader_for(Script::FailRender);
        let envelope = render(&loader, "Strict.hbs", &json!({}));

        let error = envelope.error().expect("failure detail");
        assert_eq!(error.kind, "RenderError");
        assert!(error.stack.contains("property `name` is undefined"));
    }

    #[test]
    fn stack_carries_the_whole_cause_chain() {
        let loader = loader_for(Script::FailRender);
        let envelope = render(&loader, "Strict.hbs", &json!({}));

        let error = envelope.error().expect("failure detail");
        let lines: Vec<&str> = error.stack.lines().collect();
        assert_eq!(lines[0], error.message);
        assert!(lines.len() > 1);
    }

    #[test]
    fn rejected_request_keeps_the_envelope_contract() {
        let parse_err = serde_json::from_str::<ponte_api_types::RenderRequest>("not json")
            .expect_err("invalid request");
        let envelope = rejected_request(&parse_err);

        let error = envelope.error().expect("failure detail");
        assert_eq!(error.kind, "RequestError");
        assert!(!error.message.is_empty());
    }
}
