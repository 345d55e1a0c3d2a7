//! Shared request and response types for the ponte rendering bridge.
//!
//! Hosts talk to the bridge over a line-oriented channel: one JSON
//! [`RenderRequest`] in, one JSON [`RenderEnvelope`] out. The field sets of
//! both envelope shapes are normative; existing hosts pattern-match on them,
//! so they must not drift.

use serde::{Deserialize, Serialize};

/// One render invocation: a component identifier plus its input properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Filesystem path (or root-relative locator) of the component.
    pub component: String,
    /// Arbitrary structured properties handed to the component's render
    /// capability. Absent properties default to an empty object.
    #[serde(default = "empty_props")]
    pub props: serde_json::Value,
}

impl RenderRequest {
    pub fn new(component: impl Into<String>, props: serde_json::Value) -> Self {
        Self {
            component: component.into(),
            props,
        }
    }
}

fn empty_props() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Structured failure detail carried by the failure envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderFailure {
    /// Failure category name, e.g. `ResolutionError` or `RenderError`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Top-level failure message.
    pub message: String,
    /// Diagnostic trace: the rendered error chain, one cause per line.
    pub stack: String,
}

/// The wire-level result of one render invocation.
///
/// Always exactly one of the two shapes, never partially populated:
///
/// ```json
/// { "error": null, "markup": "<p>…</p>" }
/// ```
///
/// ```json
/// { "path": "…", "error": { "type": "…", "message": "…", "stack": "…" },
///   "markup": null, "component": null }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RenderEnvelope {
    Failure {
        /// The component identifier exactly as the caller supplied it.
        path: String,
        error: RenderFailure,
        /// Always `null` on failure.
        markup: Option<String>,
        /// Always `null`; retained for host compatibility.
        component: Option<serde_json::Value>,
    },
    Success {
        /// Always `null` on success.
        error: Option<RenderFailure>,
        markup: String,
    },
}

impl RenderEnvelope {
    pub fn success(markup: impl Into<String>) -> Self {
        RenderEnvelope::Success {
            error: None,
            markup: markup.into(),
        }
    }

    pub fn failure(path: impl Into<String>, error: RenderFailure) -> Self {
        RenderEnvelope::Failure {
            path: path.into(),
            error,
            markup: None,
            component: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RenderEnvelope::Success { .. })
    }

    /// Rendered markup, present only on success.
    pub fn markup(&self) -> Option<&str> {
        match self {
            RenderEnvelope::Success { markup, .. } => Some(markup),
            RenderEnvelope::Failure { .. } => None,
        }
    }

    /// Failure detail, present only on failure.
    pub fn error(&self) -> Option<&RenderFailure> {
        match self {
            RenderEnvelope::Success { .. } => None,
            RenderEnvelope::Failure { error, .. } => Some(error),
        }
    }
}
