//! Render Bridge implementation.
//!
//! Produces a display artifact for the current graph state as a base64
//! `data:` URI of Graphviz DOT source. Rendering is never transactional
//! with edge mutation: a confirmed edge survives a failed render.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use depmap_domain::traits::GraphRenderer;
use depmap_domain::{EdgeSet, RenderArtifact};
use std::sync::Arc;
use thiserror::Error;

/// Render error
#[derive(Debug, Error)]
pub enum RenderError {
    /// The renderer could not produce an artifact
    #[error("Renderer unavailable: {0}")]
    Unavailable(String),
}

/// Renderer handle shared across handlers
pub type SharedRenderer = Arc<dyn GraphRenderer<Error = RenderError> + Send + Sync>;

/// Graphviz DOT renderer.
///
/// Emits every variable as a node (so unconnected variables stay visible)
/// and every confirmed dependency as a directed edge, then wraps the DOT
/// source as a `data:text/vnd.graphviz;base64,...` URI.
#[derive(Debug, Default)]
pub struct DotRenderer;

impl DotRenderer {
    /// Create a renderer
    pub fn new() -> Self {
        Self
    }

    fn dot_source(variables: &[String], edges: &EdgeSet) -> String {
        let mut dot = String::from("digraph dependencies {\n");
        dot.push_str("    rankdir=LR;\n");
        dot.push_str("    node [shape=ellipse, style=filled, fillcolor=lightblue];\n");

        for variable in variables {
            dot.push_str(&format!("    {};\n", quote(variable)));
        }
        for edge in edges {
            dot.push_str(&format!(
                "    {} -> {};\n",
                quote(&edge.source),
                quote(&edge.target)
            ));
        }

        dot.push_str("}\n");
        dot
    }
}

impl GraphRenderer for DotRenderer {
    type Error = RenderError;

    fn render(&self, variables: &[String], edges: &EdgeSet) -> Result<RenderArtifact, RenderError> {
        let dot = Self::dot_source(variables, edges);
        let encoded = STANDARD.encode(dot.as_bytes());
        Ok(RenderArtifact::new(format!(
            "data:text/vnd.graphviz;base64,{}",
            encoded
        )))
    }
}

/// Quote a name as a DOT identifier
fn quote(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}
