//! View-rendering collaborator seam.
//!
//! The dispatch layer resolves a fully qualified view path and a locals
//! set, then delegates actual rendering through the `ViewRenderer` trait.
//! Template semantics are a collaborator concern; the `FileRenderer`
//! shipped here does plain `{{name}}` placeholder substitution so the
//! transport adapter works out of the box.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::RenderError;

/// Renders a fully qualified view path with the given locals.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &str, locals: &IndexMap<String, Value>) -> Result<String, RenderError>;
}

/// File-backed renderer with `{{name}}` placeholder substitution.
pub struct FileRenderer {
    root: PathBuf,
}

impl FileRenderer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ViewRenderer for FileRenderer {
    fn render(&self, view: &str, locals: &IndexMap<String, Value>) -> Result<String, RenderError> {
        let path = self.root.join(view);
        let template = std::fs::read_to_string(&path)
            .map_err(|_| RenderError::missing_view(view.to_string()))?;
        Ok(substitute(&template, locals))
    }
}

/// Replace each `{{name}}` placeholder with the matching local.
///
/// Strings are inserted raw; other values use their JSON representation.
/// Unknown placeholders are left in place.
fn substitute(template: &str, locals: &IndexMap<String, Value>) -> String {
    let mut output = template.to_string();
    for (name, value) in locals {
        let placeholder = format!("{{{{{}}}}}", name);
        let rendered = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        output = output.replace(&placeholder, &rendered);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn locals(pairs: &[(&str, Value)]) -> IndexMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_substitute_strings_raw() {
        let out = substitute(
            "<h1>{{title}}</h1>",
            &locals(&[("title", json!("Hello"))]),
        );
        assert_eq!(out, "<h1>Hello</h1>");
    }

    #[test]
    fn test_substitute_non_strings_as_json() {
        let out = substitute("count: {{n}}", &locals(&[("n", json!(3))]));
        assert_eq!(out, "count: 3");
    }

    #[test]
    fn test_unknown_placeholders_left_in_place() {
        let out = substitute("{{missing}}", &locals(&[]));
        assert_eq!(out, "{{missing}}");
    }

    #[test]
    fn test_file_renderer_reports_missing_view() {
        let renderer = FileRenderer::new("/nonexistent/views");
        let err = renderer
            .render("posts/show.html.stpl", &locals(&[]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing view 'posts/show.html.stpl'");
    }
}
