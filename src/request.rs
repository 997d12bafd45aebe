//! Request handle bound to a controller context for one dispatch.

use indexmap::IndexMap;
use serde_json::Value;

/// A single incoming request, as seen by the dispatch layer.
///
/// The transport adapter builds one of these per request; the dispatch
/// coordinator stamps it with the resolved controller and action names so
/// helper code can inspect the current routing context.
#[derive(Debug, Clone)]
pub struct Request {
    method: String,
    path: String,
    params: IndexMap<String, Value>,
    headers: IndexMap<String, String>,
    body: String,
    controller: Option<String>,
    action: Option<String>,
}

impl Request {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into().to_uppercase(),
            path: path.into(),
            params: IndexMap::new(),
            headers: IndexMap::new(),
            body: String::new(),
            controller: None,
            action: None,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Builder-style param assignment, mostly useful in tests and adapters.
    pub fn with_param(mut self, name: impl Into<String>, value: Value) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    pub fn set_param(&mut self, name: impl Into<String>, value: Value) {
        self.params.insert(name.into(), value);
    }

    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    pub fn params(&self) -> &IndexMap<String, Value> {
        &self.params
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into().to_lowercase(), value.into());
    }

    /// Header lookup is case-insensitive; names are stored lowercased.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Record the resolved routing context on the request. Called by the
    /// dispatch coordinator immediately before the action runs.
    pub(crate) fn stamp(&mut self, controller: &str, action: &str) {
        self.controller = Some(controller.to_string());
        self.action = Some(action.to_string());
    }

    /// Canonical name of the controller handling this request, once dispatched.
    pub fn controller(&self) -> Option<&str> {
        self.controller.as_deref()
    }

    /// Name of the action handling this request, once dispatched.
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }
}
