//! Response handle written by the controller surface and read back by the
//! transport adapter.

use indexmap::IndexMap;
use serde_json::Value;

/// The outgoing side of one dispatch.
///
/// The controller surface writes into this handle (status, headers, body,
/// view locals, redirect); the transport adapter converts it into an
/// actual HTTP response afterwards. The default redirect status (302) is
/// applied by the transport, not here: the handle records exactly what the
/// controller forwarded.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: Vec<(String, String)>,
    body: String,
    locals: IndexMap<String, Value>,
    rendered: Option<String>,
    redirect: Option<(String, Option<u16>)>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: String::new(),
            locals: IndexMap::new(),
            rendered: None,
            redirect: None,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    /// Set a view local variable. The render surface copies each exposed
    /// controller assign here before delegating to the view renderer.
    pub fn local(&mut self, name: impl Into<String>, value: Value) {
        self.locals.insert(name.into(), value);
    }

    pub fn locals(&self) -> &IndexMap<String, Value> {
        &self.locals
    }

    /// Record a redirect, forwarding both arguments unchanged.
    pub fn redirect(&mut self, url: impl Into<String>, status: Option<u16>) {
        self.redirect = Some((url.into(), status));
    }

    pub fn redirection(&self) -> Option<(&str, Option<u16>)> {
        self.redirect
            .as_ref()
            .map(|(url, status)| (url.as_str(), *status))
    }

    /// Record the fully qualified view path handed to the renderer.
    pub(crate) fn record_render(&mut self, view: impl Into<String>) {
        self.rendered = Some(view.into());
    }

    /// The view path rendered into this response, if any.
    pub fn rendered_view(&self) -> Option<&str> {
        self.rendered.as_deref()
    }
}
