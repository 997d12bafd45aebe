//! Per-request controller context.
//!
//! A new context is created for each request being handled. This allows
//! request-specific state to live on the controller without risk of
//! conflicts due to concurrency: the context is owned exclusively by one
//! request's processing flow and dropped when the response completes or
//! errors.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::application::Application;
use crate::controller::ControllerDefinition;
use crate::error::ControllerError;
use crate::inflect;
use crate::request::Request;
use crate::response::Response;

/// Hard fallback when neither render options nor application settings
/// name a view engine.
const DEFAULT_ENGINE: &str = "stpl";

/// Assigns whose names start with this marker are never exposed to views.
const PRIVATE_MARKER: char = '_';

/// Options accepted by the render surface.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    format: Option<String>,
    engine: Option<String>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Response format, defaults to `"html"` (application setting).
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// View engine, defaults to the application's `view_engine` setting.
    pub fn engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = Some(engine.into());
        self
    }
}

/// The per-request controller instance.
///
/// Holds the bound request/response handles, the current action name, the
/// assigns map populated by the action, and the snapshot of assign keys
/// taken immediately before the action body runs. The snapshot is the
/// exclusion list used to compute view locals at render time.
pub struct Context {
    app: Arc<Application>,
    definition: Arc<ControllerDefinition>,
    action: String,
    request: Request,
    response: Response,
    assigns: IndexMap<String, Value>,
    snapshot: HashSet<String>,
}

impl Context {
    /// Prepare a fresh context for one request: binds the request and a
    /// new response handle to instance-local storage.
    pub(crate) fn prepare(
        app: Arc<Application>,
        definition: Arc<ControllerDefinition>,
        request: Request,
    ) -> Self {
        Self {
            app,
            definition,
            action: String::new(),
            request,
            response: Response::new(),
            assigns: IndexMap::new(),
            snapshot: HashSet::new(),
        }
    }

    /// Capture the pre-action assign snapshot and stamp the routing
    /// context on the request. Called by the dispatch coordinator after
    /// the action name has been validated, immediately before any filter
    /// or action code runs.
    pub(crate) fn begin_action(&mut self, action: &str) {
        self.action = action.to_string();
        self.snapshot = self.assigns.keys().cloned().collect();
        self.request.stamp(self.definition.name(), action);
    }

    pub fn app(&self) -> &Arc<Application> {
        &self.app
    }

    /// Name of the action currently being invoked.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// The bound request handle. Aliased as [`Context::request`]; both
    /// names resolve to the same underlying value.
    pub fn req(&self) -> &Request {
        &self.request
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// The bound response handle. Aliased as [`Context::response`].
    pub fn res(&self) -> &Response {
        &self.response
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    /// Split borrow used to hand middleware-shape filters the bare
    /// request/response pair.
    pub(crate) fn handles_mut(&mut self) -> (&mut Request, &mut Response) {
        (&mut self.request, &mut self.response)
    }

    /// The value of request parameter `name`, when present.
    ///
    /// Aliased as [`Context::params`], which additionally takes a default.
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.request.param(name)
    }

    /// The value of request parameter `name`, or `default` when absent.
    pub fn params(&self, name: &str, default: Value) -> Value {
        self.request.param(name).cloned().unwrap_or(default)
    }

    /// Set an assign. Assigns made while the action executes (and whose
    /// names do not start with `_`) become view locals at render time.
    pub fn assign(&mut self, name: impl Into<String>, value: Value) {
        self.assigns.insert(name.into(), value);
    }

    pub fn assigns(&self) -> &IndexMap<String, Value> {
        &self.assigns
    }

    /// Render the template for the current action with default options.
    pub fn render(&mut self) -> Result<(), ControllerError> {
        self.render_with(None, RenderOptions::default())
    }

    /// Render `template` with default options.
    pub fn render_template(&mut self, template: &str) -> Result<(), ControllerError> {
        self.render_with(Some(template), RenderOptions::default())
    }

    /// Render a template, resolving the effective view path as
    /// `<view_dir>/<template>.<format>.<engine>`.
    ///
    /// The template defaults to the underscored current action name and is
    /// used as given when it already contains a `/`. The format defaults
    /// to the application's default format; the engine resolves explicit
    /// option, then application setting, then the hard fallback.
    pub fn render_with(
        &mut self,
        template: Option<&str>,
        options: RenderOptions,
    ) -> Result<(), ControllerError> {
        let settings = self.app.settings();
        let tmpl = template
            .map(str::to_string)
            .unwrap_or_else(|| inflect::underscore(&self.action));
        let fmt = options
            .format
            .unwrap_or_else(|| settings.default_format.clone());
        let eng = options
            .engine
            .or_else(|| settings.view_engine.clone())
            .unwrap_or_else(|| DEFAULT_ENGINE.to_string());

        let tmpl = if tmpl.contains('/') {
            tmpl
        } else {
            format!("{}/{}", self.definition.view_dir(), tmpl)
        };
        let view = format!("{}.{}.{}", tmpl, fmt, eng);

        // Copy the exposed assigns to the response's local-variable store.
        // Private assigns and assigns existing prior to the action are
        // filtered out.
        for (name, value) in &self.assigns {
            if name.starts_with(PRIVATE_MARKER) || self.snapshot.contains(name) {
                continue;
            }
            self.response.local(name.clone(), value.clone());
        }

        let body = self.app.renderer().render(&view, self.response.locals())?;
        self.response.set_body(body);
        self.response.record_render(view);
        Ok(())
    }

    /// Redirect to `url`. The default status (302) is applied by the
    /// transport; this layer forwards the call unchanged.
    pub fn redirect(&mut self, url: &str) {
        self.response.redirect(url, None);
    }

    /// Redirect to `url` with an explicit status, forwarded verbatim.
    pub fn redirect_with_status(&mut self, url: &str, status: u16) {
        self.response.redirect(url, Some(status));
    }

    /// Signal an internal error out of the dispatch flow. This is the
    /// single sanctioned failure path for action and filter code:
    ///
    /// ```ignore
    /// return ctx.error("database unavailable");
    /// ```
    pub fn error(&self, err: impl Into<ControllerError>) -> Result<(), ControllerError> {
        Err(err.into())
    }

    /// Consume the context once the request completes.
    pub(crate) fn into_response(self) -> Response {
        self.response
    }
}
