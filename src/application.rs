//! Application context: the controller registry and its collaborators.
//!
//! The application is built once at boot through `ApplicationBuilder`
//! (registration calls mutate the builder), then frozen behind an `Arc`
//! by `build()`. While serving it is read-only; registry mutation after
//! boot is unrepresentable because the builder is consumed.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::controller::ControllerDefinition;
use crate::datastore::DatastoreAdapter;
use crate::inflect;
use crate::view::{FileRenderer, ViewRenderer};

/// Application-level settings consulted by the render surface.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root directory for views, used by the default file renderer.
    pub views_dir: String,
    /// Default view engine; when unset the render surface uses its hard
    /// fallback.
    pub view_engine: Option<String>,
    /// Default response format.
    pub default_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            views_dir: "app/views".to_string(),
            view_engine: None,
            default_format: "html".to_string(),
        }
    }
}

/// Process-wide application context, shared read-only across requests.
pub struct Application {
    controllers: IndexMap<String, Arc<ControllerDefinition>>,
    datastores: Vec<Arc<dyn DatastoreAdapter>>,
    renderer: Arc<dyn ViewRenderer>,
    settings: Settings,
}

impl Application {
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    /// Look up the controller registered under `name`.
    ///
    /// The name is canonicalized first, so `"posts"`, `"Posts"` and
    /// `"PostsController"` all resolve to the same definition.
    pub fn controller(&self, name: &str) -> Option<&Arc<ControllerDefinition>> {
        self.controllers.get(&inflect::controllerize(name))
    }

    /// Canonical names of all registered controllers, in registration order.
    pub fn controller_names(&self) -> impl Iterator<Item = &str> {
        self.controllers.keys().map(String::as_str)
    }

    /// The kind of record `value` is, according to the registered
    /// datastore adapters. Adapters are consulted in registration order;
    /// the first non-empty answer wins.
    pub fn record_of(&self, value: &Value) -> Option<String> {
        self.datastores.iter().find_map(|ds| ds.record_of(value))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn renderer(&self) -> &Arc<dyn ViewRenderer> {
        &self.renderer
    }
}

/// Boot-phase application assembly.
pub struct ApplicationBuilder {
    controllers: IndexMap<String, Arc<ControllerDefinition>>,
    datastores: Vec<Arc<dyn DatastoreAdapter>>,
    renderer: Option<Arc<dyn ViewRenderer>>,
    settings: Settings,
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationBuilder {
    pub fn new() -> Self {
        Self {
            controllers: IndexMap::new(),
            datastores: Vec::new(),
            renderer: None,
            settings: Settings::default(),
        }
    }

    /// Register `definition` under `name`.
    ///
    /// The name is canonicalized (`"posts"` → `"PostsController"`) and the
    /// definition's one-time initialization runs here: canonical name and
    /// view directory are recorded on the definition, exactly once, at
    /// boot — never per request.
    pub fn controller(mut self, name: &str, mut definition: ControllerDefinition) -> Self {
        let canonical = inflect::controllerize(name);
        definition.init(&canonical);
        self.controllers.insert(canonical, Arc::new(definition));
        self
    }

    /// Register a datastore adapter. Order of registration is the order
    /// of consultation.
    pub fn datastore(mut self, adapter: impl DatastoreAdapter + 'static) -> Self {
        self.datastores.push(Arc::new(adapter));
        self
    }

    /// Replace the view renderer. Defaults to a file renderer rooted at
    /// the views directory.
    pub fn renderer(mut self, renderer: impl ViewRenderer + 'static) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    pub fn views_dir(mut self, dir: impl Into<String>) -> Self {
        self.settings.views_dir = dir.into();
        self
    }

    pub fn view_engine(mut self, engine: impl Into<String>) -> Self {
        self.settings.view_engine = Some(engine.into());
        self
    }

    pub fn default_format(mut self, format: impl Into<String>) -> Self {
        self.settings.default_format = format.into();
        self
    }

    /// Freeze the application. Consumes the builder so no registration
    /// can happen once serving starts.
    pub fn build(self) -> Arc<Application> {
        let renderer = self
            .renderer
            .unwrap_or_else(|| Arc::new(FileRenderer::new(self.settings.views_dir.clone())));
        Arc::new(Application {
            controllers: self.controllers,
            datastores: self.datastores,
            renderer,
            settings: self.settings,
        })
    }
}
