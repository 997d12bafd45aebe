//! Controller definitions and per-request controller contexts.
//!
//! A `ControllerDefinition` is a named, stateless template built once at
//! application boot: its action table and filter chains grow during the
//! boot declaration phase, then the definition is frozen behind an `Arc`
//! at registration. A fresh `Context` is created from it for every
//! request, so request-scoped state never leaks between requests.

pub mod context;
pub mod filters;

pub use context::Context;
pub use filters::{Filter, FilterKind, FilterResult, FilterTable, Phase};

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::ControllerError;
use crate::inflect;

/// An action body: runs against the per-request context, signals
/// completion by returning `Ok(())` and failure by returning an error.
/// Post-filters run only after completion is signaled.
pub type ActionFn = Arc<dyn Fn(&mut Context) -> Result<(), ControllerError> + Send + Sync>;

/// Boot-time template describing one logical resource's behavior.
pub struct ControllerDefinition {
    name: String,
    view_dir: String,
    actions: IndexMap<String, ActionFn>,
    filters: FilterTable,
}

impl Default for ControllerDefinition {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerDefinition {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            view_dir: String::new(),
            actions: IndexMap::new(),
            filters: FilterTable::new(),
        }
    }

    /// Declare an action under `name`.
    pub fn action<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&mut Context) -> Result<(), ControllerError> + Send + Sync + 'static,
    {
        self.actions.insert(name.to_string(), Arc::new(f));
        self
    }

    /// Declare a pre-filter for `action`. Filters accumulate in
    /// declaration order and run strictly before the action body.
    pub fn before(mut self, action: &str, filter: Filter) -> Self {
        self.filters.declare_before(action, filter);
        self
    }

    /// Declare a post-filter for `action`, run strictly after the action
    /// body signals completion.
    pub fn after(mut self, action: &str, filter: Filter) -> Self {
        self.filters.declare_after(action, filter);
        self
    }

    /// One-time initialization performed at registration, never per
    /// request: records the canonical name and derives the view directory.
    pub(crate) fn init(&mut self, canonical_name: &str) {
        self.name = canonical_name.to_string();
        self.view_dir = inflect::decontrollerize(canonical_name);
    }

    /// Canonical controller name, e.g. `PostsController`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Short display name used in error messages, e.g. `Posts`.
    pub fn short_name(&self) -> String {
        inflect::camelize(&self.view_dir, true)
    }

    /// View directory derived from the canonical name, e.g. `posts`.
    pub fn view_dir(&self) -> &str {
        &self.view_dir
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub(crate) fn action_fn(&self, name: &str) -> Option<&ActionFn> {
        self.actions.get(name)
    }

    /// Declared action names, in declaration order.
    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub(crate) fn filters(&self) -> &FilterTable {
        &self.filters
    }
}
