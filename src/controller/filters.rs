//! Before/after filter chains.
//!
//! Filters attach to a named action and run strictly in declaration order,
//! pre-filters before the action body and post-filters after it. Two
//! callback shapes are supported, decided at registration time and stored
//! as a tagged variant:
//!
//! - **simple**: invoked with the controller context, like an action body.
//! - **middleware**: invoked with the bare request/response pair, so
//!   generic HTTP middleware can be reused as a filter without adaptation.
//!
//! Both shapes return `Result<(), ControllerError>`. An `Err` forwards to
//! the controller's error path and the remaining chain is not advanced;
//! an error in a pre-filter also skips the action entirely.

use std::sync::Arc;

use crate::controller::context::Context;
use crate::error::ControllerError;
use crate::hooks::HookSet;
use crate::request::Request;
use crate::response::Response;

pub type FilterResult = Result<(), ControllerError>;

pub type SimpleFilterFn = Arc<dyn Fn(&mut Context) -> FilterResult + Send + Sync>;
pub type MiddlewareFilterFn =
    Arc<dyn Fn(&mut Request, &mut Response) -> FilterResult + Send + Sync>;

/// The two supported filter call shapes.
#[derive(Clone)]
pub enum FilterKind {
    Simple(SimpleFilterFn),
    Middleware(MiddlewareFilterFn),
}

/// A single registered filter callback. Immutable once registered.
#[derive(Clone)]
pub struct Filter {
    kind: FilterKind,
}

impl Filter {
    /// A filter invoked with the controller context.
    pub fn simple<F>(f: F) -> Self
    where
        F: Fn(&mut Context) -> FilterResult + Send + Sync + 'static,
    {
        Self {
            kind: FilterKind::Simple(Arc::new(f)),
        }
    }

    /// A filter invoked with the request/response pair, middleware-style.
    pub fn middleware<F>(f: F) -> Self
    where
        F: Fn(&mut Request, &mut Response) -> FilterResult + Send + Sync + 'static,
    {
        Self {
            kind: FilterKind::Middleware(Arc::new(f)),
        }
    }

    fn run(&self, ctx: &mut Context) -> FilterResult {
        match &self.kind {
            FilterKind::Simple(f) => (f.as_ref())(ctx),
            FilterKind::Middleware(f) => {
                let (req, res) = ctx.handles_mut();
                (f.as_ref())(req, res)
            }
        }
    }
}

/// Which side of the action a chain runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Before,
    After,
}

/// Ordered pre/post filters per action name.
///
/// A thin adapter over the named-hook primitive: hooks provide the
/// "ordered callbacks for a named key" storage, this table injects the
/// error-short-circuit semantics when a chain runs.
#[derive(Clone, Default)]
pub struct FilterTable {
    hooks: HookSet<Filter>,
}

impl FilterTable {
    pub fn new() -> Self {
        Self {
            hooks: HookSet::new(),
        }
    }

    /// Append a pre-filter for `action`, in declaration order.
    pub fn declare_before(&mut self, action: &str, filter: Filter) {
        self.hooks.pre(action, filter);
    }

    /// Append a post-filter for `action`, in declaration order.
    pub fn declare_after(&mut self, action: &str, filter: Filter) {
        self.hooks.post(action, filter);
    }

    /// Run one phase of the chain for `action`. Stops at the first error.
    pub fn run(&self, phase: Phase, action: &str, ctx: &mut Context) -> FilterResult {
        let entries = match phase {
            Phase::Before => self.hooks.pre_callbacks(action),
            Phase::After => self.hooks.post_callbacks(action),
        };
        for filter in entries {
            filter.run(ctx)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Application;
    use crate::controller::ControllerDefinition;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn test_context() -> Context {
        let app = Application::builder()
            .controller("tests", ControllerDefinition::new().action("index", |_| Ok(())))
            .build();
        let definition = app.controller("tests").unwrap().clone();
        Context::prepare(app, definition, Request::new("GET", "/tests"))
    }

    #[test]
    fn test_filters_run_in_declaration_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut table = FilterTable::new();
        for name in ["first", "second", "third"] {
            let calls = calls.clone();
            table.declare_before(
                "show",
                Filter::simple(move |_| {
                    calls.lock().unwrap().push(name);
                    Ok(())
                }),
            );
        }

        let mut ctx = test_context();
        table.run(Phase::Before, "show", &mut ctx).unwrap();
        assert_eq!(*calls.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_error_short_circuits_remaining_filters() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut table = FilterTable::new();

        let c = calls.clone();
        table.declare_before(
            "show",
            Filter::simple(move |_| {
                c.lock().unwrap().push("ran");
                Err(ControllerError::filter("halt"))
            }),
        );
        let c = calls.clone();
        table.declare_before(
            "show",
            Filter::simple(move |_| {
                c.lock().unwrap().push("never");
                Ok(())
            }),
        );

        let mut ctx = test_context();
        let err = table.run(Phase::Before, "show", &mut ctx).unwrap_err();
        assert_eq!(err.to_string(), "halt");
        assert_eq!(*calls.lock().unwrap(), vec!["ran"]);
    }

    #[test]
    fn test_simple_shape_receives_context() {
        let mut table = FilterTable::new();
        table.declare_before(
            "show",
            Filter::simple(|ctx| {
                assert_eq!(ctx.req().path(), "/tests");
                ctx.assign("seen", serde_json::json!(true));
                Ok(())
            }),
        );

        let mut ctx = test_context();
        table.run(Phase::Before, "show", &mut ctx).unwrap();
        assert_eq!(ctx.assigns().get("seen"), Some(&serde_json::json!(true)));
    }

    #[test]
    fn test_middleware_shape_receives_request_and_response() {
        let mut table = FilterTable::new();
        table.declare_before(
            "show",
            Filter::middleware(|req, res| {
                assert_eq!(req.method(), "GET");
                res.set_header("x-filtered", "yes");
                Ok(())
            }),
        );

        let mut ctx = test_context();
        table.run(Phase::Before, "show", &mut ctx).unwrap();
        assert_eq!(
            ctx.res().headers(),
            &[("x-filtered".to_string(), "yes".to_string())]
        );
    }

    #[test]
    fn test_phases_are_independent() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut table = FilterTable::new();

        let c = calls.clone();
        table.declare_before(
            "show",
            Filter::simple(move |_| {
                c.lock().unwrap().push("pre");
                Ok(())
            }),
        );
        let c = calls.clone();
        table.declare_after(
            "show",
            Filter::simple(move |_| {
                c.lock().unwrap().push("post");
                Ok(())
            }),
        );

        let mut ctx = test_context();
        table.run(Phase::After, "show", &mut ctx).unwrap();
        assert_eq!(*calls.lock().unwrap(), vec!["post"]);
    }
}
