//! Roundhouse: an MVC request-dispatch layer.
//!
//! Controllers are registered once at application boot and frozen into a
//! read-only registry; every incoming request gets a fresh controller
//! context, so request-scoped state never leaks between concurrent
//! requests. Before/after filter chains wrap each action with consistent
//! error short-circuiting, and a constrained render/redirect/error
//! surface translates controller state into response operations.
//!
//! ```ignore
//! use roundhouse::{Application, ControllerDefinition, Filter, RouteSet, Server};
//! use serde_json::json;
//!
//! let app = Application::builder()
//!     .controller(
//!         "posts",
//!         ControllerDefinition::new()
//!             .action("show", |ctx| {
//!                 ctx.assign("id", ctx.params("id", json!(null)));
//!                 ctx.render()
//!             })
//!             .before("show", Filter::simple(|ctx| {
//!                 match ctx.param("id") {
//!                     Some(_) => Ok(()),
//!                     None => ctx.error("missing id"),
//!                 }
//!             })),
//!     )
//!     .build();
//!
//! Server::new(app, RouteSet::new().resource("posts")).run(3000)?;
//! # Ok::<(), roundhouse::error::ServeError>(())
//! ```

pub mod application;
pub mod controller;
pub mod datastore;
pub mod dispatch;
pub mod error;
pub mod hooks;
pub mod inflect;
pub mod request;
pub mod response;
pub mod router;
pub mod serve;
pub mod view;

pub use application::{Application, ApplicationBuilder, Settings};
pub use controller::{Context, ControllerDefinition, Filter, FilterKind, FilterResult};
pub use datastore::{DatastoreAdapter, ObjectAdapter};
pub use dispatch::{dispatch, DispatchOutcome};
pub use error::{ControllerError, DispatchError, FrameworkError, RenderError, ServeError};
pub use request::Request;
pub use response::Response;
pub use router::{Recognition, Route, RouteSet};
pub use serve::Server;
pub use view::{FileRenderer, ViewRenderer};
