//! Per-request dispatch coordination.
//!
//! One call per request: look up the registered controller definition,
//! create a fresh context, prepare it with the request, and run the
//! filtered invocation. The returned outcome is what the transport acts
//! on; errors are never thrown synchronously at the caller.

use std::sync::Arc;

use crate::application::Application;
use crate::controller::{Context, ControllerDefinition, Phase};
use crate::error::{ControllerError, DispatchError, FrameworkError};
use crate::request::Request;
use crate::response::Response;

/// The result of dispatching one request.
///
/// `Errored` plays the role of the external error continuation: dispatch,
/// filter and action errors all funnel into it, and the transport decides
/// what the user sees.
#[derive(Debug)]
pub enum DispatchOutcome {
    Completed(Response),
    Errored(FrameworkError),
}

impl DispatchOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Dispatch `request` to `controller#action`.
///
/// A fresh context is created per call, so concurrent dispatches against
/// the same definition never share instance state.
pub fn dispatch(
    app: &Arc<Application>,
    controller: &str,
    action: &str,
    request: Request,
) -> DispatchOutcome {
    let definition = match app.controller(controller) {
        Some(definition) => definition.clone(),
        None => {
            return DispatchOutcome::Errored(
                DispatchError::unknown_controller(controller).into(),
            )
        }
    };

    let mut ctx = Context::prepare(app.clone(), definition.clone(), request);
    match invoke(&definition, action, &mut ctx) {
        Ok(()) => DispatchOutcome::Completed(ctx.into_response()),
        Err(err) => DispatchOutcome::Errored(err.into()),
    }
}

/// Run the filtered invocation: validate the action, snapshot the
/// context, then pre-filters → action body → post-filters. Any error
/// short-circuits the rest of the flow.
fn invoke(
    definition: &ControllerDefinition,
    action: &str,
    ctx: &mut Context,
) -> Result<(), ControllerError> {
    let action_fn = definition
        .action_fn(action)
        .ok_or_else(|| ControllerError::unknown_action(definition.short_name(), action))?
        .clone();

    ctx.begin_action(action);

    definition.filters().run(Phase::Before, action, ctx)?;
    (action_fn.as_ref())(ctx)?;
    // The action returning Ok is the explicit completion signal that
    // triggers the post phase.
    definition.filters().run(Phase::After, action, ctx)?;
    Ok(())
}
