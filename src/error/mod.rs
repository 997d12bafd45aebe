//! Error types for all dispatch phases.

use thiserror::Error;

/// Errors raised while resolving a request to a controller definition.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown controller '{0}'")]
    UnknownController(String),
}

impl DispatchError {
    pub fn unknown_controller(name: impl Into<String>) -> Self {
        Self::UnknownController(name.into())
    }
}

/// Errors raised by a controller while an action is being invoked.
///
/// All three variants funnel into the same error outcome; the dispatch
/// layer never classifies them beyond the unknown-action case it detects
/// itself.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The requested action name does not resolve to a registered action.
    #[error("{controller}#{action} is not a function")]
    UnknownAction { controller: String, action: String },

    /// A before or after filter reported an error.
    #[error("{message}")]
    Filter { message: String },

    /// The action body signaled failure through the error surface.
    #[error("{message}")]
    Action { message: String },

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ControllerError {
    pub fn unknown_action(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self::UnknownAction {
            controller: controller.into(),
            action: action.into(),
        }
    }

    pub fn filter(message: impl Into<String>) -> Self {
        Self::Filter {
            message: message.into(),
        }
    }

    pub fn action(message: impl Into<String>) -> Self {
        Self::Action {
            message: message.into(),
        }
    }
}

impl From<&str> for ControllerError {
    fn from(message: &str) -> Self {
        Self::action(message)
    }
}

impl From<String> for ControllerError {
    fn from(message: String) -> Self {
        Self::action(message)
    }
}

/// Errors raised by the view-rendering collaborator.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Missing view '{0}'")]
    MissingView(String),

    #[error("Failed to render view '{view}': {message}")]
    Engine { view: String, message: String },
}

impl RenderError {
    pub fn missing_view(view: impl Into<String>) -> Self {
        Self::MissingView(view.into())
    }

    pub fn engine(view: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Engine {
            view: view.into(),
            message: message.into(),
        }
    }
}

/// Errors raised by the HTTP transport adapter.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("Failed to bind port {port}: {source}")]
    Bind { port: u16, source: std::io::Error },

    #[error("Failed to start server runtime: {0}")]
    Runtime(std::io::Error),
}

/// A unified error type for all phases.
#[derive(Debug, Error)]
pub enum FrameworkError {
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Controller error: {0}")]
    Controller(#[from] ControllerError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Serve error: {0}")]
    Serve(#[from] ServeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unknown_action_message() {
        let err = ControllerError::unknown_action("Posts", "bogus");
        assert_eq!(err.to_string(), "Posts#bogus is not a function");
    }

    #[test]
    fn test_filter_error_carries_message_verbatim() {
        let err = ControllerError::filter("database unavailable");
        assert_eq!(err.to_string(), "database unavailable");
    }

    #[test]
    fn test_framework_error_wraps_dispatch() {
        let err: FrameworkError = DispatchError::unknown_controller("BogusController").into();
        assert_eq!(
            err.to_string(),
            "Dispatch error: Unknown controller 'BogusController'"
        );
    }
}
