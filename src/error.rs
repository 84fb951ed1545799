//! Error type shared by controllers, the router, and the app.
//!
//! Only programming errors surface here. Structural non-events (removing a
//! child that is not there, popping an empty stack, selecting a cell that does
//! not exist) are absorbed by the operation itself and reported through
//! `Option` or a no-op.

use crate::controller::lifecycle::Phase;

/// Errors raised by the view-controller layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UiError {
    /// A list controller was rendered without a data source.
    #[error("missing {0} view controller data source")]
    MissingDataSource(&'static str),

    /// An index was outside the bounds of a collection that requires a valid one.
    #[error("index ({index}) is out of bounds for {len} item(s)")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The router has no registered routes to fall back to.
    #[error("no routes registered")]
    NoRoutes,

    /// A lifecycle phase was requested out of order.
    #[error("cannot move from {from:?} to {to:?}")]
    LifecycleOrder { from: Phase, to: Phase },

    /// Failure raised by application code inside a lifecycle hook.
    #[error("{0}")]
    Custom(String),
}

impl UiError {
    /// Build a [`UiError::Custom`] from any displayable value.
    pub fn custom(message: impl std::fmt::Display) -> Self {
        Self::Custom(message.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = UiError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_data_source_message() {
        let err = UiError::MissingDataSource("table");
        assert_eq!(err.to_string(), "missing table view controller data source");
    }

    #[test]
    fn out_of_bounds_message() {
        let err = UiError::IndexOutOfBounds { index: 4, len: 3 };
        assert_eq!(err.to_string(), "index (4) is out of bounds for 3 item(s)");
    }

    #[test]
    fn lifecycle_order_message() {
        let err = UiError::LifecycleOrder {
            from: Phase::Unprepared,
            to: Phase::Loaded,
        };
        assert_eq!(err.to_string(), "cannot move from Unprepared to Loaded");
    }

    #[test]
    fn custom_from_display() {
        let err = UiError::custom(format_args!("boom {}", 1));
        assert_eq!(err, UiError::Custom("boom 1".into()));
    }
}
