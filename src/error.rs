//! Error type shared by the graph model, filters and layouts.

use thiserror::Error;

/// Errors raised by graph operations.
///
/// Only precondition violations and failures reported by pluggable layout
/// algorithms are errors. Removing something that is not there, re-adding an
/// existing identity or setting a flag to its current value are silent no-ops.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
	/// A required argument was missing (for example an empty identity).
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	/// A layout algorithm could not place the nodes it was given.
	#[error("Layout error: {0}")]
	Layout(String),

	/// A view was asked to run a layout it does not have.
	#[error("Unknown layout: {0}")]
	UnknownLayout(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_display() {
		assert_eq!(
			GraphError::InvalidArgument("identity".into()).to_string(),
			"Invalid argument: identity"
		);
		assert_eq!(GraphError::UnknownLayout("Spring".into()).to_string(), "Unknown layout: Spring");
	}
}
