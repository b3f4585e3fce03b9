//! Errors surfaced by loading, building and searching.

use std::fmt;

/// Failures surfaced to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeError {
	/// No element lists the root sentinel among its parents.
	NoRoot,
	/// The dataset could not be fetched or decoded.
	DataLoad(String),
	/// A search query matched no element. Recoverable.
	NoSearchMatch(String),
}

impl fmt::Display for TreeError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TreeError::NoRoot => write!(f, "no root element found (no element has \"none\" as a parent)"),
			TreeError::DataLoad(reason) => write!(f, "can't load the element data: {reason}"),
			TreeError::NoSearchMatch(query) => write!(f, "no element matches \"{query}\""),
		}
	}
}

impl std::error::Error for TreeError {}
