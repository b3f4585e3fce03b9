//! Presentation and interaction settings for the explorer.

use crate::tree::{SessionOptions, Spacing};

/// Settings for one explorer; [`Default`] gives the stock values.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
	/// Where the element list is fetched from.
	pub data_url: String,
	/// Layout spacing between node slots and levels.
	pub spacing: Spacing,
	/// Node box height.
	pub box_height: f64,
	/// Node box width floor.
	pub min_box_width: f64,
	/// Approximate label width per character.
	pub char_width: f64,
	/// Horizontal padding on each side of a label.
	pub box_padding: f64,
	/// Levels expanded on first render of the primary tree.
	pub initial_depth: usize,
	/// Collapse-all closes nodes deeper than this.
	pub collapse_depth: usize,
	/// Smallest zoom scale.
	pub min_zoom: f64,
	/// Largest zoom scale.
	pub max_zoom: f64,
	/// Seconds.
	pub node_transition: f64,
	/// Seconds.
	pub camera_transition: f64,
	/// Screen offset of the root in the primary view.
	pub primary_top: f64,
	/// Screen offset of the target in the focused view.
	pub focused_top: f64,
}

impl Default for ViewerConfig {
	fn default() -> Self {
		Self {
			data_url: "confluence_elements.json".into(),
			spacing: Spacing::default(),
			box_height: 30.0,
			min_box_width: 60.0,
			char_width: 7.0,
			box_padding: 10.0,
			initial_depth: 3,
			collapse_depth: 2,
			min_zoom: 0.4,
			max_zoom: 3.0,
			node_transition: 0.3,
			camera_transition: 0.75,
			primary_top: 50.0,
			focused_top: 100.0,
		}
	}
}

impl ViewerConfig {
	/// The subset the core [`Session`](crate::tree::Session) needs.
	pub fn session_options(&self) -> SessionOptions {
		SessionOptions {
			initial_depth: self.initial_depth,
			collapse_depth: self.collapse_depth,
			spacing: self.spacing,
			..SessionOptions::default()
		}
	}

	/// Box width for a label.
	pub fn box_width(&self, label: &str) -> f64 {
		(label.chars().count() as f64 * self.char_width + self.box_padding * 2.0).max(self.min_box_width)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn short_labels_get_minimum_width() {
		let config = ViewerConfig::default();
		assert_eq!(config.box_width("ab"), 60.0);
		assert_eq!(config.box_width("abcdefghij"), 90.0);
	}
}
