use std::collections::HashMap;

use log::debug;

use crate::config::ViewerConfig;
use crate::tree::{Layout, LayoutMode, NodeKey, PositionedNode, Session, TreeError};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl ViewTransform {
	fn lerp(&self, to: &ViewTransform, t: f64) -> ViewTransform {
		ViewTransform {
			x: lerp(self.x, to.x, t),
			y: lerp(self.y, to.y, t),
			k: lerp(self.k, to.k, t),
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	/// Pointer travelled far enough that release is not a click.
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Pointer travel below which a press and release count as a click.
const CLICK_SLOP: f64 = 4.0;

#[derive(Clone, Debug)]
struct CameraTween {
	from: ViewTransform,
	to: ViewTransform,
	elapsed: f64,
}

/// A node on its way from one position to another.
#[derive(Clone, Debug)]
pub struct Sprite {
	pub node: PositionedNode,
	from: (f64, f64),
	to: (f64, f64),
	/// No longer in the layout; shrinks away and is dropped.
	pub leaving: bool,
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
	a + (b - a) * t
}

pub fn ease_in_out_cubic(t: f64) -> f64 {
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

pub struct TreeViewState {
	pub session: Session,
	pub config: ViewerConfig,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	layout: Layout,
	sprites: Vec<Sprite>,
	elapsed: f64,
	camera: Option<CameraTween>,
}

impl TreeViewState {
	pub fn new(session: Session, config: ViewerConfig, width: f64, height: f64) -> Self {
		let mut state = Self {
			session,
			transform: ViewTransform::default(),
			pan: PanState::default(),
			width,
			height,
			layout: Layout::default(),
			sprites: Vec::new(),
			elapsed: 0.0,
			camera: None,
			config,
		};
		state.transform = state.home_transform();
		state.replace_tree();
		state
	}

	pub fn layout(&self) -> &Layout {
		&self.layout
	}

	pub fn sprites(&self) -> &[Sprite] {
		&self.sprites
	}

	/// Transition progress in `[0, 1]`, eased.
	pub fn progress(&self) -> f64 {
		let duration = self.config.node_transition;
		if duration <= 0.0 {
			return 1.0;
		}
		ease_in_out_cubic((self.elapsed / duration).min(1.0))
	}

	pub fn sprite_position(&self, sprite: &Sprite) -> (f64, f64) {
		let t = self.progress();
		if t >= 1.0 {
			return sprite.to;
		}
		(lerp(sprite.from.0, sprite.to.0, t), lerp(sprite.from.1, sprite.to.1, t))
	}

	/// Current on-screen position of a node still in the layout.
	pub fn position_of(&self, key: &NodeKey) -> Option<(f64, f64)> {
		self.sprites
			.iter()
			.find(|s| !s.leaving && &s.node.key == key)
			.map(|s| self.sprite_position(s))
	}

	/// Start a transition to the session's current layout. New nodes grow
	/// out of `source` and vanished ones collapse into it.
	fn relayout(&mut self, source: Option<&NodeKey>) {
		let next = self.session.layout();
		let current: HashMap<&NodeKey, (f64, f64)> = self
			.sprites
			.iter()
			.filter(|s| !s.leaving)
			.map(|s| (&s.node.key, self.sprite_position(s)))
			.collect();

		let root_new = next.nodes.first().map(|n| (n.x, n.y)).unwrap_or_default();
		let origin_old = source.and_then(|k| self.position_of(k)).unwrap_or(root_new);
		let origin_new = source.and_then(|k| next.position_of(k)).unwrap_or(root_new);

		let mut sprites: Vec<Sprite> = next
			.nodes
			.iter()
			.map(|node| Sprite {
				from: current.get(&node.key).copied().unwrap_or(origin_old),
				to: (node.x, node.y),
				node: node.clone(),
				leaving: false,
			})
			.collect();
		for old in self.sprites.iter().filter(|s| !s.leaving) {
			if next.position_of(&old.node.key).is_none() {
				sprites.push(Sprite {
					from: current[&old.node.key],
					to: origin_new,
					node: old.node.clone(),
					leaving: true,
				});
			}
		}

		self.sprites = sprites;
		self.layout = next;
		self.elapsed = 0.0;
	}

	/// Throw away the old picture; the new tree grows from its root.
	fn replace_tree(&mut self) {
		self.sprites.clear();
		self.relayout(None);
	}

	pub fn tick(&mut self, dt: f64) {
		self.elapsed += dt;
		if self.elapsed >= self.config.node_transition {
			self.sprites.retain(|s| !s.leaving);
		}

		if let Some(tween) = &mut self.camera {
			tween.elapsed += dt;
			let t = (tween.elapsed / self.config.camera_transition).min(1.0);
			if t >= 1.0 {
				self.transform = tween.to;
				self.camera = None;
			} else {
				self.transform = tween.from.lerp(&tween.to, ease_in_out_cubic(t));
			}
		}
	}

	fn home_transform(&self) -> ViewTransform {
		let top = match self.session.mode() {
			LayoutMode::Primary => self.config.primary_top,
			LayoutMode::Focused => self.config.focused_top,
		};
		ViewTransform {
			x: self.width / 2.0,
			y: top,
			k: 1.0,
		}
	}

	/// Animate the camera back to the root (or target) at scale 1.
	pub fn recenter(&mut self) {
		self.camera = Some(CameraTween {
			from: self.transform,
			to: self.home_transform(),
			elapsed: 0.0,
		});
	}

	/// Animate the camera so layout point `(x, y)` lands at the home spot.
	pub fn refocus(&mut self, x: f64, y: f64) {
		let home = self.home_transform();
		self.camera = Some(CameraTween {
			from: self.transform,
			to: ViewTransform {
				x: home.x - x,
				y: home.y - y,
				k: 1.0,
			},
			elapsed: 0.0,
		});
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn screen_to_layout(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeKey> {
		let (lx, ly) = self.screen_to_layout(sx, sy);
		let half_h = self.config.box_height / 2.0;
		self.sprites
			.iter()
			.filter(|s| !s.leaving)
			.find(|s| {
				let (x, y) = self.sprite_position(s);
				let half_w = self.config.box_width(&s.node.name) / 2.0;
				(lx - x).abs() <= half_w && (ly - y).abs() <= half_h
			})
			.map(|s| s.node.key.clone())
	}

	/// Zoom by `factor` keeping screen point `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		self.camera = None;
		let new_k = (self.transform.k * factor).clamp(self.config.min_zoom, self.config.max_zoom);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn begin_pan(&mut self, x: f64, y: f64) {
		self.camera = None;
		self.pan = PanState {
			active: true,
			moved: false,
			start_x: x,
			start_y: y,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn pan_to(&mut self, x: f64, y: f64) {
		if !self.pan.active {
			return;
		}
		let (dx, dy) = (x - self.pan.start_x, y - self.pan.start_y);
		if dx.abs() > CLICK_SLOP || dy.abs() > CLICK_SLOP {
			self.pan.moved = true;
		}
		self.transform.x = self.pan.transform_start_x + dx;
		self.transform.y = self.pan.transform_start_y + dy;
	}

	/// Finish a press. A release without travel activates the node under
	/// the pointer; returns whether one was toggled.
	pub fn end_pan(&mut self, x: f64, y: f64) -> bool {
		let clicked = self.pan.active && !self.pan.moved;
		self.pan = PanState::default();
		match clicked.then(|| self.node_at_position(x, y)).flatten() {
			Some(key) => self.activate(&key),
			None => false,
		}
	}

	pub fn activate(&mut self, key: &NodeKey) -> bool {
		if !self.session.toggle(key) {
			return false;
		}
		debug!("toggled {key}");
		self.relayout(Some(key));
		true
	}

	fn focus_target(&mut self) {
		self.replace_tree();
		self.transform = ViewTransform {
			x: self.width / 2.0,
			y: self.config.primary_top,
			k: 1.0,
		};
		// Target sits at the layout origin.
		self.refocus(0.0, 0.0);
	}

	pub fn search(&mut self, query: &str) -> Result<bool, TreeError> {
		let found = self.session.search(query)?.is_some();
		if found {
			self.focus_target();
		}
		Ok(found)
	}

	pub fn next_match(&mut self) {
		if self.session.next_match().is_some() {
			self.focus_target();
		}
	}

	pub fn previous_match(&mut self) {
		if self.session.previous_match().is_some() {
			self.focus_target();
		}
	}

	pub fn expand_all(&mut self) {
		self.session.expand_all();
		let root = self.layout.nodes.first().map(|n| n.key.clone());
		self.relayout(root.as_ref());
	}

	pub fn collapse_all(&mut self) {
		self.session.collapse_all();
		let root = self.layout.nodes.first().map(|n| n.key.clone());
		self.relayout(root.as_ref());
		self.recenter();
	}

	pub fn reset(&mut self) -> Result<(), TreeError> {
		self.session.reset()?;
		self.replace_tree();
		self.recenter();
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tree::{Element, SessionOptions};

	fn element(name: &str, parents: &[&str], children: &[&str]) -> Element {
		Element {
			name: name.into(),
			parents: parents.iter().map(|s| s.to_string()).collect(),
			children: children.iter().map(|s| s.to_string()).collect(),
		}
	}

	fn state() -> TreeViewState {
		let session = Session::new(
			vec![
				element("root", &["none"], &["a", "b"]),
				element("a", &["root"], &["c"]),
				element("b", &["root"], &[]),
				element("c", &["a"], &[]),
			],
			SessionOptions::default(),
		)
		.unwrap();
		TreeViewState::new(session, ViewerConfig::default(), 800.0, 600.0)
	}

	fn settle(state: &mut TreeViewState) {
		for _ in 0..100 {
			state.tick(0.016);
		}
	}

	#[test]
	fn fresh_tree_grows_from_root() {
		let mut s = state();
		assert_eq!(s.sprites().len(), 4);
		assert!(s.sprites().iter().all(|sp| s.sprite_position(sp) == (0.0, 0.0)));
		settle(&mut s);
		for node in &s.layout().nodes {
			assert_eq!(s.position_of(&node.key), Some((node.x, node.y)));
		}
	}

	#[test]
	fn collapsing_shrinks_children_into_parent() {
		let mut s = state();
		settle(&mut s);
		let a = s.layout().nodes.iter().find(|n| n.name == "a").unwrap().clone();
		assert!(s.activate(&a.key));
		assert_eq!(s.layout().nodes.len(), 3);
		let leaving: Vec<_> = s.sprites().iter().filter(|sp| sp.leaving).collect();
		assert_eq!(leaving.len(), 1);
		assert_eq!(leaving[0].node.name, "c");

		settle(&mut s);
		assert!(s.sprites().iter().all(|sp| !sp.leaving));
	}

	#[test]
	fn click_hits_node_box_and_drag_does_not() {
		let mut s = state();
		settle(&mut s);
		let a = s.layout().nodes.iter().find(|n| n.name == "a").unwrap().clone();
		let (sx, sy) = (s.transform.x + a.x * s.transform.k, s.transform.y + a.y * s.transform.k);
		assert_eq!(s.node_at_position(sx, sy), Some(a.key.clone()));

		s.begin_pan(sx, sy);
		s.pan_to(sx + 50.0, sy);
		assert!(!s.end_pan(sx + 50.0, sy));

		// The drag moved the view; the node is now under the release point.
		let (sx, sy) = (s.transform.x + a.x * s.transform.k, s.transform.y + a.y * s.transform.k);
		assert_eq!(s.node_at_position(sx, sy), Some(a.key.clone()));
		s.begin_pan(sx, sy);
		assert!(s.end_pan(sx, sy));
		assert!(s.layout().nodes.iter().find(|n| n.name == "a").unwrap().collapsed);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut s = state();
		for _ in 0..50 {
			s.zoom_at(100.0, 100.0, 1.1);
		}
		assert_eq!(s.transform.k, 3.0);
		for _ in 0..50 {
			s.zoom_at(100.0, 100.0, 0.9);
		}
		assert_eq!(s.transform.k, 0.4);
	}

	#[test]
	fn search_then_reset_recentres() {
		let mut s = state();
		assert_eq!(s.search("c"), Ok(true));
		assert_eq!(s.session.mode(), LayoutMode::Focused);
		settle(&mut s);
		assert_eq!(s.transform, ViewTransform { x: 400.0, y: 100.0, k: 1.0 });

		s.zoom_at(0.0, 0.0, 2.0);
		s.reset().unwrap();
		settle(&mut s);
		assert_eq!(s.transform, ViewTransform { x: 400.0, y: 50.0, k: 1.0 });
		assert_eq!(s.layout().nodes.len(), 4);
	}

	#[test]
	fn collapse_all_in_focused_view_homes_on_target() {
		let mut s = state();
		s.search("c").unwrap();
		settle(&mut s);
		s.zoom_at(0.0, 0.0, 2.0);
		s.collapse_all();
		settle(&mut s);
		assert_eq!(s.transform, ViewTransform { x: 400.0, y: 100.0, k: 1.0 });
	}
}
