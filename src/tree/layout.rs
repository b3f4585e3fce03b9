//! Node positions for the visible part of a tree.
//!
//! Layout units: one unit of x is one node slot, one unit of y is one
//! level. [`Spacing`] scales both into layout space.

use std::collections::HashMap;

use log::debug;

use super::arena::{NodeKey, ViewTree};
use super::expansion::Expansion;
use super::types::{BlockReason, Role};

/// Which positioner to run. Chosen by whoever built the tree, never
/// guessed from its shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutMode {
	/// Tidy top-down tree, root at the top.
	#[default]
	Primary,
	/// Butterfly around the target: ancestors above, descendants below.
	Focused,
}

/// Layout-space size of one x unit and one level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spacing {
	/// Horizontal distance between neighbouring node slots.
	pub node: f64,
	/// Vertical distance between levels.
	pub level: f64,
}

impl Default for Spacing {
	fn default() -> Self {
		Self {
			node: 180.0,
			level: 70.0,
		}
	}
}

/// A visible node with its layout-space position.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedNode {
	/// Stable identity, shared with the [`ViewTree`] node.
	pub key: NodeKey,
	/// Label.
	pub name: String,
	/// Tree depth.
	pub depth: usize,
	/// Decides the half-plane in a butterfly.
	pub role: Role,
	/// Set on dead-end nodes.
	pub reason: Option<BlockReason>,
	/// Has children that are currently hidden.
	pub collapsed: bool,
	/// Horizontal position.
	pub x: f64,
	/// Vertical position; negative on the ancestor side.
	pub y: f64,
}

impl PositionedNode {
	/// Dead end: not interactive.
	pub fn blocked(&self) -> bool {
		self.reason.is_some()
	}
}

/// Parent-to-child connector, as indices into [`Layout::nodes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
	/// Parent node index.
	pub source: usize,
	/// Child node index.
	pub target: usize,
	/// The child sits above its parent (ancestor side of a butterfly).
	pub upward: bool,
}

/// Everything the renderer needs for one frame's target state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
	/// Visible nodes in preorder; the root comes first.
	pub nodes: Vec<PositionedNode>,
	/// One per visible parent-child pair.
	pub links: Vec<Link>,
}

impl Layout {
	/// Position of the node with `key`, if visible.
	pub fn position_of(&self, key: &NodeKey) -> Option<(f64, f64)> {
		self.nodes.iter().find(|n| &n.key == key).map(|n| (n.x, n.y))
	}
}

/// Position every visible node of `tree`.
pub fn layout(tree: &ViewTree, state: &Expansion, mode: LayoutMode, spacing: Spacing) -> Layout {
	let units = match mode {
		LayoutMode::Primary => tidy(tree, state),
		LayoutMode::Focused => butterfly(tree, state),
	};

	let visible = state.visible(tree);
	let mut slot = HashMap::with_capacity(visible.len());
	let mut out = Layout::default();
	for &idx in &visible {
		let node = tree.node(idx);
		let x = units.get(&idx).copied().unwrap_or_default() * spacing.node;
		let y = match (mode, node.role) {
			(LayoutMode::Focused, Role::Ancestor) => -(node.depth as f64) * spacing.level,
			(LayoutMode::Focused, Role::Descendant) => node.depth as f64 * spacing.level,
			(LayoutMode::Focused, _) => 0.0,
			(LayoutMode::Primary, _) => node.depth as f64 * spacing.level,
		};
		slot.insert(idx, out.nodes.len());
		out.nodes.push(PositionedNode {
			key: node.key.clone(),
			name: node.name.clone(),
			depth: node.depth,
			role: node.role,
			reason: node.reason,
			collapsed: node.has_children() && !state.is_expanded(&node.key),
			x,
			y,
		});
	}
	for &idx in &visible {
		for &child in state.visible_children(tree, idx) {
			out.links.push(Link {
				source: slot[&idx],
				target: slot[&child],
				upward: tree.node(child).role == Role::Ancestor,
			});
		}
	}
	debug!("{mode:?} layout: {} nodes, {} links", out.nodes.len(), out.links.len());
	out
}

/// Per-level horizontal extent of a subtree, relative to its root.
type Contour = Vec<(f64, f64)>;

/// Reingold-Tilford style: lay children out left to right, pushing each
/// one right until its left contour clears the accumulated right contour
/// by one unit, then centre the parent over its first and last child.
fn tidy(tree: &ViewTree, state: &Expansion) -> HashMap<usize, f64> {
	let mut relative = HashMap::new();
	tidy_subtree(tree, state, ViewTree::ROOT, &mut relative);

	let mut absolute = HashMap::with_capacity(relative.len() + 1);
	let mut stack = vec![(ViewTree::ROOT, 0.0)];
	while let Some((idx, x)) = stack.pop() {
		absolute.insert(idx, x);
		for &child in state.visible_children(tree, idx) {
			stack.push((child, x + relative[&child]));
		}
	}
	absolute
}

fn tidy_subtree(tree: &ViewTree, state: &Expansion, idx: usize, relative: &mut HashMap<usize, f64>) -> Contour {
	let children = state.visible_children(tree, idx);
	if children.is_empty() {
		return vec![(0.0, 0.0)];
	}

	let mut merged: Contour = Vec::new();
	let mut offsets = Vec::with_capacity(children.len());
	for &child in children {
		let contour = tidy_subtree(tree, state, child, relative);
		let offset = if merged.is_empty() {
			0.0
		} else {
			merged
				.iter()
				.zip(&contour)
				.map(|(&(_, right), &(left, _))| right - left + 1.0)
				.fold(f64::NEG_INFINITY, f64::max)
		};
		for (level, &(left, right)) in contour.iter().enumerate() {
			let (left, right) = (left + offset, right + offset);
			match merged.get_mut(level) {
				Some(extent) => *extent = (extent.0.min(left), extent.1.max(right)),
				None => merged.push((left, right)),
			}
		}
		offsets.push(offset);
	}

	let mid = (offsets[0] + offsets[offsets.len() - 1]) / 2.0;
	for (&child, offset) in children.iter().zip(offsets) {
		relative.insert(child, offset - mid);
	}
	std::iter::once((0.0, 0.0))
		.chain(merged.into_iter().map(|(l, r)| (l - mid, r - mid)))
		.collect()
}

/// Target at the origin; each direction packed left to right with
/// subtree width equal to the sum of its children's widths (one unit for
/// a leaf), each node centred over its span, each direction centred on 0.
fn butterfly(tree: &ViewTree, state: &Expansion) -> HashMap<usize, f64> {
	let mut widths = HashMap::new();
	subtree_width(tree, state, ViewTree::ROOT, &mut widths);

	let mut xs = HashMap::new();
	xs.insert(ViewTree::ROOT, 0.0);
	for role in [Role::Ancestor, Role::Descendant] {
		let group: Vec<usize> = state
			.visible_children(tree, ViewTree::ROOT)
			.iter()
			.copied()
			.filter(|&c| tree.node(c).role == role)
			.collect();
		let total: f64 = group.iter().map(|c| widths[c]).sum();
		let mut left = -total / 2.0;
		for idx in group {
			place_span(tree, state, idx, left, &widths, &mut xs);
			left += widths[&idx];
		}
	}
	xs
}

fn subtree_width(tree: &ViewTree, state: &Expansion, idx: usize, widths: &mut HashMap<usize, f64>) -> f64 {
	let children = state.visible_children(tree, idx);
	let width = if children.is_empty() {
		1.0
	} else {
		children.iter().map(|&c| subtree_width(tree, state, c, widths)).sum()
	};
	widths.insert(idx, width);
	width
}

fn place_span(
	tree: &ViewTree,
	state: &Expansion,
	idx: usize,
	left: f64,
	widths: &HashMap<usize, f64>,
	xs: &mut HashMap<usize, f64>,
) {
	xs.insert(idx, left + widths[&idx] / 2.0);
	let mut cursor = left;
	for &child in state.visible_children(tree, idx) {
		place_span(tree, state, child, cursor, widths, xs);
		cursor += widths[&child];
	}
}
