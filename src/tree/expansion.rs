//! Collapsed/expanded state, kept apart from the immutable tree.

use std::collections::HashSet;

use super::arena::{NodeKey, ViewTree};

/// Set of expanded node keys. Anything not in the set is collapsed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Expansion {
	expanded: HashSet<NodeKey>,
}

impl Expansion {
	/// Expand every node with children above `levels`.
	pub fn to_depth(tree: &ViewTree, levels: usize) -> Self {
		let mut state = Self::default();
		state.open_levels(tree, ViewTree::ROOT, 0, levels);
		state
	}

	fn open_levels(&mut self, tree: &ViewTree, idx: usize, level: usize, levels: usize) {
		let node = tree.node(idx);
		if level >= levels || !node.has_children() {
			return;
		}
		self.expanded.insert(node.key.clone());
		for &child in &node.children {
			self.open_levels(tree, child, level + 1, levels);
		}
	}

	/// Whether the node with `key` shows its children.
	pub fn is_expanded(&self, key: &NodeKey) -> bool {
		self.expanded.contains(key)
	}

	/// Flip a node. Blocked and childless nodes do not change; returns
	/// whether anything did.
	pub fn toggle(&mut self, tree: &ViewTree, idx: usize) -> bool {
		let node = tree.node(idx);
		if node.blocked() || !node.has_children() {
			return false;
		}
		if !self.expanded.remove(&node.key) {
			self.expanded.insert(node.key.clone());
		}
		true
	}

	/// Expand every node that has children.
	pub fn expand_all(&mut self, tree: &ViewTree) {
		for node in tree.nodes().iter().filter(|n| n.has_children()) {
			self.expanded.insert(node.key.clone());
		}
	}

	/// Collapse every node deeper than `depth`; shallower nodes keep
	/// their state.
	pub fn collapse_beyond(&mut self, tree: &ViewTree, depth: usize) {
		for node in tree.nodes() {
			if node.depth > depth {
				self.expanded.remove(&node.key);
			}
		}
	}

	/// Children of `idx` that are on screen.
	pub fn visible_children<'t>(&self, tree: &'t ViewTree, idx: usize) -> &'t [usize] {
		let node = tree.node(idx);
		if self.is_expanded(&node.key) {
			&node.children
		} else {
			&[]
		}
	}

	/// Preorder list of on-screen node indices.
	pub fn visible(&self, tree: &ViewTree) -> Vec<usize> {
		let mut out = Vec::new();
		let mut stack = vec![ViewTree::ROOT];
		while let Some(idx) = stack.pop() {
			out.push(idx);
			stack.extend(self.visible_children(tree, idx).iter().rev());
		}
		out
	}
}
