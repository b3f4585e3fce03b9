//! Flattened, index-addressed copy of a [`ViewNode`] tree.

use std::fmt;

use super::index::normalize;
use super::types::{BlockReason, Role, ViewNode};

/// Stable identity of a node: the path of (sibling index, identity) pairs
/// from the root. Two occurrences of one element never share a key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(String);

impl NodeKey {
	fn root(name: &str) -> Self {
		Self(normalize(name))
	}

	fn child(&self, position: usize, name: &str) -> Self {
		Self(format!("{}/{}:{}", self.0, position, normalize(name)))
	}

	/// The key as text, `/`-separated from the root.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for NodeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// One node of a [`ViewTree`], linked to its neighbours by index.
#[derive(Clone, Debug)]
pub struct TreeNode {
	/// Path-derived identity.
	pub key: NodeKey,
	/// Raw element name, as shown.
	pub name: String,
	/// Distance from the tree root.
	pub depth: usize,
	/// Branch membership in a focused tree.
	pub role: Role,
	/// Set on dead-end nodes.
	pub reason: Option<BlockReason>,
	/// `None` for the root.
	pub parent: Option<usize>,
	/// Child indices in display order.
	pub children: Vec<usize>,
}

impl TreeNode {
	/// Dead end: never expands.
	pub fn blocked(&self) -> bool {
		self.reason.is_some()
	}

	/// Whether there is anything to expand.
	pub fn has_children(&self) -> bool {
		!self.children.is_empty()
	}
}

/// Nodes in preorder; index 0 is the root.
#[derive(Clone, Debug)]
pub struct ViewTree {
	nodes: Vec<TreeNode>,
}

impl ViewTree {
	/// Flatten `root` in preorder and assign keys.
	pub fn new(root: &ViewNode) -> Self {
		let mut tree = Self { nodes: Vec::with_capacity(root.count()) };
		tree.push(root, NodeKey::root(&root.name), None);
		tree
	}

	fn push(&mut self, node: &ViewNode, key: NodeKey, parent: Option<usize>) -> usize {
		let idx = self.nodes.len();
		self.nodes.push(TreeNode {
			key,
			name: node.name.clone(),
			depth: node.depth,
			role: node.role,
			reason: node.reason,
			parent,
			children: Vec::with_capacity(node.children.len()),
		});
		for (position, child) in node.children.iter().enumerate() {
			let child_key = self.nodes[idx].key.child(position, &child.name);
			let child_idx = self.push(child, child_key, Some(idx));
			self.nodes[idx].children.push(child_idx);
		}
		idx
	}

	/// Index of the root node.
	pub const ROOT: usize = 0;

	/// The root node.
	pub fn root(&self) -> &TreeNode {
		&self.nodes[Self::ROOT]
	}

	/// Node at `idx`. Panics on an index not from this tree.
	pub fn node(&self, idx: usize) -> &TreeNode {
		&self.nodes[idx]
	}

	/// All nodes, preorder.
	pub fn nodes(&self) -> &[TreeNode] {
		&self.nodes
	}

	/// Node count, hidden nodes included.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Index of the node with `key`.
	pub fn find(&self, key: &NodeKey) -> Option<usize> {
		self.nodes.iter().position(|n| &n.key == key)
	}
}
