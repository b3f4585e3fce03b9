//! Input records and the derived display tree.

use serde::Deserialize;

/// Parent sentinel marking a graph root.
pub const ROOT_SENTINEL: &str = "none";

/// One entry of the input dataset.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Element {
	/// Raw name; may carry a `=suffix`.
	pub name: String,
	/// Parent names, or the root sentinel.
	#[serde(default)]
	pub parents: Vec<String>,
	/// Child names.
	#[serde(default)]
	pub children: Vec<String>,
}

impl Element {
	/// True when `parents` carries the root sentinel (any case).
	pub fn is_root(&self) -> bool {
		self.parents.iter().any(|p| is_root_sentinel(p))
	}

	/// Parent names with the root sentinel filtered out.
	pub fn real_parents(&self) -> impl Iterator<Item = &str> {
		self.parents
			.iter()
			.map(String::as_str)
			.filter(|p| !is_root_sentinel(p))
	}
}

pub(crate) fn is_root_sentinel(name: &str) -> bool {
	name.eq_ignore_ascii_case(ROOT_SENTINEL)
}

/// Why a node is a dead end in the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockReason {
	/// The identity is already on the path from the root.
	Circular,
	/// The identity is placed elsewhere, at its first-appearance depth.
	Duplicate,
}

impl BlockReason {
	/// Lowercase label, as shown to users.
	pub fn as_str(self) -> &'static str {
		match self {
			BlockReason::Circular => "circular",
			BlockReason::Duplicate => "duplicate",
		}
	}
}

/// Branch membership of a node in a focused tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Role {
	/// Primary tree node.
	#[default]
	None,
	/// The search target at the centre.
	Target,
	/// Reached by following parents; drawn above the target.
	Ancestor,
	/// Reached by following children; drawn below the target.
	Descendant,
}

/// A node of a derived, display-ready tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewNode {
	/// Raw element name.
	pub name: String,
	/// Empty for blocked nodes.
	pub children: Vec<ViewNode>,
	/// `Some` exactly when the node is blocked.
	pub reason: Option<BlockReason>,
	/// Distance from the tree root.
	pub depth: usize,
	/// Branch membership; [`Role::None`] outside focused trees.
	pub role: Role,
}

impl ViewNode {
	pub(crate) fn open(name: &str, depth: usize, role: Role, children: Vec<ViewNode>) -> Self {
		Self {
			name: name.to_owned(),
			children,
			reason: None,
			depth,
			role,
		}
	}

	pub(crate) fn blocked_leaf(name: &str, depth: usize, role: Role, reason: BlockReason) -> Self {
		Self {
			name: name.to_owned(),
			children: Vec::new(),
			reason: Some(reason),
			depth,
			role,
		}
	}

	/// Blocked nodes are terminal and non-interactive.
	pub fn blocked(&self) -> bool {
		self.reason.is_some()
	}

	/// Preorder walk over this node and everything below it.
	pub fn walk(&self, visit: &mut impl FnMut(&ViewNode)) {
		visit(self);
		for child in &self.children {
			child.walk(visit);
		}
	}

	/// Size of the subtree, this node included.
	pub fn count(&self) -> usize {
		let mut n = 0;
		self.walk(&mut |_| n += 1);
		n
	}
}
