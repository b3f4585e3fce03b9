//! Two-directional tree around a search target.

use log::debug;

use super::index::{GraphIndex, normalize};
use super::types::{BlockReason, Element, Role, ViewNode};

#[derive(Clone, Copy)]
enum Direction {
	Up,
	Down,
}

impl Direction {
	fn role(self) -> Role {
		match self {
			Direction::Up => Role::Ancestor,
			Direction::Down => Role::Descendant,
		}
	}

	fn neighbours(self, element: &Element) -> Vec<&str> {
		match self {
			Direction::Up => element.real_parents().collect(),
			Direction::Down => element.children.iter().map(String::as_str).collect(),
		}
	}
}

fn build_branch(
	element: &Element,
	depth: usize,
	direction: Direction,
	visited: &mut Vec<String>,
	index: &GraphIndex,
) -> ViewNode {
	let key = normalize(&element.name);
	let role = direction.role();
	if visited.contains(&key) {
		return ViewNode::blocked_leaf(&element.name, depth, role, BlockReason::Circular);
	}

	visited.push(key);
	let children = index
		.resolve(direction.neighbours(element))
		.map(|next| build_branch(next, depth + 1, direction, visited, index))
		.collect();
	visited.pop();

	ViewNode::open(&element.name, depth, role, children)
}

/// Target at depth 0, its ancestors followed by its descendants as
/// children. Each direction keeps its own cycle guard, seeded with the
/// target, so an identity may show once per side.
pub fn build_focused_tree(target: &Element, index: &GraphIndex) -> ViewNode {
	let mut children = Vec::new();
	for direction in [Direction::Up, Direction::Down] {
		let mut visited = vec![normalize(&target.name)];
		for next in index.resolve(direction.neighbours(target)) {
			children.push(build_branch(next, 1, direction, &mut visited, index));
		}
	}

	let tree = ViewNode::open(&target.name, 0, Role::Target, children);
	debug!("focused tree for \"{}\": {} nodes", target.name, tree.count());
	tree
}
