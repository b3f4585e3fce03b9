//! The full tree rooted at the sentinel root.
//!
//! An identity reachable along several paths is expanded exactly once, at
//! the shallowest depth it can be reached and at the first such position
//! in child order. Every other occurrence is a blocked leaf.

use std::collections::{HashMap, HashSet, VecDeque};

use log::{debug, warn};

use super::error::TreeError;
use super::index::{GraphIndex, normalize};
use super::types::{BlockReason, Element, Role, ViewNode};

/// The first element, in input order, whose parents contain the sentinel.
pub fn find_root(elements: &[Element]) -> Result<&Element, TreeError> {
	let mut roots = elements.iter().filter(|e| e.is_root());
	let root = roots.next().ok_or(TreeError::NoRoot)?;
	for extra in roots {
		warn!(
			"multiple root candidates: using \"{}\", ignoring \"{}\"",
			root.name, extra.name
		);
	}
	Ok(root)
}

/// Shortest depth from `root` to every reachable identity.
///
/// The minimum over all cycle-free paths equals the breadth-first
/// distance, so a plain BFS over resolved child edges suffices.
pub fn first_appearance_depths(root: &Element, index: &GraphIndex) -> HashMap<String, usize> {
	let mut depths = HashMap::new();
	let mut queue = VecDeque::new();
	depths.insert(normalize(&root.name), 0);
	queue.push_back((root, 0));

	while let Some((element, depth)) = queue.pop_front() {
		for child in index.resolve(element.children.iter().map(String::as_str)) {
			let key = normalize(&child.name);
			if !depths.contains_key(&key) {
				depths.insert(key, depth + 1);
				queue.push_back((child, depth + 1));
			}
		}
	}
	depths
}

struct PrimaryBuilder<'a> {
	index: &'a GraphIndex,
	depths: HashMap<String, usize>,
	placed: HashSet<String>,
	path: Vec<String>,
}

impl PrimaryBuilder<'_> {
	fn build(&mut self, element: &Element, depth: usize) -> ViewNode {
		let key = normalize(&element.name);
		if self.path.contains(&key) {
			return ViewNode::blocked_leaf(&element.name, depth, Role::None, BlockReason::Circular);
		}
		let at_first_depth = self.depths.get(&key) == Some(&depth);
		if !at_first_depth || !self.placed.insert(key.clone()) {
			return ViewNode::blocked_leaf(&element.name, depth, Role::None, BlockReason::Duplicate);
		}

		self.path.push(key);
		let index = self.index;
		let children = index
			.resolve(element.children.iter().map(String::as_str))
			.map(|child| self.build(child, depth + 1))
			.collect();
		self.path.pop();

		ViewNode::open(&element.name, depth, Role::None, children)
	}
}

/// Build the primary tree from the dataset.
pub fn build_primary_tree(elements: &[Element], index: &GraphIndex) -> Result<ViewNode, TreeError> {
	let root = find_root(elements)?;
	let depths = first_appearance_depths(root, index);
	debug!("first-appearance depths computed for {} identities", depths.len());

	let mut builder = PrimaryBuilder {
		index,
		depths,
		placed: HashSet::new(),
		path: Vec::new(),
	};
	let tree = builder.build(root, 0);
	debug!("primary tree built: {} nodes", tree.count());
	Ok(tree)
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	fn element(name: &str, parents: &[&str], children: &[&str]) -> Element {
		Element {
			name: name.into(),
			parents: parents.iter().map(|s| s.to_string()).collect(),
			children: children.iter().map(|s| s.to_string()).collect(),
		}
	}

	fn build(elements: Vec<Element>) -> ViewNode {
		let index = GraphIndex::new(elements.clone());
		build_primary_tree(&elements, &index).unwrap()
	}

	#[test]
	fn shared_child_is_placed_under_first_parent() {
		let tree = build(vec![
			element("root", &["none"], &["a", "b"]),
			element("a", &["root"], &["c"]),
			element("b", &["root"], &["c"]),
			element("c", &["a", "b"], &[]),
		]);
		let a = &tree.children[0];
		let b = &tree.children[1];
		assert_eq!(a.children[0].name, "c");
		assert_eq!(a.children[0].depth, 2);
		assert!(!a.children[0].blocked());
		assert_eq!(b.children[0].reason, Some(BlockReason::Duplicate));
		assert_eq!(b.children[0].depth, 2);
	}

	#[test]
	fn self_child_is_circular() {
		let tree = build(vec![element("x", &["NONE"], &["x"])]);
		assert_eq!(tree.children.len(), 1);
		assert_eq!(tree.children[0].reason, Some(BlockReason::Circular));
		assert!(tree.children[0].children.is_empty());
	}

	#[test]
	fn deeper_occurrence_is_duplicate_even_when_seen_first() {
		// "d" is reached at depth 3 via a, but at depth 1 directly from root.
		let tree = build(vec![
			element("root", &["none"], &["a", "d"]),
			element("a", &["root"], &["b"]),
			element("b", &["a"], &["d"]),
			element("d", &["b", "root"], &["e"]),
			element("e", &["d"], &[]),
		]);
		let deep = &tree.children[0].children[0].children[0];
		assert_eq!(deep.name, "d");
		assert_eq!(deep.reason, Some(BlockReason::Duplicate));
		let shallow = &tree.children[1];
		assert!(!shallow.blocked());
		assert_eq!(shallow.children[0].name, "e");
	}

	#[test]
	fn back_edge_to_ancestor_is_circular() {
		let tree = build(vec![
			element("root", &["none"], &["a"]),
			element("a", &["root", "b"], &["b"]),
			element("b", &["a"], &["a"]),
		]);
		let back = &tree.children[0].children[0].children[0];
		assert_eq!(back.name, "a");
		assert_eq!(back.reason, Some(BlockReason::Circular));
	}

	#[test]
	fn unresolved_children_are_dropped() {
		let tree = build(vec![element("root", &["none"], &["ghost", "a"]), element("a", &["root"], &[])]);
		assert_eq!(tree.children.len(), 1);
		assert_eq!(tree.children[0].name, "a");
	}

	#[test]
	fn missing_root_is_an_error() {
		let elements = vec![element("a", &["b"], &[])];
		let index = GraphIndex::new(elements.clone());
		assert_eq!(build_primary_tree(&elements, &index), Err(TreeError::NoRoot));
	}

	#[test]
	fn first_root_in_input_order_wins() {
		let tree = build(vec![element("first", &["none"], &[]), element("second", &["None"], &[])]);
		assert_eq!(tree.name, "first");
	}

	fn random_graph() -> impl Strategy<Value = Vec<Element>> {
		(2usize..9).prop_flat_map(|n| {
			proptest::collection::vec(proptest::collection::vec(0..n, 0..4), n).prop_map(move |edges| {
				(0..n)
					.map(|i| Element {
						name: format!("N{i}"),
						parents: if i == 0 { vec!["none".into()] } else { Vec::new() },
						children: edges[i].iter().map(|c| format!("n{c}")).collect(),
					})
					.collect()
			})
		})
	}

	fn collect(node: &ViewNode, path: &mut Vec<String>, out: &mut Vec<(String, usize, Option<BlockReason>, bool)>) {
		let key = normalize(&node.name);
		let on_path = path.contains(&key);
		out.push((key.clone(), node.depth, node.reason, on_path));
		path.push(key);
		for child in &node.children {
			collect(child, path, out);
		}
		path.pop();
	}

	proptest! {
		#[test]
		fn each_reachable_identity_is_open_once_at_min_depth(elements in random_graph()) {
			let index = GraphIndex::new(elements.clone());
			let tree = build_primary_tree(&elements, &index).unwrap();
			let depths = first_appearance_depths(&elements[0], &index);

			let mut seen = Vec::new();
			collect(&tree, &mut Vec::new(), &mut seen);

			for (key, min_depth) in &depths {
				let open: Vec<_> = seen.iter().filter(|(k, _, r, _)| k == key && r.is_none()).collect();
				prop_assert_eq!(open.len(), 1);
				prop_assert_eq!(open[0].1, *min_depth);
			}
			for (_, _, reason, on_path) in &seen {
				if let Some(reason) = reason {
					prop_assert_eq!(*reason == BlockReason::Circular, *on_path);
				}
			}
		}
	}
}
