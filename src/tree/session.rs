//! All state behind one explorer view: the dataset, the tree on screen,
//! its expansion table and the current search.

use log::{info, warn};

use super::arena::{NodeKey, ViewTree};
use super::error::TreeError;
use super::expansion::Expansion;
use super::focused::build_focused_tree;
use super::index::{EdgeKind, GraphIndex, normalize};
use super::layout::{Layout, LayoutMode, Spacing, layout};
use super::primary::build_primary_tree;
use super::types::{Element, ViewNode};

/// Expansion depths and spacing used by a [`Session`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionOptions {
	/// Levels expanded when the primary tree is first shown.
	pub initial_depth: usize,
	/// Levels expanded when a focused tree is first shown.
	pub focused_depth: usize,
	/// Collapse-all closes every node deeper than this.
	pub collapse_depth: usize,
	/// Passed through to the layout.
	pub spacing: Spacing,
}

impl Default for SessionOptions {
	fn default() -> Self {
		Self {
			initial_depth: 3,
			focused_depth: 1,
			collapse_depth: 2,
			spacing: Spacing::default(),
		}
	}
}

#[derive(Clone, Debug, Default)]
struct Search {
	/// Indices into the element list, in input order.
	matches: Vec<usize>,
	cursor: usize,
	active: bool,
}

/// Application state threaded through every UI action.
pub struct Session {
	index: GraphIndex,
	options: SessionOptions,
	view: ViewNode,
	tree: ViewTree,
	mode: LayoutMode,
	expansion: Expansion,
	search: Search,
	status: String,
}

impl Session {
	/// Index the dataset and show its primary tree. Fails without a root.
	pub fn new(elements: Vec<Element>, options: SessionOptions) -> Result<Self, TreeError> {
		let index = GraphIndex::new(elements);
		for dangling in index.dangling_references() {
			let kind = match dangling.kind {
				EdgeKind::Parent => "parent",
				EdgeKind::Child => "child",
			};
			warn!("\"{}\" lists unknown {kind} \"{}\"; dropped", dangling.from, dangling.target);
		}

		let view = build_primary_tree(index.elements(), &index)?;
		let tree = ViewTree::new(&view);
		let expansion = Expansion::to_depth(&tree, options.initial_depth);
		info!("loaded {} elements, primary tree has {} nodes", index.elements().len(), tree.len());
		Ok(Self {
			index,
			options,
			view,
			tree,
			mode: LayoutMode::Primary,
			expansion,
			search: Search::default(),
			status: String::new(),
		})
	}

	/// Fresh primary tree from the loaded dataset.
	pub fn build_primary_tree(&self) -> Result<ViewNode, TreeError> {
		build_primary_tree(self.index.elements(), &self.index)
	}

	/// The tree currently on screen.
	pub fn view(&self) -> &ViewNode {
		&self.view
	}

	/// Flattened form of [`Session::view`].
	pub fn tree(&self) -> &ViewTree {
		&self.tree
	}

	/// Primary or focused.
	pub fn mode(&self) -> LayoutMode {
		self.mode
	}

	/// Collapsed/expanded state of the current tree.
	pub fn expansion(&self) -> &Expansion {
		&self.expansion
	}

	/// Positions for the visible part of the current tree.
	pub fn layout(&self) -> Layout {
		layout(&self.tree, &self.expansion, self.mode, self.options.spacing)
	}

	/// Result counter text for the UI.
	pub fn status(&self) -> &str {
		&self.status
	}

	fn show(&mut self, view: ViewNode, mode: LayoutMode) {
		let depth = match mode {
			LayoutMode::Primary => self.options.initial_depth,
			LayoutMode::Focused => self.options.focused_depth,
		};
		self.tree = ViewTree::new(&view);
		self.expansion = Expansion::to_depth(&self.tree, depth);
		self.view = view;
		self.mode = mode;
	}

	/// Substring search on canonical names. A blank query does nothing
	/// and returns `Ok(None)`. On a miss the view is kept as it is.
	pub fn search(&mut self, query: &str) -> Result<Option<&Element>, TreeError> {
		let needle = normalize(query.trim());
		if needle.is_empty() {
			return Ok(None);
		}

		let matches: Vec<usize> = self
			.index
			.elements()
			.iter()
			.enumerate()
			.filter(|(_, e)| normalize(&e.name).contains(&needle))
			.map(|(i, _)| i)
			.collect();
		if matches.is_empty() {
			warn!("no element matches \"{needle}\"");
			self.search = Search::default();
			self.status = "No results found".into();
			return Err(TreeError::NoSearchMatch(query.trim().to_owned()));
		}

		info!("\"{needle}\": {} matches", matches.len());
		self.search = Search {
			matches,
			cursor: 0,
			active: true,
		};
		Ok(Some(self.show_match()))
	}

	/// Elements matched by the last successful search.
	pub fn matches(&self) -> Vec<&Element> {
		let elements = self.index.elements();
		self.search.matches.iter().map(|&i| &elements[i]).collect()
	}

	/// Position in the match list, while a search is active.
	pub fn match_cursor(&self) -> Option<usize> {
		self.search.active.then_some(self.search.cursor)
	}

	/// Advance cyclically and show that match. `None` without an active search.
	pub fn next_match(&mut self) -> Option<&Element> {
		let count = self.search.matches.len();
		if !self.search.active || count == 0 {
			return None;
		}
		self.search.cursor = (self.search.cursor + 1) % count;
		Some(self.show_match())
	}

	/// Step back cyclically and show that match.
	pub fn previous_match(&mut self) -> Option<&Element> {
		let count = self.search.matches.len();
		if !self.search.active || count == 0 {
			return None;
		}
		self.search.cursor = (self.search.cursor + count - 1) % count;
		Some(self.show_match())
	}

	fn show_match(&mut self) -> &Element {
		let position = self.search.matches[self.search.cursor];
		let target = &self.index.elements()[position];
		let view = build_focused_tree(target, &self.index);
		self.status = format!(
			"Result {} of {}: {}",
			self.search.cursor + 1,
			self.search.matches.len(),
			target.name
		);
		self.show(view, LayoutMode::Focused);
		&self.index.elements()[position]
	}

	/// Flip the node with `key`. Returns false for blocked nodes, leaves
	/// and unknown keys.
	pub fn toggle(&mut self, key: &NodeKey) -> bool {
		match self.tree.find(key) {
			Some(idx) => self.expansion.toggle(&self.tree, idx),
			None => false,
		}
	}

	/// Expand every node of the current tree.
	pub fn expand_all(&mut self) {
		self.expansion.expand_all(&self.tree);
	}

	/// Collapse every node deeper than the collapse depth.
	pub fn collapse_all(&mut self) {
		self.expansion.collapse_beyond(&self.tree, self.options.collapse_depth);
	}

	/// Back to the primary tree with its initial expansion.
	pub fn reset(&mut self) -> Result<(), TreeError> {
		let view = self.build_primary_tree()?;
		self.search = Search::default();
		self.status.clear();
		self.show(view, LayoutMode::Primary);
		info!("view reset to the primary tree");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::tree::types::Role;

	fn element(name: &str, parents: &[&str], children: &[&str]) -> Element {
		Element {
			name: name.into(),
			parents: parents.iter().map(|s| s.to_string()).collect(),
			children: children.iter().map(|s| s.to_string()).collect(),
		}
	}

	fn session() -> Session {
		Session::new(
			vec![
				element("Root", &["none"], &["alpha", "beta"]),
				element("Alpha=first", &["root"], &["gamma"]),
				element("Beta", &["root"], &["gamma", "alphabet"]),
				element("Gamma", &["alpha", "beta"], &[]),
				element("Alphabet", &["beta"], &[]),
			],
			SessionOptions::default(),
		)
		.unwrap()
	}

	#[test]
	fn blank_query_changes_nothing() {
		let mut s = session();
		let before = s.layout();
		assert_eq!(s.search("   "), Ok(None));
		assert_eq!(s.mode(), LayoutMode::Primary);
		assert_eq!(s.layout(), before);
		assert_eq!(s.status(), "");
	}

	#[test]
	fn search_focuses_first_match() {
		let mut s = session();
		let found = s.search(" ALPHA ").unwrap().map(|e| e.name.clone());
		assert_eq!(found.as_deref(), Some("Alpha=first"));
		assert_eq!(s.mode(), LayoutMode::Focused);
		assert_eq!(s.view().role, Role::Target);
		assert_eq!(s.matches().len(), 2);
		assert_eq!(s.status(), "Result 1 of 2: Alpha=first");
	}

	#[test]
	fn missed_search_keeps_view() {
		let mut s = session();
		s.search("gamma").unwrap();
		let before = s.layout();
		assert_eq!(s.search("zzz"), Err(TreeError::NoSearchMatch("zzz".into())));
		assert_eq!(s.layout(), before);
		assert_eq!(s.status(), "No results found");
		assert!(s.next_match().is_none());
	}

	#[test]
	fn previous_from_first_wraps_to_last() {
		let mut s = session();
		s.search("a").unwrap();
		let last = s.matches().len() - 1;
		s.previous_match().unwrap();
		assert_eq!(s.match_cursor(), Some(last));
	}

	#[test]
	fn navigation_needs_a_search() {
		let mut s = session();
		assert!(s.next_match().is_none());
		assert!(s.previous_match().is_none());
		assert_eq!(s.match_cursor(), None);
	}

	#[test]
	fn focused_view_opens_one_level() {
		let mut s = session();
		s.search("beta").unwrap();
		let names: Vec<_> = s.layout().nodes.iter().map(|n| n.name.clone()).collect();
		assert_eq!(names, ["Beta", "Root", "Gamma", "Alphabet"]);
	}

	#[test]
	fn toggle_and_bulk_operations() {
		let mut s = session();
		let beta = s.layout().nodes.iter().find(|n| n.name == "Beta").unwrap().key.clone();
		let visible = s.layout().nodes.len();
		assert!(s.toggle(&beta));
		assert!(s.layout().nodes.len() < visible);

		let dup = s.tree().nodes().iter().find(|n| n.blocked()).unwrap().key.clone();
		assert!(!s.toggle(&dup));

		s.expand_all();
		assert_eq!(s.layout().nodes.len(), s.tree().len());
		s.collapse_all();
		assert!(s.layout().nodes.iter().all(|n| n.depth <= 3));
	}

	#[test]
	fn reset_restores_primary_tree() {
		let mut s = session();
		let first = s.view().clone();
		let first_layout = s.layout();
		s.search("gamma").unwrap();
		s.expand_all();
		s.next_match();
		s.reset().unwrap();
		assert_eq!(s.mode(), LayoutMode::Primary);
		assert_eq!(s.view(), &first);
		assert_eq!(s.layout(), first_layout);
		assert_eq!(s.match_cursor(), None);
	}

	proptest! {
		#[test]
		fn next_match_cycles(m in 1usize..6, k in 0usize..20) {
			let mut elements = vec![element("root", &["none"], &[])];
			elements.extend((0..m).map(|i| element(&format!("hit{i}"), &["root"], &[])));
			let mut s = Session::new(elements, SessionOptions::default()).unwrap();
			s.search("hit").unwrap();
			for _ in 0..k {
				s.next_match();
			}
			prop_assert_eq!(s.match_cursor(), Some(k % m));
		}
	}
}
