//! Canonical identities and the name lookup table.

use std::collections::HashMap;

use super::types::Element;

/// Canonical identity of a raw element name: the part before the first
/// `=`, trimmed and lowercased.
pub fn normalize(name: &str) -> String {
	name.split('=').next().unwrap_or_default().trim().to_lowercase()
}

/// Which edge list a reference was found in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
	/// Listed in `parents`.
	Parent,
	/// Listed in `children`.
	Child,
}

/// A parent or child name that does not resolve to any element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DanglingReference {
	/// Name of the element holding the reference.
	pub from: String,
	/// The name that did not resolve.
	pub target: String,
	/// Which list it sits in.
	pub kind: EdgeKind,
}

/// Maps canonical identity to element. On key collisions the later
/// element wins.
#[derive(Clone, Debug, Default)]
pub struct GraphIndex {
	elements: Vec<Element>,
	by_key: HashMap<String, usize>,
}

impl GraphIndex {
	/// Index `elements` by canonical identity.
	pub fn new(elements: Vec<Element>) -> Self {
		let by_key = elements
			.iter()
			.enumerate()
			.map(|(i, e)| (normalize(&e.name), i))
			.collect();
		Self { elements, by_key }
	}

	/// Elements in input order.
	pub fn elements(&self) -> &[Element] {
		&self.elements
	}

	/// Number of distinct identities.
	pub fn len(&self) -> usize {
		self.by_key.len()
	}

	/// Look up a raw or canonical name.
	pub fn get(&self, name: &str) -> Option<&Element> {
		self.by_key.get(&normalize(name)).map(|&i| &self.elements[i])
	}

	/// Resolve a list of raw names, dropping the ones that are unknown.
	pub fn resolve<'a, I>(&'a self, names: I) -> impl Iterator<Item = &'a Element> + 'a
	where
		I: IntoIterator<Item = &'a str> + 'a,
		I::IntoIter: 'a,
	{
		names.into_iter().filter_map(move |n| self.get(n))
	}

	/// Every reference that `resolve` would silently drop.
	pub fn dangling_references(&self) -> Vec<DanglingReference> {
		let mut out = Vec::new();
		for element in &self.elements {
			let parents = element.real_parents().map(|p| (p, EdgeKind::Parent));
			let children = element.children.iter().map(|c| (c.as_str(), EdgeKind::Child));
			for (target, kind) in parents.chain(children) {
				if self.get(target).is_none() {
					out.push(DanglingReference {
						from: element.name.clone(),
						target: target.to_owned(),
						kind,
					});
				}
			}
		}
		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn element(name: &str, parents: &[&str], children: &[&str]) -> Element {
		Element {
			name: name.into(),
			parents: parents.iter().map(|s| s.to_string()).collect(),
			children: children.iter().map(|s| s.to_string()).collect(),
		}
	}

	#[test]
	fn normalize_strips_suffix_and_case() {
		assert_eq!(normalize("  Alpha Beta = extra = more"), "alpha beta");
		assert_eq!(normalize("GAMMA"), "gamma");
		assert_eq!(normalize(""), "");
		assert_eq!(normalize("=only suffix"), "");
	}

	#[test]
	fn lookup_uses_canonical_identity() {
		let index = GraphIndex::new(vec![element("Node A=v1", &["none"], &[])]);
		assert_eq!(index.get("node a").map(|e| e.name.as_str()), Some("Node A=v1"));
		assert_eq!(index.get(" NODE A = v2").map(|e| e.name.as_str()), Some("Node A=v1"));
		assert!(index.get("node b").is_none());
	}

	#[test]
	fn later_duplicate_wins() {
		let index = GraphIndex::new(vec![
			element("dup", &["none"], &["x"]),
			element("DUP=2", &["none"], &["y"]),
		]);
		assert_eq!(index.len(), 1);
		assert_eq!(index.get("dup").map(|e| e.children.clone()), Some(vec!["y".into()]));
		assert_eq!(index.elements().len(), 2);
	}

	#[test]
	fn dangling_references_are_reported() {
		let index = GraphIndex::new(vec![
			element("root", &["None"], &["a", "ghost"]),
			element("a", &["root", "phantom"], &[]),
		]);
		let dangling = index.dangling_references();
		assert_eq!(dangling.len(), 2);
		assert_eq!(dangling[0].target, "ghost");
		assert_eq!(dangling[0].kind, EdgeKind::Child);
		assert_eq!(dangling[1].from, "a");
		assert_eq!(dangling[1].kind, EdgeKind::Parent);
	}
}
