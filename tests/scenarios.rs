use element_tree::data::parse_elements;
use element_tree::tree::{BlockReason, LayoutMode, Role, Session, SessionOptions, TreeError, ViewNode};

const DIAMOND: &str = r#"[
	{"name": "root", "parents": ["none"], "children": ["a", "b"]},
	{"name": "a", "parents": ["root"], "children": ["c"]},
	{"name": "b", "parents": ["root"], "children": ["c"]},
	{"name": "c", "parents": ["a", "b"], "children": []}
]"#;

fn session(json: &str) -> Session {
	Session::new(parse_elements(json).unwrap(), SessionOptions::default()).unwrap()
}

fn open_nodes(node: &ViewNode, out: &mut Vec<(String, usize)>) {
	if !node.blocked() {
		out.push((node.name.clone(), node.depth));
	}
	for child in &node.children {
		open_nodes(child, out);
	}
}

#[test]
fn diamond_places_shared_child_once() {
	let s = session(DIAMOND);
	let tree = s.view();
	let (a, b) = (&tree.children[0], &tree.children[1]);
	assert_eq!((a.name.as_str(), b.name.as_str()), ("a", "b"));
	assert_eq!(a.children[0].reason, None);
	assert_eq!(a.children[0].depth, 2);
	assert_eq!(b.children[0].reason, Some(BlockReason::Duplicate));
	assert_eq!(b.children[0].depth, 2);
}

#[test]
fn self_reference_is_circular() {
	let s = session(r#"[{"name": "x", "parents": ["none"], "children": ["x"]}]"#);
	let child = &s.view().children[0];
	assert!(child.blocked());
	assert_eq!(child.reason, Some(BlockReason::Circular));
	assert!(child.children.is_empty());
}

#[test]
fn dataset_without_root_fails() {
	let elements = parse_elements(r#"[{"name": "a", "parents": ["b"], "children": []}]"#).unwrap();
	assert!(matches!(Session::new(elements, SessionOptions::default()), Err(TreeError::NoRoot)));
}

#[test]
fn butterfly_half_planes() {
	let mut s = session(DIAMOND);
	s.search("a").unwrap();
	s.expand_all();
	let layout = s.layout();
	let target: Vec<_> = layout.nodes.iter().filter(|n| n.role == Role::Target).collect();
	assert_eq!(target.len(), 1);
	assert_eq!((target[0].x, target[0].y), (0.0, 0.0));
	for node in &layout.nodes {
		match node.role {
			Role::Ancestor => assert!(node.y < 0.0, "{} above", node.name),
			Role::Descendant => assert!(node.y > 0.0, "{} below", node.name),
			_ => {}
		}
	}
}

#[test]
fn reset_round_trips_to_first_load() {
	let mut s = session(DIAMOND);
	let mut first = Vec::new();
	open_nodes(&s.build_primary_tree().unwrap(), &mut first);

	s.search("c").unwrap();
	s.expand_all();
	s.previous_match();
	s.collapse_all();
	s.reset().unwrap();

	assert_eq!(s.mode(), LayoutMode::Primary);
	let mut again = Vec::new();
	open_nodes(s.view(), &mut again);
	assert_eq!(first, again);
}
