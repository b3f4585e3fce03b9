pub mod tree_view;
