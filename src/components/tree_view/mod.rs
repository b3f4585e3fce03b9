mod component;
mod render;
mod state;

pub use component::{SharedTreeView, TreeCanvas};
pub use state::TreeViewState;
