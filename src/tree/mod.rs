//! Tree construction and layout over the element graph. Nothing in here
//! touches the browser.

pub mod arena;
pub mod error;
pub mod expansion;
pub mod focused;
pub mod index;
pub mod layout;
pub mod primary;
pub mod session;
pub mod types;

pub use arena::{NodeKey, ViewTree};
pub use error::TreeError;
pub use layout::{Layout, LayoutMode, Link, PositionedNode, Spacing};
pub use session::{Session, SessionOptions};
pub use types::{BlockReason, Element, Role, ViewNode};
