// ABOUTME: Pane layout management for terminal multiplexer tabs.
// ABOUTME: Immutable binary split trees plus drop-zone classification for drag and drop.

mod drop_zone;
mod error;
mod identity;
mod tree;

pub use drop_zone::{classify, DropZone};
pub use error::LayoutError;
pub use identity::StructuralIdentity;
pub use tree::{
    clamp_ratio, FocusDirection, Leaves, NewDirection, Node, SpatialDirection, SplitTree,
    DEFAULT_RATIO, MAX_RATIO, MIN_RATIO,
};

pub use pw_core::{Direction, Point, Rect, ViewId};
