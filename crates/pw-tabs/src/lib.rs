// ABOUTME: Tab composition for paneweave.
// ABOUTME: Groups split trees into selectable tabs and applies join/unjoin and drop policy.

mod controller;
mod entry;
mod error;
mod host;
mod pending;
mod session;

pub use controller::{CloseTab, GotoTab, TabController, TabRow, MAX_JOINED_PANES};
pub use entry::{TabEntry, TabId, DEFAULT_TITLE};
pub use error::TabError;
pub use host::SurfaceHost;
pub use pending::{DropTicket, PendingOp};
