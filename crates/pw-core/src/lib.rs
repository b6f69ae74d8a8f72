// ABOUTME: Shared types and configuration for paneweave.
// ABOUTME: Defines view handles, geometry, config file handling and layout sessions.

pub mod config;
pub mod geometry;
pub mod session;

pub use config::{BehaviorSettings, Config, ConfigError, LayoutSettings};
pub use geometry::{Direction, Point, Rect, ViewId};
pub use session::{LayoutSession, NodeSnapshot, SessionError, TabSnapshot};
