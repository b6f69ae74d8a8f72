// ABOUTME: The collaborator that owns terminal surfaces and the window.
// ABOUTME: The controller only asks it for surfaces and tells it about focus and closure.

use pw_core::ViewId;

pub trait SurfaceHost {
    /// Create a new terminal surface and return its handle
    fn create_surface(&mut self) -> ViewId;

    /// Whether closing `view` would interrupt something, e.g. a running
    /// foreground process
    fn needs_confirm_quit(&self, view: ViewId) -> bool;

    /// Move keyboard focus to `view`
    fn focus_surface(&mut self, view: ViewId);

    /// The engine no longer references `view`
    fn release_surface(&mut self, view: ViewId);

    /// The last tab closed
    fn close_window(&mut self);
}
