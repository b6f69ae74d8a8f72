// ABOUTME: In-memory surface host used by the headless driver.
// ABOUTME: Hands out view ids and tracks which surfaces are alive, busy or focused.

use std::collections::{BTreeSet, HashSet};

use pw_core::ViewId;
use pw_tabs::SurfaceHost;

#[derive(Debug, Default)]
pub struct HeadlessHost {
    next: u64,
    live: BTreeSet<ViewId>,
    busy: HashSet<ViewId>,
    focused: Option<ViewId>,
    window_closed: bool,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.live.iter().copied()
    }

    pub fn focused(&self) -> Option<ViewId> {
        self.focused
    }

    pub fn window_closed(&self) -> bool {
        self.window_closed
    }

    /// Flip whether `view` runs a foreground process. Returns the new state.
    pub fn toggle_busy(&mut self, view: ViewId) -> bool {
        if self.busy.remove(&view) {
            false
        } else {
            self.busy.insert(view);
            true
        }
    }
}

impl SurfaceHost for HeadlessHost {
    fn create_surface(&mut self) -> ViewId {
        self.next += 1;
        let view = ViewId(self.next);
        self.live.insert(view);
        tracing::debug!("Created surface {}", view);
        view
    }

    fn needs_confirm_quit(&self, view: ViewId) -> bool {
        self.busy.contains(&view)
    }

    fn focus_surface(&mut self, view: ViewId) {
        if self.live.contains(&view) {
            self.focused = Some(view);
        }
    }

    fn release_surface(&mut self, view: ViewId) {
        if self.live.remove(&view) {
            tracing::debug!("Released surface {}", view);
        }
        self.busy.remove(&view);
        if self.focused == Some(view) {
            self.focused = None;
        }
    }

    fn close_window(&mut self) {
        self.window_closed = true;
    }
}
