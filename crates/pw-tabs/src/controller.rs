// ABOUTME: Owns the ordered tab list and the single live split tree.
// ABOUTME: Implements select, close, join, unjoin and drag-and-drop with a fixed layout policy.

use std::sync::Arc;

use pw_core::{Config, Direction, Point, Rect, ViewId};
use pw_layout::{
    classify, DropZone, FocusDirection, LayoutError, NewDirection, Node, SpatialDirection,
    SplitTree, StructuralIdentity,
};

use crate::entry::{TabEntry, TabId, DEFAULT_TITLE};
use crate::error::TabError;
use crate::host::SurfaceHost;
use crate::pending::{DropTicket, PendingOp, PendingQueue};

/// A tab never grows past this many panes by joining
pub const MAX_JOINED_PANES: usize = 4;

/// Relative or absolute tab navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GotoTab {
    Previous,
    Next,
    Last,
    /// 1-based position; values past the end pick the last tab
    Index(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTab {
    Closed,
    /// A pane is busy; call `confirm_close` or `cancel_close`
    NeedsConfirmation,
    NotFound,
}

/// What a sidebar row shows for one top-level tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabRow {
    pub id: TabId,
    pub title: String,
    pub bell: bool,
    pub joined: usize,
    pub selected: bool,
}

/// Tab list plus the checked-out tree of the selected tab.
///
/// The selected tab's tree lives in `live_tree` while it is selected and is
/// written back to its entry before another tab is checked out, so exactly one
/// copy is ever mutated.
pub struct TabController<H: SurfaceHost> {
    pub(crate) host: H,
    pub(crate) config: Config,
    pub(crate) tabs: Vec<TabEntry>,
    pub(crate) selected: Option<TabId>,
    pub(crate) live_tree: SplitTree,
    pub(crate) pending: PendingQueue,
    pub(crate) pending_close: Option<TabId>,
    pub(crate) window_open: bool,
    pub(crate) published: Option<StructuralIdentity>,
}

impl<H: SurfaceHost> TabController<H> {
    /// Wrap `tree` as the first, selected tab. An empty tree gets a fresh surface.
    pub fn new(tree: SplitTree, mut host: H, config: Config) -> Self {
        let tree = if tree.is_empty() {
            SplitTree::with_view(host.create_surface())
        } else {
            tree
        };
        let entry = TabEntry::new(tree.clone());
        tracing::info!("Created tab {} with {} pane(s)", entry.id, tree.leaf_count());

        Self {
            host,
            config,
            selected: Some(entry.id),
            tabs: vec![entry],
            live_tree: tree,
            pending: PendingQueue::default(),
            pending_close: None,
            window_open: true,
            published: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tabs(&self) -> &[TabEntry] {
        &self.tabs
    }

    pub fn selected_id(&self) -> Option<TabId> {
        self.selected
    }

    /// The selected entry. Its stored tree is stale; use `live_tree`.
    pub fn selected_tab(&self) -> Option<&TabEntry> {
        let id = self.selected?;
        self.tabs.iter().find(|tab| tab.id == id)
    }

    pub fn live_tree(&self) -> &SplitTree {
        &self.live_tree
    }

    pub fn is_window_open(&self) -> bool {
        self.window_open
    }

    pub fn has_pending_close(&self) -> bool {
        self.pending_close.is_some()
    }

    pub fn pending_ops(&self) -> usize {
        self.pending.len()
    }

    pub fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id == id)
    }

    /// The tree that currently holds `id`'s panes
    pub fn tree_for(&self, id: TabId) -> Option<&SplitTree> {
        if self.selected == Some(id) {
            return Some(&self.live_tree);
        }
        self.tabs
            .iter()
            .find(|tab| tab.id == id)
            .map(|tab| &tab.surface_tree)
    }

    pub fn structural_identity(&self) -> StructuralIdentity {
        self.live_tree.structural_identity()
    }

    /// True when the live tree's structure changed since the previous call
    pub fn take_tree_changed(&mut self) -> bool {
        let identity = self.live_tree.structural_identity();
        let changed = self.published != Some(identity);
        self.published = Some(identity);
        changed
    }

    pub fn tab_rows(&self) -> Vec<TabRow> {
        self.tabs
            .iter()
            .map(|tab| TabRow {
                id: tab.id,
                title: tab.title.clone(),
                bell: tab.bell,
                joined: tab.children.len(),
                selected: self.selected == Some(tab.id),
            })
            .collect()
    }

    /// Pane that has keyboard focus in the live tree
    pub fn focused_view(&self) -> Option<ViewId> {
        self.selected_tab()
            .and_then(|tab| tab.focused_surface)
            .filter(|view| self.live_tree.contains(*view))
            .or_else(|| self.live_tree.leftmost_leaf().ok())
    }

    pub fn select_tab(&mut self, id: TabId) -> bool {
        if self.selected == Some(id) {
            return false;
        }
        let Some(index) = self.index_of(id) else {
            tracing::debug!("Select of unknown tab {} ignored", id);
            return false;
        };

        self.checkin();
        let entry = &mut self.tabs[index];
        entry.bell = false;
        self.selected = Some(id);
        self.live_tree = entry.surface_tree.clone();
        if let Some(view) = entry.focused_surface {
            self.pending.push(PendingOp::RestoreFocus(view));
        }
        tracing::debug!("Switched to tab {}", id);
        true
    }

    pub fn add_tab(&mut self) -> TabId {
        let view = self.host.create_surface();
        let entry = TabEntry::new(SplitTree::with_view(view));
        let id = entry.id;
        self.tabs.push(entry);
        tracing::info!("Created tab {} (total: {})", id, self.tabs.len());
        self.select_tab(id);
        id
    }

    pub fn close_tab(&mut self, id: TabId) -> CloseTab {
        let Some(tree) = self.tree_for(id) else {
            return CloseTab::NotFound;
        };
        if self.config.behavior.confirm_close_running
            && tree.leaves().any(|view| self.host.needs_confirm_quit(view))
        {
            tracing::info!("Tab {} has running processes, asking for confirmation", id);
            self.pending_close = Some(id);
            return CloseTab::NeedsConfirmation;
        }
        self.finish_close(id);
        CloseTab::Closed
    }

    /// Close the tab awaiting confirmation
    pub fn confirm_close(&mut self) -> bool {
        let Some(id) = self.pending_close.take() else {
            return false;
        };
        if self.index_of(id).is_none() {
            tracing::debug!("Confirmed tab {} is already gone", id);
            return false;
        }
        self.finish_close(id);
        true
    }

    pub fn cancel_close(&mut self) -> bool {
        self.pending_close.take().is_some()
    }

    pub fn goto_tab(&mut self, goto: GotoTab) -> bool {
        let len = self.tabs.len();
        if len == 0 {
            return false;
        }
        let current = self
            .selected
            .and_then(|id| self.index_of(id))
            .unwrap_or(0);
        let index = match goto {
            GotoTab::Previous => (current + len - 1) % len,
            GotoTab::Next => (current + 1) % len,
            GotoTab::Last => len - 1,
            GotoTab::Index(n) if n >= 1 => usize::try_from(n - 1).unwrap_or(usize::MAX).min(len - 1),
            GotoTab::Index(n) => {
                tracing::debug!("Goto tab {} ignored", n);
                return false;
            }
        };
        let id = self.tabs[index].id;
        self.select_tab(id)
    }

    /// Move `source`'s leftmost pane into `target`'s tree following the join
    /// layout policy, and demote `source` to a child of `target`. Other panes
    /// of `source` stay together as a new tab in its place.
    pub fn join_tab(&mut self, source: TabId, target: TabId) -> Result<(), TabError> {
        self.join_at(source, target, None)
    }

    /// Detach `child` from `parent`, giving it back a one-pane tab placed
    /// right after `parent`.
    pub fn unjoin_tab(&mut self, child: TabId, parent: TabId) -> bool {
        let Some(parent_index) = self.index_of(parent) else {
            tracing::debug!("Unjoin ignored, parent {} not found", parent);
            return false;
        };
        let Some(child_index) = self.tabs[parent_index]
            .children
            .iter()
            .position(|entry| entry.id == child)
        else {
            tracing::debug!("Unjoin ignored, {} is not joined into {}", child, parent);
            return false;
        };

        let mut entry = self.tabs[parent_index].children.remove(child_index);
        let parent_tree = self.tree_for(parent).cloned().unwrap_or_default();
        let remaining = match entry.original_surface {
            Some(original) => parent_tree.removing(original),
            None => parent_tree,
        };
        entry.detach();

        let parent_entry = &mut self.tabs[parent_index];
        if entry.original_surface.is_some() && parent_entry.focused_surface == entry.original_surface {
            parent_entry.focused_surface = remaining.leftmost_leaf().ok();
        }
        let parent_focus = parent_entry.focused_surface;

        let insert_at = self
            .index_of(parent)
            .map_or(self.tabs.len(), |index| index + 1);
        tracing::info!("Unjoined tab {} from {}", entry.id, parent);
        self.tabs.insert(insert_at, entry);

        self.store_tree(parent, remaining);
        if self.selected == Some(parent) {
            if let Some(view) = parent_focus {
                self.pending.push(PendingOp::RestoreFocus(view));
            }
        }
        true
    }

    /// Drop `payload` onto the `zone` edge of `destination` in the live tree.
    /// Panes already in the live tree move; the leftmost pane of another tab joins
    /// at that spot; anything else is ignored.
    pub fn drop(&mut self, payload: ViewId, destination: ViewId, zone: DropZone) -> Result<(), TabError> {
        if payload == destination {
            tracing::debug!("Drop of {} onto itself ignored", payload);
            return Ok(());
        }
        if !self.live_tree.contains(destination) {
            tracing::debug!("Drop ignored, destination {} is gone", destination);
            return Ok(());
        }

        let edge = NewDirection::from(zone);
        if self.live_tree.contains(payload) {
            let moved = self
                .live_tree
                .removing(payload)
                .inserting(payload, destination, edge)?;
            self.set_live_tree(moved);
            self.set_focus(payload);
            return Ok(());
        }

        let source = self
            .tabs
            .iter()
            .find(|tab| {
                Some(tab.id) != self.selected
                    && tab.original_surface == Some(payload)
                    && tab.surface_tree.leftmost_leaf() == Ok(payload)
            })
            .map(|tab| tab.id);
        match (source, self.selected) {
            (Some(source), Some(target)) => self.join_at(source, target, Some((destination, edge))),
            _ => {
                tracing::debug!("Drop ignored, payload {} is not a known pane", payload);
                Ok(())
            }
        }
    }

    /// Drop at a window position, picking the pane under `point` and the zone
    /// within that pane.
    pub fn drop_at(&mut self, payload: ViewId, point: Point) -> Result<(), TabError> {
        let Some((destination, rect)) = self.live_tree.view_at(point, self.window_bounds()) else {
            tracing::debug!("Drop at ({}, {}) hit no pane", point.x, point.y);
            return Ok(());
        };
        self.drop(payload, destination, classify(point, rect))
    }

    /// Start a drop whose payload is delivered later through `resolve_drop`
    pub fn begin_drop(&mut self, destination: ViewId, zone: DropZone) -> DropTicket {
        self.pending.begin_drop(destination, zone)
    }

    pub fn resolve_drop(&mut self, ticket: DropTicket, payload: ViewId) -> bool {
        self.pending.resolve_drop(ticket, payload)
    }

    pub fn abandon_drop(&mut self, ticket: DropTicket) -> bool {
        self.pending.abandon_drop(ticket)
    }

    /// Run the operations queued before this call. Each is checked against the
    /// current state first, since it may have changed since it was queued.
    pub fn tick(&mut self) -> usize {
        let ops = self.pending.take_ready();
        let count = ops.len();
        for op in ops {
            match op {
                PendingOp::RestoreFocus(view) => {
                    if self.live_tree.contains(view) {
                        self.host.focus_surface(view);
                    } else {
                        tracing::debug!("Focus restore of {} skipped, pane is gone", view);
                    }
                }
                PendingOp::ResolveDrop {
                    payload,
                    destination,
                    zone,
                } => {
                    if let Err(err) = self.drop(payload, destination, zone) {
                        tracing::warn!("Deferred drop of {} rejected: {}", payload, err);
                    }
                }
            }
        }
        count
    }

    /// Split the focused pane of the live tree with a fresh surface
    pub fn new_split(&mut self, edge: NewDirection) -> Result<ViewId, TabError> {
        let anchor = self.focused_view().ok_or(LayoutError::EmptyTree)?;
        let view = self.host.create_surface();
        match self.live_tree.inserting(view, anchor, edge) {
            Ok(tree) => {
                self.set_live_tree(tree);
                self.set_focus(view);
                Ok(view)
            }
            Err(err) => {
                self.host.release_surface(view);
                Err(err.into())
            }
        }
    }

    /// Remove a pane from whichever tab holds it. A tab left without panes
    /// closes without asking for confirmation.
    pub fn close_surface(&mut self, view: ViewId) -> bool {
        let owner = self
            .tabs
            .iter()
            .map(|tab| tab.id)
            .find(|id| self.tree_for(*id).is_some_and(|tree| tree.contains(view)));
        let Some(owner) = owner else {
            tracing::debug!("Close of unknown pane {} ignored", view);
            return false;
        };
        let tree = self.tree_for(owner).cloned().unwrap_or_default();
        let fallback = tree
            .focus_target(view, FocusDirection::Next)
            .filter(|next| *next != view);
        let remaining = tree.removing(view);
        self.host.release_surface(view);

        let mut focus = None;
        if let Some(index) = self.index_of(owner) {
            let entry = &mut self.tabs[index];
            entry
                .children
                .retain(|child| child.original_surface != Some(view));
            if entry.focused_surface == Some(view) {
                entry.focused_surface = fallback;
                focus = fallback;
            }
        }

        self.store_tree(owner, remaining);
        if self.selected == Some(owner) {
            if let Some(view) = focus {
                self.pending.push(PendingOp::RestoreFocus(view));
            }
        }
        true
    }

    /// Record that the user focused `view` in the live tree
    pub fn focus_surface(&mut self, view: ViewId) -> bool {
        if !self.live_tree.contains(view) {
            return false;
        }
        if let Some(entry) = self.selected_entry_mut() {
            if entry.update_focused_surface(view) {
                tracing::debug!("Tab {} follows title of {}", entry.id, view);
            }
        }
        true
    }

    pub fn move_focus(&mut self, direction: FocusDirection) -> Option<ViewId> {
        let from = self.focused_view()?;
        let target = self.live_tree.focus_target(from, direction)?;
        if target != from {
            self.set_focus(target);
        }
        Some(target)
    }

    /// Zoom the focused pane, or unzoom. Returns whether a pane is zoomed now.
    pub fn toggle_zoom(&mut self) -> bool {
        if self.live_tree.zoomed().is_some() {
            self.live_tree = self.live_tree.unzoom();
            return false;
        }
        let Some(view) = self.focused_view() else {
            return false;
        };
        let Some(leaf) = self.live_tree.find_leaf(view).cloned() else {
            return false;
        };
        self.live_tree = self.live_tree.zoom(&leaf);
        true
    }

    pub fn equalize(&mut self) {
        self.live_tree = self.live_tree.equalized();
    }

    pub fn resize(&mut self, node: &Arc<Node>, ratio: f32) {
        self.live_tree = self.live_tree.resizing(node, ratio);
    }

    /// Move the divider nearest `view` one resize step toward `direction`
    pub fn nudge(&mut self, view: ViewId, direction: SpatialDirection) -> bool {
        let step = self.config.layout.resize_step;
        let (axis, delta) = match direction {
            SpatialDirection::Left => (Direction::Horizontal, -step),
            SpatialDirection::Right => (Direction::Horizontal, step),
            SpatialDirection::Up => (Direction::Vertical, -step),
            SpatialDirection::Down => (Direction::Vertical, step),
        };
        let Some(split) = self.live_tree.nearest_split(view, axis).cloned() else {
            return false;
        };
        let Node::Split { ratio, .. } = split.as_ref() else {
            return false;
        };
        self.live_tree = self.live_tree.resizing(&split, ratio + delta);
        true
    }

    pub fn swap_surfaces(&mut self, a: ViewId, b: ViewId) -> Result<(), TabError> {
        self.live_tree = self.live_tree.swapping(a, b)?;
        Ok(())
    }

    /// Route a title change to every tab that tracks `view`. Returns the number
    /// of entries updated.
    pub fn surface_title_changed(&mut self, view: ViewId, title: &str) -> usize {
        let mut updated = 0;
        for tab in &mut self.tabs {
            tab.for_each_mut(&mut |entry| {
                if entry.tracked_surface() == Some(view) {
                    entry.set_title(title);
                    updated += 1;
                }
            });
        }
        updated
    }

    pub fn surface_bell_changed(&mut self, view: ViewId, bell: bool) -> usize {
        let mut updated = 0;
        for tab in &mut self.tabs {
            tab.for_each_mut(&mut |entry| {
                if entry.tracked_surface() == Some(view) {
                    entry.set_bell(bell);
                    updated += 1;
                }
            });
        }
        updated
    }

    fn window_bounds(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.config.layout.window_width,
            self.config.layout.window_height,
        )
    }

    fn selected_entry_mut(&mut self) -> Option<&mut TabEntry> {
        let id = self.selected?;
        self.tabs.iter_mut().find(|tab| tab.id == id)
    }

    fn set_focus(&mut self, view: ViewId) {
        if let Some(entry) = self.selected_entry_mut() {
            entry.update_focused_surface(view);
        }
        self.pending.push(PendingOp::RestoreFocus(view));
    }

    /// Write the live tree back into the selected entry
    fn checkin(&mut self) {
        let Some(id) = self.selected else {
            return;
        };
        if let Some(entry) = self.tabs.iter_mut().find(|tab| tab.id == id) {
            entry.surface_tree = self.live_tree.clone();
        }
    }

    fn set_live_tree(&mut self, tree: SplitTree) {
        self.live_tree = tree;
        if self.live_tree.is_empty() {
            if let Some(id) = self.selected {
                tracing::info!("Last pane of tab {} closed", id);
                self.finish_close(id);
            }
        }
    }

    fn store_tree(&mut self, id: TabId, tree: SplitTree) {
        if self.selected == Some(id) {
            self.set_live_tree(tree);
            return;
        }
        let Some(index) = self.index_of(id) else {
            return;
        };
        let empty = tree.is_empty();
        self.tabs[index].surface_tree = tree;
        if empty {
            self.finish_close(id);
        }
    }

    fn finish_close(&mut self, id: TabId) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        let was_selected = self.selected == Some(id);
        if was_selected {
            self.checkin();
        }
        let entry = self.tabs.remove(index);
        if self.pending_close == Some(id) {
            self.pending_close = None;
        }
        for view in entry.surface_tree.leaves() {
            self.host.release_surface(view);
        }
        tracing::info!("Closed tab {} (remaining: {})", id, self.tabs.len());

        if self.tabs.is_empty() {
            self.selected = None;
            self.live_tree = SplitTree::new();
            if self.window_open {
                self.window_open = false;
                tracing::info!("All tabs closed, closing window");
                self.host.close_window();
            }
            return;
        }
        if was_selected {
            self.selected = None;
            let next = self.tabs[index.min(self.tabs.len() - 1)].id;
            self.select_tab(next);
        }
    }

    fn join_at(
        &mut self,
        source: TabId,
        target: TabId,
        placement: Option<(ViewId, NewDirection)>,
    ) -> Result<(), TabError> {
        if source == target {
            tracing::debug!("Join of tab {} into itself ignored", source);
            return Ok(());
        }
        let (Some(source_tree), Some(target_tree)) = (self.tree_for(source), self.tree_for(target))
        else {
            tracing::debug!("Join ignored, tab {} or {} not found", source, target);
            return Ok(());
        };
        let Ok(view) = source_tree.leftmost_leaf() else {
            tracing::debug!("Join ignored, tab {} has no panes", source);
            return Ok(());
        };
        let remaining = source_tree.removing(view);

        let leaf_count = target_tree.leaf_count();
        if leaf_count >= MAX_JOINED_PANES {
            tracing::warn!("Tab {} already holds {} panes", target, leaf_count);
            return Err(TabError::CapacityExceeded);
        }
        let (anchor, edge) = match placement {
            Some(placement) => placement,
            None => match leaf_count {
                1 => (target_tree.leftmost_leaf()?, NewDirection::Right),
                2 => (target_tree.rightmost_leaf()?, NewDirection::Down),
                _ => (target_tree.leftmost_leaf()?, NewDirection::Down),
            },
        };
        let joined = target_tree.inserting(view, anchor, edge)?;

        let Some(source_index) = self.index_of(source) else {
            return Ok(());
        };
        let source_was_selected = self.selected == Some(source);
        if source_was_selected {
            self.checkin();
            self.selected = None;
        }
        let mut source_entry = self.tabs.remove(source_index);
        if let Some(remainder) = split_remainder(&mut source_entry, view, remaining) {
            tracing::info!(
                "Panes left behind by tab {} stay in tab {}",
                source,
                remainder.id
            );
            self.tabs.insert(source_index, remainder);
        }
        self.store_tree(target, joined);
        if let Some(target_index) = self.index_of(target) {
            let entry = &mut self.tabs[target_index];
            entry.children.push(source_entry);
            entry.focused_surface = Some(view);
        }
        tracing::info!("Joined tab {} into {}", source, target);

        if source_was_selected {
            self.select_tab(target);
        } else if self.selected == Some(target) {
            self.pending.push(PendingOp::RestoreFocus(view));
        }
        Ok(())
    }
}

/// Turn a joined source into a one-pane child around `view`. Any other panes
/// it held come back as a new top-level tab, taking along the joined children
/// and, when the original surface is among them, the title.
fn split_remainder(source: &mut TabEntry, view: ViewId, remaining: SplitTree) -> Option<TabEntry> {
    let remainder = if remaining.is_empty() {
        None
    } else {
        let mut entry = TabEntry::new(remaining);
        if let Some(focused) = source
            .focused_surface
            .filter(|focused| entry.surface_tree.contains(*focused))
        {
            entry.focused_surface = Some(focused);
        }
        let (moved, kept): (Vec<TabEntry>, Vec<TabEntry>) =
            source.children.drain(..).partition(|child| {
                child
                    .original_surface
                    .is_some_and(|original| entry.surface_tree.contains(original))
            });
        entry.children = moved;
        source.children = kept;
        if source
            .original_surface
            .is_some_and(|original| entry.surface_tree.contains(original))
        {
            entry.original_surface = source.original_surface;
            entry.title = std::mem::replace(&mut source.title, DEFAULT_TITLE.to_string());
            entry.bell = std::mem::take(&mut source.bell);
        }
        Some(entry)
    };
    source.original_surface = Some(view);
    source.detach();
    remainder
}
