// ABOUTME: One tab: a split tree plus title, bell and focus bookkeeping.
// ABOUTME: Joined tabs live on as children of the tab they were joined into.

use std::fmt;

use pw_core::ViewId;
use pw_layout::SplitTree;
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "Terminal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(Uuid);

impl TabId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone)]
pub struct TabEntry {
    pub(crate) id: TabId,
    /// Stale while the tab is selected or joined; the controller's live tree
    /// or the parent's tree is authoritative then.
    pub(crate) surface_tree: SplitTree,
    pub(crate) focused_surface: Option<ViewId>,
    pub(crate) original_surface: Option<ViewId>,
    pub(crate) title: String,
    pub(crate) bell: bool,
    pub(crate) children: Vec<TabEntry>,
}

impl TabEntry {
    /// Wrap `tree`, anchoring the tab on its leftmost pane.
    pub fn new(tree: SplitTree) -> Self {
        let anchor = tree.leftmost_leaf().ok();
        Self {
            id: TabId::new(),
            surface_tree: tree,
            focused_surface: anchor,
            original_surface: anchor,
            title: DEFAULT_TITLE.to_string(),
            bell: false,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn surface_tree(&self) -> &SplitTree {
        &self.surface_tree
    }

    pub fn focused_surface(&self) -> Option<ViewId> {
        self.focused_surface
    }

    pub fn original_surface(&self) -> Option<ViewId> {
        self.original_surface
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn bell(&self) -> bool {
        self.bell
    }

    pub fn children(&self) -> &[TabEntry] {
        &self.children
    }

    pub fn find_child(&self, id: TabId) -> Option<&TabEntry> {
        self.children.iter().find(|child| child.id == id)
    }

    /// Surface whose title and bell this tab mirrors
    pub fn tracked_surface(&self) -> Option<ViewId> {
        self.original_surface
    }

    /// Record the last focused pane. Returns true when title tracking follows
    /// `view`, which only happens for the original surface (adopted if the tab
    /// has none yet). Focus on a joined pane never retargets the title.
    pub fn update_focused_surface(&mut self, view: ViewId) -> bool {
        self.focused_surface = Some(view);
        if self.original_surface.is_none() {
            self.original_surface = Some(view);
        }
        self.original_surface == Some(view)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_bell(&mut self, bell: bool) {
        self.bell = bell;
    }

    /// Rebuild as a standalone one-pane tab around the original surface.
    pub(crate) fn detach(&mut self) {
        if let Some(original) = self.original_surface {
            self.surface_tree = SplitTree::with_view(original);
            self.focused_surface = Some(original);
        }
    }

    /// Apply `f` to this entry and every joined descendant.
    pub(crate) fn for_each_mut(&mut self, f: &mut dyn FnMut(&mut TabEntry)) {
        f(self);
        for child in &mut self.children {
            child.for_each_mut(f);
        }
    }
}
