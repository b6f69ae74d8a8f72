// ABOUTME: Converts a tab controller to and from a persisted layout session.
// ABOUTME: Surfaces become slot numbers on save and fresh host surfaces on restore.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use pw_core::{Config, LayoutSession, NodeSnapshot, TabSnapshot, ViewId};
use pw_layout::{LayoutError, Node, SplitTree};

use crate::controller::TabController;
use crate::entry::{TabEntry, TabId};
use crate::error::TabError;
use crate::host::SurfaceHost;
use crate::pending::{PendingOp, PendingQueue};

impl<H: SurfaceHost> TabController<H> {
    /// Capture tab order, titles, layouts and focus. Joined tabs are stored
    /// under their parent.
    pub fn snapshot(&self) -> LayoutSession {
        let mut slots = HashMap::new();
        let tabs = self
            .tabs
            .iter()
            .map(|tab| {
                let tree = self.tree_for(tab.id).unwrap_or(&tab.surface_tree);
                snapshot_tab(tab, tree, &mut slots)
            })
            .collect();

        LayoutSession {
            version: LayoutSession::CURRENT_VERSION,
            selected: self.selected.and_then(|id| self.index_of(id)),
            tabs,
        }
    }

    /// Rebuild a controller from `session`, creating one surface per slot.
    /// The session is validated before any surface is created. Tabs saved
    /// without panes are skipped; if none remain a fresh tab is opened.
    pub fn restore(session: &LayoutSession, mut host: H, config: Config) -> Result<Self, TabError> {
        validate(session)?;

        let mut views = HashMap::new();
        let mut tabs = Vec::new();
        let mut positions = Vec::new();
        for (position, snapshot) in session.tabs.iter().enumerate() {
            let entry = restore_tab(snapshot, &mut host, &mut views)?;
            if entry.surface_tree.is_empty() {
                tracing::debug!("Skipping saved tab '{}' without panes", entry.title);
                continue;
            }
            tabs.push(entry);
            positions.push(position);
        }

        if tabs.is_empty() {
            return Ok(Self::new(SplitTree::new(), host, config));
        }

        // Saved positions count skipped tabs
        let wanted = session.selected.unwrap_or(0);
        let index = positions
            .iter()
            .position(|position| *position >= wanted)
            .unwrap_or(tabs.len() - 1);
        let selected = tabs[index].id;
        let live_tree = tabs[index].surface_tree.clone();
        let mut pending = PendingQueue::default();
        if let Some(view) = tabs[index].focused_surface {
            pending.push(PendingOp::RestoreFocus(view));
        }
        tracing::info!("Restored {} tab(s) with {} surface(s)", tabs.len(), views.len());

        Ok(Self {
            host,
            config,
            tabs,
            selected: Some(selected),
            live_tree,
            pending,
            pending_close: None,
            window_open: true,
            published: None,
        })
    }
}

fn slot_for(view: ViewId, slots: &mut HashMap<ViewId, usize>) -> usize {
    let next = slots.len();
    *slots.entry(view).or_insert(next)
}

fn snapshot_node(node: &Node, slots: &mut HashMap<ViewId, usize>) -> NodeSnapshot {
    match node {
        Node::Leaf(view) => NodeSnapshot::Leaf {
            slot: slot_for(*view, slots),
        },
        Node::Split {
            direction,
            ratio,
            left,
            right,
        } => NodeSnapshot::Split {
            direction: *direction,
            ratio: *ratio,
            left: Box::new(snapshot_node(left, slots)),
            right: Box::new(snapshot_node(right, slots)),
        },
    }
}

fn snapshot_tab(entry: &TabEntry, tree: &SplitTree, slots: &mut HashMap<ViewId, usize>) -> TabSnapshot {
    let root = tree.root().map(|root| snapshot_node(root, slots));
    let known = |view: Option<ViewId>| view.filter(|view| tree.contains(*view));

    TabSnapshot {
        title: entry.title.clone(),
        tree: root,
        focused: known(entry.focused_surface).map(|view| slot_for(view, slots)),
        original: known(entry.original_surface).map(|view| slot_for(view, slots)),
        children: entry
            .children
            .iter()
            .filter_map(|child| {
                // A joined pane lives in the parent's tree
                let original = child.original_surface.filter(|view| tree.contains(*view))?;
                let slot = slot_for(original, slots);
                Some(TabSnapshot {
                    title: child.title.clone(),
                    tree: Some(NodeSnapshot::Leaf { slot }),
                    focused: Some(slot),
                    original: Some(slot),
                    children: Vec::new(),
                })
            })
            .collect(),
    }
}

/// Each slot may appear in at most one top-level tree, and only once there
fn validate(session: &LayoutSession) -> Result<(), TabError> {
    let mut seen = HashSet::new();
    for tab in &session.tabs {
        if let Some(tree) = &tab.tree {
            collect_slots(tree, &mut seen)?;
        }
    }
    Ok(())
}

fn collect_slots(node: &NodeSnapshot, seen: &mut HashSet<usize>) -> Result<(), TabError> {
    match node {
        NodeSnapshot::Leaf { slot } => {
            if !seen.insert(*slot) {
                return Err(LayoutError::DuplicateView.into());
            }
            Ok(())
        }
        NodeSnapshot::Split { left, right, .. } => {
            collect_slots(left, seen)?;
            collect_slots(right, seen)
        }
    }
}

fn view_for<H: SurfaceHost>(slot: usize, host: &mut H, views: &mut HashMap<usize, ViewId>) -> ViewId {
    *views.entry(slot).or_insert_with(|| host.create_surface())
}

fn restore_node<H: SurfaceHost>(
    node: &NodeSnapshot,
    host: &mut H,
    views: &mut HashMap<usize, ViewId>,
) -> Arc<Node> {
    match node {
        NodeSnapshot::Leaf { slot } => Node::leaf(view_for(*slot, host, views)),
        NodeSnapshot::Split {
            direction,
            ratio,
            left,
            right,
        } => {
            let left = restore_node(left, host, views);
            let right = restore_node(right, host, views);
            Node::split(*direction, *ratio, left, right)
        }
    }
}

fn restore_tab<H: SurfaceHost>(
    snapshot: &TabSnapshot,
    host: &mut H,
    views: &mut HashMap<usize, ViewId>,
) -> Result<TabEntry, TabError> {
    let surface_tree = match &snapshot.tree {
        Some(node) => SplitTree::from_node(restore_node(node, host, views))?,
        None => SplitTree::new(),
    };
    // Slots outside this tab's tree would create orphan surfaces
    let lookup = |slot: Option<usize>| {
        slot.and_then(|slot| views.get(&slot).copied())
            .filter(|view| surface_tree.contains(*view))
    };
    let focused_surface = lookup(snapshot.focused).or_else(|| surface_tree.leftmost_leaf().ok());
    let original_surface = lookup(snapshot.original);

    let children = snapshot
        .children
        .iter()
        .filter_map(|child| {
            let view = child
                .original
                .and_then(|slot| views.get(&slot).copied())
                .filter(|view| surface_tree.contains(*view))?;
            Some(TabEntry {
                id: TabId::new(),
                surface_tree: SplitTree::with_view(view),
                focused_surface: Some(view),
                original_surface: Some(view),
                title: child.title.clone(),
                bell: false,
                children: Vec::new(),
            })
        })
        .collect();

    Ok(TabEntry {
        id: TabId::new(),
        surface_tree,
        focused_surface,
        original_surface,
        title: snapshot.title.clone(),
        bell: false,
        children,
    })
}
