// ABOUTME: Text rendering of the tab list and the live split tree.
// ABOUTME: Output goes to stdout so scripted runs can be diffed.

use std::fmt::Write;

use pw_core::{Direction, Rect, ViewId};
use pw_layout::{Node, SplitTree};
use pw_tabs::TabRow;

pub fn render_tabs(rows: &[TabRow]) -> String {
    let mut out = String::new();
    for (index, row) in rows.iter().enumerate() {
        let marker = if row.selected { '>' } else { ' ' };
        let _ = write!(out, "{} {}. {}", marker, index + 1, row.title);
        if row.joined > 0 {
            let _ = write!(out, " (+{})", row.joined);
        }
        if row.bell {
            out.push_str(" [bell]");
        }
        out.push('\n');
    }
    out
}

/// Indented outline of `tree`. Each leaf shows its rect inside `bounds`;
/// `focused` is starred and the zoomed node is tagged.
pub fn render_tree(tree: &SplitTree, bounds: Rect, focused: Option<ViewId>) -> String {
    let Some(root) = tree.root() else {
        return "(empty)\n".to_string();
    };
    let rects = tree.rects(bounds);
    let zoomed = tree.zoomed().map(|node| node.as_ref() as *const Node);

    let mut out = String::new();
    render_node(root, 0, &rects, focused, zoomed, &mut out);
    out
}

fn render_node(
    node: &Node,
    depth: usize,
    rects: &[(ViewId, Rect)],
    focused: Option<ViewId>,
    zoomed: Option<*const Node>,
    out: &mut String,
) {
    let indent = "  ".repeat(depth);
    let zoom_tag = if zoomed == Some(node as *const Node) {
        " [zoom]"
    } else {
        ""
    };
    match node {
        Node::Leaf(view) => {
            let star = if focused == Some(*view) { " *" } else { "" };
            let _ = write!(out, "{}{}{}{}", indent, view, star, zoom_tag);
            if let Some((_, rect)) = rects.iter().find(|(v, _)| v == view) {
                let _ = write!(
                    out,
                    " @ {:.0},{:.0} {:.0}x{:.0}",
                    rect.x, rect.y, rect.width, rect.height
                );
            }
            out.push('\n');
        }
        Node::Split {
            direction,
            ratio,
            left,
            right,
        } => {
            let name = match direction {
                Direction::Horizontal => "horizontal",
                Direction::Vertical => "vertical",
            };
            let _ = writeln!(out, "{}{} {:.2}{}", indent, name, ratio, zoom_tag);
            render_node(left, depth + 1, rects, focused, zoomed, out);
            render_node(right, depth + 1, rects, focused, zoomed, out);
        }
    }
}
