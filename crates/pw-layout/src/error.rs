// ABOUTME: Errors signalled by split tree operations.
// ABOUTME: Every failure leaves the original tree untouched.

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("anchor pane is not in the tree")]
    AnchorNotFound,

    #[error("pane is already in the tree")]
    DuplicateView,

    #[error("tree has no panes")]
    EmptyTree,
}
