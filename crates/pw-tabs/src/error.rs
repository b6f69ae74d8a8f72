// ABOUTME: Errors signalled by tab composition.
// ABOUTME: A failed mutation leaves every tab and tree as it was.

use pw_layout::LayoutError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TabError {
    #[error("tab already holds the maximum number of panes")]
    CapacityExceeded,

    #[error(transparent)]
    Layout(#[from] LayoutError),
}
