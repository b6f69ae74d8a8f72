// ABOUTME: Operations deferred to the next scheduling tick.
// ABOUTME: Covers focus restoration and drags whose payload resolves later.

use std::collections::VecDeque;

use pw_core::ViewId;
use pw_layout::DropZone;

/// Handle for a drop whose dragged view is not known yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DropTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOp {
    RestoreFocus(ViewId),
    ResolveDrop {
        payload: ViewId,
        destination: ViewId,
        zone: DropZone,
    },
}

#[derive(Debug, Default)]
pub(crate) struct PendingQueue {
    ops: VecDeque<PendingOp>,
    awaiting: Vec<(DropTicket, ViewId, DropZone)>,
    next_ticket: u64,
}

impl PendingQueue {
    pub fn push(&mut self, op: PendingOp) {
        self.ops.push_back(op);
    }

    pub fn begin_drop(&mut self, destination: ViewId, zone: DropZone) -> DropTicket {
        let ticket = DropTicket(self.next_ticket);
        self.next_ticket += 1;
        self.awaiting.push((ticket, destination, zone));
        ticket
    }

    /// Queue the drop for `ticket` now that its payload is known. Unknown or
    /// already resolved tickets return false.
    pub fn resolve_drop(&mut self, ticket: DropTicket, payload: ViewId) -> bool {
        let Some(index) = self.awaiting.iter().position(|(t, _, _)| *t == ticket) else {
            return false;
        };
        let (_, destination, zone) = self.awaiting.remove(index);
        self.push(PendingOp::ResolveDrop {
            payload,
            destination,
            zone,
        });
        true
    }

    pub fn abandon_drop(&mut self, ticket: DropTicket) -> bool {
        let before = self.awaiting.len();
        self.awaiting.retain(|(t, _, _)| *t != ticket);
        self.awaiting.len() != before
    }

    /// Take everything queued so far. Ops pushed while these run wait for the
    /// next tick.
    pub fn take_ready(&mut self) -> Vec<PendingOp> {
        self.ops.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }
}
