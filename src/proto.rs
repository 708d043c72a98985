//! The message protocol passed between workspace actors.
//!
//! A [`Message`] is the only thing that crosses a workspace boundary; no
//! workspace ever reaches into another workspace's state directly (see
//! `SPEC_FULL.md` §5, Reentrancy).
use crate::transport::Transport;

/// Destination meaning `whichever workspace owns window {from}`.
pub const BROADCAST: u32 = 0;

/// A message exchanged between workspace actors along the ring.
#[derive(Debug, Clone)]
pub struct Message {
    /// The window (or, for [`MessageKind::Reattach`], the sending workspace)
    /// this message concerns.
    pub from: u32,
    /// The destination workspace id, or [`BROADCAST`].
    pub to: u32,
    pub kind: MessageKind,
    pub transport: Transport,
}

impl Message {
    pub fn new(from: u32, to: u32, kind: MessageKind, transport: Transport) -> Self {
        Self {
            from,
            to,
            kind,
            transport,
        }
    }

    pub fn broadcast(from: u32, kind: MessageKind, transport: Transport) -> Self {
        Self::new(from, BROADCAST, kind, transport)
    }
}

/// The kind of operation a [`Message`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Attach,
    Detach,
    Reattach,
    Remove,
    Close,
    FocusHere,
    FocusLeft,
    FocusRight,
    FocusUp,
    FocusDown,
    Maximize,
    Activate,
    Deactivate,
    ResizeLeft,
    ResizeRight,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Exit,
}
