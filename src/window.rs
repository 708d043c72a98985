//! A lightweight handle to a client window.
//!
//! A [`Window`] does not own the underlying X window — it is an opaque id,
//! cached geometry, and a pair of endpoints (a channel back into the
//! pipeline, a transport handle) that let user operations on the window be
//! forwarded as [`Message`]s instead of mutating state directly.
use crate::proto::{Message, MessageKind};
use crate::transport::Transport;
use crossbeam_channel::Sender;

#[derive(Debug, Clone)]
pub struct Window {
    pub id: u32,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    mailbox: Sender<Message>,
    pub transport: Transport,
    /// Latch: cleared on workspace deactivation, raised on the first
    /// `Remove` that arrives afterward (which is absorbed rather than
    /// applied), so the second `Remove` is treated as real. See
    /// `SPEC_FULL.md` §3.
    removal_allowed: bool,
}

impl PartialEq for Window {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Window {}

impl Window {
    pub fn new(id: u32, mailbox: Sender<Message>, transport: Transport) -> Self {
        Self {
            id,
            x: 0,
            y: 0,
            w: 0,
            h: 0,
            mailbox,
            transport,
            removal_allowed: true,
        }
    }

    fn send(&self, to: u32, kind: MessageKind) {
        let _ = self
            .mailbox
            .send(Message::new(self.id, to, kind, self.transport.clone()));
    }

    fn broadcast(&self, kind: MessageKind) {
        let _ = self
            .mailbox
            .send(Message::broadcast(self.id, kind, self.transport.clone()));
    }

    pub fn send_attach(&self, to: u32) {
        self.send(to, MessageKind::Attach);
    }

    pub fn send_detach(&self, to: u32) {
        self.send(to, MessageKind::Detach);
    }

    pub fn send_reattach(&self, to: u32) {
        self.send(to, MessageKind::Reattach);
    }

    pub fn send_activate(&self, to: u32) {
        self.send(to, MessageKind::Activate);
    }

    pub fn send_deactivate(&self, to: u32) {
        self.send(to, MessageKind::Deactivate);
    }

    pub fn send_remove(&self) {
        self.broadcast(MessageKind::Remove);
    }

    pub fn send_close(&self, to: u32) {
        self.send(to, MessageKind::Close);
    }

    pub fn send_exit(&self) {
        self.broadcast(MessageKind::Exit);
    }

    pub fn send_focus_here(&self) {
        self.broadcast(MessageKind::FocusHere);
    }

    pub fn send_focus(&self, to: u32, kind: MessageKind) {
        debug_assert!(matches!(
            kind,
            MessageKind::FocusLeft | MessageKind::FocusRight | MessageKind::FocusUp | MessageKind::FocusDown
        ));
        self.send(to, kind);
    }

    pub fn send_resize(&self, to: u32, kind: MessageKind) {
        debug_assert!(matches!(kind, MessageKind::ResizeLeft | MessageKind::ResizeRight));
        self.send(to, kind);
    }

    pub fn send_move(&self, kind: MessageKind) {
        debug_assert!(matches!(
            kind,
            MessageKind::MoveUp | MessageKind::MoveDown | MessageKind::MoveLeft | MessageKind::MoveRight
        ));
        self.broadcast(kind);
    }

    pub fn send_maximize(&self, to: u32) {
        self.send(to, MessageKind::Maximize);
    }

    // --- geometry, applied directly through the transport ---

    pub fn set_x(&mut self, x: i32) {
        self.x = x;
        let _ = self.transport.configure(self.id, self.x, self.y, self.w, self.h);
    }

    pub fn set_y(&mut self, y: i32) {
        self.y = y;
        let _ = self.transport.configure(self.id, self.x, self.y, self.w, self.h);
    }

    pub fn set_width(&mut self, w: i32) {
        self.w = w;
        let _ = self.transport.configure(self.id, self.x, self.y, self.w, self.h);
    }

    pub fn set_height(&mut self, h: i32) {
        self.h = h;
        let _ = self.transport.configure(self.id, self.x, self.y, self.w, self.h);
    }

    // --- latch handling for spurious unmaps ---

    /// Mark this window as "about to be hidden by us", not the client.
    pub fn clear_removal_allowed(&mut self) {
        self.removal_allowed = false;
    }

    /// First call after `clear_removal_allowed` absorbs the spurious remove
    /// and returns `false` (caller should no-op); every later call returns
    /// `true` (a real removal).
    pub fn try_consume_removal(&mut self) -> bool {
        if self.removal_allowed {
            true
        } else {
            self.removal_allowed = true;
            false
        }
    }

    pub fn is_dock(&self) -> bool {
        self.transport.is_dock(self.id)
    }

    pub fn is_manageable(&self) -> bool {
        self.transport.is_manageable(self.id)
    }

    pub fn take_focus(&self) {
        if self.transport.supports_take_focus(self.id) {
            let _ = self.transport.send_take_focus(self.id);
        }
        let _ = self.transport.set_border(self.id, true);
        let _ = self.transport.set_input_focus(self.id);
    }

    pub fn unset_border(&self) {
        let _ = self.transport.set_border(self.id, false);
    }

    pub fn wm_name(&self) -> Option<String> {
        self.transport.wm_name(self.id)
    }
}
