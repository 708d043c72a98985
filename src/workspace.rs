//! The workspace actor: owns three [`Column`]s and a slice of the message
//! ring, and is the only thing that ever mutates them.
//!
//! A `Workspace` runs on its own OS thread (`SPEC_FULL.md` §5). It never
//! reaches into a sibling workspace's state — every cross-workspace effect
//! goes out as a [`Message`], either forwarded along `next` or looped back
//! to itself through `head`.
use crate::column::Column;
use crate::geometry::Screen;
use crate::layout::{arrange, Arrangement, Layout};
use crate::proto::{Message, MessageKind, BROADCAST};
use crate::transport::Transport;
use crate::window::Window;
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;

use crate::latch::Latch;

pub struct Workspace {
    pub id: u32,
    left: Column,
    central: Column,
    right: Column,
    layout: Layout,
    focus: Option<u32>,
    transport: Option<Transport>,
    /// Whether this is the screen-spanning workspace reserved for a second
    /// monitor (`SPEC_FULL.md` §4.9) — windows attached here are activated
    /// immediately instead of waiting for a `SetCurr` switch.
    special: bool,
    name_limit: usize,

    head: Sender<Message>,
    input: Receiver<Message>,
    next: Option<Sender<Message>>,

    unmap_lock: Arc<Latch>,
    attach_lock: Arc<Latch>,
}

impl Workspace {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u32,
        screen: Screen,
        head: Sender<Message>,
        input: Receiver<Message>,
        next: Option<Sender<Message>>,
        special: bool,
        name_limit: usize,
    ) -> Self {
        Self {
            id,
            left: Column::new(screen),
            central: Column::new(screen),
            right: Column::new(screen),
            layout: Layout::Full,
            focus: None,
            transport: None,
            special,
            name_limit,
            head,
            input,
            next,
            unmap_lock: Arc::new(Latch::new()),
            attach_lock: Arc::new(Latch::new()),
        }
    }

    /// Drain the input channel until it closes. Consumes `self` so it can be
    /// moved wholesale onto the thread the pipeline spawns it on.
    pub fn run(mut self) {
        while let Ok(msg) = self.input.recv() {
            if self.transport.is_none() {
                self.transport = Some(msg.transport.clone());
            }

            if msg.to == BROADCAST {
                if msg.kind == MessageKind::Exit {
                    if let Some(next) = &self.next {
                        let _ = next.send(msg);
                    }
                    return;
                }
                self.clean_up();
                if self.find_window(msg.from).is_some() {
                    self.handle(msg);
                } else if let Some(next) = &self.next {
                    let _ = next.send(msg);
                }
            } else if msg.to == self.id {
                self.clean_up();
                self.handle(msg);
            } else if let Some(next) = &self.next {
                let _ = next.send(msg);
            }
        }
    }

    /// Sweep windows the display server already tore down behind our back
    /// (`SPEC_FULL.md` §4.2, "CleanUp").
    fn clean_up(&mut self) {
        let dead: Vec<u32> = self
            .central
            .iter()
            .chain(self.left.iter())
            .chain(self.right.iter())
            .filter(|w| !w.is_manageable())
            .map(|w| w.id)
            .collect();
        if dead.is_empty() {
            return;
        }
        for id in dead {
            if self.focus == Some(id) {
                self.refocus();
            }
            self.remove_window(id);
            self.reshape();
        }
        self.focus_visuals();
    }

    fn handle(&mut self, msg: Message) {
        use MessageKind::*;
        tracing::trace!(workspace = self.id, from = msg.from, to = msg.to, kind = ?msg.kind, "handling message");
        match msg.kind {
            Attach => self.handle_attach(msg.from, msg.transport.clone()),
            Detach => self.handle_detach(msg.from),
            Reattach => self.handle_reattach(msg.from),
            Remove => self.handle_remove(msg.from),
            Close => self.handle_close(),
            FocusHere => self.handle_focus_here(msg.from),
            FocusLeft => {
                let t = self.focus_left_target();
                self.apply_focus_move(t);
            }
            FocusRight => {
                let t = self.focus_right_target();
                self.apply_focus_move(t);
            }
            FocusUp => {
                let t = self.focus_up_target();
                self.apply_focus_move(t);
            }
            FocusDown => {
                let t = self.focus_down_target();
                self.apply_focus_move(t);
            }
            Maximize => self.handle_maximize(),
            Activate => {
                self.activate_columns();
                if let Some(transport) = self.transport.clone() {
                    let _ = transport.set_current_desktop(self.id);
                }
            }
            Deactivate => self.handle_deactivate(),
            ResizeLeft => {
                self.resize_left(msg.from);
                self.focus_visuals();
            }
            ResizeRight => {
                self.resize_right(msg.from);
                self.focus_visuals();
            }
            MoveUp => {
                self.move_up(msg.from);
                self.reshape();
                self.focus_visuals();
            }
            MoveDown => {
                self.move_down(msg.from);
                self.reshape();
                self.focus_visuals();
            }
            MoveLeft => {
                self.move_left(msg.from);
                self.reshape();
                self.focus_visuals();
            }
            MoveRight => {
                self.move_right(msg.from);
                self.reshape();
                self.focus_visuals();
            }
            Exit => {}
        }
        tracing::trace!(workspace = self.id, focus = ?self.focus, "handled message");
        self.update_desktop_name();
    }

    // --- lookups ---

    /// Central, then left, then right — matches the precedence a window id
    /// can only ever occupy one column under anyway, but central is checked
    /// first since it's the common case (single-window workspace).
    fn find_window(&self, id: u32) -> Option<&Window> {
        self.central
            .iter()
            .find(|w| w.id == id)
            .or_else(|| self.left.iter().find(|w| w.id == id))
            .or_else(|| self.right.iter().find(|w| w.id == id))
    }

    // --- Attach / Detach / Reattach ---

    fn handle_attach(&mut self, from: u32, transport: Transport) {
        let window = Window::new(from, self.head.clone(), transport);
        if window.is_dock() {
            let _ = window.transport.map(from);
            return;
        }
        if self.find_window(from).is_some() {
            return;
        }
        self.add_window(window);
        self.reshape();
        self.focus_visuals();
        if self.special {
            self.activate_columns();
        }
    }

    /// `msg.from` identifies the workspace the focused window should move
    /// to next (it was set to that workspace's own id when it sent us the
    /// `Detach`, see [`Workspace::handle_reattach`]).
    fn handle_detach(&mut self, target: u32) {
        let Some(focus_id) = self.focus else {
            return;
        };
        let Some(transport) = self.transport.clone() else {
            return;
        };

        let head = self.head.clone();
        let unmap_lock = self.unmap_lock.clone();
        let attach_lock = self.attach_lock.clone();
        std::thread::spawn(move || {
            unmap_lock.wait();
            let _ = head.send(Message::new(focus_id, target, MessageKind::Attach, transport));
            attach_lock.raise();
        });

        if let Some(w) = self.find_window(focus_id) {
            let _ = w.transport.unmap(focus_id);
        }
    }

    /// Sent by the external adapter to the workspace taking ownership. We
    /// identify ourselves as the sender (`from = self.id`) and ask the
    /// previous owner to hand the window over.
    fn handle_reattach(&mut self, previous_owner: u32) {
        let Some(transport) = self.transport.clone() else {
            return;
        };
        let handle = Window::new(self.id, self.head.clone(), transport);
        std::thread::spawn(move || {
            handle.send_detach(previous_owner);
        });
    }

    // --- Remove / Close ---

    fn handle_remove(&mut self, from: u32) {
        let Some(win) = self.find_window_mut(from) else {
            return;
        };
        if !win.try_consume_removal() {
            return;
        }

        if self.focus == Some(from) {
            if let Some(w) = self.find_window(from) {
                w.unset_border();
            }
            self.refocus();
        }
        self.remove_window(from);
        self.reshape();
        self.focus_visuals();
        self.unmap_lock.raise();
    }

    fn handle_close(&mut self) {
        let Some(focus_id) = self.focus else {
            return;
        };
        let Some(win) = self.find_window(focus_id) else {
            return;
        };
        if win.transport.supports_wm_delete(focus_id) {
            let _ = win.transport.send_delete(focus_id);
            return;
        }
        let transport = win.transport.clone();
        self.refocus();
        self.remove_window(focus_id);
        self.reshape();
        self.focus_visuals();
        let _ = transport.destroy(focus_id);
    }

    fn find_window_mut(&mut self, id: u32) -> Option<&mut Window> {
        if self.central.index_by_id(id).is_some() {
            return self.central.window_by_index_mut(self.central.index_by_id(id).unwrap());
        }
        if self.left.index_by_id(id).is_some() {
            return self.left.window_by_index_mut(self.left.index_by_id(id).unwrap());
        }
        if self.right.index_by_id(id).is_some() {
            return self.right.window_by_index_mut(self.right.index_by_id(id).unwrap());
        }
        None
    }

    // --- layout-affecting algorithms (`SPEC_FULL.md` §4.3) ---

    fn add_window(&mut self, w: Window) {
        let left_empty = self.left.is_empty();
        let right_empty = self.right.is_empty();
        let central_empty = self.central.is_empty();

        if left_empty && right_empty && central_empty {
            self.focus = Some(w.id);
            self.central.add(w);
            self.layout = Layout::Full;
            return;
        }

        if self.layout == Layout::Full {
            self.layout = Layout::Equal;
        }

        if !central_empty {
            if let Some(c) = self.central.remove_by_index(0) {
                self.left.add(c);
            }
        }
        self.right.add(w);
    }

    /// Remove `id` wherever it is, rebalancing left/right so the invariant
    /// `left.is_empty() == right.is_empty()` holds afterward. Counts are
    /// captured once up front, matching the handoff semantics this mirrors
    /// (`SPEC_FULL.md` §4.3).
    fn remove_window(&mut self, id: u32) -> Option<Window> {
        let in_central = self.central.index_by_id(id).is_some();
        let in_left = !in_central && self.left.index_by_id(id).is_some();
        let in_right = !in_central && !in_left && self.right.index_by_id(id).is_some();

        let nleft = self.left.len();
        let nright = self.right.len();

        if in_left && nleft == 1 && nright == 1 {
            if let Some(w) = self.right.remove_by_index(0) {
                self.central.add(w);
            }
            self.layout = Layout::Full;
        }
        if in_right && nright == 1 && nleft == 1 {
            if let Some(w) = self.left.remove_by_index(0) {
                self.central.add(w);
            }
            self.layout = Layout::Full;
        }
        if in_left && nleft == 1 && nright > 1 {
            if let Some(w) = self.right.remove_by_index(0) {
                self.left.add(w);
            }
        }
        if in_right && nright == 1 && nleft > 1 {
            if let Some(w) = self.left.remove_by_index(0) {
                self.right.add(w);
            }
        }

        if in_central {
            self.focus = None;
            self.layout = Layout::Full;
            self.central.remove(id)
        } else if in_right {
            self.right.remove(id)
        } else {
            self.left.remove(id)
        }
    }

    // --- reshape / focus visuals (`SPEC_FULL.md` §4.4, §4.5) ---

    pub fn reshape(&mut self) {
        match arrange(self.layout, !self.central.is_empty()) {
            Arrangement::CentralFull => {
                self.central.set_x(0);
                self.central.set_width_100();
            }
            Arrangement::Equal => {
                self.left.set_x(0);
                self.left.set_width_50();
                let w = self.left.width;
                self.right.set_x(w);
                self.right.set_width_50();
            }
            Arrangement::LeftWide => {
                self.left.set_x(0);
                self.left.set_width_65();
                let w = self.left.width;
                self.right.set_x(w);
                self.right.set_width_35();
            }
        }
        self.central.reshape();
        self.left.reshape();
        self.right.reshape();
    }

    /// Apply take-focus visuals to whatever `self.focus` currently is.
    fn focus_visuals(&mut self) {
        let central_occupied = !self.central.is_empty();
        if let Some(id) = self.focus {
            if let Some(w) = self.find_window(id) {
                w.take_focus();
                if central_occupied {
                    w.unset_border();
                }
            }
        }
    }

    fn apply_focus_move(&mut self, target: Option<u32>) {
        let Some(new_focus) = target else {
            return;
        };
        if let Some(old) = self.focus {
            if let Some(w) = self.find_window(old) {
                w.unset_border();
            }
        }
        self.focus = Some(new_focus);
        self.focus_visuals();
    }

    fn refocus(&mut self) {
        let Some(current) = self.focus else {
            return;
        };
        for candidate in [
            self.focus_down_target(),
            self.focus_up_target(),
            self.focus_left_target(),
            self.focus_right_target(),
        ] {
            if let Some(c) = candidate {
                if c != current {
                    self.focus = Some(c);
                    return;
                }
            }
        }
        self.focus = None;
    }

    // --- focus ring algorithms (`SPEC_FULL.md` §4.5) ---

    fn focus_down_target(&self) -> Option<u32> {
        let focus = self.focus?;
        if self.central.index_by_id(focus).is_some() {
            return Some(focus);
        }
        if let Some(idx) = self.left.index_by_id(focus) {
            return Some(
                self.left
                    .window_by_index(idx + 1)
                    .map(|w| w.id)
                    .unwrap_or(focus),
            );
        }
        if let Some(idx) = self.right.index_by_id(focus) {
            return Some(
                self.right
                    .window_by_index(idx + 1)
                    .map(|w| w.id)
                    .unwrap_or(focus),
            );
        }
        Some(focus)
    }

    fn focus_up_target(&self) -> Option<u32> {
        let focus = self.focus?;
        if self.central.index_by_id(focus).is_some() {
            return Some(focus);
        }
        if let Some(idx) = self.left.index_by_id(focus) {
            if idx == 0 {
                return Some(focus);
            }
            return Some(self.left.window_by_index(idx - 1).map(|w| w.id).unwrap_or(focus));
        }
        if let Some(idx) = self.right.index_by_id(focus) {
            if idx == 0 {
                return Some(focus);
            }
            return Some(self.right.window_by_index(idx - 1).map(|w| w.id).unwrap_or(focus));
        }
        Some(focus)
    }

    fn focus_left_target(&self) -> Option<u32> {
        let focus = self.focus?;
        if self.central.index_by_id(focus).is_some() {
            return Some(focus);
        }
        if self.left.index_by_id(focus).is_some() {
            return Some(focus);
        }
        // must be in right
        Some(self.left.window_by_index(0).map(|w| w.id).unwrap_or(focus))
    }

    fn focus_right_target(&self) -> Option<u32> {
        let focus = self.focus?;
        if self.central.index_by_id(focus).is_some() {
            return Some(focus);
        }
        if self.right.index_by_id(focus).is_some() {
            return Some(focus);
        }
        // must be in left
        Some(self.right.window_by_index(0).map(|w| w.id).unwrap_or(focus))
    }

    fn handle_focus_here(&mut self, from: u32) {
        if self.focus == Some(from) {
            return;
        }
        if self.find_window(from).is_none() {
            return;
        }
        self.apply_focus_move(Some(from));
    }

    // --- Maximize / Activate / Deactivate ---

    fn handle_maximize(&mut self) {
        if self.central.fullscreen {
            self.central.add_padding();
        } else {
            self.central.remove_padding();
        }
        self.activate_columns();
    }

    fn activate_columns(&mut self) {
        self.reshape();
        for w in self.central.iter().chain(self.left.iter()).chain(self.right.iter()) {
            let _ = w.transport.map(w.id);
        }
        self.focus_visuals();
    }

    fn handle_deactivate(&mut self) {
        if self.special {
            return;
        }
        for w in self
            .central
            .iter_mut()
            .chain(self.left.iter_mut())
            .chain(self.right.iter_mut())
        {
            w.clear_removal_allowed();
            let _ = w.transport.unmap(w.id);
        }
    }

    // --- Resize / Move (`SPEC_FULL.md` §4.6, §4.7) ---

    fn resize_right(&mut self, from: u32) {
        if self.layout != Layout::Equal {
            return;
        }
        if self.left.index_by_id(from).is_some() || self.right.index_by_id(from).is_some() {
            self.layout = Layout::LeftWide;
            self.reshape();
        }
    }

    fn resize_left(&mut self, from: u32) {
        if self.layout != Layout::LeftWide {
            return;
        }
        if self.left.index_by_id(from).is_some() || self.right.index_by_id(from).is_some() {
            self.layout = Layout::Equal;
            self.reshape();
        }
    }

    fn move_left(&mut self, wid: u32) {
        if self.right.index_by_id(wid).is_some() && self.right.len() > 1 {
            if let Some(w) = self.right.remove(wid) {
                self.left.add(w);
            }
        }
    }

    fn move_right(&mut self, wid: u32) {
        if self.left.index_by_id(wid).is_some() && self.left.len() > 1 {
            if let Some(w) = self.left.remove(wid) {
                self.right.add(w);
            }
        }
    }

    fn move_up(&mut self, wid: u32) {
        if let Some(idx) = self.left.index_by_id(wid) {
            if idx > 0 {
                let _ = self.left.swap(idx, idx - 1);
            }
            return;
        }
        if let Some(idx) = self.right.index_by_id(wid) {
            if idx > 0 {
                let _ = self.right.swap(idx, idx - 1);
            }
        }
    }

    fn move_down(&mut self, wid: u32) {
        if let Some(idx) = self.left.index_by_id(wid) {
            if idx + 1 < self.left.len() {
                let _ = self.left.swap(idx, idx + 1);
            }
            return;
        }
        if let Some(idx) = self.right.index_by_id(wid) {
            if idx + 1 < self.right.len() {
                let _ = self.right.swap(idx, idx + 1);
            }
        }
    }

    // --- EWMH desktop naming (`SPEC_FULL.md` §4.8) ---

    fn update_desktop_name(&mut self) {
        let Some(transport) = self.transport.clone() else {
            return;
        };

        let repr = match self.focus {
            None => self.id.to_string(),
            Some(focus_id) => {
                let n = self.central.len() + self.left.len() + self.right.len();
                let name = self
                    .find_window(focus_id)
                    .and_then(|w| w.wm_name())
                    .unwrap_or_default();
                let truncated: String = name.chars().take(self.name_limit).collect();
                if n <= 1 {
                    format!("{}:{}", self.id, truncated)
                } else {
                    format!("{}:{}({})", self.id, truncated, n)
                }
            }
        };

        let mut names = transport.desktop_names(crate::MAX_WORKSPACES as usize);
        let idx = (self.id - 1) as usize;
        if idx < names.len() {
            names[idx] = repr;
            let _ = transport.set_desktop_names(&names);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::test_support::mock_transport;
    use crossbeam_channel::unbounded;

    fn workspace(id: u32, special: bool) -> (Workspace, Sender<Message>, Receiver<Message>) {
        let (head_tx, head_rx) = unbounded();
        let (input_tx, input_rx) = unbounded();
        let ws = Workspace::new(id, Screen::new(1000, 900, 0), head_tx, input_rx, None, special, 20);
        (ws, input_tx, head_rx)
    }

    fn attach(ws: &mut Workspace, id: u32) {
        let transport = mock_transport();
        if ws.transport.is_none() {
            ws.transport = Some(transport.clone());
        }
        ws.handle(Message::new(id, ws.id, MessageKind::Attach, transport));
    }

    #[test]
    fn first_three_attaches_populate_central_then_left_then_right() {
        let (mut ws, _tx, _rx) = workspace(1, false);
        attach(&mut ws, 1);
        assert_eq!(ws.central.len(), 1);
        assert!(ws.left.is_empty());
        assert!(ws.right.is_empty());
        assert_eq!(ws.focus, Some(1));

        attach(&mut ws, 2);
        assert!(ws.central.is_empty());
        assert_eq!(ws.left.len(), 1);
        assert_eq!(ws.right.len(), 1);

        attach(&mut ws, 3);
        assert_eq!(ws.left.len(), 1);
        assert_eq!(ws.right.len(), 2);
    }

    #[test]
    fn removing_last_right_window_rebalances_the_lone_left_window_to_central() {
        let (mut ws, _tx, _rx) = workspace(1, false);
        attach(&mut ws, 1);
        attach(&mut ws, 2);
        ws.handle_remove(2);
        assert_eq!(ws.central.len(), 1);
        assert!(ws.left.is_empty());
        assert!(ws.right.is_empty());
        assert_eq!(ws.layout, Layout::Full);
    }

    #[test]
    fn focus_here_switches_focus_to_hovered_window() {
        let (mut ws, _tx, _rx) = workspace(1, false);
        attach(&mut ws, 1);
        attach(&mut ws, 2);
        attach(&mut ws, 3);
        assert_eq!(ws.focus, Some(1));
        ws.handle_focus_here(3);
        assert_eq!(ws.focus, Some(3));
    }

    #[test]
    fn focus_here_for_unknown_window_is_a_noop() {
        let (mut ws, _tx, _rx) = workspace(1, false);
        attach(&mut ws, 1);
        ws.handle_focus_here(404);
        assert_eq!(ws.focus, Some(1));
    }

    #[test]
    fn a_spurious_remove_after_deactivate_is_absorbed() {
        let (mut ws, _tx, _rx) = workspace(1, false);
        attach(&mut ws, 1);
        ws.handle_deactivate();
        ws.handle_remove(1);
        assert_eq!(ws.central.len(), 1, "first remove after deactivate must be absorbed");
        ws.handle_remove(1);
        assert!(ws.central.is_empty(), "second remove is the real one");
    }

    #[test]
    fn clean_up_refocuses_away_from_a_dead_window_that_was_focused() {
        use crate::transport::test_support::recording_transport;

        let (mut ws, _tx, _rx) = workspace(1, false);
        let (transport, recorder) = recording_transport();
        ws.transport = Some(transport.clone());
        ws.handle(Message::new(1, ws.id, MessageKind::Attach, transport.clone()));
        ws.handle(Message::new(2, ws.id, MessageKind::Attach, transport.clone()));
        assert_eq!(ws.focus, Some(1));

        recorder.mark_unmanageable(1);
        ws.clean_up();

        assert_eq!(ws.find_window(1), None, "dead window must be gone");
        assert_ne!(ws.focus, Some(1), "focus must move off a window CleanUp just removed");
        if let Some(id) = ws.focus {
            assert!(ws.find_window(id).is_some(), "focus must always resolve to a real window");
        }
    }

    #[test]
    fn remove_from_right_front_migrates_next_right_window_into_left() {
        let (mut ws, _tx, _rx) = workspace(1, false);
        attach(&mut ws, 1);
        attach(&mut ws, 2);
        attach(&mut ws, 3);
        assert_eq!(ws.left.len(), 1);
        assert_eq!(ws.right.len(), 2);

        ws.handle_remove(2);

        assert!(ws.central.is_empty());
        assert_eq!(ws.left.iter().map(|w| w.id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(ws.right.iter().map(|w| w.id).collect::<Vec<_>>(), vec![3]);
        assert_eq!(ws.layout, Layout::Equal);
    }

    #[test]
    fn focus_ring_walks_right_then_down_then_clamps_then_left() {
        let (mut ws, _tx, _rx) = workspace(1, false);
        let transport = mock_transport();
        ws.transport = Some(transport.clone());
        for id in [1, 2] {
            ws.left.add(Window::new(id, ws.head.clone(), transport.clone()));
        }
        for id in [3, 4] {
            ws.right.add(Window::new(id, ws.head.clone(), transport.clone()));
        }
        ws.focus = Some(1);

        let t = ws.focus_right_target();
        ws.apply_focus_move(t);
        assert_eq!(ws.focus, Some(3), "FocusRight from left's top window lands on right's first window");

        let t = ws.focus_down_target();
        ws.apply_focus_move(t);
        assert_eq!(ws.focus, Some(4), "FocusDown walks to the next window in the same column");

        let t = ws.focus_down_target();
        ws.apply_focus_move(t);
        assert_eq!(ws.focus, Some(4), "FocusDown at the bottom of a column clamps");

        let t = ws.focus_left_target();
        ws.apply_focus_move(t);
        assert_eq!(ws.focus, Some(1), "FocusLeft from right lands on left's first window");
    }

    #[test]
    fn detach_unmaps_the_focus_window_and_waits_for_unmap_lock_before_attaching() {
        let (mut ws, _tx, head_rx) = workspace(1, false);
        attach(&mut ws, 1);
        ws.handle_detach(2);

        assert!(
            head_rx.recv_timeout(std::time::Duration::from_millis(50)).is_err(),
            "Attach must not be sent before unmap_lock is released"
        );

        ws.unmap_lock.raise();
        let msg = head_rx.recv_timeout(std::time::Duration::from_secs(1)).unwrap();
        assert_eq!(msg.kind, MessageKind::Attach);
        assert_eq!(msg.from, 1);
        assert_eq!(msg.to, 2);
    }
}
