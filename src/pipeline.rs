//! Builds the ring of workspace actors and tracks which one the user is
//! currently viewing (`SPEC_FULL.md` §4.9).
use crate::geometry::MonitorsInfo;
use crate::proto::{Message, MessageKind};
use crate::transport::Transport;
use crate::workspace::Workspace;
use crate::{DEFAULT_WORKSPACE, MAX_WORKSPACES};
use crossbeam_channel::{unbounded, Sender};
use std::thread::JoinHandle;

/// Owns the spawned workspace threads and the single `mailbox` channel the
/// external adapter writes every [`Message`] to.
pub struct WorkspaceManager {
    current: u32,
    previous: u32,
    mailbox: Sender<Message>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkspaceManager {
    /// Spawn `MaxWorkspaces` workspace actors wired into a linear ring
    /// (`SPEC_FULL.md` §4.9). When `monitors` has a secondary screen, the
    /// last workspace is bound to it permanently as the *special workspace*.
    pub fn new(monitors: MonitorsInfo, name_limit: usize) -> Self {
        let (mailbox, mut input) = unbounded::<Message>();
        let mut handles = Vec::new();

        for id in 1..=(MAX_WORKSPACES - 2) {
            let (next_tx, next_rx) = unbounded();
            let ws = Workspace::new(
                id,
                monitors.primary,
                mailbox.clone(),
                input,
                Some(next_tx),
                false,
                name_limit,
            );
            handles.push(std::thread::spawn(move || ws.run()));
            input = next_rx;
        }

        if monitors.is_dual() {
            let (next_tx, next_rx) = unbounded();
            let ws = Workspace::new(
                MAX_WORKSPACES - 1,
                monitors.primary,
                mailbox.clone(),
                input,
                Some(next_tx),
                false,
                name_limit,
            );
            handles.push(std::thread::spawn(move || ws.run()));

            let secondary = monitors.secondary.expect("is_dual implies secondary is set");
            let special = Workspace::new(MAX_WORKSPACES, secondary, mailbox.clone(), next_rx, None, true, name_limit);
            handles.push(std::thread::spawn(move || special.run()));
        } else {
            let ws = Workspace::new(
                MAX_WORKSPACES - 1,
                monitors.primary,
                mailbox.clone(),
                input,
                None,
                false,
                name_limit,
            );
            handles.push(std::thread::spawn(move || ws.run()));
        }

        Self {
            current: DEFAULT_WORKSPACE,
            previous: DEFAULT_WORKSPACE,
            mailbox,
            handles,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn previous(&self) -> u32 {
        self.previous
    }

    /// A clone of the head channel every [`Window`][crate::window::Window]
    /// handle and the external adapter send through.
    pub fn mailbox(&self) -> Sender<Message> {
        self.mailbox.clone()
    }

    pub fn send(&self, msg: Message) {
        let _ = self.mailbox.send(msg);
    }

    /// `previous` is only updated across a real switch (`SPEC_FULL.md` §4.9).
    pub fn set_curr(&mut self, n: u32) {
        if n != self.current {
            self.previous = self.current;
            self.current = n;
        }
    }

    /// Broadcast `Exit` along the ring and join every workspace thread.
    pub fn shutdown(mut self, transport: Transport) {
        let _ = self.mailbox.send(Message::broadcast(0, MessageKind::Exit, transport));
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Screen;
    use crate::transport::test_support::mock_transport;

    #[test]
    fn set_curr_updates_previous_only_on_real_switch() {
        let mut m = WorkspaceManager::new(MonitorsInfo::single(Screen::new(800, 600, 0)), 20);
        assert_eq!(m.current(), DEFAULT_WORKSPACE);
        m.set_curr(DEFAULT_WORKSPACE);
        assert_eq!(m.previous(), DEFAULT_WORKSPACE);

        m.set_curr(3);
        assert_eq!(m.current(), 3);
        assert_eq!(m.previous(), DEFAULT_WORKSPACE);

        m.set_curr(3);
        assert_eq!(m.previous(), DEFAULT_WORKSPACE, "no-op switch must not touch previous");

        m.shutdown(mock_transport());
    }

    #[test]
    fn single_monitor_spawns_max_workspaces_minus_one_threads() {
        let m = WorkspaceManager::new(MonitorsInfo::single(Screen::new(800, 600, 0)), 20);
        assert_eq!(m.handles.len() as u32, MAX_WORKSPACES - 1);
        m.shutdown(mock_transport());
    }

    #[test]
    fn dual_monitor_spawns_max_workspaces_threads() {
        let m = WorkspaceManager::new(
            MonitorsInfo::dual(Screen::new(800, 600, 0), Screen::new(800, 600, 800)),
            20,
        );
        assert_eq!(m.handles.len() as u32, MAX_WORKSPACES);
        m.shutdown(mock_transport());
    }

    /// End-to-end drive of scenario 6 (`spec.md` §8): a window attached to
    /// workspace 1 is migrated to workspace 2 via the full
    /// Reattach → Detach → unmap → Remove → Attach handshake, across real
    /// threads and real channels.
    #[test]
    fn reattach_migrates_a_window_across_real_workspace_threads() {
        use crate::transport::test_support::recording_transport;
        use crate::window::Window;
        use std::time::Duration;

        let (transport, recorder) = recording_transport();
        let m = WorkspaceManager::new(MonitorsInfo::single(Screen::new(1000, 900, 0)), 20);

        Window::new(100, m.mailbox(), transport.clone()).send_attach(1);
        std::thread::sleep(Duration::from_millis(50));
        assert!(recorder.calls().iter().any(|c| c.starts_with("configure(100")));

        // Adapter-side: ask workspace 2 to take over from workspace 1.
        Window::new(1, m.mailbox(), transport.clone()).send_reattach(2);
        std::thread::sleep(Duration::from_millis(50));
        assert!(
            recorder.calls().iter().any(|c| c == "unmap(100)"),
            "workspace 1 should have unmapped the window as soon as Detach arrived"
        );

        // Adapter observes the UnmapNotify and reports the real removal.
        Window::new(100, m.mailbox(), transport.clone()).send_remove();

        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        let mut arrived = false;
        while std::time::Instant::now() < deadline {
            if recorder
                .calls()
                .iter()
                .filter(|c| c.starts_with("configure(100"))
                .count()
                > 1
            {
                arrived = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(arrived, "window 100 should have been reshaped again after landing on workspace 2");

        m.shutdown(transport);
    }
}
