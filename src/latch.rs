//! A one-shot, idempotent-release gate.
//!
//! `unmapLock`/`attachLock` in `SPEC_FULL.md` §4.10 are "waitgroup-style":
//! `lock()` blocks the caller until raised, `unlock()` releases the latch if
//! it was raised and is otherwise a no-op. This sequences the
//! unmap → remove → attach handoff between two workspace actors without a
//! shared-memory race (Design Notes, §9).
use std::sync::{Condvar, Mutex};

#[derive(Debug, Default)]
pub struct Latch {
    raised: Mutex<bool>,
    cond: Condvar,
}

impl Latch {
    pub fn new() -> Self {
        Self {
            raised: Mutex::new(false),
            cond: Condvar::new(),
        }
    }

    /// Raise the gate, unblocking any waiter. Safe to call from either side.
    pub fn raise(&self) {
        let mut raised = self.raised.lock().unwrap();
        *raised = true;
        self.cond.notify_all();
    }

    /// Block until the gate is raised, then lower it again.
    pub fn wait(&self) {
        let mut raised = self.raised.lock().unwrap();
        while !*raised {
            raised = self.cond.wait(raised).unwrap();
        }
        *raised = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn wait_blocks_until_raised() {
        let latch = Arc::new(Latch::new());
        let waiter = latch.clone();
        let handle = std::thread::spawn(move || {
            waiter.wait();
        });

        std::thread::sleep(Duration::from_millis(20));
        assert!(!handle.is_finished());

        latch.raise();
        handle.join().unwrap();
    }

    #[test]
    fn raise_before_wait_does_not_block() {
        let latch = Latch::new();
        latch.raise();
        latch.wait();
    }
}
