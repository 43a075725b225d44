//! Joinable/detachable real-time worker thread with scheduling priority
//! control and a cooperative cancelability stack.
//!
//! A thread can be stopped from the outside (`stop`, which cancels or waits for a
//! self-detach) or can terminate on its own (entering `PendingJoin` until
//! somebody detaches it). Real-time threads additionally get their
//! scheduling policy bumped and their pages locked in RAM.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use thread_priority::{ThreadPriority, ThreadPriorityValue};

/// Lifecycle state of an [`RtThread`]: not yet started, running, finished
/// and awaiting join, or detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadState {
    NotRunning,
    Running,
    /// The thread function returned on its own; it must be joined or
    /// detached before the handle can be reused.
    PendingJoin,
    Detached,
}

/// Per-thread stack of cancelability flags. A thread must push `false`
/// before acquiring any mutex or calling a blocking operation it would
/// otherwise want to be cancelable at, and pop after releasing it.
thread_local! {
    static CANCEL_STACK: std::cell::RefCell<Vec<bool>> = std::cell::RefCell::new(vec![true]);
}

/// Is the current thread presently cancelable?
pub fn is_cancelable() -> bool {
    CANCEL_STACK.with(|s| *s.borrow().last().unwrap_or(&true))
}

fn push_cancelable(cancel: bool) {
    CANCEL_STACK.with(|s| s.borrow_mut().push(cancel));
}

fn pop_cancelable() {
    CANCEL_STACK.with(|s| {
        let mut stack = s.borrow_mut();
        if stack.len() > 1 {
            stack.pop();
        }
    });
}

/// RAII guard enforcing the push/pop discipline required before taking a
/// mutex on a cancelable thread: construct it to push `false`, drop it to
/// pop. Using the guard instead of calling `push_cancelable`/
/// `pop_cancelable` directly makes it impossible to forget the matching pop
/// if the critical section returns early or panics.
pub struct CancelGuard {
    _private: (),
}

impl CancelGuard {
    #[must_use]
    pub fn enter() -> Self {
        push_cancelable(false);
        Self { _private: () }
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        pop_cancelable();
    }
}

/// Scheduling policy requested for an [`RtThread`].
#[derive(Debug, Clone, Copy)]
pub enum SchedulePolicy {
    /// Plain OS thread, default priority.
    Normal,
    /// Real-time FIFO scheduling with a priority offset from the max
    /// priority available for that policy (clamped to `[min, max]` by the
    /// OS), plus a request to lock the thread's memory pages.
    Fifo { priority_offset_from_max: i8 },
}

/// A thread that can be started, asked to stop cooperatively, and joined
/// or detached depending on which side noticed termination first.
pub struct RtThread {
    name: String,
    policy: SchedulePolicy,
    run_flag: Arc<AtomicBool>,
    handle: Mutex<Option<JoinHandle<()>>>,
    state: Mutex<ThreadState>,
}

impl RtThread {
    pub fn new(name: impl Into<String>, policy: SchedulePolicy) -> Self {
        Self {
            name: name.into(),
            policy,
            run_flag: Arc::new(AtomicBool::new(false)),
            handle: Mutex::new(None),
            state: Mutex::new(ThreadState::NotRunning),
        }
    }

    pub fn state(&self) -> ThreadState {
        *self.state.lock().unwrap()
    }

    /// Spawns the worker. `body` is called once per run; it should loop
    /// while `run` is `true`, checking it at a cadence appropriate for the
    /// thread's purpose.
    pub fn start<F>(&self, body: F)
    where
        F: FnOnce(Arc<AtomicBool>) + Send + 'static,
    {
        self.run_flag.store(true, Ordering::SeqCst);
        *self.state.lock().unwrap() = ThreadState::Running;

        let run_flag = Arc::clone(&self.run_flag);
        let name = self.name.clone();

        let handle = match self.policy {
            SchedulePolicy::Normal => {
                let run_flag = Arc::clone(&run_flag);
                std::thread::Builder::new()
                    .name(name.clone())
                    .spawn(move || body(run_flag))
                    .ok()
            }
            SchedulePolicy::Fifo { priority_offset_from_max } => {
                let priority = priority_from_offset(priority_offset_from_max);
                let log_name = name.clone();
                Some(thread_priority::spawn(ThreadPriority::Crossplatform(priority), move |priority_res| {
                    if let Err(e) = priority_res {
                        log::warn!("RtThread '{log_name}': failed to set real-time priority: {e:?}");
                    }
                    #[cfg(unix)]
                    lock_memory(&log_name);
                    body(run_flag);
                }))
            }
        };

        match handle {
            Some(handle) => *self.handle.lock().unwrap() = Some(handle),
            None => {
                log::error!("RtThread '{}': failed to spawn", self.name);
                *self.state.lock().unwrap() = ThreadState::NotRunning;
            }
        }
    }

    /// Signals the worker to stop and blocks until it has terminated,
    /// joining it if still attached.
    pub fn stop(&self) {
        self.run_flag.store(false, Ordering::SeqCst);

        let handle = self.handle.lock().unwrap().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                log::error!("RtThread '{}': worker thread panicked", self.name);
            }
        }
        *self.state.lock().unwrap() = ThreadState::NotRunning;
    }
}

impl Drop for RtThread {
    fn drop(&mut self) {
        if self.state() == ThreadState::Running {
            self.stop();
        }
    }
}

fn priority_from_offset(offset_from_max: i8) -> ThreadPriorityValue {
    let max = u8::MAX as i16;
    let wanted = max - offset_from_max.max(0) as i16;
    let clamped = wanted.clamp(0, max) as u8;
    ThreadPriorityValue::try_from(clamped).unwrap_or_else(|_| ThreadPriorityValue::try_from(0u8).unwrap())
}

#[cfg(unix)]
fn lock_memory(name: &str) {
    let res = unsafe { libc::mlockall(libc::MCL_CURRENT | libc::MCL_FUTURE) };
    if res != 0 {
        log::warn!("RtThread '{name}': mlockall failed (errno path not pinned to RAM)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[test]
    fn cancel_guard_pushes_and_pops() {
        assert!(is_cancelable());
        {
            let _guard = CancelGuard::enter();
            assert!(!is_cancelable());
        }
        assert!(is_cancelable());
    }

    #[test]
    fn nested_cancel_guards_restore_outer_state() {
        let _outer = CancelGuard::enter();
        assert!(!is_cancelable());
        {
            let _inner = CancelGuard::enter();
            assert!(!is_cancelable());
        }
        assert!(!is_cancelable());
    }

    #[test]
    fn start_then_stop_runs_and_terminates() {
        let thread = RtThread::new("test-worker", SchedulePolicy::Normal);
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);

        thread.start(move |run| {
            while run.load(Ordering::Relaxed) {
                counter_clone.fetch_add(1, Ordering::Relaxed);
                std::thread::sleep(Duration::from_millis(1));
            }
        });

        std::thread::sleep(Duration::from_millis(20));
        thread.stop();

        assert!(counter.load(Ordering::Relaxed) > 0);
        assert_eq!(thread.state(), ThreadState::NotRunning);
    }
}
