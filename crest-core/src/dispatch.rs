use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};

use parking_lot::Mutex;

/// Wakes the UI thread's event loop so it will call [`Dispatcher::drain`].
///
/// Implement this for your frontend's event channel. Wakes may be
/// coalesced: several wakes before one drain resolve in that single drain,
/// and a wake that arrives with an already-empty queue must be harmless.
pub trait MainThreadWaker: Send + Sync + 'static {
    fn wake(&self);
}

/// One deferred unit of work: a diagnostic label plus the job itself.
/// Arguments are captured by the closure at submission time.
struct PendingCallback {
    label: String,
    job: Box<dyn FnOnce() + Send>,
}

/// Hands callbacks from any thread to the UI thread.
///
/// `submit` may be called from anywhere and never blocks beyond a brief
/// queue lock; `drain` must only run on the UI thread, in response to the
/// waker. Each submitted job runs exactly once, in FIFO order per
/// submitting thread (concurrent submitters interleave arbitrarily).
pub struct Dispatcher {
    queue: Mutex<VecDeque<PendingCallback>>,
    waker: Box<dyn MainThreadWaker>,
}

impl Dispatcher {
    pub fn new(waker: impl MainThreadWaker) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            waker: Box::new(waker),
        }
    }

    /// Queue `job` to run later on the UI thread.
    ///
    /// `label` identifies the callback in diagnostics if it panics. The job
    /// cannot be withdrawn once submitted.
    pub fn submit(&self, label: impl Into<String>, job: impl FnOnce() + Send + 'static) {
        self.queue.lock().push_back(PendingCallback {
            label: label.into(),
            job: Box::new(job),
        });
        self.waker.wake();
    }

    /// Run queued callbacks until the queue is empty. UI thread only.
    ///
    /// The lock is released around each job, so a running callback may
    /// submit again and the new job runs in this same drain. A panicking
    /// job is logged and skipped; draining continues. Returns how many
    /// jobs ran.
    pub fn drain(&self) -> usize {
        let mut executed = 0;
        loop {
            let next = self.queue.lock().pop_front();
            let Some(pending) = next else {
                return executed;
            };
            executed += 1;
            if let Err(payload) = catch_unwind(AssertUnwindSafe(pending.job)) {
                let msg = if let Some(s) = payload.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = payload.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic payload".to_string()
                };
                log::error!("deferred callback '{}' failed: {}", pending.label, msg);
            }
        }
    }

    /// Number of callbacks currently waiting.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }
}
