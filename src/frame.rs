// frame.rs - Frame loop lifecycle
//
// Schedule -> step -> reschedule, until stopped. The browser side plugs
// requestAnimationFrame in through `Scheduler`; everything else here is plain
// bookkeeping so teardown ordering can be checked without a browser.

/// Host primitive for "call me on the next display refresh"
pub trait Scheduler {
    /// Returns the request id, or None if the host refused
    fn request(&mut self) -> Option<i32>;
    fn cancel(&mut self, id: i32);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, first frame not yet requested (async init may be running)
    Idle,
    Running,
    /// Initialization failed, terminal
    Failed,
    /// Torn down, terminal
    Stopped,
}

#[derive(Debug)]
pub struct FrameLoop {
    phase: Phase,
    pending: Option<i32>,
    frames: u64,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        Self { phase: Phase::Idle, pending: None, frames: 0 }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// A frame callback is queued with the host
    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Idle -> Running and queue the first frame. Refused from any other
    /// phase, so an init that finishes after teardown never starts a loop.
    pub fn start(&mut self, sched: &mut impl Scheduler) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.phase = Phase::Running;
        self.pending = sched.request();
        if self.pending.is_none() {
            log::warn!("host refused first animation frame");
            self.phase = Phase::Failed;
            return false;
        }
        true
    }

    /// Called at the top of a frame callback. Returns whether to step.
    pub fn begin_frame(&mut self) -> bool {
        self.pending = None;
        if self.phase != Phase::Running {
            return false;
        }
        self.frames += 1;
        true
    }

    /// Called after the step; queues the next frame while still running.
    pub fn end_frame(&mut self, sched: &mut impl Scheduler) {
        if self.phase == Phase::Running && self.pending.is_none() {
            self.pending = sched.request();
        }
    }

    pub fn fail(&mut self) {
        if self.phase == Phase::Idle {
            self.phase = Phase::Failed;
        }
    }

    /// Cancel whatever is queued and stop for good. Safe to call repeatedly
    /// and from any phase.
    pub fn stop(&mut self, sched: &mut impl Scheduler) {
        if let Some(id) = self.pending.take() {
            sched.cancel(id);
        }
        self.phase = Phase::Stopped;
    }
}
