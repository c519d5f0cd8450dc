// Frame loop lifecycle against a hand-driven scheduler

use backdrop_engine::frame::{FrameLoop, Phase, Scheduler};

#[derive(Default)]
struct ManualScheduler {
    next_id: i32,
    pending: Vec<i32>,
    cancelled: Vec<i32>,
    refuse: bool,
}

impl ManualScheduler {
    /// Pop the oldest queued frame, as the host would when it fires
    fn fire(&mut self) -> Option<i32> {
        (!self.pending.is_empty()).then(|| self.pending.remove(0))
    }
}

impl Scheduler for ManualScheduler {
    fn request(&mut self) -> Option<i32> {
        if self.refuse {
            return None;
        }
        self.next_id += 1;
        self.pending.push(self.next_id);
        Some(self.next_id)
    }

    fn cancel(&mut self, id: i32) {
        self.pending.retain(|&p| p != id);
        self.cancelled.push(id);
    }
}

/// Run one host frame through the loop; returns whether it stepped
fn pump(lp: &mut FrameLoop, sched: &mut ManualScheduler) -> bool {
    if sched.fire().is_none() {
        return false;
    }
    let stepped = lp.begin_frame();
    lp.end_frame(sched);
    stepped
}

#[test]
fn test_loop_reschedules_every_frame() {
    let mut sched = ManualScheduler::default();
    let mut lp = FrameLoop::new();
    assert!(lp.start(&mut sched));
    for _ in 0..3 {
        assert!(pump(&mut lp, &mut sched));
        assert_eq!(sched.pending.len(), 1);
    }
    assert_eq!(lp.frames(), 3);
    assert!(lp.is_running());
}

#[test]
fn test_teardown_twice_leaves_nothing_pending() {
    let mut sched = ManualScheduler::default();
    let mut lp = FrameLoop::new();
    lp.start(&mut sched);
    pump(&mut lp, &mut sched);

    lp.stop(&mut sched);
    lp.stop(&mut sched);
    assert!(sched.pending.is_empty());
    assert!(!lp.is_scheduled());
    assert_eq!(lp.phase(), Phase::Stopped);
    assert_eq!(sched.cancelled.len(), 1);
}

#[test]
fn test_teardown_before_start_refuses_a_late_start() {
    let mut sched = ManualScheduler::default();
    let mut lp = FrameLoop::new();
    lp.stop(&mut sched);
    assert!(sched.pending.is_empty());

    // Async init finishing after unmount
    assert!(!lp.start(&mut sched));
    assert!(sched.pending.is_empty());
    assert_eq!(lp.phase(), Phase::Stopped);
}

#[test]
fn test_teardown_inside_a_frame_stops_rescheduling() {
    let mut sched = ManualScheduler::default();
    let mut lp = FrameLoop::new();
    lp.start(&mut sched);

    sched.fire();
    assert!(lp.begin_frame());
    lp.stop(&mut sched);
    lp.end_frame(&mut sched);
    assert!(sched.pending.is_empty());
}

#[test]
fn test_stale_callback_after_teardown_does_not_step() {
    let mut sched = ManualScheduler::default();
    let mut lp = FrameLoop::new();
    lp.start(&mut sched);
    lp.stop(&mut sched);
    assert!(!lp.begin_frame());
    assert_eq!(lp.frames(), 0);
}

#[test]
fn test_refused_first_frame_fails_for_good() {
    let mut sched = ManualScheduler { refuse: true, ..Default::default() };
    let mut lp = FrameLoop::new();
    assert!(!lp.start(&mut sched));
    assert_eq!(lp.phase(), Phase::Failed);

    sched.refuse = false;
    assert!(!lp.start(&mut sched));
    lp.stop(&mut sched);
    assert_eq!(lp.phase(), Phase::Stopped);
}

#[test]
fn test_init_failure_is_terminal_but_teardown_is_fine() {
    let mut sched = ManualScheduler::default();
    let mut lp = FrameLoop::new();
    lp.fail();
    assert_eq!(lp.phase(), Phase::Failed);
    assert!(!lp.start(&mut sched));
    lp.stop(&mut sched);
    lp.stop(&mut sched);
    assert!(sched.pending.is_empty());
}

#[test]
fn test_fail_after_teardown_keeps_stopped() {
    let mut sched = ManualScheduler::default();
    let mut lp = FrameLoop::new();
    lp.stop(&mut sched);
    lp.fail();
    assert_eq!(lp.phase(), Phase::Stopped);
}
