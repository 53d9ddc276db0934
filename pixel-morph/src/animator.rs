use std::time::Duration;

use crate::easing::Easing;
use crate::interpolate;
use crate::particle::Particle;
use crate::schedule::{FrameHandle, FrameRequest, FrameScheduler, RunId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorState {
    Idle,
    Running(Run),
    Completed(RunId),
    Cancelled(RunId),
}

/// Bookkeeping for the run currently driving the particle buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub id: RunId,
    started_at: Duration,
    duration: Duration,
    /// The single outstanding frame request of this run.
    pending: FrameHandle,
}

/// Per-frame event handed to the renderer.
#[derive(Debug)]
pub struct Frame<'a> {
    pub run: RunId,
    /// Raw time fraction in `[0, 1]`.
    pub t: f32,
    /// Eased progress shared by every particle.
    pub progress: f32,
    /// Set on the terminal frame of a run.
    pub complete: bool,
    pub particles: &'a [Particle],
}

impl Frame<'_> {
    pub fn progress_percent(&self) -> u8 {
        (self.progress * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// Drives matched particles from start to target, one scheduled frame at a time.
///
/// Starting a run always cancels the previous one first, so there is never
/// more than one frame request outstanding.
pub struct ParticleAnimator<S> {
    scheduler: S,
    easing: Easing,
    particles: Vec<Particle>,
    state: AnimatorState,
    next_run: u64,
}

impl<S: FrameScheduler> ParticleAnimator<S> {
    pub fn new(scheduler: S, easing: Easing) -> Self {
        Self {
            scheduler,
            easing,
            particles: Vec::new(),
            state: AnimatorState::Idle,
            next_run: 0,
        }
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, AnimatorState::Running(_))
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Replaces the particle buffer and begins a new run.
    ///
    /// An empty buffer or a zero duration completes on the first frame.
    pub fn start(&mut self, particles: Vec<Particle>, duration: Duration) -> RunId {
        self.cancel();

        let id = RunId(self.next_run);
        self.next_run += 1;
        self.particles = particles;

        let pending = self.scheduler.request_frame(id);
        self.state = AnimatorState::Running(Run {
            id,
            started_at: self.scheduler.now(),
            duration,
            pending,
        });

        tracing::debug!(run = id.0, particles = self.particles.len(), ?duration, "animation started");
        id
    }

    /// Stops the running run, if any. Safe to call in any state.
    pub fn cancel(&mut self) {
        if let AnimatorState::Running(run) = self.state {
            self.scheduler.cancel_frame(run.pending);
            self.state = AnimatorState::Cancelled(run.id);
            tracing::debug!(run = run.id.0, "animation cancelled");
        }
    }

    /// Cancels and drops the particle buffer.
    pub fn reset(&mut self) {
        self.cancel();
        self.particles.clear();
        self.state = AnimatorState::Idle;
    }

    /// Whether `request` belongs to the live run.
    pub fn accepts(&self, request: FrameRequest) -> bool {
        matches!(self.state, AnimatorState::Running(run) if run.id == request.run && run.pending == request.handle)
    }

    /// Frame callback. Requests from cancelled or replaced runs are ignored.
    pub fn on_frame(&mut self, request: FrameRequest) -> Option<Frame<'_>> {
        let run = match self.state {
            AnimatorState::Running(run) if self.accepts(request) => run,
            _ => {
                tracing::trace!(run = request.run.0, "stale frame ignored");
                return None;
            }
        };

        let t = if run.duration.is_zero() || self.particles.is_empty() {
            1.0
        } else {
            let elapsed = self.scheduler.now().saturating_sub(run.started_at);
            (elapsed.as_secs_f64() / run.duration.as_secs_f64()).clamp(0.0, 1.0) as f32
        };

        let progress = (self.easing)(t);
        interpolate::apply(&mut self.particles, progress);

        let complete = t >= 1.0;

        if complete {
            self.state = AnimatorState::Completed(run.id);
            tracing::debug!(run = run.id.0, "animation complete");
        } else {
            let pending = self.scheduler.request_frame(run.id);
            self.state = AnimatorState::Running(Run { pending, ..run });
        }

        Some(Frame {
            run: run.id,
            t,
            progress,
            complete,
            particles: &self.particles,
        })
    }

    /// Fires the next due frame request, if any.
    pub fn pump(&mut self) -> Option<Frame<'_>> {
        while let Some(request) = self.scheduler.next_frame() {
            if self.accepts(request) {
                return self.on_frame(request);
            }

            tracing::trace!(run = request.run.0, "dropping stale frame request");
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::{ease_in_out, linear};
    use crate::schedule::ManualScheduler;

    fn particles() -> Vec<Particle> {
        vec![
            Particle::new([10, 10, 10], (0, 0), (100, 40)),
            Particle::new([20, 20, 20], (30, 60), (10, 0)),
            Particle::new([30, 30, 30], (5, 5), (5, 5)),
        ]
    }

    fn animator() -> (ManualScheduler, ParticleAnimator<ManualScheduler>) {
        let sched = ManualScheduler::new();
        let anim = ParticleAnimator::new(sched.clone(), ease_in_out);
        (sched, anim)
    }

    fn start_positions(ps: &[Particle]) -> Vec<(f32, f32)> {
        ps.iter()
            .map(|p| (f32::from(p.start.0), f32::from(p.start.1)))
            .collect()
    }

    #[test]
    fn first_frame_sits_at_start() {
        let (_sched, mut anim) = animator();
        anim.start(particles(), Duration::from_millis(2000));

        let frame = anim.pump().unwrap();
        assert_eq!(frame.t, 0.0);
        assert!(!frame.complete);

        let currents: Vec<_> = frame.particles.iter().map(|p| p.current).collect();
        assert_eq!(currents, start_positions(&particles()));
    }

    #[test]
    fn halfway_through_is_the_midpoint() {
        let (sched, mut anim) = animator();
        anim.start(particles(), Duration::from_millis(2000));
        sched.advance_ms(1000);

        let frame = anim.pump().unwrap();
        assert_eq!(frame.t, 0.5);
        assert_eq!(frame.progress, 0.5);
        assert_eq!(frame.progress_percent(), 50);

        for p in frame.particles {
            let mid_x = (f32::from(p.start.0) + f32::from(p.target.0)) / 2.0;
            let mid_y = (f32::from(p.start.1) + f32::from(p.target.1)) / 2.0;
            assert_eq!(p.current, (mid_x, mid_y));
        }
    }

    #[test]
    fn completes_at_target_and_stops_scheduling() {
        let (sched, mut anim) = animator();
        let id = anim.start(particles(), Duration::from_millis(2000));
        sched.advance_ms(2500);

        let frame = anim.pump().unwrap();
        assert!(frame.complete);
        assert_eq!(frame.t, 1.0);
        assert_eq!(frame.progress_percent(), 100);

        for p in anim.particles() {
            assert_eq!(p.current, (f32::from(p.target.0), f32::from(p.target.1)));
        }

        assert_eq!(anim.state(), AnimatorState::Completed(id));
        assert!(sched.pending().is_empty());
        assert!(anim.pump().is_none());
    }

    #[test]
    fn frames_are_monotonic_until_done() {
        let (sched, mut anim) = animator();
        anim.start(particles(), Duration::from_millis(1000));

        let mut ts = Vec::new();
        loop {
            let frame = anim.pump().unwrap();
            ts.push(frame.t);
            if frame.complete {
                break;
            }
            assert_eq!(sched.pending().len(), 1);
            sched.advance_ms(100);
        }

        assert_eq!(ts.len(), 11);
        assert!(ts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn restart_leaves_exactly_one_live_run() {
        let (sched, mut anim) = animator();
        let first = anim.start(particles(), Duration::from_millis(2000));
        let second = anim.start(particles(), Duration::from_millis(2000));

        assert_ne!(first, second);
        let pending = sched.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].run, second);

        let frame = anim.pump().unwrap();
        assert_eq!(frame.run, second);
        assert_eq!(sched.pending().len(), 1);
    }

    #[test]
    fn stale_callback_does_not_touch_new_run() {
        let (sched, mut anim) = animator();
        anim.start(particles(), Duration::from_millis(2000));
        let stale = sched.pending()[0];

        anim.cancel();
        let fresh = vec![Particle::new([1, 2, 3], (9, 9), (0, 0))];
        anim.start(fresh.clone(), Duration::from_millis(2000));
        sched.advance_ms(1000);

        assert!(!anim.accepts(stale));
        assert!(anim.on_frame(stale).is_none());
        assert_eq!(anim.particles(), fresh.as_slice());
    }

    #[test]
    fn stale_request_still_queued_is_skipped_by_pump() {
        let sched = ManualScheduler::new();
        let mut anim = ParticleAnimator::new(sched.clone(), linear);
        anim.start(particles(), Duration::from_millis(1000));

        // A request for a run that no longer exists, as if a cancel raced the queue.
        let stale = sched.pending()[0];
        let mut other = sched.clone();
        other.request_frame(stale.run);
        anim.start(particles(), Duration::from_millis(1000));

        let frame = anim.pump().unwrap();
        assert_ne!(frame.run, stale.run);
    }

    #[test]
    fn cancel_is_idempotent_and_silent() {
        let (sched, mut anim) = animator();
        let id = anim.start(particles(), Duration::from_millis(2000));

        anim.cancel();
        anim.cancel();

        assert_eq!(anim.state(), AnimatorState::Cancelled(id));
        assert!(sched.pending().is_empty());
        assert!(anim.pump().is_none());
    }

    #[test]
    fn cancel_from_idle_and_completed_is_a_no_op() {
        let (_sched, mut anim) = animator();
        anim.cancel();
        assert_eq!(anim.state(), AnimatorState::Idle);

        let id = anim.start(Vec::new(), Duration::from_millis(10));
        assert!(anim.pump().unwrap().complete);
        anim.cancel();
        assert_eq!(anim.state(), AnimatorState::Completed(id));
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let (_sched, mut anim) = animator();
        anim.start(particles(), Duration::ZERO);

        let frame = anim.pump().unwrap();
        assert!(frame.complete);
        assert_eq!(frame.progress, 1.0);
    }

    #[test]
    fn cancelled_particles_stay_frozen() {
        let (sched, mut anim) = animator();
        anim.start(particles(), Duration::from_millis(2000));
        sched.advance_ms(500);
        anim.pump().unwrap();
        let frozen = anim.particles().to_vec();

        anim.cancel();
        sched.advance_ms(1000);
        assert!(anim.pump().is_none());
        assert_eq!(anim.particles(), frozen.as_slice());
    }

    #[test]
    fn reset_drops_particles() {
        let (sched, mut anim) = animator();
        anim.start(particles(), Duration::from_millis(2000));

        anim.reset();

        assert_eq!(anim.state(), AnimatorState::Idle);
        assert!(anim.particles().is_empty());
        assert!(sched.pending().is_empty());
    }
}
