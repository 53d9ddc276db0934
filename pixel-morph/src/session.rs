use std::fmt;

use crate::animator::{Frame, ParticleAnimator};
use crate::config::MorphConfig;
use crate::error::{MorphError, MorphResult};
use crate::matcher;
use crate::particle::Particle;
use crate::raster::Raster;
use crate::sampler;
use crate::schedule::{FrameScheduler, RunId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// A→B morph between two loaded images.
    Upload,
    /// Live morph from a drawing surface onto a target image.
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OneShot {
    Ready,
    Animating(RunId),
    /// Finished; needs `reset` before another morph.
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Live {
    Off,
    Active,
    Stopped,
}

/// Status line shown by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    AwaitingImages,
    SourceLoaded,
    TargetLoaded,
    ReadyToMorph,
    Animating(u8),
    Complete,
    AwaitingDrawTarget,
    DrawTargetLoaded,
    LiveActive,
    LiveStopped,
    Failed(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingImages => f.write_str("Upload both images to begin"),
            Self::SourceLoaded => f.write_str("Image A loaded. Now upload Image B."),
            Self::TargetLoaded => f.write_str("Image B loaded. Now upload Image A."),
            Self::ReadyToMorph => f.write_str("Both images loaded! Click Start Animation to begin."),
            Self::Animating(pct) => write!(f, "Animating... {pct}%"),
            Self::Complete => f.write_str("Animation complete! Click Reset to try again."),
            Self::AwaitingDrawTarget => f.write_str("Draw something and upload a target image"),
            Self::DrawTargetLoaded => f.write_str(
                "Target image loaded! Start drawing and click Start Real-Time Animation.",
            ),
            Self::LiveActive => f.write_str("Real-time mode active! Draw to see pixels rearrange."),
            Self::LiveStopped => f.write_str("Real-time mode stopped."),
            Self::Failed(msg) => write!(f, "Error: {msg}. Please try again."),
        }
    }
}

/// Which session controls are currently usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub start: bool,
    pub reset: bool,
    pub start_live: bool,
    pub stop_live: bool,
}

/// Owns the images, the animator and the workflow state for one morph UI.
///
/// Both workflows share the animator; starting either one cancels whatever
/// run is in flight.
pub struct MorphSession<S> {
    config: MorphConfig,
    animator: ParticleAnimator<S>,
    mode: Mode,
    source: Option<Raster>,
    target: Option<Raster>,
    one_shot: OneShot,
    live_target: Option<Raster>,
    live: Live,
    progress_percent: u8,
    failure: Option<String>,
}

impl<S: FrameScheduler> MorphSession<S> {
    pub fn new(config: MorphConfig, scheduler: S) -> Self {
        let animator = ParticleAnimator::new(scheduler, config.easing);

        Self {
            config,
            animator,
            mode: Mode::Upload,
            source: None,
            target: None,
            one_shot: OneShot::Ready,
            live_target: None,
            live: Live::Off,
            progress_percent: 0,
            failure: None,
        }
    }

    pub fn config(&self) -> &MorphConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn animator(&self) -> &ParticleAnimator<S> {
        &self.animator
    }

    pub fn particles(&self) -> &[Particle] {
        self.animator.particles()
    }

    pub fn is_live(&self) -> bool {
        self.live == Live::Active
    }

    /// Stops every animation, clears the particles and switches the active
    /// workflow.
    pub fn switch_mode(&mut self, mode: Mode) {
        self.animator.reset();

        if let OneShot::Animating(_) = self.one_shot {
            self.one_shot = OneShot::Ready;
        }

        if self.live == Live::Active {
            self.live = Live::Stopped;
        }

        self.progress_percent = 0;
        self.failure = None;
        self.mode = mode;
    }

    // One-shot workflow.

    pub fn load_source(&mut self, raster: Raster) {
        self.source = Some(raster);
        self.failure = None;
    }

    pub fn load_target(&mut self, raster: Raster) {
        self.target = Some(raster);
        self.failure = None;
    }

    /// Matches the loaded images and starts the long A→B morph.
    ///
    /// Allowed once per reset.
    pub fn start_one_shot(&mut self) -> MorphResult<RunId> {
        if self.one_shot != OneShot::Ready {
            return Err(MorphError::Locked);
        }

        let (Some(source), Some(target)) = (&self.source, &self.target) else {
            return Err(MorphError::MissingInput("both images must be loaded"));
        };

        let particles = match rematch(source, target, self.config.side) {
            Ok(particles) => particles,
            Err(err) => return Err(self.abort(err)),
        };

        if self.live == Live::Active {
            self.live = Live::Stopped;
        }

        let id = self
            .animator
            .start(particles, self.config.one_shot_duration);
        self.one_shot = OneShot::Animating(id);
        self.progress_percent = 0;
        self.failure = None;

        Ok(id)
    }

    /// Cancels the morph and drops both images.
    pub fn reset(&mut self) {
        self.animator.reset();
        self.source = None;
        self.target = None;
        self.one_shot = OneShot::Ready;
        self.progress_percent = 0;
        self.failure = None;
    }

    // Live workflow.

    pub fn load_live_target(&mut self, raster: Raster) {
        self.live_target = Some(raster);
        self.failure = None;
    }

    /// Turns live mode on and matches the current drawing once.
    pub fn start_live(&mut self, drawing: &Raster) -> MorphResult<RunId> {
        if self.live_target.is_none() {
            return Err(MorphError::MissingInput("a target image must be loaded"));
        }

        self.live = Live::Active;
        self.rematch_live(drawing)
    }

    /// Re-matches after the drawing changed. Ignored unless live mode is on.
    pub fn source_changed(&mut self, drawing: &Raster) -> MorphResult<Option<RunId>> {
        if self.live != Live::Active {
            return Ok(None);
        }

        self.rematch_live(drawing).map(Some)
    }

    /// Turns live mode off. A running one-shot morph is left alone.
    pub fn stop_live(&mut self) {
        if self.live == Live::Active {
            self.live = Live::Stopped;
        }

        if !self.one_shot_running() {
            self.animator.cancel();
        }
    }

    /// Stops live mode and drops the target image.
    pub fn reset_live(&mut self) {
        if !self.one_shot_running() {
            self.animator.reset();
        }

        self.live = Live::Off;
        self.live_target = None;
        self.failure = None;
    }

    fn one_shot_running(&self) -> bool {
        matches!(self.one_shot, OneShot::Animating(_))
    }

    fn rematch_live(&mut self, drawing: &Raster) -> MorphResult<RunId> {
        self.animator.cancel();

        let Some(target) = &self.live_target else {
            return Err(self.abort(MorphError::MissingInput("a target image must be loaded")));
        };

        let particles = match rematch(drawing, target, self.config.side) {
            Ok(particles) => particles,
            Err(err) => return Err(self.abort(err)),
        };

        if let OneShot::Animating(_) = self.one_shot {
            self.one_shot = OneShot::Ready;
        }

        tracing::debug!(particles = particles.len(), "live re-match");
        self.failure = None;
        Ok(self.animator.start(particles, self.config.live_duration))
    }

    /// Cancels the in-flight run and records the failure for the status line.
    fn abort(&mut self, err: MorphError) -> MorphError {
        tracing::warn!(error = %err, "morph aborted");
        self.animator.cancel();

        if let OneShot::Animating(_) = self.one_shot {
            self.one_shot = OneShot::Ready;
        }

        self.failure = Some(err.to_string());
        err
    }

    // Driving loop.

    /// Fires the next due frame, updating progress and the one-shot lock.
    pub fn pump(&mut self) -> Option<Frame<'_>> {
        let frame = self.animator.pump()?;

        if let OneShot::Animating(id) = self.one_shot {
            if frame.run == id {
                self.progress_percent = frame.progress_percent();

                if frame.complete {
                    self.one_shot = OneShot::Locked;
                }
            }
        }

        Some(frame)
    }

    pub fn status(&self) -> Status {
        if let Some(msg) = &self.failure {
            return Status::Failed(msg.clone());
        }

        match self.mode {
            Mode::Upload => match (self.one_shot, &self.source, &self.target) {
                (OneShot::Animating(_), _, _) => Status::Animating(self.progress_percent),
                (OneShot::Locked, _, _) => Status::Complete,
                (OneShot::Ready, Some(_), Some(_)) => Status::ReadyToMorph,
                (OneShot::Ready, Some(_), None) => Status::SourceLoaded,
                (OneShot::Ready, None, Some(_)) => Status::TargetLoaded,
                (OneShot::Ready, None, None) => Status::AwaitingImages,
            },
            Mode::Draw => match (self.live, &self.live_target) {
                (Live::Active, _) => Status::LiveActive,
                (Live::Stopped, _) => Status::LiveStopped,
                (Live::Off, Some(_)) => Status::DrawTargetLoaded,
                (Live::Off, None) => Status::AwaitingDrawTarget,
            },
        }
    }

    pub fn controls(&self) -> Controls {
        Controls {
            start: self.one_shot == OneShot::Ready && self.source.is_some() && self.target.is_some(),
            reset: true,
            start_live: self.live_target.is_some() && self.live != Live::Active,
            stop_live: self.live == Live::Active,
        }
    }
}

fn rematch(source: &Raster, target: &Raster, side: u32) -> MorphResult<Vec<Particle>> {
    let src = sampler::sample(source, side)?;
    let dst = sampler::sample(target, side)?;
    matcher::match_samples(&src, &dst)
}
