//! Pixel-particle morphing: every source pixel travels to the target pixel of
//! equal brightness rank, along an eased straight line.

pub mod animator;
pub mod canvas;
pub mod config;
pub mod easing;
pub mod error;
pub mod interpolate;
pub mod matcher;
pub mod particle;
pub mod raster;
pub mod sampler;
pub mod schedule;
pub mod session;
pub mod view;

pub use animator::{AnimatorState, Frame, ParticleAnimator};
pub use canvas::{Brush, Canvas};
pub use config::{DEFAULT_SIDE, MorphConfig};
pub use error::{MorphError, MorphResult};
pub use particle::Particle;
pub use raster::Raster;
pub use sampler::Sample;
pub use schedule::{FrameScheduler, IntervalScheduler, ManualScheduler, RunId};
pub use session::{Controls, Mode, MorphSession, Status};
pub use view::{ParticleView, RasterView};
