/// Result type used across pixel-morph.
pub type MorphResult<T> = Result<T, MorphError>;

/// Errors raised by sampling, matching and session workflows.
///
/// Every variant is scoped to a single morph invocation. The session that
/// produced it stays usable for the next attempt.
#[derive(thiserror::Error, Debug)]
pub enum MorphError {
    /// Raster is not the square size the sampler was asked for.
    #[error("invalid raster: {width}x{height}, expected {side}x{side}")]
    InvalidRaster { width: u32, height: u32, side: u32 },

    /// Source and target sample lists differ in length.
    #[error("sample count mismatch: {source_len} source vs {target_len} target")]
    LengthMismatch { source_len: usize, target_len: usize },

    /// RGBA buffer length does not match the raster dimensions.
    #[error("invalid rgba buffer: expected {expected} bytes, got {actual}")]
    InvalidBuffer { expected: usize, actual: usize },

    /// A workflow was started before its inputs were loaded.
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    /// One-shot morph already ran or is running; reset first.
    #[error("session is locked until reset")]
    Locked,

    /// Image decoding or IO failure.
    #[error(transparent)]
    Image(#[from] image::ImageError),
}
