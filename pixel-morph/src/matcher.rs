use crate::error::{MorphError, MorphResult};
use crate::particle::Particle;
use crate::sampler::Sample;

/// NTSC luma. Not rounded.
pub fn brightness(r: u8, g: u8, b: u8) -> f32 {
    0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b)
}

/// Pairs source and target samples by brightness rank.
///
/// Both lists are sorted ascending by [`brightness`] and the i-th source is
/// sent to the i-th target position, keeping the source color. The sort is
/// stable, so equal-brightness samples keep their input order; for sampler
/// output that means ties resolve by ascending `(y, x)`.
///
/// Lists must be the same length.
#[tracing::instrument(skip_all, fields(n = src.len()))]
pub fn match_samples(src: &[Sample], dst: &[Sample]) -> MorphResult<Vec<Particle>> {
    if src.len() != dst.len() {
        return Err(MorphError::LengthMismatch {
            source_len: src.len(),
            target_len: dst.len(),
        });
    }

    let src_ranked = rank(src);
    let dst_ranked = rank(dst);

    let particles = src_ranked
        .into_iter()
        .zip(dst_ranked)
        .map(|(s, d)| Particle::new(s.rgb(), (s.x, s.y), (d.x, d.y)))
        .collect();

    Ok(particles)
}

fn rank(samples: &[Sample]) -> Vec<Sample> {
    let mut keyed: Vec<(f32, Sample)> = samples
        .iter()
        .map(|s| (brightness(s.r, s.g, s.b), *s))
        .collect();

    // `sort_by` is stable.
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, s)| s).collect()
}
