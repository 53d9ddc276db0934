use crate::particle::Particle;

/// Moves every particle to `start + (target - start) * progress`.
///
/// `progress` is the already-eased global scalar shared by all particles.
pub fn apply(particles: &mut [Particle], progress: f32) {
    for p in particles.iter_mut() {
        p.current = (
            lerp_pos(p.start.0, p.target.0, progress),
            lerp_pos(p.start.1, p.target.1, progress),
        );
    }
}

fn lerp_pos(src: u16, dst: u16, t: f32) -> f32 {
    let s = f32::from(src);
    let d = f32::from(dst);
    s + (d - s) * t
}
