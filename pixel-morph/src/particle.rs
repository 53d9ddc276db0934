/// One source pixel travelling to its matched target position.
///
/// Produced by the matcher, moved by the animator. `current` is the only
/// field that changes after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub color: [u8; 3],
    pub start: (u16, u16),
    pub target: (u16, u16),
    pub current: (f32, f32),
}

impl Particle {
    pub fn new(color: [u8; 3], start: (u16, u16), target: (u16, u16)) -> Self {
        Self {
            color,
            start,
            target,
            current: (f32::from(start.0), f32::from(start.1)),
        }
    }

    /// Grid cell the particle currently covers.
    pub fn cell(&self) -> (i32, i32) {
        (self.current.0.round() as i32, self.current.1.round() as i32)
    }

    pub fn is_stationary(&self) -> bool {
        self.start == self.target
    }
}
