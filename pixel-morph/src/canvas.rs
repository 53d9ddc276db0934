use crate::raster::Raster;

const PAPER: [u8; 3] = [255, 255, 255];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    /// Stroke width in pixels.
    pub size: f32,
    pub color: [u8; 3],
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            size: 5.0,
            color: [0, 0, 0],
        }
    }
}

/// Square drawing surface painted with round-capped strokes.
///
/// Starts out white. [`snapshot`](Self::snapshot) yields the raster a live
/// morph re-samples after every stroke.
#[derive(Debug, Clone)]
pub struct Canvas {
    raster: Raster,
    pub brush: Brush,
}

impl Canvas {
    pub fn new(side: u32) -> Self {
        Self {
            raster: Raster::filled(side, side, PAPER),
            brush: Brush::default(),
        }
    }

    pub fn side(&self) -> u32 {
        self.raster.width()
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn snapshot(&self) -> Raster {
        self.raster.clone()
    }

    pub fn clear(&mut self) {
        self.raster.fill(PAPER);
    }

    /// Paints every pixel whose center lies within `brush.size / 2` of the
    /// segment `from → to`. Coordinates are in pixel space; `(x + 0.5, y + 0.5)`
    /// is the center of pixel `(x, y)`.
    pub fn stroke(&mut self, from: (f32, f32), to: (f32, f32)) {
        let radius = (self.brush.size / 2.0).max(0.0);
        let side = self.side() as f32;

        let min_x = (from.0.min(to.0) - radius).floor().clamp(0.0, side) as u32;
        let max_x = (from.0.max(to.0) + radius).ceil().clamp(0.0, side) as u32;
        let min_y = (from.1.min(to.1) - radius).floor().clamp(0.0, side) as u32;
        let max_y = (from.1.max(to.1) + radius).ceil().clamp(0.0, side) as u32;

        for y in min_y..max_y {
            for x in min_x..max_x {
                let center = (x as f32 + 0.5, y as f32 + 0.5);

                if distance_to_segment(center, from, to) <= radius {
                    self.raster.set_rgb(x, y, self.brush.color);
                }
            }
        }
    }
}

fn distance_to_segment(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let ab = (b.0 - a.0, b.1 - a.1);
    let ap = (p.0 - a.0, p.1 - a.1);
    let len_sq = ab.0 * ab.0 + ab.1 * ab.1;

    let t = if len_sq == 0.0 {
        0.0
    } else {
        ((ap.0 * ab.0 + ap.1 * ab.1) / len_sq).clamp(0.0, 1.0)
    };

    let closest = (a.0 + ab.0 * t, a.1 + ab.1 * t);
    ((p.0 - closest.0).powi(2) + (p.1 - closest.1).powi(2)).sqrt()
}
