use crate::error::{MorphError, MorphResult};
use crate::raster::Raster;

/// One raster pixel with its grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub x: u16,
    pub y: u16,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Sample {
    pub fn rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Extracts `side * side` samples, row-major (y outer, x inner).
///
/// The raster must be exactly `side × side`.
pub fn sample(raster: &Raster, side: u32) -> MorphResult<Vec<Sample>> {
    if raster.width() != side || raster.height() != side || side > u32::from(u16::MAX) + 1 {
        return Err(MorphError::InvalidRaster {
            width: raster.width(),
            height: raster.height(),
            side,
        });
    }

    let samples = raster
        .as_rgba()
        .chunks_exact(4)
        .enumerate()
        .map(|(i, px)| Sample {
            x: (i % side as usize) as u16,
            y: (i / side as usize) as u16,
            r: px[0],
            g: px[1],
            b: px[2],
        })
        .collect();

    Ok(samples)
}
