//! Terminal rendering. Each cell shows two pixel rows: the upper pixel as the
//! `▀` foreground, the lower as the background.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

use crate::particle::Particle;
use crate::raster::Raster;

const UPPER_HALF: &str = "▀";

/// Terminal cells needed to show a `side × side` image.
pub fn cell_size(side: u32) -> (u16, u16) {
    let w = side.min(u32::from(u16::MAX)) as u16;
    let h = side.div_ceil(2).min(u32::from(u16::MAX)) as u16;
    (w, h)
}

/// Paints particles at their current positions on a cleared surface.
///
/// Later particles overwrite earlier ones that land on the same pixel.
pub struct ParticleView<'a> {
    particles: &'a [Particle],
    side: u32,
    background: Color,
}

impl<'a> ParticleView<'a> {
    pub fn new(particles: &'a [Particle], side: u32) -> Self {
        Self {
            particles,
            side,
            background: Color::Black,
        }
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }
}

impl Widget for ParticleView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = clip(area, self.side);
        clear(area, buf, self.background);

        for p in self.particles {
            let (x, y) = p.cell();
            let [r, g, b] = p.color;
            put_pixel(area, buf, x, y, Color::Rgb(r, g, b));
        }
    }
}

/// Shows a raster as-is, e.g. the drawing surface.
pub struct RasterView<'a> {
    raster: &'a Raster,
}

impl<'a> RasterView<'a> {
    pub fn new(raster: &'a Raster) -> Self {
        Self { raster }
    }
}

impl Widget for RasterView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = clip(area, self.raster.width().max(self.raster.height()));
        clear(area, buf, Color::Black);

        for y in 0..self.raster.height() {
            for x in 0..self.raster.width() {
                let [r, g, b] = self.raster.rgb(x, y);
                put_pixel(area, buf, x as i32, y as i32, Color::Rgb(r, g, b));
            }
        }
    }
}

fn clip(area: Rect, side: u32) -> Rect {
    let (w, h) = cell_size(side);
    Rect {
        width: area.width.min(w),
        height: area.height.min(h),
        ..area
    }
}

fn clear(area: Rect, buf: &mut Buffer, color: Color) {
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            let cell = &mut buf[(x, y)];
            cell.set_symbol(UPPER_HALF);
            cell.set_style(Style::new().fg(color).bg(color));
        }
    }
}

fn put_pixel(area: Rect, buf: &mut Buffer, x: i32, y: i32, color: Color) {
    if x < 0 || y < 0 {
        return;
    }

    let col = x as u32;
    let row = y as u32 / 2;

    if col >= u32::from(area.width) || row >= u32::from(area.height) {
        return;
    }

    let cell = &mut buf[(area.x + col as u16, area.y + row as u16)];

    if y % 2 == 0 {
        cell.set_fg(color);
    } else {
        cell.set_bg(color);
    }
}
