//! Frame-wide layers: congestion-tinted background, scrolling grid, and the
//! block-confirmation flash.

use super::canvas::{Canvas, Hsla, Point, SURFACE_HEIGHT, SURFACE_WIDTH};

pub const FEE_EMA_KEEP: f64 = 0.98;
pub const INITIAL_AVG_FEE_RATE: f64 = 1.0;
/// Average fee rate at which congestion saturates.
pub const CONGESTED_FEE_RATE: f64 = 100.0;

pub const FLASH_DECAY: f32 = 0.02;
pub const FLASH_ALPHA: f32 = 0.3;

const GRID_SPACING: f32 = 64.0;
const GRID_SCROLL: f32 = 0.25;

#[derive(Debug, Clone, PartialEq)]
pub struct Ambient {
    avg_fee_rate: f64,
    flash: f32,
    scroll: f32,
}

impl Default for Ambient {
    fn default() -> Self {
        Self {
            avg_fee_rate: INITIAL_AVG_FEE_RATE,
            flash: 0.0,
            scroll: 0.0,
        }
    }
}

impl Ambient {
    pub fn observe_fee_rate(&mut self, fee_rate: f64) {
        if fee_rate.is_finite() {
            self.avg_fee_rate = self.avg_fee_rate * FEE_EMA_KEEP + fee_rate * (1.0 - FEE_EMA_KEEP);
        }
    }

    pub fn avg_fee_rate(&self) -> f64 {
        self.avg_fee_rate
    }

    /// Congestion in [0, 1].
    pub fn intensity(&self) -> f32 {
        (self.avg_fee_rate / CONGESTED_FEE_RATE).clamp(0.0, 1.0) as f32
    }

    pub fn flash(&mut self) {
        self.flash = 1.0;
    }

    pub fn flash_level(&self) -> f32 {
        self.flash
    }

    pub fn step(&mut self) {
        self.flash = (self.flash - FLASH_DECAY).max(0.0);
        self.scroll = (self.scroll + GRID_SCROLL) % GRID_SPACING;
    }

    /// Deep blue when calm, dark red when congested.
    pub fn background(&self) -> Hsla {
        let t = self.intensity();
        Hsla::new(225.0 - 220.0 * t, 0.45 + 0.2 * t, 0.06 + 0.05 * t, 1.0)
    }

    pub fn grid_color(&self) -> Hsla {
        let t = self.intensity();
        Hsla::new(200.0 - 180.0 * t, 0.6, 0.5, 0.04 + 0.12 * t)
    }

    pub fn draw_background<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.fill_background(self.background());

        let color = self.grid_color();
        let mut x = -self.scroll;
        while x <= SURFACE_WIDTH {
            canvas.grid_line(Point::new(x, 0.0), Point::new(x, SURFACE_HEIGHT), color);
            x += GRID_SPACING;
        }
        let mut y = SURFACE_HEIGHT + self.scroll - GRID_SPACING * (SURFACE_HEIGHT / GRID_SPACING).ceil();
        while y <= SURFACE_HEIGHT {
            canvas.grid_line(Point::new(0.0, y), Point::new(SURFACE_WIDTH, y), color);
            y += GRID_SPACING;
        }
    }

    pub fn draw_overlay<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        if self.flash > 0.0 {
            canvas.fill_overlay(Hsla::WHITE.with_alpha(FLASH_ALPHA * self.flash));
        }
    }
}
