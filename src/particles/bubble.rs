use std::f32::consts::TAU;

use rand::Rng;

use super::canvas::{ColorStop, Hsla, Point, RadialGradient, SURFACE_HEIGHT, SURFACE_WIDTH};
use crate::{
    mapping::{radius_for_value, WHALE_HUE},
    tx::Transaction,
};

/// Vertices in a bubble outline.
pub const OUTLINE_VERTICES: usize = 14;
/// Life lost per frame; a bubble lives 500 frames at most.
pub const LIFE_DECAY: f32 = 0.002;
pub const MAX_ALPHA: f32 = 0.9;
/// Fee rate above which a bubble gets a glow rim.
pub const GLOW_FEE_RATE: f64 = 100.0;

const DRIFT_SPEED: f32 = 0.02;
const DRIFT_AMPLITUDE: f32 = 0.3;
const WOBBLE_PRIMARY: (f32, f32) = (0.03, 0.08);
const WOBBLE_SECONDARY: (f32, f32) = (0.047, 0.05);
/// Gradient center orbit, as a fraction of the radius.
const HIGHLIGHT_ORBIT: f32 = 0.2;

/// One transaction on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub tx: Transaction,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub life: f32,
    pub alpha: f32,
    pub hue: f32,
    pub is_whale: bool,
    pub pulse_offset: f32,
    pub noise: [f32; OUTLINE_VERTICES],
}

impl Bubble {
    /// New bubble just below the bottom edge, drifting up.
    pub fn spawn<R: Rng>(tx: Transaction, rng: &mut R) -> Self {
        let radius = radius_for_value(tx.value);
        let is_whale = tx.is_whale();
        let hue = tx.hue();

        let x = rng.gen_range(0.0..SURFACE_WIDTH);
        let vx = rng.gen_range(-0.3..0.3);
        // whales rise at a fraction of the speed
        let vy = if is_whale {
            -rng.gen_range(0.1..0.25)
        } else {
            -rng.gen_range(0.6..1.5)
        };
        let mut noise = [0.0; OUTLINE_VERTICES];
        for phase in noise.iter_mut() {
            *phase = rng.gen_range(0.0..TAU);
        }

        Self {
            x,
            y: SURFACE_HEIGHT + radius,
            vx,
            vy,
            radius,
            life: 1.0,
            alpha: MAX_ALPHA,
            hue,
            is_whale,
            pulse_offset: rng.gen_range(0.0..TAU),
            noise,
            tx,
        }
    }

    /// One frame of motion and aging. `time` is the frame counter.
    pub fn update(&mut self, time: f32) {
        self.x += self.vx + (time * DRIFT_SPEED + self.pulse_offset).sin() * DRIFT_AMPLITUDE;
        self.y += self.vy;
        self.life -= LIFE_DECAY;
        self.alpha = (self.life * 3.0).clamp(0.0, MAX_ALPHA);
    }

    pub fn is_expired(&self) -> bool {
        self.life <= 0.0 || self.y + self.radius * 3.0 < 0.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn contains(&self, point: Point) -> bool {
        self.center().distance(point) <= self.radius
    }

    /// Hue actually drawn: whales are always warm.
    pub fn display_hue(&self) -> f32 {
        if self.is_whale {
            WHALE_HUE
        } else {
            self.hue
        }
    }

    pub fn has_glow(&self) -> bool {
        self.is_whale || self.tx.fee_rate > GLOW_FEE_RATE
    }

    /// Wobbling outline. Each vertex mixes two sinusoids: one at its own
    /// phase, one at the phase of the vertex three steps ahead.
    pub fn outline(&self, time: f32) -> [Point; OUTLINE_VERTICES] {
        let mut points = [Point::default(); OUTLINE_VERTICES];
        for (i, point) in points.iter_mut().enumerate() {
            let angle = i as f32 / OUTLINE_VERTICES as f32 * TAU;
            let own = self.noise[i];
            let ahead = self.noise[(i + 3) % OUTLINE_VERTICES];
            let wobble = (time * WOBBLE_PRIMARY.0 + own).sin() * WOBBLE_PRIMARY.1
                + (time * WOBBLE_SECONDARY.0 + ahead).sin() * WOBBLE_SECONDARY.1;
            let r = self.radius * (1.0 + wobble);
            *point = Point::new(self.x + angle.cos() * r, self.y + angle.sin() * r);
        }
        points
    }

    pub fn gradient(&self, time: f32) -> RadialGradient {
        let orbit = time * DRIFT_SPEED + self.pulse_offset;
        let center = Point::new(
            self.x + orbit.cos() * self.radius * HIGHLIGHT_ORBIT,
            self.y + orbit.sin() * self.radius * HIGHLIGHT_ORBIT,
        );
        let hue = self.display_hue();
        let lightness = if self.is_whale { 0.72 } else { 0.55 };
        RadialGradient {
            center,
            radius: self.radius,
            stops: vec![
                ColorStop {
                    offset: 0.0,
                    color: Hsla::new(hue, 0.8, lightness, self.alpha),
                },
                ColorStop {
                    offset: 0.7,
                    color: Hsla::new(hue, 0.7, lightness - 0.15, self.alpha * 0.5),
                },
                ColorStop {
                    offset: 1.0,
                    color: Hsla::new(hue, 0.7, lightness - 0.25, 0.0),
                },
            ],
        }
    }

    pub fn glow_color(&self) -> Hsla {
        Hsla::new(self.display_hue(), 0.9, 0.7, self.alpha * 0.35)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    fn bubble(value: u64, fee_rate: f64) -> Bubble {
        let mut rng = SmallRng::seed_from_u64(3);
        Bubble::spawn(Transaction::new("t", value, fee_rate), &mut rng)
    }

    #[test]
    fn spawns_below_the_surface() {
        let b = bubble(500_000, 200.0);
        assert!(b.y > SURFACE_HEIGHT);
        assert!(b.vy < 0.0);
        assert!((b.radius - 42.247).abs() < 0.01);
        assert!((b.hue - 36.0).abs() < 1e-3);
        assert!(b.has_glow());
    }

    #[test]
    fn whale_is_big_slow_and_warm() {
        let b = bubble(250_000_000, 5.0);
        assert!(b.is_whale);
        assert_eq!(b.radius, 180.0);
        assert!(b.vy.abs() < 0.3);
        assert_eq!(b.display_hue(), WHALE_HUE);
        assert_ne!(b.hue, WHALE_HUE);
    }

    #[test]
    fn alpha_tracks_remaining_life() {
        let mut b = bubble(10_000, 2.0);
        b.update(0.0);
        assert_eq!(b.alpha, MAX_ALPHA);
        b.life = 0.2 + LIFE_DECAY;
        b.update(1.0);
        assert!((b.alpha - 0.6).abs() < 1e-4);
    }

    #[test]
    fn expiry_by_life_or_leaving_the_top() {
        let mut b = bubble(10_000, 2.0);
        assert!(!b.is_expired());
        b.life = 0.0;
        assert!(b.is_expired());

        let mut high = bubble(10_000, 2.0);
        high.y = -high.radius * 3.0 - 0.5;
        assert!(high.life > 0.0);
        assert!(high.is_expired());
    }

    #[test]
    fn outline_wobbles_within_bounds() {
        let b = bubble(5_000_000, 10.0);
        let max = WOBBLE_PRIMARY.1 + WOBBLE_SECONDARY.1;
        for t in [0.0, 17.0, 250.0] {
            for p in b.outline(t) {
                let d = b.center().distance(p) / b.radius;
                assert!(d >= 1.0 - max - 1e-4 && d <= 1.0 + max + 1e-4);
            }
        }
        let a = b.outline(0.0);
        let later = b.outline(40.0);
        assert_ne!(a, later);
    }

    #[test]
    fn gradient_fades_to_transparent() {
        let b = bubble(5_000_000, 10.0);
        let g = b.gradient(12.0);
        assert_eq!(g.stops.last().map(|s| s.color.a), Some(0.0));
        assert!(g.center.distance(b.center()) <= b.radius * HIGHLIGHT_ORBIT + 1e-3);
    }
}
