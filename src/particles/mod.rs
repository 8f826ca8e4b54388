//! Bubble field: one drifting, wobbling bubble per dispatched transaction,
//! over a congestion-tinted background.

pub mod ambient;
pub mod bubble;
pub mod canvas;

use rand::Rng;

pub use ambient::Ambient;
pub use bubble::Bubble;
pub use canvas::{Canvas, DisplayList, DrawCmd, Hsla, Point, SURFACE_HEIGHT, SURFACE_WIDTH};

use crate::tx::Transaction;

const GLOW_WIDTH: f32 = 3.0;

#[derive(Debug)]
pub struct ParticleEngine<R> {
    bubbles: Vec<Bubble>,
    ambient: Ambient,
    rng: R,
    pointer: Option<Point>,
    hovered: Option<usize>,
    frame: u64,
}

impl<R: Rng> ParticleEngine<R> {
    pub fn new(rng: R) -> Self {
        Self {
            bubbles: Vec::new(),
            ambient: Ambient::default(),
            rng,
            pointer: None,
            hovered: None,
            frame: 0,
        }
    }

    pub fn add_transaction(&mut self, tx: Transaction) {
        let bubble = Bubble::spawn(tx, &mut self.rng);
        if bubble.is_whale {
            tracing::debug!(id = %bubble.tx.id, btc = bubble.tx.btc(), "whale bubble");
        }
        self.bubbles.push(bubble);
    }

    pub fn flash_block(&mut self) {
        self.ambient.flash();
    }

    /// Feed the congestion average. Called for every ingested transaction,
    /// dispatched or not.
    pub fn observe_fee_rate(&mut self, fee_rate: f64) {
        self.ambient.observe_fee_rate(fee_rate);
    }

    /// Pointer position in surface units, None when it left the surface.
    pub fn set_pointer(&mut self, pointer: Option<Point>) {
        self.pointer = pointer.filter(Point::on_surface);
    }

    /// Advance one frame: motion, aging, removal, hover.
    pub fn step(&mut self) {
        self.frame += 1;
        self.ambient.step();
        let time = self.frame as f32;

        self.hovered = None;
        // newest first so removal does not disturb unvisited indices
        for i in (0..self.bubbles.len()).rev() {
            self.bubbles[i].update(time);
            if self.bubbles[i].is_expired() {
                self.bubbles.remove(i);
                // indices above `i` shifted down by one
                self.hovered = self.hovered.map(|h| h - 1);
                continue;
            }
            if let Some(pointer) = self.pointer {
                if self.bubbles[i].contains(pointer) {
                    self.hovered = Some(i);
                }
            }
        }
    }

    /// Draw the current state without advancing it.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let time = self.frame as f32;
        self.ambient.draw_background(canvas);
        for bubble in &self.bubbles {
            let outline = bubble.outline(time);
            canvas.fill_blob(&outline, &bubble.gradient(time));
            if bubble.has_glow() {
                canvas.stroke_outline(&outline, bubble.glow_color(), GLOW_WIDTH);
            }
        }
        self.ambient.draw_overlay(canvas);
    }

    /// One display refresh: `step` then `draw`.
    pub fn render_frame<C: Canvas + ?Sized>(&mut self, canvas: &mut C) {
        self.step();
        self.draw(canvas);
    }

    /// Transaction under the pointer as of the last step.
    pub fn hovered(&self) -> Option<&Transaction> {
        self.hovered.and_then(|i| self.bubbles.get(i)).map(|b| &b.tx)
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn ambient(&self) -> &Ambient {
        &self.ambient
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[cfg(test)]
    pub(crate) fn bubbles_mut(&mut self) -> &mut [Bubble] {
        &mut self.bubbles
    }
}
