//! Paints the particle display list onto a ratatui canvas.
//!
//! The terminal has no alpha, so translucency is approximated by blending
//! each color toward the background, and gradient fills become a few
//! concentric outlines.

use blockdub::particles::{
    canvas::RadialGradient, DisplayList, DrawCmd, Hsla, Point, SURFACE_HEIGHT, SURFACE_WIDTH,
};
use ratatui::{
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Context, Line},
        Block, Borders,
    },
    Frame,
};

/// Rings drawn per blob: (scale toward the center, gradient offset).
const FILL_RINGS: [(f32, f32); 3] = [(1.0, 0.6), (0.66, 0.3), (0.33, 0.0)];

const FALLBACK_BACKGROUND: Hsla = Hsla::new(225.0, 0.45, 0.06, 1.0);

/// Draw the field; returns the inner area used for mouse mapping.
pub fn render_field(frame: &mut Frame, area: Rect, display: &DisplayList) -> Rect {
    let mut background = FALLBACK_BACKGROUND.to_rgb();
    let mut flash = 0.0;
    for cmd in display.commands() {
        match cmd {
            DrawCmd::Background(color) => background = color.to_rgb(),
            DrawCmd::Overlay(color) => flash = color.a,
            _ => {}
        }
    }
    let background = blend([255, 255, 255], background, flash);

    let block = Block::default().title(" blockdub ").borders(Borders::ALL);
    let inner = block.inner(area);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .background_color(rgb(background))
        .x_bounds([0.0, SURFACE_WIDTH as f64])
        .y_bounds([0.0, SURFACE_HEIGHT as f64])
        .paint(|ctx| {
            for cmd in display.commands() {
                if let DrawCmd::GridLine { from, to, color } = cmd {
                    segment(ctx, *from, *to, shade(*color, background));
                }
            }
            ctx.layer();
            for cmd in display.commands() {
                match cmd {
                    DrawCmd::Blob { outline, fill } => blob(ctx, outline, fill, background),
                    DrawCmd::Outline { outline, color, .. } => {
                        polygon(ctx, outline, shade(*color, background))
                    }
                    _ => {}
                }
            }
        });

    frame.render_widget(canvas, area);
    inner
}

fn blob(ctx: &mut Context, outline: &[Point], fill: &RadialGradient, background: [u8; 3]) {
    if outline.is_empty() {
        return;
    }
    let n = outline.len() as f32;
    let cx = outline.iter().map(|p| p.x).sum::<f32>() / n;
    let cy = outline.iter().map(|p| p.y).sum::<f32>() / n;

    for (scale, offset) in FILL_RINGS {
        let Some(color) = fill.sample(offset) else {
            continue;
        };
        let ring: Vec<Point> = outline
            .iter()
            .map(|p| Point::new(cx + (p.x - cx) * scale, cy + (p.y - cy) * scale))
            .collect();
        polygon(ctx, &ring, shade(color, background));
    }
}

fn polygon(ctx: &mut Context, points: &[Point], color: Color) {
    for (i, &from) in points.iter().enumerate() {
        let to = points[(i + 1) % points.len()];
        segment(ctx, from, to, color);
    }
}

/// Surface y points down, canvas y points up.
fn segment(ctx: &mut Context, from: Point, to: Point, color: Color) {
    let flip = |y: f32| (SURFACE_HEIGHT - y) as f64;
    ctx.draw(&Line::new(
        from.x as f64,
        flip(from.y),
        to.x as f64,
        flip(to.y),
        color,
    ));
}

fn shade(color: Hsla, background: [u8; 3]) -> Color {
    rgb(blend(color.to_rgb(), background, color.a))
}

fn blend(fg: [u8; 3], bg: [u8; 3], alpha: f32) -> [u8; 3] {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |f: u8, b: u8| (f as f32 * a + b as f32 * (1.0 - a)).round() as u8;
    [mix(fg[0], bg[0]), mix(fg[1], bg[1]), mix(fg[2], bg[2])]
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(r, g, b)
}
