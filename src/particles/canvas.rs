//! Drawing surface abstraction and a recorded display list.
//!
//! Coordinates are in the virtual surface (`SURFACE_WIDTH` x
//! `SURFACE_HEIGHT`), origin top-left, y pointing down.

pub const SURFACE_WIDTH: f32 = 1280.0;
pub const SURFACE_HEIGHT: f32 = 720.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Inside the virtual surface.
    pub fn on_surface(&self) -> bool {
        (0.0..=SURFACE_WIDTH).contains(&self.x) && (0.0..=SURFACE_HEIGHT).contains(&self.y)
    }
}

/// Hue in degrees, saturation/lightness/alpha in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub h: f32,
    pub s: f32,
    pub l: f32,
    pub a: f32,
}

impl Hsla {
    pub const fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self { h, s, l, a }
    }

    pub const WHITE: Hsla = Hsla::new(0.0, 0.0, 1.0, 1.0);

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// sRGB bytes, alpha ignored.
    pub fn to_rgb(&self) -> [u8; 3] {
        let h = self.h.rem_euclid(360.0) / 60.0;
        let s = self.s.clamp(0.0, 1.0);
        let l = self.l.clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let byte = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        [byte(r), byte(g), byte(b)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// 0.0 at the gradient center, 1.0 at its edge.
    pub offset: f32,
    pub color: Hsla,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Point,
    pub radius: f32,
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    /// Color at `offset` in [0, 1], interpolated between stops.
    pub fn sample(&self, offset: f32) -> Option<Hsla> {
        let first = self.stops.first()?;
        if offset <= first.offset {
            return Some(first.color);
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if offset <= b.offset {
                let t = (offset - a.offset) / (b.offset - a.offset).max(f32::EPSILON);
                let lerp = |x: f32, y: f32| x + (y - x) * t;
                return Some(Hsla::new(
                    lerp(a.color.h, b.color.h),
                    lerp(a.color.s, b.color.s),
                    lerp(a.color.l, b.color.l),
                    lerp(a.color.a, b.color.a),
                ));
            }
        }
        self.stops.last().map(|s| s.color)
    }
}

pub trait Canvas {
    fn fill_background(&mut self, color: Hsla);
    fn grid_line(&mut self, from: Point, to: Point, color: Hsla);
    /// Closed polygon filled with a radial gradient.
    fn fill_blob(&mut self, outline: &[Point], fill: &RadialGradient);
    fn stroke_outline(&mut self, outline: &[Point], color: Hsla, width: f32);
    /// Translucent rectangle over the whole surface.
    fn fill_overlay(&mut self, color: Hsla);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Background(Hsla),
    GridLine { from: Point, to: Point, color: Hsla },
    Blob { outline: Vec<Point>, fill: RadialGradient },
    Outline { outline: Vec<Point>, color: Hsla, width: f32 },
    Overlay(Hsla),
}

/// Canvas that records commands for a host (or a test) to replay.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    cmds: Vec<DrawCmd>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn blobs(&self) -> impl Iterator<Item = (&[Point], &RadialGradient)> {
        self.cmds.iter().filter_map(|cmd| match cmd {
            DrawCmd::Blob { outline, fill } => Some((outline.as_slice(), fill)),
            _ => None,
        })
    }
}

impl Canvas for DisplayList {
    fn fill_background(&mut self, color: Hsla) {
        self.cmds.push(DrawCmd::Background(color));
    }

    fn grid_line(&mut self, from: Point, to: Point, color: Hsla) {
        self.cmds.push(DrawCmd::GridLine { from, to, color });
    }

    fn fill_blob(&mut self, outline: &[Point], fill: &RadialGradient) {
        self.cmds.push(DrawCmd::Blob {
            outline: outline.to_vec(),
            fill: fill.clone(),
        });
    }

    fn stroke_outline(&mut self, outline: &[Point], color: Hsla, width: f32) {
        self.cmds.push(DrawCmd::Outline {
            outline: outline.to_vec(),
            color,
            width,
        });
    }

    fn fill_overlay(&mut self, color: Hsla) {
        self.cmds.push(DrawCmd::Overlay(color));
    }
}
