//! TUI: bubble field, scope, status line and hover tooltip.

mod field;
mod scope;
mod status;

use std::time::{Duration, Instant};

use blockdub::{
    particles::{DisplayList, Point, SURFACE_HEIGHT, SURFACE_WIDTH},
    synth::VoiceSink,
    Session,
};
use color_eyre::eyre::Result as EyreResult;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEvent,
        MouseEventKind,
    },
    execute,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};

use crate::{audio_out::ScopeTap, feed::FeedHandle};

use field::render_field;
use scope::{render_scope, AudioStats};
use status::render_status;

/// Scope window length in samples.
const SCOPE_LEN: usize = 1024;
/// Longest wait for input before the loops are serviced again.
const MAX_WAIT: Duration = Duration::from_millis(16);

/// Take over the terminal, run the app, restore the terminal.
pub fn run<S: VoiceSink>(
    session: &mut Session<S>,
    feed: &mut FeedHandle,
    clock: Instant,
    scope: Option<ScopeTap>,
) -> EyreResult<()> {
    let mut terminal = ratatui::init();
    execute!(std::io::stdout(), EnableMouseCapture)?;
    let result = App::new(session, feed, clock, scope).run(&mut terminal);
    execute!(std::io::stdout(), DisableMouseCapture)?;
    ratatui::restore();
    result
}

pub struct App<'a, S> {
    session: &'a mut Session<S>,
    feed: &'a mut FeedHandle,
    clock: Instant,
    scope: Option<ScopeTap>,
    scope_buffer: Vec<f32>,
    display: DisplayList,
    /// Inner area of the field as last drawn, for mouse mapping.
    field_area: Rect,
    should_quit: bool,
}

impl<'a, S: VoiceSink> App<'a, S> {
    pub fn new(
        session: &'a mut Session<S>,
        feed: &'a mut FeedHandle,
        clock: Instant,
        scope: Option<ScopeTap>,
    ) -> Self {
        Self {
            session,
            feed,
            clock,
            scope,
            scope_buffer: vec![0.0; SCOPE_LEN],
            display: DisplayList::new(),
            field_area: Rect::default(),
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            let now = self.clock.elapsed();
            let session = &mut *self.session;
            self.feed.drain(|event| session.ingest(event));
            self.session.poll(now);

            if self.session.frame_due(now) {
                self.display.clear();
                self.session.render_frame(&mut self.display);
                self.poll_scope();
                terminal.draw(|frame| self.render(frame))?;
            }

            let wait = self
                .session
                .next_wakeup()
                .map(|due| due.saturating_sub(self.clock.elapsed()))
                .unwrap_or(MAX_WAIT)
                .min(MAX_WAIT);
            if event::poll(wait)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key.code),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Keep the newest `SCOPE_LEN` samples.
    fn poll_scope(&mut self) {
        let Some(tap) = self.scope.as_mut() else {
            return;
        };
        while let Ok(sample) = tap.samples.pop() {
            self.scope_buffer.push(sample);
        }
        if self.scope_buffer.len() > SCOPE_LEN {
            let excess = self.scope_buffer.len() - SCOPE_LEN;
            self.scope_buffer.drain(0..excess);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.session.nudge_volume(1),
            KeyCode::Char('-') | KeyCode::Char('_') => self.session.nudge_volume(-1),
            KeyCode::Char('m') | KeyCode::Char('M') => self.session.toggle_mute(),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
            let pointer = surface_point(self.field_area, mouse.column, mouse.row);
            self.session.set_pointer(pointer);
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let has_scope = self.scope.is_some();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(8),                                      // Bubble field
                Constraint::Length(if has_scope { 7 } else { 0 }),       // Scope
                Constraint::Length(4),                                   // Status + tooltip
                Constraint::Length(1),                                   // Help bar
            ])
            .split(frame.area());

        self.field_area = render_field(frame, chunks[0], &self.display);

        let stats = AudioStats::from_buffer(&self.scope_buffer);
        if let Some(tap) = &self.scope {
            render_scope(frame, chunks[1], &self.scope_buffer, tap.sample_rate);
        }

        render_status(frame, chunks[2], self.session, &stats);

        let help = Paragraph::new(" [Q] Quit  [+/-] Volume  [M] Mute  (hover a bubble for details)")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}

/// Terminal cell to surface coordinates; None outside the field.
fn surface_point(area: Rect, column: u16, row: u16) -> Option<Point> {
    if area.width == 0 || area.height == 0 {
        return None;
    }
    let inside = column >= area.x
        && column < area.x + area.width
        && row >= area.y
        && row < area.y + area.height;
    if !inside {
        return None;
    }
    let fx = (column - area.x) as f32 + 0.5;
    let fy = (row - area.y) as f32 + 0.5;
    Some(Point::new(
        fx / area.width as f32 * SURFACE_WIDTH,
        fy / area.height as f32 * SURFACE_HEIGHT,
    ))
}
